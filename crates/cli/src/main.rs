//! `spay-check` -- validate simple payment drafts and merge revision-author
//! batches from JSON files.
//!
//! ```text
//! spay-check validate <draft.json>...
//! spay-check merge-authors <cache.json> <batch.json>...
//! ```
//!
//! `validate` prints one JSON report per draft and exits with status 1 when
//! any draft is invalid. `merge-authors` prints the merged cache.
//!
//! # Environment variables
//!
//! | Variable                | Required | Default                          | Description                       |
//! |-------------------------|----------|----------------------------------|-----------------------------------|
//! | `SPAY_DEFAULT_CURRENCY` | no       | `USD`                            | Currency for drafts that omit one |
//! | `RUST_LOG`              | no       | `spay_check=info,spay_core=warn` | Log filter                        |

use std::io;
use std::process;

use spay_check::args::{CommandLine, Commands};
use spay_check::commands;
use spay_check::config::{Config, DEFAULT_LOG_FILTER};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    let cli = CommandLine::parse_args();
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = Config::from_env().unwrap_or_else(|e| {
        tracing::error!(error = %e, "Invalid configuration");
        process::exit(1);
    });

    let mut stdout = io::stdout().lock();
    let outcome = match cli.command {
        Commands::Validate { drafts } => {
            commands::validate_documents(&drafts, &config, &mut stdout).map(|all_valid| {
                if !all_valid {
                    tracing::info!("One or more drafts failed validation");
                }
                all_valid
            })
        }
        Commands::MergeAuthors { cache, batches } => {
            commands::merge_authors(&cache, &batches, &mut stdout).map(|summary| {
                tracing::info!(
                    cached = summary.cached,
                    rejected = summary.rejected,
                    changed = summary.changed,
                    "Author merge complete",
                );
                true
            })
        }
    };

    match outcome {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            let message = format!("{e:#}");
            tracing::error!(error = %message, "spay-check failed");
            process::exit(1);
        }
    }
}
