use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "spay-check")]
#[command(about = "Validate simple payment drafts and merge revision-author batches.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Validate product drafts and print one report per draft
    #[command(alias = "v")]
    Validate {
        #[arg(required = true)]
        drafts: Vec<PathBuf>,
    },
    /// Merge user batches into an author cache and print the result
    #[command(alias = "m")]
    MergeAuthors {
        cache: PathBuf,
        batches: Vec<PathBuf>,
    },
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
