//! Subcommands: validate draft documents and merge author batches.
//!
//! Both read JSON files and write JSON to the supplied writer so they can be
//! exercised without touching stdout.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Serialize;
use serde_json::Value;
use spay_core::currency::DefaultCurrencies;
use spay_core::error::CoreError;
use spay_core::payments::{validate, FieldErrors, ProductDraft};
use spay_core::revisions::authors::{parse_user_records, AuthorCache, UserRecord};

use crate::config::Config;

// ---------------------------------------------------------------------------
// validate
// ---------------------------------------------------------------------------

/// One line of `validate` output.
#[derive(Debug, Serialize)]
struct DraftReport<'a> {
    file: &'a str,
    index: usize,
    is_valid: bool,
    currency_valid: bool,
    errors: FieldErrors,
}

/// Validate every draft in `paths`, writing one JSON report line per draft.
///
/// A file holds either one draft object or an array of them. Drafts with no
/// currency get the configured default. Returns whether every draft passed.
pub fn validate_documents(
    paths: &[PathBuf],
    config: &Config,
    out: &mut impl Write,
) -> anyhow::Result<bool> {
    let mut all_valid = true;

    for path in paths {
        let drafts = read_drafts(path)?;
        let file = path.display().to_string();

        for (index, mut draft) in drafts.into_iter().enumerate() {
            if draft.currency.is_none() {
                draft.currency = Some(config.default_currency.to_string());
            }
            let result = validate(&draft, &DefaultCurrencies);
            all_valid &= result.is_valid;

            let report = DraftReport {
                file: &file,
                index,
                is_valid: result.is_valid,
                currency_valid: result.currency_valid,
                errors: result.errors,
            };
            serde_json::to_writer(&mut *out, &report)?;
            writeln!(out)?;
        }

        tracing::info!(file = %file, "Validated drafts");
    }

    Ok(all_valid)
}

fn read_drafts(path: &Path) -> anyhow::Result<Vec<ProductDraft>> {
    let document = read_json(path)?;
    let drafts = match document {
        Value::Array(items) => items,
        obj @ Value::Object(_) => vec![obj],
        _ => {
            return Err(CoreError::Validation(format!(
                "{} must hold a draft object or an array of drafts",
                path.display()
            ))
            .into())
        }
    };

    drafts
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            serde_json::from_value(value)
                .with_context(|| format!("{}: draft {index} is malformed", path.display()))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// merge-authors
// ---------------------------------------------------------------------------

/// Counts reported after `merge-authors`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeSummary {
    pub cached: usize,
    pub rejected: usize,
    pub changed: bool,
}

/// Load the author cache in `cache_path`, merge each batch file in order and
/// write the resulting cache as a JSON array sorted by user id.
///
/// Malformed user records are logged and skipped.
pub fn merge_authors(
    cache_path: &Path,
    batch_paths: &[PathBuf],
    out: &mut impl Write,
) -> anyhow::Result<MergeSummary> {
    let (initial_users, mut rejected) = read_users(cache_path)?;
    let initial = AuthorCache::from_iter(initial_users);
    let mut cache = initial.clone();

    for path in batch_paths {
        let (users, skipped) = read_users(path)?;
        rejected += skipped;
        let merged = cache.merge(users);
        tracing::info!(
            file = %path.display(),
            changed = !merged.same_as(&cache),
            "Merged author batch",
        );
        cache = merged;
    }

    let mut users: Vec<&UserRecord> = cache.iter().collect();
    users.sort_by_key(|user| user.id);
    serde_json::to_writer_pretty(&mut *out, &users)?;
    writeln!(out)?;

    Ok(MergeSummary {
        cached: cache.len(),
        rejected,
        changed: !cache.same_as(&initial),
    })
}

fn read_users(path: &Path) -> anyhow::Result<(Vec<UserRecord>, usize)> {
    let document = read_json(path)?;
    let raw = match document {
        Value::Array(items) => items,
        _ => anyhow::bail!("{} must hold an array of user records", path.display()),
    };

    let mut users = Vec::with_capacity(raw.len());
    let mut rejected = 0;
    for (index, parsed) in parse_user_records(&raw).into_iter().enumerate() {
        match parsed {
            Ok(user) => users.push(user),
            Err(e) => {
                rejected += 1;
                tracing::warn!(file = %path.display(), index, error = %e, "Skipping user record");
            }
        }
    }
    Ok((users, rejected))
}

fn read_json(path: &Path) -> anyhow::Result<Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("{} is not valid JSON", path.display()))
}
