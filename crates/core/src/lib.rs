//! `spay-core` -- simple payment product validation and the revision-author
//! cache.
//!
//! Everything here is synchronous and free of I/O: drafts are validated in
//! memory, saved posts are parsed from `serde_json::Value`s the host already
//! fetched, and author batches are merged into an immutable cache.

pub mod currency;
pub mod error;
pub mod payments;
pub mod revisions;
pub mod types;
