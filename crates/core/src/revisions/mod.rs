//! State kept for post revisions.

pub mod authors;
