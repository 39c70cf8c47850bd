//! `spay-check` library crate.
//!
//! Re-exports the argument parser, configuration and subcommands for testing. The binary
//! entrypoint lives in `main.rs`.

pub mod args;
pub mod commands;
pub mod config;
