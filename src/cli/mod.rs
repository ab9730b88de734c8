//! Command-line interface for songbook.
//!
//! Drives the catalog service directly against a local SQLite file, one
//! operation per invocation.

mod commands;

pub use commands::{Cli, Commands, run_command};
