//! Songbook - a song catalog with metadata enrichment.
//!
//! Songs are stored in SQLite together with their group. On creation the
//! catalog asks an external music-info service for release date, lyrics and
//! a link; lyrics can then be read verse by verse.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod model;
pub mod musicinfo;
#[cfg(test)]
pub mod test_utils;

use clap::Parser;

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Logging first, so config loading problems are reported
    let log_filter = logging::init();

    let config = match &args.config {
        Some(path) => config::load_from(path),
        None => config::load(),
    };
    logging::apply_level(&log_filter, &config.logging.level);

    cli::run_command(&args, &config)
}
