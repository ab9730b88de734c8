//! Database module for song persistence.
//!
//! Uses SQLx with SQLite. This module owns pool construction and schema
//! migrations; the song queries themselves live in [`songs`].
//!
//! # Example
//!
//! ```ignore
//! use songbook::db::{init_db, songs};
//!
//! let pool = init_db("sqlite:songbook.db", 5).await?;
//! let page = songs::list_songs(&pool, 0, 10).await?;
//! ```

pub mod songs;

use std::str::FromStr;
use std::time::Duration;

use sqlx::migrate::MigrateDatabase;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};

/// Default database filename.
pub const DEFAULT_DB_NAME: &str = "songbook.db";

/// How long a connection waits for another writer before reporting `SQLITE_BUSY`.
pub const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Build a SQLite database URL from an optional path.
///
/// If no path is provided, uses [`DEFAULT_DB_NAME`] in the current directory.
pub fn db_url(path: Option<&std::path::Path>) -> String {
    match path {
        Some(p) => format!("sqlite:{}", p.display()),
        None => format!("sqlite:{}", DEFAULT_DB_NAME),
    }
}

/// Initialize the database connection pool and run migrations.
///
/// Creates the database file if it doesn't exist, establishes a connection
/// pool with up to `max_connections` connections, and runs all pending
/// migrations.
///
/// Connections run in WAL mode with a [`BUSY_TIMEOUT`], so concurrent
/// writers queue instead of failing, and readers never block the writer.
/// Foreign keys are switched on explicitly; the `group_song` cascade relies
/// on them.
///
/// # Errors
///
/// Returns an error if:
/// - Database creation fails
/// - Connection cannot be established
/// - Migration fails
pub async fn init_db(db_url: &str, max_connections: u32) -> Result<SqlitePool, sqlx::Error> {
    if !sqlx::Sqlite::database_exists(db_url).await.unwrap_or(false) {
        tracing::info!("Creating database at {}", db_url);
        sqlx::Sqlite::create_database(db_url).await?;
    }

    let options = SqliteConnectOptions::from_str(db_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(BUSY_TIMEOUT)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections.max(1))
        .connect_with(options)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}
