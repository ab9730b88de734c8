//! Test utilities and fixtures for songbook tests.
//!
//! # Example
//!
//! ```ignore
//! use crate::test_utils::{temp_db, seed_song};
//!
//! #[tokio::test]
//! async fn test_something() {
//!     let (pool, _dir) = temp_db().await;
//!     let id = seed_song(&pool, "Muse", "Uprising", "Verse one\n\nVerse two").await;
//!     // ... test logic
//! }
//! ```

use sqlx::sqlite::SqlitePool;
use tempfile::TempDir;

use crate::musicinfo::SongDetail;

/// Creates a migrated database in a temporary directory.
///
/// Keep the returned `TempDir` alive for the duration of the test; the
/// database file is deleted when it is dropped.
pub async fn temp_db() -> (SqlitePool, TempDir) {
    let dir = tempfile::tempdir().expect("Failed to create temp directory");
    let db_path = dir.path().join("test.db");
    let db_url = crate::db::db_url(Some(&db_path));

    let pool = crate::db::init_db(&db_url, 5)
        .await
        .expect("Failed to initialize test database");

    (pool, dir)
}

/// Enrichment data as a healthy provider would return it.
///
/// Customize with struct update syntax:
///
/// ```ignore
/// let detail = SongDetail { link: None, ..mock_song_detail() };
/// ```
pub fn mock_song_detail() -> SongDetail {
    SongDetail {
        release_date: Some("16.07.2006".to_string()),
        lyrics: Some("Ooh baby, don't you know I suffer?\n\nOoh baby, can you hear me moan?".to_string()),
        link: Some("https://www.youtube.com/watch?v=Xsp3_a-PMTw".to_string()),
    }
}

/// Inserts a song and returns its ID.
///
/// Empty `lyrics` are stored as NULL, as for an unenriched song.
pub async fn seed_song(pool: &SqlitePool, group: &str, title: &str, lyrics: &str) -> i64 {
    let detail = SongDetail {
        lyrics: (!lyrics.is_empty()).then(|| lyrics.to_string()),
        ..SongDetail::default()
    };

    crate::db::songs::create_song(pool, group, title, &detail)
        .await
        .expect("Failed to seed song")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_temp_db_creates_working_database() {
        let (pool, _dir) = temp_db().await;

        let songs = crate::db::songs::list_songs(&pool, 0, 10).await.unwrap();
        assert!(songs.is_empty());
    }

    #[tokio::test]
    async fn test_seed_song() {
        let (pool, _dir) = temp_db().await;

        let id = seed_song(&pool, "Muse", "Uprising", "").await;
        assert!(id > 0);

        let song = crate::db::songs::get_song(&pool, id).await.unwrap().unwrap();
        assert_eq!(song.group, "Muse");
        assert_eq!(song.lyrics, None);
    }

    #[test]
    fn test_mock_song_detail_is_complete() {
        let detail = mock_song_detail();
        assert!(!detail.is_empty());
        assert!(detail.release_date.is_some());
        assert!(detail.lyrics.is_some());
        assert!(detail.link.is_some());
    }
}
