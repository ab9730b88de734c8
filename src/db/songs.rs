//! Song queries: atomic create, keyset listing, lookups, update and delete.
//!
//! Every value reaches SQLite as a bound parameter. The only identifiers
//! spliced into query text are the static column names returned by
//! [`filter_column`] and by the update-statement builder.

use sqlx::sqlite::{SqliteConnection, SqlitePool};
use sqlx::{QueryBuilder, Sqlite, Transaction};

use crate::catalog::UpdateStatement;
use crate::error::{Error, Result, ResultExt};
use crate::model::{FilterField, Song, SongFilter};
use crate::musicinfo::SongDetail;

/// Projection shared by every query that returns [`Song`] rows.
const SONG_SELECT: &str = r#"
    SELECT s.id, g.name AS group_name, s.song_name AS title,
           s.release_date, s.lyrics, s.link
    FROM songs s
    JOIN group_song gs ON gs.song_id = s.id
    JOIN music_group g ON g.id = gs.group_id
"#;

/// Physical column for an allowlisted filter.
pub fn filter_column(field: FilterField) -> &'static str {
    match field {
        FilterField::Group => "g.name",
        FilterField::Title => "s.song_name",
        FilterField::ReleaseDate => "s.release_date",
        FilterField::Link => "s.link",
    }
}

// ============================================================================
// Create
// ============================================================================

/// Insert a song together with its group linkage, atomically.
///
/// Runs on one pooled connection: look up (or insert) the group, insert the
/// song, insert the `group_song` link, commit. Any failure rolls the whole
/// thing back and surfaces as [`Error::TransactionFailed`]. If the returned
/// future is dropped before commit, the transaction guard rolls back.
///
/// The transaction takes the write lock up front (see [`begin_write`]), so
/// concurrent creates wait on the busy timeout instead of failing with
/// `SQLITE_BUSY` when a read lock cannot be upgraded.
///
/// # Returns
///
/// The new song's database ID.
pub async fn create_song(
    pool: &SqlitePool,
    group: &str,
    title: &str,
    detail: &SongDetail,
) -> Result<i64> {
    let mut tx = begin_write(pool).await.map_err(Error::TransactionFailed)?;

    match insert_song_rows(&mut tx, group, title, detail).await {
        Ok(id) => {
            tx.commit().await.map_err(Error::TransactionFailed)?;
            Ok(id)
        }
        Err(e) => {
            if let Err(rollback_err) = tx.rollback().await {
                tracing::warn!("Rollback after failed create also failed: {}", rollback_err);
            }
            Err(Error::TransactionFailed(e))
        }
    }
}

/// Start a transaction that holds the database write lock from its first statement.
async fn begin_write(pool: &SqlitePool) -> sqlx::Result<Transaction<'static, Sqlite>> {
    pool.begin_with("BEGIN IMMEDIATE").await
}

async fn insert_song_rows(
    conn: &mut SqliteConnection,
    group: &str,
    title: &str,
    detail: &SongDetail,
) -> sqlx::Result<i64> {
    let group_id = get_or_create_group(conn, group).await?;

    let (song_id,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO songs (song_name, release_date, lyrics, link)
        VALUES (?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(title)
    .bind(detail.release_date.as_deref())
    .bind(detail.lyrics.as_deref())
    .bind(detail.link.as_deref())
    .fetch_one(&mut *conn)
    .await?;

    sqlx::query("INSERT INTO group_song (group_id, song_id) VALUES (?, ?)")
        .bind(group_id)
        .bind(song_id)
        .execute(&mut *conn)
        .await?;

    Ok(song_id)
}

/// Get or create a group by exact name.
///
/// Idempotent: calling with the same name always yields the same ID.
async fn get_or_create_group(conn: &mut SqliteConnection, name: &str) -> sqlx::Result<i64> {
    let row: Option<(i64,)> = sqlx::query_as("SELECT id FROM music_group WHERE name = ?")
        .bind(name)
        .fetch_optional(&mut *conn)
        .await?;

    if let Some((id,)) = row {
        return Ok(id);
    }

    // A concurrent create may have inserted the same name since the lookup
    let (id,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO music_group (name) VALUES (?)
        ON CONFLICT(name) DO UPDATE SET name = excluded.name
        RETURNING id
        "#,
    )
    .bind(name)
    .fetch_one(&mut *conn)
    .await?;

    Ok(id)
}

// ============================================================================
// Read
// ============================================================================

/// One page of songs with `id > cursor`, ascending, at most `limit` rows.
pub async fn list_songs(pool: &SqlitePool, cursor: i64, limit: u32) -> Result<Vec<Song>> {
    select_page(pool, cursor, limit, None).await
}

/// Like [`list_songs`], restricted to rows whose filter column equals the value.
pub async fn list_songs_filtered(
    pool: &SqlitePool,
    cursor: i64,
    limit: u32,
    filter: &SongFilter,
) -> Result<Vec<Song>> {
    select_page(pool, cursor, limit, Some(filter)).await
}

async fn select_page(
    pool: &SqlitePool,
    cursor: i64,
    limit: u32,
    filter: Option<&SongFilter>,
) -> Result<Vec<Song>> {
    let mut qb = QueryBuilder::<Sqlite>::new(SONG_SELECT);
    qb.push(" WHERE s.id > ").push_bind(cursor);

    if let Some(filter) = filter {
        qb.push(" AND ")
            .push(filter_column(filter.field))
            .push(" = ")
            .push_bind(filter.value.clone());
    }

    qb.push(" ORDER BY s.id LIMIT ").push_bind(i64::from(limit));

    qb.build_query_as::<Song>()
        .fetch_all(pool)
        .await
        .with_context("listing songs")
}

/// Get a song by its database ID.
pub async fn get_song(pool: &SqlitePool, id: i64) -> Result<Option<Song>> {
    let sql = format!("{SONG_SELECT} WHERE s.id = ?");
    sqlx::query_as::<_, Song>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
        .with_context(format!("fetching song {id}"))
}

/// Get the stored lyrics for a song.
///
/// A song without lyrics yields an empty string; a missing song is
/// [`Error::NotFound`].
pub async fn get_lyrics(pool: &SqlitePool, id: i64) -> Result<String> {
    let row: Option<(Option<String>,)> = sqlx::query_as("SELECT lyrics FROM songs WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
        .with_context(format!("fetching lyrics for song {id}"))?;

    match row {
        Some((lyrics,)) => Ok(lyrics.unwrap_or_default()),
        None => Err(song_not_found(id)),
    }
}

// ============================================================================
// Update / Delete
// ============================================================================

/// Execute a prepared sparse update.
///
/// The song id is bound as `?1`, the assignment values as `?2..`.
pub async fn update_song(pool: &SqlitePool, statement: &UpdateStatement) -> Result<()> {
    let sql = statement.sql();
    let mut query = sqlx::query(&sql).bind(statement.id());
    for value in statement.values() {
        query = query.bind(value);
    }

    let result = query
        .execute(pool)
        .await
        .with_context(format!("updating song {}", statement.id()))?;

    expect_single_row(result.rows_affected(), statement.id())
}

/// Delete a song. Its `group_song` link goes with it; the group stays.
pub async fn delete_song(pool: &SqlitePool, id: i64) -> Result<()> {
    let result = sqlx::query("DELETE FROM songs WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .with_context(format!("deleting song {id}"))?;

    expect_single_row(result.rows_affected(), id)
}

fn song_not_found(id: i64) -> Error {
    Error::not_found(format!("song {id} not found"))
}

/// Map an affected-row count from a by-id statement to success or failure.
fn expect_single_row(affected: u64, id: i64) -> Result<()> {
    match affected {
        1 => Ok(()),
        0 => Err(song_not_found(id)),
        n => Err(Error::internal(format!(
            "statement for song {id} affected {n} rows"
        ))),
    }
}
