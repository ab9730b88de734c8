//! Catalog service - orchestrates enrichment and persistence
//!
//! This is the API a transport layer calls:
//! 1. `add_song` - enrich from the metadata provider, then store atomically
//! 2. `list_songs` - keyset page, optionally filtered
//! 3. `get_verse` - one verse of the stored lyrics
//! 4. `update_song` - sparse update of present fields only
//! 5. `delete_song` - remove one song
//!
//! The service holds no per-request state; every operation gets its logging
//! handle from the [`RequestContext`] it is called with.

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use sqlx::sqlite::SqlitePool;
use tracing::Instrument;

use super::context::RequestContext;
use super::update::UpdateStatement;
use super::verse;
use crate::db::songs;
use crate::error::{Error, Result};
use crate::model::{CreateSong, ListQuery, Song, SongPatch};
use crate::musicinfo::{MusicInfoApi, ProviderError, SongDetail};

/// Default upper bound on one enrichment call, independent of the client's own timeout.
pub const DEFAULT_ENRICHMENT_TIMEOUT: Duration = Duration::from_secs(10);

/// What a failed enrichment lookup does to song creation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EnrichmentFailurePolicy {
    /// Log the failure and create the song with empty enrichment fields
    #[default]
    NonBlocking,
    /// Fail the create with the provider error
    Blocking,
}

/// Song catalog operations
pub struct CatalogService {
    pool: SqlitePool,
    music_info: Option<Arc<dyn MusicInfoApi>>,
    failure_policy: EnrichmentFailurePolicy,
    enrichment_timeout: Duration,
}

impl CatalogService {
    /// Create a service over `pool`. Without a provider, songs are stored unenriched.
    pub fn new(pool: SqlitePool, music_info: Option<Arc<dyn MusicInfoApi>>) -> Self {
        Self {
            pool,
            music_info,
            failure_policy: EnrichmentFailurePolicy::default(),
            enrichment_timeout: DEFAULT_ENRICHMENT_TIMEOUT,
        }
    }

    pub fn with_failure_policy(mut self, policy: EnrichmentFailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn with_enrichment_timeout(mut self, timeout: Duration) -> Self {
        self.enrichment_timeout = timeout;
        self
    }

    /// Add a song and return its id.
    ///
    /// The provider is called first. Under [`EnrichmentFailurePolicy::NonBlocking`]
    /// a failed or timed-out lookup still creates the song, with release date,
    /// lyrics and link left empty.
    pub async fn add_song(&self, ctx: &RequestContext, cmd: &CreateSong) -> Result<i64> {
        async {
            cmd.validate()?;
            let group = cmd.group.trim();
            let title = cmd.title.trim();

            let detail = self.enrich(group, title).await?;
            let id = songs::create_song(&self.pool, group, title, &detail).await?;

            tracing::info!(id, group, title, enriched = !detail.is_empty(), "Song created");
            Ok::<_, Error>(id)
        }
        .instrument(ctx.operation("add_song"))
        .await
    }

    /// Fetch enrichment data, applying the timeout and failure policy.
    async fn enrich(&self, group: &str, title: &str) -> Result<SongDetail> {
        let Some(music_info) = &self.music_info else {
            tracing::debug!("No metadata provider configured, skipping enrichment");
            return Ok(SongDetail::default());
        };

        let lookup = tokio::time::timeout(
            self.enrichment_timeout,
            music_info.song_detail(group, title),
        )
        .await
        .unwrap_or_else(|_| {
            Err(ProviderError::Unavailable(format!(
                "lookup timed out after {:?}",
                self.enrichment_timeout
            )))
        });

        match (lookup, self.failure_policy) {
            (Ok(detail), _) => Ok(detail),
            (Err(e), EnrichmentFailurePolicy::NonBlocking) => {
                tracing::warn!(
                    group,
                    title,
                    error = %e,
                    "Enrichment failed, storing song without metadata"
                );
                Ok(SongDetail::default())
            }
            (Err(e), EnrichmentFailurePolicy::Blocking) => Err(e.into()),
        }
    }

    /// One page of songs, ascending by id, strictly after `query.cursor`.
    ///
    /// An empty page is `Ok(vec![])`; the transport decides how to present it.
    pub async fn list_songs(&self, ctx: &RequestContext, query: &ListQuery) -> Result<Vec<Song>> {
        async {
            query.validate()?;

            let page = match &query.filter {
                Some(filter) => {
                    songs::list_songs_filtered(&self.pool, query.cursor, query.limit, filter)
                        .await?
                }
                None => songs::list_songs(&self.pool, query.cursor, query.limit).await?,
            };

            tracing::debug!(
                cursor = query.cursor,
                limit = query.limit,
                filtered = query.filter.is_some(),
                returned = page.len(),
                "Listed songs"
            );
            Ok::<_, Error>(page)
        }
        .instrument(ctx.operation("list_songs"))
        .await
    }

    /// Full record for one song.
    pub async fn get_song(&self, ctx: &RequestContext, id: i64) -> Result<Song> {
        async {
            songs::get_song(&self.pool, id)
                .await?
                .ok_or_else(|| Error::not_found(format!("song {id} not found")))
        }
        .instrument(ctx.operation("get_song"))
        .await
    }

    /// Verse `index` (0-based) of the song's lyrics.
    pub async fn get_verse(&self, ctx: &RequestContext, id: i64, index: usize) -> Result<String> {
        async {
            let lyrics = songs::get_lyrics(&self.pool, id).await?;
            let verse = verse::verse_at(&lyrics, index)?;
            tracing::debug!(id, index, "Fetched verse");
            Ok::<_, Error>(verse.to_string())
        }
        .instrument(ctx.operation("get_verse"))
        .await
    }

    /// Change exactly the fields present in `patch`.
    pub async fn update_song(&self, ctx: &RequestContext, patch: &SongPatch) -> Result<()> {
        async {
            let statement = UpdateStatement::from_patch(patch)?;
            songs::update_song(&self.pool, &statement).await?;

            let fields: Vec<_> = patch.present_fields().map(|f| f.name()).collect();
            tracing::info!(id = patch.id, ?fields, "Song updated");
            Ok::<_, Error>(())
        }
        .instrument(ctx.operation("update_song"))
        .await
    }

    /// Delete one song.
    pub async fn delete_song(&self, ctx: &RequestContext, id: i64) -> Result<()> {
        async {
            songs::delete_song(&self.pool, id).await?;
            tracing::info!(id, "Song deleted");
            Ok::<_, Error>(())
        }
        .instrument(ctx.operation("delete_song"))
        .await
    }
}
