//! Trait definition for the metadata provider.
//!
//! The catalog service depends on [`MusicInfoApi`] rather than the concrete
//! HTTP client, so tests can substitute a mock.

use async_trait::async_trait;

use super::domain::{ProviderError, SongDetail};

/// Metadata lookup for a (group, title) pair.
#[async_trait]
pub trait MusicInfoApi: Send + Sync {
    /// Fetch enrichment data. Exactly one outbound call per invocation.
    async fn song_detail(&self, group: &str, title: &str) -> Result<SongDetail, ProviderError>;
}

#[async_trait]
impl MusicInfoApi for super::client::MusicInfoClient {
    async fn song_detail(&self, group: &str, title: &str) -> Result<SongDetail, ProviderError> {
        self.song_detail(group, title).await
    }
}

/// Mock provider for testing.
#[cfg(test)]
pub mod mocks {
    use std::sync::Mutex;
    use std::time::Duration;

    use super::*;

    /// Mock provider that returns a predefined result and records its calls.
    pub struct MockMusicInfo {
        /// Detail to return on success
        pub detail: SongDetail,
        /// Error to return (takes precedence over detail)
        pub error: Option<ProviderError>,
        /// Sleep before answering, to exercise timeouts and cancellation
        pub delay: Option<Duration>,
        /// (group, title) pairs seen so far
        pub calls: Mutex<Vec<(String, String)>>,
    }

    impl MockMusicInfo {
        /// Create a mock that returns the given detail.
        pub fn with_detail(detail: SongDetail) -> Self {
            Self {
                detail,
                error: None,
                delay: None,
                calls: Mutex::new(Vec::new()),
            }
        }

        /// Create a mock that returns release date, lyrics and link.
        pub fn with_lyrics(lyrics: &str) -> Self {
            Self::with_detail(SongDetail {
                release_date: Some("16.07.2006".to_string()),
                lyrics: Some(lyrics.to_string()),
                link: Some("https://example.com/watch".to_string()),
            })
        }

        /// Create a mock that returns an error.
        pub fn with_error(error: ProviderError) -> Self {
            Self {
                error: Some(error),
                ..Self::with_detail(SongDetail::default())
            }
        }

        /// Create a mock that answers only after `delay`.
        pub fn slow(delay: Duration) -> Self {
            Self {
                delay: Some(delay),
                ..Self::with_lyrics("late")
            }
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl MusicInfoApi for MockMusicInfo {
        async fn song_detail(
            &self,
            group: &str,
            title: &str,
        ) -> Result<SongDetail, ProviderError> {
            self.calls
                .lock()
                .unwrap()
                .push((group.to_string(), title.to_string()));

            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if let Some(ref err) = self.error {
                return Err(err.clone());
            }
            Ok(self.detail.clone())
        }
    }
}
