//! Internal domain models for song enrichment.
//!
//! These types don't change when the provider's response format does.
//! Provider responses get converted into these types via the adapter.

/// Enrichment data for one song
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SongDetail {
    /// Release date, as the provider formats it
    pub release_date: Option<String>,
    /// Lyrics, verses separated by a blank line
    pub lyrics: Option<String>,
    /// External link (usually a video or store page)
    pub link: Option<String>,
}

impl SongDetail {
    /// True if the provider returned nothing usable
    pub fn is_empty(&self) -> bool {
        self.release_date.is_none() && self.lyrics.is_none() && self.link.is_none()
    }
}

/// Errors that can occur while talking to the metadata provider
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    /// Transport failure, timeout or cancellation
    #[error("Provider unavailable: {0}")]
    Unavailable(String),

    /// Non-success status or a body we could not parse
    #[error("Bad provider response: {0}")]
    BadResponse(String),
}
