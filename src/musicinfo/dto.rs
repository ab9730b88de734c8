//! Metadata provider Data Transfer Objects
//!
//! These types match what the provider returns for `GET <url>?group=..&song=..`.
//! DO NOT use these types outside the musicinfo module - convert to domain types.

use serde::Deserialize;

/// Song detail response
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongDetailResponse {
    /// Release date (e.g. "16.07.2006")
    #[serde(default, alias = "releaseData", alias = "release_date")]
    pub release_date: Option<String>,
    /// Full lyrics text
    #[serde(default, alias = "lyrics")]
    pub text: Option<String>,
    /// External link
    #[serde(default)]
    pub link: Option<String>,
}
