//! Adapter layer: Convert provider DTOs to domain models
//!
//! This is the ONLY place where DTO types are converted to domain types.

use super::dto;
use super::domain::SongDetail;

/// Convert a provider response to a [`SongDetail`]
///
/// Blank fields become `None`. Lyrics line endings are normalized to `\n`
/// so that verse boundaries are always `\n\n`.
pub fn to_song_detail(response: dto::SongDetailResponse) -> SongDetail {
    SongDetail {
        release_date: non_blank(response.release_date),
        lyrics: non_blank(response.text).map(|text| text.replace("\r\n", "\n")),
        link: non_blank(response.link),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
