//! Core data models for the song catalog.
//!
//! Defines the persisted [`Song`] and the commands that operate on it:
//! [`CreateSong`], [`SongPatch`] and [`ListQuery`]. These are plain values;
//! validation helpers reject malformed input before any I/O happens.
//!
//! # Database Schema
//!
//! The models map to the following tables:
//! - `music_group` - Groups with unique names
//! - `songs` - Song title plus enrichment fields
//! - `group_song` - Junction linking each song to its group

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::{Error, Result};

/// Minimum length of a group name, in characters.
pub const GROUP_MIN_CHARS: usize = 2;
/// Maximum length of a group name, in characters.
pub const GROUP_MAX_CHARS: usize = 20;
/// Minimum length of a song title, in characters.
pub const TITLE_MIN_CHARS: usize = 2;
/// Largest page a single list call may request.
pub const MAX_PAGE_LIMIT: u32 = 500;

/// A song in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    /// Database ID (auto-generated)
    pub id: i64,
    /// Performing group
    #[sqlx(rename = "group_name")]
    pub group: String,
    /// Song title
    pub title: String,
    /// Release date as reported by the provider (free-form)
    pub release_date: Option<String>,
    /// Lyrics, verses separated by a blank line
    pub lyrics: Option<String>,
    /// External link
    pub link: Option<String>,
}

/// Request to add a song.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateSong {
    pub group: String,
    #[serde(alias = "song")]
    pub title: String,
}

impl CreateSong {
    pub fn new(group: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            title: title.into(),
        }
    }

    /// Check name lengths. Whitespace around either name does not count.
    pub fn validate(&self) -> Result<()> {
        let group_len = self.group.trim().chars().count();
        if group_len == 0 {
            return Err(Error::invalid_argument("enter the name of the group"));
        }
        if group_len < GROUP_MIN_CHARS {
            return Err(Error::invalid_argument(format!(
                "the minimum length of the group name is {GROUP_MIN_CHARS} characters"
            )));
        }
        if group_len > GROUP_MAX_CHARS {
            return Err(Error::invalid_argument(format!(
                "the maximum length of the group name is {GROUP_MAX_CHARS} characters"
            )));
        }
        validate_title(&self.title)
    }
}

fn validate_title(title: &str) -> Result<()> {
    let len = title.trim().chars().count();
    if len == 0 {
        return Err(Error::invalid_argument("enter the name of the song"));
    }
    if len < TITLE_MIN_CHARS {
        return Err(Error::invalid_argument(format!(
            "the minimum length of the song name is {TITLE_MIN_CHARS} characters"
        )));
    }
    Ok(())
}

/// Song fields that a [`SongPatch`] can change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SongField {
    Title,
    ReleaseDate,
    Lyrics,
    Link,
}

impl SongField {
    /// Every patchable field, in statement order.
    pub const ALL: [SongField; 4] = [
        SongField::Title,
        SongField::ReleaseDate,
        SongField::Lyrics,
        SongField::Link,
    ];

    /// Logical (API-facing) field name.
    pub fn name(self) -> &'static str {
        match self {
            SongField::Title => "title",
            SongField::ReleaseDate => "releaseDate",
            SongField::Lyrics => "lyrics",
            SongField::Link => "link",
        }
    }
}

impl fmt::Display for SongField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Sparse update for one song.
///
/// `None` means "leave untouched"; `Some(String::new())` means "set to
/// empty". The two are never conflated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SongPatch {
    #[serde(skip)]
    pub id: i64,
    pub title: Option<String>,
    pub release_date: Option<String>,
    pub lyrics: Option<String>,
    pub link: Option<String>,
}

impl SongPatch {
    /// Empty patch for the given song.
    pub fn new(id: i64) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    /// Value supplied for `field`, if present.
    pub fn get(&self, field: SongField) -> Option<&str> {
        match field {
            SongField::Title => self.title.as_deref(),
            SongField::ReleaseDate => self.release_date.as_deref(),
            SongField::Lyrics => self.lyrics.as_deref(),
            SongField::Link => self.link.as_deref(),
        }
    }

    /// Fields present in this patch, in statement order.
    pub fn present_fields(&self) -> impl Iterator<Item = SongField> + '_ {
        SongField::ALL
            .into_iter()
            .filter(|field| self.get(*field).is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.present_fields().next().is_none()
    }

    pub fn validate(&self) -> Result<()> {
        if self.is_empty() {
            return Err(Error::invalid_argument("no fields to update"));
        }
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        Ok(())
    }
}

/// Columns a list query may filter on.
///
/// Parsing is the allowlist: any name not listed here is rejected before a
/// query is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Group,
    Title,
    ReleaseDate,
    Link,
}

impl FromStr for FilterField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "group" => Ok(FilterField::Group),
            "title" => Ok(FilterField::Title),
            "releaseDate" | "release_date" => Ok(FilterField::ReleaseDate),
            "link" => Ok(FilterField::Link),
            other => Err(Error::invalid_argument(format!(
                "unknown filter column: {other}"
            ))),
        }
    }
}

/// Exact-match filter on one allowlisted column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongFilter {
    pub field: FilterField,
    pub value: String,
}

/// Keyset-paginated list request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    /// Last id the caller has seen; results start strictly after it
    pub cursor: i64,
    /// Maximum number of songs to return
    pub limit: u32,
    pub filter: Option<SongFilter>,
}

impl ListQuery {
    pub fn new(cursor: i64, limit: u32) -> Self {
        Self {
            cursor,
            limit,
            filter: None,
        }
    }

    pub fn with_filter(mut self, field: FilterField, value: impl Into<String>) -> Self {
        self.filter = Some(SongFilter {
            field,
            value: value.into(),
        });
        self
    }

    /// Build a query from raw transport parameters.
    ///
    /// A filter is applied only when both the column and the value are given,
    /// but a column name outside the allowlist is rejected either way.
    pub fn from_parts(
        cursor: i64,
        limit: u32,
        filter_field: Option<&str>,
        filter_value: Option<&str>,
    ) -> Result<Self> {
        let field = filter_field
            .filter(|f| !f.is_empty())
            .map(FilterField::from_str)
            .transpose()?;

        let query = Self::new(cursor, limit);
        Ok(match (field, filter_value.filter(|v| !v.is_empty())) {
            (Some(field), Some(value)) => query.with_filter(field, value),
            _ => query,
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.cursor < 0 {
            return Err(Error::invalid_argument("cursor must not be negative"));
        }
        if self.limit == 0 || self.limit > MAX_PAGE_LIMIT {
            return Err(Error::invalid_argument(format!(
                "limit must be between 1 and {MAX_PAGE_LIMIT}"
            )));
        }
        Ok(())
    }
}
