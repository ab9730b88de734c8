//! Sparse update statement construction.
//!
//! A [`SongPatch`] becomes `UPDATE songs SET <col> = ?2, <col> = ?3 ... WHERE id = ?1`.
//! Column names come from a fixed field table; values are only ever bound.

use std::borrow::Cow;

use crate::error::Result;
use crate::model::{SongField, SongPatch};

/// Placeholder index of the song id.
const ID_PLACEHOLDER: usize = 1;

/// Fields whose physical column differs from the lowercased logical name.
const COLUMN_OVERRIDES: &[(SongField, &str)] = &[
    (SongField::Title, "song_name"),
    (SongField::ReleaseDate, "release_date"),
];

/// Physical `songs` column for a patchable field.
pub fn column_for(field: SongField) -> Cow<'static, str> {
    COLUMN_OVERRIDES
        .iter()
        .find(|(f, _)| *f == field)
        .map(|(_, column)| Cow::Borrowed(*column))
        .unwrap_or_else(|| Cow::Owned(field.name().to_ascii_lowercase()))
}

fn stored_value(field: SongField, value: &str) -> String {
    match field {
        SongField::Title => value.trim().to_string(),
        _ => value.to_string(),
    }
}

/// One `column = ?N` entry of a SET list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub field: SongField,
    pub column: Cow<'static, str>,
    pub placeholder: usize,
    pub value: String,
}

/// A validated, parameterized sparse update for one song.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateStatement {
    id: i64,
    assignments: Vec<Assignment>,
}

impl UpdateStatement {
    /// Build the statement for the fields present in `patch`.
    ///
    /// Fails with `InvalidArgument` when the patch is empty or a value is invalid.
    /// A title is stored trimmed, as on create.
    pub fn from_patch(patch: &SongPatch) -> Result<Self> {
        patch.validate()?;

        let assignments = patch
            .present_fields()
            .zip(ID_PLACEHOLDER + 1..)
            .map(|(field, placeholder)| Assignment {
                field,
                column: column_for(field),
                placeholder,
                value: stored_value(field, patch.get(field).unwrap_or_default()),
            })
            .collect();

        Ok(Self {
            id: patch.id,
            assignments,
        })
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    /// `song_name = ?2, lyrics = ?3`
    pub fn set_clause(&self) -> String {
        self.assignments
            .iter()
            .map(|a| format!("{} = ?{}", a.column, a.placeholder))
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn sql(&self) -> String {
        format!(
            "UPDATE songs SET {} WHERE id = ?{}",
            self.set_clause(),
            ID_PLACEHOLDER
        )
    }

    /// Values to bind after the id, in placeholder order.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.assignments.iter().map(|a| a.value.as_str())
    }
}
