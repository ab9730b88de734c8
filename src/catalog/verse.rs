//! Lyrics segmentation.
//!
//! Stored lyrics are one text blob; verses are the pieces between blank
//! lines (`"\n\n"`), numbered from zero.

use crate::error::{Error, Result};

/// Separator between two verses.
pub const VERSE_DELIMITER: &str = "\n\n";

/// Split lyrics into verses. Empty lyrics have no verses.
///
/// A plain `str::split` would yield `[""]` for empty input; songs stored
/// without lyrics deliberately report zero verses instead.
pub fn split_verses(lyrics: &str) -> Vec<&str> {
    if lyrics.is_empty() {
        return Vec::new();
    }
    lyrics.split(VERSE_DELIMITER).collect()
}

/// The verse at `index`, or [`Error::InvalidArgument`] when out of range.
pub fn verse_at(lyrics: &str, index: usize) -> Result<&str> {
    let verses = split_verses(lyrics);
    verses.get(index).copied().ok_or_else(|| {
        Error::invalid_argument(format!(
            "verse {index} is out of range: song has {} verses",
            verses.len()
        ))
    })
}


/// Property-based tests using proptest
#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// Verse text: any printable run without blank lines in it
    fn verse_text() -> impl Strategy<Value = String> {
        prop::string::string_regex("[a-zA-Z ,.']{1,20}(\n[a-zA-Z ,.']{1,20}){0,3}").unwrap()
    }

    proptest! {
        /// Joining verses with the delimiter and splitting gives them back in order
        #[test]
        fn split_recovers_joined_verses(verses in prop::collection::vec(verse_text(), 1..8)) {
            let lyrics = verses.join(VERSE_DELIMITER);
            let split = split_verses(&lyrics);
            prop_assert_eq!(split.len(), verses.len());
            for (i, verse) in verses.iter().enumerate() {
                prop_assert_eq!(verse_at(&lyrics, i).unwrap(), verse.as_str());
            }
        }

        /// Any index at or past the verse count is rejected, never panics
        #[test]
        fn out_of_range_is_rejected(
            verses in prop::collection::vec(verse_text(), 0..5),
            extra in 0usize..100,
        ) {
            let lyrics = verses.join(VERSE_DELIMITER);
            let count = split_verses(&lyrics).len();
            prop_assert!(verse_at(&lyrics, count + extra).is_err());
        }
    }
}
