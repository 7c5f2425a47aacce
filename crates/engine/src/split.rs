//! Text splitting strategies used when one caption is split in two.

use serde::{Deserialize, Serialize};

/// Decides where a caption's text is cut when the caption is split.
pub trait SplitPolicy {
    /// Returns the text for the left and right captions.
    fn split_text(&self, text: &str) -> (String, String);
}

/// Cuts the joined text at its character midpoint, ignoring line breaks.
///
/// Both halves are trimmed, so whitespace around the cut is dropped.
///
/// # Example
/// ```
/// use engine::split::{CharacterMidpoint, SplitPolicy};
///
/// let (left, right) = CharacterMidpoint.split_text("Hello world");
/// assert_eq!(left, "Hello");
/// assert_eq!(right, "world");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CharacterMidpoint;

impl SplitPolicy for CharacterMidpoint {
    fn split_text(&self, text: &str) -> (String, String) {
        let mid = text.chars().count() / 2;
        let cut = byte_offset_of_char(text, mid);
        let (left, right) = text.split_at(cut);
        (left.trim().to_string(), right.trim().to_string())
    }
}

/// Cuts at the line break closest to the character midpoint.
///
/// Single-line text falls back to [`CharacterMidpoint`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineBoundary;

impl SplitPolicy for LineBoundary {
    fn split_text(&self, text: &str) -> (String, String) {
        let mid = byte_offset_of_char(text, text.chars().count() / 2);
        let nearest_break = text
            .match_indices('\n')
            .map(|(offset, _)| offset)
            .min_by_key(|offset| offset.abs_diff(mid));

        match nearest_break {
            Some(offset) => (
                text[..offset].trim().to_string(),
                text[offset + 1..].trim().to_string(),
            ),
            None => CharacterMidpoint.split_text(text),
        }
    }
}

/// Serializable selector for the built-in policies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitPolicyKind {
    #[default]
    CharacterMidpoint,
    LineBoundary,
}

impl SplitPolicy for SplitPolicyKind {
    fn split_text(&self, text: &str) -> (String, String) {
        match self {
            Self::CharacterMidpoint => CharacterMidpoint.split_text(text),
            Self::LineBoundary => LineBoundary.split_text(text),
        }
    }
}

fn byte_offset_of_char(text: &str, char_index: usize) -> usize {
    text.char_indices()
        .nth(char_index)
        .map(|(offset, _)| offset)
        .unwrap_or(text.len())
}
