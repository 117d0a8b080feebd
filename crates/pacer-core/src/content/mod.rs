//! Display units and the text pipeline that produces them.

use alloc::{string::String, vec::Vec};
use core::slice;

pub mod marker;
pub mod markup;
mod text_utils;
mod tokenize;

pub use marker::Marker;
pub use markup::flatten_markup;
pub use tokenize::tokenize;

/// One element of the playback sequence.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Unit {
    /// Non-empty, whitespace-free text that never equals a sentinel.
    Word(String),
    Marker(Marker),
}

impl Unit {
    pub fn as_word(&self) -> Option<&str> {
        match self {
            Self::Word(text) => Some(text),
            Self::Marker(_) => None,
        }
    }

    pub fn marker(&self) -> Option<Marker> {
        match self {
            Self::Word(_) => None,
            Self::Marker(marker) => Some(*marker),
        }
    }

    pub fn is_marker(&self) -> bool {
        matches!(self, Self::Marker(_))
    }
}

impl From<Marker> for Unit {
    fn from(marker: Marker) -> Self {
        Self::Marker(marker)
    }
}

/// Whether a raw token is one of the marker sentinels.
pub fn is_marker_token(token: &str) -> bool {
    Marker::from_sentinel(token).is_some()
}

/// Number of word units in `units`; markers never count.
pub fn count_words(units: &[Unit]) -> usize {
    units.iter().filter(|unit| !unit.is_marker()).count()
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SequenceError {
    /// The text produced no word units, only markers or nothing at all.
    NoReadableText,
}

impl core::fmt::Display for SequenceError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NoReadableText => f.write_str("No readable text found."),
        }
    }
}

impl core::error::Error for SequenceError {}

/// Ordered units built once by tokenization.
///
/// Word totals are computed at construction and never change, so progress reporting
/// always uses the same denominator.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct UnitSequence {
    units: Vec<Unit>,
    // words_through[i] = word units at indices 0..=i
    words_through: Vec<usize>,
}

impl UnitSequence {
    /// Builds a sequence from already-split units. Empty words are dropped, and words
    /// holding whitespace or sentinel characters go back through [`tokenize`], so every
    /// word unit stays a single displayable token.
    pub fn new(units: Vec<Unit>) -> Self {
        let units = if units.iter().all(is_well_formed) {
            units
        } else {
            units.into_iter().flat_map(resplit).collect()
        };

        let mut seen = 0usize;
        let words_through = units
            .iter()
            .map(|unit| {
                if !unit.is_marker() {
                    seen += 1;
                }
                seen
            })
            .collect();

        Self {
            units,
            words_through,
        }
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Unit> {
        self.units.get(index)
    }

    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    pub fn iter(&self) -> slice::Iter<'_, Unit> {
        self.units.iter()
    }

    /// Total word units, the progress denominator.
    pub fn word_count(&self) -> usize {
        self.words_through.last().copied().unwrap_or(0)
    }

    /// Word units at indices `0..=index`. Indices past the end count the whole sequence.
    pub fn words_through(&self, index: usize) -> usize {
        match self.words_through.get(index) {
            Some(count) => *count,
            None => self.word_count(),
        }
    }

    pub fn has_words(&self) -> bool {
        self.word_count() > 0
    }

    /// Rejects sequences a reader could not play meaningfully.
    pub fn require_words(self) -> Result<Self, SequenceError> {
        if self.has_words() {
            Ok(self)
        } else {
            Err(SequenceError::NoReadableText)
        }
    }
}

fn is_well_formed(unit: &Unit) -> bool {
    match unit {
        Unit::Word(text) => !text.is_empty() && !needs_split(text),
        Unit::Marker(_) => true,
    }
}

fn needs_split(text: &str) -> bool {
    text.chars()
        .any(|ch| text_utils::is_token_space(ch) || marker::is_sentinel_char(ch))
}

fn resplit(unit: Unit) -> Vec<Unit> {
    match unit {
        Unit::Word(text) if text.is_empty() => Vec::new(),
        Unit::Word(text) if needs_split(&text) => tokenize(&text).units,
        unit => alloc::vec![unit],
    }
}

impl FromIterator<Unit> for UnitSequence {
    fn from_iter<I: IntoIterator<Item = Unit>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a UnitSequence {
    type Item = &'a Unit;
    type IntoIter = slice::Iter<'a, Unit>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::{string::ToString, vec};

    fn word(text: &str) -> Unit {
        Unit::Word(text.to_string())
    }

    #[test]
    fn word_totals_skip_every_marker_kind() {
        let sequence = UnitSequence::new(vec![
            Marker::ParagraphBreak.into(),
            word("one"),
            Marker::CodeBlock.into(),
            word("two"),
            Marker::ImageBlock.into(),
            Marker::ParagraphBreak.into(),
            word("three"),
        ]);

        assert_eq!(sequence.len(), 7);
        assert_eq!(sequence.word_count(), 3);
        assert_eq!(count_words(sequence.units()), 3);
        assert_eq!(sequence.words_through(0), 0);
        assert_eq!(sequence.words_through(1), 1);
        assert_eq!(sequence.words_through(2), 1);
        assert_eq!(sequence.words_through(5), 2);
        assert_eq!(sequence.words_through(6), 3);
        assert_eq!(sequence.words_through(99), 3);
    }

    #[test]
    fn marker_only_sequence_has_no_readable_text() {
        let sequence = UnitSequence::new(vec![
            Marker::CodeBlock.into(),
            Marker::ParagraphBreak.into(),
        ]);
        assert!(!sequence.has_words());
        assert_eq!(sequence.require_words(), Err(SequenceError::NoReadableText));
        assert_eq!(
            UnitSequence::default().require_words(),
            Err(SequenceError::NoReadableText)
        );
    }

    #[test]
    fn hand_built_words_are_kept_single_tokens() {
        let sequence = UnitSequence::new(vec![
            word(""),
            word("two words"),
            word("see\u{2028}IMG\u{2028}below"),
            Marker::ParagraphBreak.into(),
            word("done"),
        ]);

        assert_eq!(
            sequence.units(),
            [
                word("two"),
                word("words"),
                word("see"),
                Marker::ImageBlock.into(),
                word("below"),
                Marker::ParagraphBreak.into(),
                word("done"),
            ]
        );
        assert_eq!(sequence.word_count(), 5);
        assert_eq!(sequence.words_through(6), 5);
    }

    #[test]
    fn raw_tokens_are_classified() {
        assert!(is_marker_token(marker::PARAGRAPH_BREAK));
        assert!(is_marker_token(marker::CODE_BLOCK));
        assert!(is_marker_token(marker::IMAGE_BLOCK));
        assert!(!is_marker_token("paragraph"));
    }
}
