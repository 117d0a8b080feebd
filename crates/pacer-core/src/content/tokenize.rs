//! Flattened text to display units.

use alloc::{string::ToString, vec::Vec};

use log::debug;

use super::{
    Marker, Unit, UnitSequence,
    marker::LINE_SEPARATOR,
    text_utils::{next_token_at, normalize_whitespace, sentence_cuts},
};

/// Converts flattened text, with sentinels already embedded, into a unit sequence.
pub fn tokenize(text: &str) -> UnitSequence {
    let normalized = normalize_whitespace(text);
    let mut units = Vec::new();
    let mut cursor = 0usize;

    while let Some((token, next_cursor)) = next_token_at(&normalized, cursor) {
        cursor = next_cursor;
        match Marker::from_sentinel(token) {
            Some(marker) => units.push(Unit::Marker(marker)),
            None => push_token(token, &mut units),
        }
    }

    let sequence = UnitSequence::new(units);
    debug!(
        "tokenize: units={} words={}",
        sequence.len(),
        sequence.word_count()
    );
    sequence
}

/// Pulls sentinels glued to surrounding text out as their own markers, so word units
/// never carry one.
fn push_token(token: &str, units: &mut Vec<Unit>) {
    let mut rest = token;

    while let Some((start, marker)) = find_sentinel(rest) {
        push_words(&rest[..start], units);
        units.push(Unit::Marker(marker));
        rest = &rest[start + marker.sentinel().len()..];
    }

    push_words(rest, units);
}

fn find_sentinel(text: &str) -> Option<(usize, Marker)> {
    Marker::ALL
        .into_iter()
        .filter_map(|marker| text.find(marker.sentinel()).map(|at| (at, marker)))
        .min_by_key(|(at, _)| *at)
}

fn push_words(text: &str, units: &mut Vec<Unit>) {
    // A stray line separator outside a sentinel is a line break.
    for piece in text.split(LINE_SEPARATOR) {
        let mut start = 0usize;
        for cut in sentence_cuts(piece) {
            push_word(&piece[start..cut], units);
            start = cut;
        }
        push_word(&piece[start..], units);
    }
}

fn push_word(piece: &str, units: &mut Vec<Unit>) {
    if !piece.is_empty() {
        units.push(Unit::Word(piece.to_string()));
    }
}
