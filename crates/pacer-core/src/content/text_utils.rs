use alloc::string::String;

use super::marker::{PARAGRAPH_SEPARATOR, is_sentinel_char};

/// Whitespace that separates tokens. Sentinel separators are whitespace to Unicode but
/// carry structure here, so they stay inside tokens.
pub(super) fn is_token_space(ch: char) -> bool {
    ch.is_whitespace() && !is_sentinel_char(ch)
}

/// Collapses whitespace runs to single spaces and turns runs holding two or more line
/// breaks into a standalone paragraph-break sentinel. Ends are trimmed, but a break at
/// either end survives as its own token.
pub(super) fn normalize_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_gap = false;
    let mut newlines = 0usize;

    for ch in text.chars() {
        if is_token_space(ch) {
            in_gap = true;
            if ch == '\n' {
                newlines += 1;
            }
            continue;
        }

        if in_gap {
            push_gap(&mut out, newlines, false);
            in_gap = false;
            newlines = 0;
        }
        out.push(ch);
    }

    if in_gap {
        push_gap(&mut out, newlines, true);
    }

    out
}

fn push_gap(out: &mut String, newlines: usize, at_end: bool) {
    if newlines >= 2 {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push(PARAGRAPH_SEPARATOR);
        if !at_end {
            out.push(' ');
        }
    } else if !out.is_empty() && !at_end {
        out.push(' ');
    }
}

/// Next space-delimited token at or after `cursor` (byte offset), with the offset just
/// past it.
pub(super) fn next_token_at(text: &str, mut cursor: usize) -> Option<(&str, usize)> {
    let bytes = text.as_bytes();
    let len = bytes.len();

    while cursor < len && bytes[cursor] == b' ' {
        cursor += 1;
    }
    if cursor >= len {
        return None;
    }

    let start = cursor;
    while cursor < len && bytes[cursor] != b' ' {
        cursor += 1;
    }

    Some((&text[start..cursor], cursor))
}

/// Byte offsets where a fused sentence boundary should be cut: a word character and a
/// closing `. ! ? ) ]`, immediately followed by an uppercase letter or an opening quote
/// or bracket.
pub(super) fn sentence_cuts(token: &str) -> impl Iterator<Item = usize> + '_ {
    let bytes = token.as_bytes();
    (2..bytes.len()).filter(move |&at| {
        is_ascii_word(bytes[at - 2])
            && matches!(bytes[at - 1], b'.' | b'!' | b'?' | b')' | b']')
            && (bytes[at].is_ascii_uppercase()
                || matches!(bytes[at], b'"' | b'\'' | b'(' | b'[' | b'{'))
    })
}

fn is_ascii_word(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn single_line_breaks_are_plain_spaces() {
        assert_eq!(normalize_whitespace("  one\ntwo \t three  "), "one two three");
    }

    #[test]
    fn blank_lines_become_paragraph_sentinels() {
        assert_eq!(normalize_whitespace("A.\n\n\nB"), "A. \u{2029} B");
        assert_eq!(normalize_whitespace("A.\r\n  \r\nB"), "A. \u{2029} B");
        assert_eq!(normalize_whitespace("\n\nA\n \n"), "\u{2029} A \u{2029}");
    }

    #[test]
    fn sentinel_separators_are_not_collapsed() {
        assert_eq!(
            normalize_whitespace("x \u{2028}CODE\u{2028}  y"),
            "x \u{2028}CODE\u{2028} y"
        );
    }

    #[test]
    fn tokens_are_walked_in_order() {
        let text = "one two  three";
        let mut cursor = 0usize;
        let mut tokens = Vec::new();
        while let Some((token, next)) = next_token_at(text, cursor) {
            tokens.push(token);
            cursor = next;
        }
        assert_eq!(tokens, ["one", "two", "three"]);
    }

    #[test]
    fn cuts_need_word_char_before_punctuation() {
        assert_eq!(sentence_cuts("end.Next").collect::<Vec<_>>(), [4]);
        assert_eq!(sentence_cuts(".NET").count(), 0);
        assert_eq!(sentence_cuts("end.next").count(), 0);
    }
}
