//! Optimal recognition point placement.

/// Focal character offset for `word`, by character count.
///
/// Longer words anchor further right so the letters on either side of the focus stay
/// roughly balanced.
pub fn focus_index(word: &str) -> usize {
    focus_index_for_len(word.chars().count())
}

pub const fn focus_index_for_len(len: usize) -> usize {
    match len {
        0..=1 => 0,
        2..=5 => len / 2 - 1,
        6..=9 => 2,
        10..=13 => 3,
        _ => 4,
    }
}

/// Splits `word` into the text before the focal character, the focal character and the
/// text after it. An empty word yields three empty slices.
pub fn split_at_focus(word: &str) -> (&str, &str, &str) {
    let index = focus_index(word);
    let Some((start, ch)) = word.char_indices().nth(index) else {
        return ("", "", "");
    };
    let end = start + ch.len_utf8();
    (&word[..start], &word[start..end], &word[end..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::String;

    #[test]
    fn length_bands() {
        let cases = [
            (1, 0),
            (2, 0),
            (3, 0),
            (4, 1),
            (5, 1),
            (6, 2),
            (9, 2),
            (10, 3),
            (13, 3),
            (14, 4),
            (20, 4),
        ];
        for (len, expected) in cases {
            assert_eq!(focus_index_for_len(len), expected, "len={len}");
        }
        assert_eq!(focus_index(""), 0);
    }

    #[test]
    fn index_is_always_inside_the_word() {
        let mut word = String::new();
        for len in 1..=64 {
            word.push('x');
            let index = focus_index(&word);
            assert!(index < len, "len={len} index={index}");
        }
    }

    #[test]
    fn same_length_same_index() {
        assert_eq!(focus_index("reading"), focus_index("letters"));
        assert_eq!(focus_index("a"), focus_index("."));
    }

    #[test]
    fn counts_characters_not_bytes() {
        // 6 chars, 7 bytes
        assert_eq!(focus_index("señora"), 2);
        assert_eq!(split_at_focus("ñandú"), ("ñ", "a", "ndú"));
    }

    #[test]
    fn split_surrounds_focus() {
        assert_eq!(split_at_focus("a"), ("", "a", ""));
        assert_eq!(split_at_focus("word"), ("w", "o", "rd"));
        assert_eq!(split_at_focus("recognition"), ("rec", "o", "gnition"));
        assert_eq!(split_at_focus(""), ("", "", ""));
    }
}
