const NAMED_ENTITIES: [(&[u8], char); 30] = [
    (b"amp", '&'),
    (b"lt", '<'),
    (b"gt", '>'),
    (b"quot", '"'),
    (b"apos", '\''),
    (b"nbsp", ' '),
    (b"lsquo", '\u{2018}'),
    (b"rsquo", '\u{2019}'),
    (b"ldquo", '\u{201C}'),
    (b"rdquo", '\u{201D}'),
    (b"laquo", '«'),
    (b"raquo", '»'),
    (b"ndash", '\u{2013}'),
    (b"mdash", '\u{2014}'),
    (b"hellip", '\u{2026}'),
    (b"copy", '©'),
    (b"aacute", 'á'),
    (b"eacute", 'é'),
    (b"iacute", 'í'),
    (b"oacute", 'ó'),
    (b"uacute", 'ú'),
    (b"ntilde", 'ñ'),
    (b"uuml", 'ü'),
    (b"ouml", 'ö'),
    (b"auml", 'ä'),
    (b"agrave", 'à'),
    (b"egrave", 'è'),
    (b"ccedil", 'ç'),
    (b"iexcl", '¡'),
    (b"iquest", '¿'),
];

/// Decodes the body of `&...;` (without the delimiters).
pub(super) fn decode_html_entity(entity: &[u8]) -> Option<char> {
    if entity.first() == Some(&b'#') {
        return decode_numeric_entity(&entity[1..]);
    }

    NAMED_ENTITIES
        .iter()
        .find(|(name, _)| *name == entity)
        .map(|(_, ch)| *ch)
}

fn decode_numeric_entity(body: &[u8]) -> Option<char> {
    let (digits, radix) = match body.first().copied() {
        Some(b'x' | b'X') => (&body[1..], 16),
        _ => (body, 10),
    };
    if digits.is_empty() {
        return None;
    }

    let mut value = 0u32;
    for &digit in digits {
        let step = (digit as char).to_digit(radix)?;
        value = value.checked_mul(radix)?.checked_add(step)?;
    }

    match char::from_u32(value)? {
        '\u{A0}' => Some(' '),
        ch => Some(ch),
    }
}
