use super::eq_ignore_case;

#[derive(Clone, Copy)]
pub(super) struct TagInfo<'a> {
    pub(super) local_name: &'a [u8],
    pub(super) is_closing: bool,
    pub(super) is_self_closing: bool,
}

/// What an element contributes to the flattened text.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) enum TagRole {
    /// Content is dropped entirely.
    Hidden,
    /// Replaced by the code-block sentinel, content dropped.
    Code,
    /// Replaced by the image-block sentinel, content dropped.
    Media,
    /// Followed by a blank line once closed.
    Block,
    LineBreak,
    Inline,
}

impl TagRole {
    pub(super) fn drops_content(self) -> bool {
        matches!(self, Self::Hidden | Self::Code | Self::Media)
    }
}

const HIDDEN_TAGS: [&[u8]; 9] = [
    b"head", b"script", b"style", b"noscript", b"template", b"nav", b"header", b"footer",
    b"aside",
];
const MEDIA_TAGS: [&[u8]; 7] = [
    b"img", b"figure", b"picture", b"svg", b"canvas", b"video", b"iframe",
];
const BLOCK_TAGS: [&[u8]; 14] = [
    b"p",
    b"h1",
    b"h2",
    b"h3",
    b"h4",
    b"h5",
    b"h6",
    b"li",
    b"blockquote",
    b"div",
    b"section",
    b"article",
    b"main",
    b"tr",
];
// Elements that never wrap content, so an opening tag is the whole element.
const VOID_TAGS: [&[u8]; 6] = [b"img", b"br", b"hr", b"meta", b"link", b"input"];

pub(super) fn tag_role(local_name: &[u8]) -> TagRole {
    let is = |names: &[&[u8]]| names.iter().any(|name| eq_ignore_case(local_name, name));

    if is(&HIDDEN_TAGS) {
        TagRole::Hidden
    } else if eq_ignore_case(local_name, b"pre") {
        TagRole::Code
    } else if is(&MEDIA_TAGS) {
        TagRole::Media
    } else if is(&BLOCK_TAGS) {
        TagRole::Block
    } else if eq_ignore_case(local_name, b"br") || eq_ignore_case(local_name, b"hr") {
        TagRole::LineBreak
    } else {
        TagRole::Inline
    }
}

pub(super) fn is_void(local_name: &[u8]) -> bool {
    VOID_TAGS.iter().any(|name| eq_ignore_case(local_name, name))
}

pub(super) fn parse_tag_info(tag: &[u8]) -> Option<TagInfo<'_>> {
    let tag = tag.trim_ascii();
    if tag.is_empty() || tag[0] == b'!' || tag[0] == b'?' {
        return None;
    }

    let (is_closing, rest) = match tag.strip_prefix(b"/") {
        Some(rest) => (true, rest.trim_ascii()),
        None => (false, tag),
    };
    if rest.is_empty() {
        return None;
    }

    let is_self_closing = rest.ends_with(b"/");
    let name_end = rest
        .iter()
        .position(|b| b.is_ascii_whitespace() || *b == b'/' || *b == b'>')
        .unwrap_or(rest.len());
    if name_end == 0 {
        return None;
    }

    let name = &rest[..name_end];
    let local_name = name
        .iter()
        .rposition(|b| *b == b':')
        .map(|idx| &name[idx + 1..])
        .unwrap_or(name);

    Some(TagInfo {
        local_name,
        is_closing,
        is_self_closing,
    })
}
