//! Sentinel vocabulary for structural units.
//!
//! Extraction inserts these sentinels into the flattened text where block-level content
//! used to be. They are built from `U+2028`/`U+2029`, which never appear in ordinary
//! prose.

/// Separator used to bracket block tags.
pub const LINE_SEPARATOR: char = '\u{2028}';
/// Paragraph separator, doubles as the paragraph-break sentinel.
pub const PARAGRAPH_SEPARATOR: char = '\u{2029}';

pub const PARAGRAPH_BREAK: &str = "\u{2029}";
pub const CODE_BLOCK: &str = "\u{2028}CODE\u{2028}";
pub const IMAGE_BLOCK: &str = "\u{2028}IMG\u{2028}";

/// Non-word unit standing in for structural content.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Marker {
    ParagraphBreak,
    CodeBlock,
    ImageBlock,
}

impl Marker {
    pub const ALL: [Marker; 3] = [Self::ParagraphBreak, Self::CodeBlock, Self::ImageBlock];

    pub const fn sentinel(self) -> &'static str {
        match self {
            Self::ParagraphBreak => PARAGRAPH_BREAK,
            Self::CodeBlock => CODE_BLOCK,
            Self::ImageBlock => IMAGE_BLOCK,
        }
    }

    /// Exact match only; a token that merely contains a sentinel is not a marker.
    pub fn from_sentinel(token: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|marker| marker.sentinel() == token)
    }

    /// Markers that always stop playback so the reader can look at the source.
    pub const fn forces_pause(self) -> bool {
        matches!(self, Self::CodeBlock | Self::ImageBlock)
    }
}

/// Whether `ch` belongs to a sentinel and must survive whitespace collapsing.
pub(crate) fn is_sentinel_char(ch: char) -> bool {
    ch == LINE_SEPARATOR || ch == PARAGRAPH_SEPARATOR
}
