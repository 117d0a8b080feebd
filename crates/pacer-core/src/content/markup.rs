//! Markup flattening into tokenizer input.
//!
//! Produces the text shape the tokenizer expects from an extraction step: readable text
//! with code and media blocks replaced by sentinels, and a blank line after every block
//! element so paragraph structure survives.

use alloc::{string::String, vec::Vec};

use log::debug;

use super::marker::{CODE_BLOCK, IMAGE_BLOCK};

mod entities;
mod tags;

use entities::decode_html_entity;
use tags::{TagRole, is_void, parse_tag_info, tag_role};

const HTML_ENTITY_BYTES: usize = 16;
const BLOCK_GAP: &str = "\n\n";

/// Element whose content is being dropped, with its nesting depth.
struct Skipping {
    name: Vec<u8>,
    depth: u16,
}

/// Flattens HTML or XHTML into sentinel-bearing plain text.
pub fn flatten_markup(markup: &str) -> String {
    let bytes = markup.as_bytes();
    let mut out = String::with_capacity(markup.len() / 2);
    let mut skipping: Option<Skipping> = None;
    let mut text_start = 0usize;
    let mut cursor = 0usize;

    while cursor < bytes.len() {
        match bytes[cursor] {
            b'<' => {
                if skipping.is_none() {
                    out.push_str(&markup[text_start..cursor]);
                }

                if bytes[cursor..].starts_with(b"<!--") {
                    cursor = find_from(bytes, b"-->", cursor + 4)
                        .map(|end| end + 3)
                        .unwrap_or(bytes.len());
                    text_start = cursor;
                    continue;
                }

                let Some(tag_end) = find_from(bytes, b">", cursor + 1) else {
                    // Unterminated tag: keep the rest as text.
                    text_start = cursor;
                    break;
                };
                apply_tag(&bytes[cursor + 1..tag_end], &mut skipping, &mut out);
                cursor = tag_end + 1;
                text_start = cursor;
            }
            b'&' if skipping.is_none() => {
                out.push_str(&markup[text_start..cursor]);
                let (decoded, next) = decode_entity_at(bytes, cursor);
                match decoded {
                    Some(ch) => out.push(ch),
                    None => out.push('&'),
                }
                cursor = next;
                text_start = cursor;
            }
            _ => cursor += 1,
        }
    }

    if skipping.is_none() && text_start < bytes.len() {
        out.push_str(&markup[text_start..]);
    }

    debug!(
        "markup: flattened in_bytes={} out_bytes={}",
        markup.len(),
        out.len()
    );
    out
}

fn apply_tag(raw_tag: &[u8], skipping: &mut Option<Skipping>, out: &mut String) {
    let Some(tag) = parse_tag_info(raw_tag) else {
        return;
    };

    if let Some(active) = skipping.as_mut() {
        // `</head>` is optional; the body starting ends the head.
        let body_opens = !tag.is_closing
            && eq_ignore_case(tag.local_name, b"body")
            && eq_ignore_case(&active.name, b"head");
        if body_opens {
            *skipping = None;
            return;
        }
        if !eq_ignore_case(tag.local_name, &active.name) || tag.is_self_closing {
            return;
        }
        if tag.is_closing {
            active.depth = active.depth.saturating_sub(1);
            if active.depth == 0 {
                *skipping = None;
            }
        } else {
            active.depth = active.depth.saturating_add(1);
        }
        return;
    }

    let role = tag_role(tag.local_name);
    if tag.is_closing {
        if role == TagRole::Block {
            out.push_str(BLOCK_GAP);
        }
        return;
    }

    match role {
        TagRole::Code => push_sentinel(out, CODE_BLOCK),
        TagRole::Media => push_sentinel(out, IMAGE_BLOCK),
        TagRole::LineBreak => out.push('\n'),
        TagRole::Hidden | TagRole::Block | TagRole::Inline => {}
    }

    if role.drops_content() && !tag.is_self_closing && !is_void(tag.local_name) {
        *skipping = Some(Skipping {
            name: tag.local_name.to_ascii_lowercase(),
            depth: 1,
        });
    }
}

fn push_sentinel(out: &mut String, sentinel: &str) {
    out.push_str(BLOCK_GAP);
    out.push_str(sentinel);
    out.push_str(BLOCK_GAP);
}

/// Decodes `&...;` at `cursor`. Returns the character, if any, and where text resumes.
fn decode_entity_at(bytes: &[u8], cursor: usize) -> (Option<char>, usize) {
    let body_start = cursor + 1;
    let mut end = body_start;

    while end < bytes.len() && end - body_start < HTML_ENTITY_BYTES {
        match bytes[end] {
            b';' => {
                return match decode_html_entity(&bytes[body_start..end]) {
                    Some(ch) => (Some(ch), end + 1),
                    None => (None, body_start),
                };
            }
            byte if byte.is_ascii_alphanumeric() || byte == b'#' => end += 1,
            _ => break,
        }
    }

    (None, body_start)
}

fn find_from(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if from >= haystack.len() {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|at| from + at)
}

fn eq_ignore_case(left: &[u8], right: &[u8]) -> bool {
    left.eq_ignore_ascii_case(right)
}

#[cfg(test)]
mod tests;
