use super::*;
use crate::content::{Marker, Unit, tokenize};
use alloc::vec::Vec;

fn word_texts(markup: &str) -> Vec<String> {
    tokenize(&flatten_markup(markup))
        .iter()
        .map(|unit| match unit {
            Unit::Word(text) => text.clone(),
            Unit::Marker(Marker::ParagraphBreak) => String::from("<p>"),
            Unit::Marker(Marker::CodeBlock) => String::from("<code>"),
            Unit::Marker(Marker::ImageBlock) => String::from("<img>"),
        })
        .collect()
}

#[test]
fn inline_tags_do_not_split_words() {
    assert_eq!(
        word_texts("<html><body>Hola <b>mundo</b>.</body></html>"),
        ["Hola", "mundo."]
    );
}

#[test]
fn head_script_and_style_are_not_rendered() {
    assert_eq!(
        word_texts(
            "<html><head><title>Book Title</title><style>.x{color:red}</style></head>\
             <body>Hello <script>ignore_me()</script>world</body></html>"
        ),
        ["Hello", "world"]
    );
}

#[test]
fn body_ends_head_without_closing_tag() {
    assert_eq!(
        word_texts(
            "<!DOCTYPE html><html><head><title>T</title><meta charset=utf-8>\
             <body><p>Hello world.</p></body></html>"
        ),
        ["Hello", "world.", "<p>"]
    );
}

#[test]
fn closing_blocks_emit_paragraph_breaks() {
    assert_eq!(
        word_texts("<p>First one.</p><p>Second one.</p>"),
        ["First", "one.", "<p>", "Second", "one.", "<p>"]
    );
}

#[test]
fn fused_block_text_is_split_by_the_tokenizer() {
    assert_eq!(
        word_texts("<div>Intro line.<p>Body</p></div>"),
        ["Intro", "line.", "Body", "<p>"]
    );
}

#[test]
fn pre_blocks_become_code_markers_without_content() {
    assert_eq!(
        word_texts("<p>Run this:</p><pre><code>let x = 1;\n\nlet y = 2;</code></pre><p>Done.</p>"),
        ["Run", "this:", "<p>", "<code>", "<p>", "Done.", "<p>"]
    );
}

#[test]
fn media_elements_become_image_markers() {
    assert_eq!(
        word_texts(
            "Look <img src=\"a.png\" alt=\"ignored\"> here \
             <figure><img src=\"b.png\"><figcaption>Caption</figcaption></figure> end"
        ),
        ["Look", "<p>", "<img>", "<p>", "here", "<p>", "<img>", "<p>", "end"]
    );
}

#[test]
fn nested_same_name_elements_are_skipped_whole() {
    assert_eq!(
        word_texts("<nav>menu <nav>inner</nav> still menu</nav>Text"),
        ["Text"]
    );
}

#[test]
fn self_closing_media_does_not_swallow_following_text() {
    assert_eq!(word_texts("A <svg/> B"), ["A", "<p>", "<img>", "<p>", "B"]);
}

#[test]
fn comments_and_doctype_are_ignored() {
    assert_eq!(
        word_texts("<!DOCTYPE html><!-- <p>hidden</p> -->Visible"),
        ["Visible"]
    );
}

#[test]
fn entities_are_decoded_and_unknown_ones_kept() {
    let flattened = flatten_markup("Fish &amp; chips &#x41; &bogus; AT&T &nbsp;x");
    assert_eq!(flattened, "Fish & chips A &bogus; AT&T  x");
}

#[test]
fn unterminated_tag_is_kept_as_text() {
    assert_eq!(flatten_markup("a < b"), "a < b");
}

#[test]
fn line_breaks_are_single_newlines() {
    assert_eq!(word_texts("one<br>two<br/>three"), ["one", "two", "three"]);
}

#[test]
fn namespaced_xhtml_tags_use_local_names() {
    let markup = "<xhtml:p>One</xhtml:p><svg:svg><svg:text>no</svg:text></svg:svg>";
    assert_eq!(word_texts(markup), ["One", "<p>", "<img>", "<p>"]);
}
