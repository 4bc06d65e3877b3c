// ABOUTME: Text helpers over scraper elements: whitespace normalization, direct text and line segmentation.
// ABOUTME: Line segmentation treats <br> and block boundaries as breaks, the way a browser lays text out.

use ego_tree::iter::Edge;
use scraper::{ElementRef, Node};

/// Tags that start a new line when rendered.
const BLOCK_TAGS: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "dd",
    "div",
    "dl",
    "dt",
    "footer",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "header",
    "hr",
    "li",
    "main",
    "ol",
    "p",
    "pre",
    "section",
    "table",
    "tr",
    "ul",
];

/// Returns true if `tag` is rendered as a block.
pub fn is_block_tag(tag: &str) -> bool {
    BLOCK_TAGS.iter().any(|t| t.eq_ignore_ascii_case(tag))
}

/// Collapse runs of whitespace (including NBSP and ideographic space) into single spaces.
pub fn normalize_spaces(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Full text of an element, whitespace-normalized.
pub fn element_text(element: &ElementRef) -> String {
    normalize_spaces(&element.text().collect::<String>())
}

/// Number of characters in the element's immediate text-node children.
pub fn direct_text_chars(element: &ElementRef) -> usize {
    element
        .children()
        .filter_map(|child| match child.value() {
            Node::Text(text) => Some(text.trim().chars().count()),
            _ => None,
        })
        .sum()
}

/// Split an element's text into lines at `<br>` and block boundaries.
///
/// Inside `<pre>` every newline also ends a line.
/// Each returned line is whitespace-normalized and non-empty.
pub fn text_segments(element: &ElementRef) -> Vec<String> {
    let mut segments = Vec::new();
    let mut buffer = String::new();
    push_segments(element, &mut buffer, &mut segments);
    flush_segment(&mut buffer, &mut segments);
    segments
}

/// Walk `element` into an open line buffer, flushing finished lines into `segments`.
///
/// Text after the last break stays in `buffer`, so an inline element continues
/// the line its caller is building.
pub fn push_segments(element: &ElementRef, buffer: &mut String, segments: &mut Vec<String>) {
    let mut pre_depth = 0usize;

    for edge in element.traverse() {
        match edge {
            Edge::Open(node) => match node.value() {
                Node::Text(text) if pre_depth > 0 => {
                    // Preformatted text keeps its own line structure.
                    let mut lines = text.split('\n').peekable();
                    while let Some(line) = lines.next() {
                        buffer.push_str(line);
                        if lines.peek().is_some() {
                            flush_segment(buffer, segments);
                        }
                    }
                }
                Node::Text(text) => buffer.push_str(text),
                Node::Element(el) => {
                    if el.name().eq_ignore_ascii_case("br") || is_block_tag(el.name()) {
                        flush_segment(buffer, segments);
                    }
                    if el.name().eq_ignore_ascii_case("pre") {
                        pre_depth += 1;
                    }
                }
                _ => {}
            },
            Edge::Close(node) => {
                if let Node::Element(el) = node.value() {
                    if el.name().eq_ignore_ascii_case("pre") {
                        pre_depth = pre_depth.saturating_sub(1);
                    }
                    if is_block_tag(el.name()) {
                        flush_segment(buffer, segments);
                    }
                }
            }
        }
    }
}

/// Normalize the buffered text and push it as a segment if non-empty.
pub fn flush_segment(buffer: &mut String, segments: &mut Vec<String>) {
    let line = normalize_spaces(buffer);
    if !line.is_empty() {
        segments.push(line);
    }
    buffer.clear();
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    fn with_first<R>(html: &str, css: &str, f: impl FnOnce(ElementRef) -> R) -> R {
        let doc = Html::parse_fragment(html);
        let sel = Selector::parse(css).unwrap();
        let el = doc.select(&sel).next().unwrap();
        f(el)
    }

    #[test]
    fn normalizes_unicode_spaces() {
        assert_eq!(normalize_spaces("\u{3000}\u{3000}他说 \u{a0}好\n"), "他说 好");
        assert_eq!(normalize_spaces("   "), "");
    }

    #[test]
    fn direct_text_ignores_children() {
        let n = with_first(
            "<div id=x>abc<p>long nested paragraph text</p>de</div>",
            "#x",
            |el| direct_text_chars(&el),
        );
        assert_eq!(n, 5);
    }

    #[test]
    fn br_splits_segments() {
        let segs = with_first("<div id=x>Hello<br>World</div>", "#x", |el| text_segments(&el));
        assert_eq!(segs, vec!["Hello", "World"]);
    }

    #[test]
    fn inline_elements_stay_on_one_line() {
        let segs = with_first(
            "<div id=x>She <em>really</em> said <b>so</b>.<br><br>Next line</div>",
            "#x",
            |el| text_segments(&el),
        );
        assert_eq!(segs, vec!["She really said so.", "Next line"]);
    }

    #[test]
    fn inline_walk_continues_open_line() {
        let mut buffer = String::from("Lead ");
        let mut segments = Vec::new();
        with_first("<span id=x>in<br>out</span>", "#x", |el| {
            push_segments(&el, &mut buffer, &mut segments)
        });
        assert_eq!(segments, vec!["Lead in"]);
        assert_eq!(buffer, "out");
    }

    #[test]
    fn pre_splits_on_newlines() {
        let segs = with_first(
            "<div id=x><pre>first line\n\nsecond line\n</pre></div>",
            "#x",
            |el| text_segments(&el),
        );
        assert_eq!(segs, vec!["first line", "second line"]);
    }

    #[test]
    fn nested_blocks_break_lines() {
        let segs = with_first(
            "<div id=x>lead<div>one</div><p>two</p>tail</div>",
            "#x",
            |el| text_segments(&el),
        );
        assert_eq!(segs, vec!["lead", "one", "two", "tail"]);
    }
}
