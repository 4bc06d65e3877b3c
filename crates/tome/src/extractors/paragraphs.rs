// ABOUTME: Paragraph assembly for cleaned content roots as a ranked list of strategies.
// ABOUTME: Paragraph tags are tried first; the block-children walk handles prose in bare text and divs.

use scraper::{ElementRef, Node, Selector};
use tracing::debug;

use crate::dom::text::{element_text, flush_segment, is_block_tag, push_segments, text_segments};
use crate::rules::CompiledHeuristics;

/// Separator between paragraphs in the assembled content.
pub const PARAGRAPH_SEPARATOR: &str = "\n\n";

/// One way of turning a content root into paragraphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParagraphStrategy {
    /// One paragraph per `<p>` descendant; needs enough `<p>` tags and text.
    ParagraphTags,
    /// Walk the root's immediate children, breaking at `<br>` and block children.
    BlockChildren,
}

/// Strategies in the order they are tried.
pub const STRATEGIES: &[ParagraphStrategy] = &[
    ParagraphStrategy::ParagraphTags,
    ParagraphStrategy::BlockChildren,
];

impl ParagraphStrategy {
    pub fn name(self) -> &'static str {
        match self {
            ParagraphStrategy::ParagraphTags => "paragraph_tags",
            ParagraphStrategy::BlockChildren => "block_children",
        }
    }

    /// Raw paragraphs for `root`, or `None` when the strategy does not apply.
    pub fn collect(self, root: &ElementRef, heuristics: &CompiledHeuristics) -> Option<Vec<String>> {
        match self {
            ParagraphStrategy::ParagraphTags => paragraph_tags(root, heuristics),
            ParagraphStrategy::BlockChildren => Some(block_children(root)),
        }
    }
}

fn paragraph_tags(root: &ElementRef, heuristics: &CompiledHeuristics) -> Option<Vec<String>> {
    let t = &heuristics.thresholds;
    let selector = Selector::parse("p").ok()?;
    let tags: Vec<ElementRef> = root.select(&selector).collect();

    if tags.len() < t.min_paragraph_tags {
        return None;
    }
    if element_text(root).chars().count() < t.min_paragraph_text_chars {
        return None;
    }

    Some(
        tags.iter()
            .map(|p| text_segments(p).join("\n"))
            .collect(),
    )
}

fn block_children(root: &ElementRef) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut buffer = String::new();

    for child in root.children() {
        match child.value() {
            Node::Text(text) => buffer.push_str(text),
            Node::Element(el) if el.name().eq_ignore_ascii_case("br") => {
                flush_segment(&mut buffer, &mut paragraphs);
            }
            Node::Element(el) => {
                let Some(element) = ElementRef::wrap(child) else {
                    continue;
                };
                if is_block_tag(el.name()) {
                    flush_segment(&mut buffer, &mut paragraphs);
                    paragraphs.extend(text_segments(&element));
                } else {
                    // Inline markup continues the current line; a nested <br> still breaks it.
                    push_segments(&element, &mut buffer, &mut paragraphs);
                }
            }
            _ => {}
        }
    }
    flush_segment(&mut buffer, &mut paragraphs);
    paragraphs
}

/// Drops empty and junk paragraphs and consecutive repeats.
fn accept(raw: Vec<String>, heuristics: &CompiledHeuristics) -> Vec<String> {
    let mut kept: Vec<String> = Vec::with_capacity(raw.len());
    for paragraph in raw {
        let paragraph = paragraph.trim();
        if paragraph.is_empty() || heuristics.contains_junk(paragraph) {
            continue;
        }
        if kept.last().is_some_and(|last| last == paragraph) {
            continue;
        }
        kept.push(paragraph.to_string());
    }
    kept
}

/// Paragraphs of a single root from the first strategy that yields any.
pub fn root_paragraphs(root: &ElementRef, heuristics: &CompiledHeuristics) -> Vec<String> {
    for strategy in STRATEGIES {
        let Some(raw) = strategy.collect(root, heuristics) else {
            debug!(strategy = strategy.name(), "paragraph strategy not applicable");
            continue;
        };
        let accepted = accept(raw, heuristics);
        if !accepted.is_empty() {
            debug!(
                strategy = strategy.name(),
                paragraphs = accepted.len(),
                "paragraph strategy accepted"
            );
            return accepted;
        }
    }
    Vec::new()
}

/// Assembles paragraphs across all content roots in document order.
pub fn assemble_paragraphs(roots: &[ElementRef], heuristics: &CompiledHeuristics) -> Vec<String> {
    let combined = roots
        .iter()
        .flat_map(|root| root_paragraphs(root, heuristics))
        .collect();
    accept(combined, heuristics)
}

/// Joins paragraphs with a blank line.
pub fn join_paragraphs(paragraphs: &[String]) -> String {
    paragraphs.join(PARAGRAPH_SEPARATOR)
}
