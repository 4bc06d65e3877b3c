// ABOUTME: In-place junk removal for the chapter content subtree.
// ABOUTME: Strips structural junk tags, ad/comment containers and boilerplate-phrase nodes before text assembly.

use std::collections::HashSet;

use ego_tree::NodeId;
use scraper::{ElementRef, Html, Node};

use super::text::element_text;
use crate::rules::CompiledHeuristics;

/// Planned edits to a content subtree.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct JunkEdits {
    /// Nodes to detach.
    pub detach: Vec<NodeId>,
    /// Text nodes whose content is replaced with the phrase spliced out.
    pub rewrite: Vec<(NodeId, String)>,
}

impl JunkEdits {
    pub fn len(&self) -> usize {
        self.detach.len() + self.rewrite.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Plans the junk removal under `root`.
///
/// The root itself is never collected. For boilerplate phrases the innermost
/// element whose text carries the phrase is removed when it is short; a long
/// element (prose with a watermark line inside) loses only the offending text
/// nodes, or only the phrase itself when it is split across inline markup.
pub fn collect_junk(doc: &Html, root: NodeId, heuristics: &CompiledHeuristics) -> JunkEdits {
    let root_el = match doc.tree.get(root).and_then(ElementRef::wrap) {
        Some(el) => el,
        None => return JunkEdits::default(),
    };

    let mut rewrite: Vec<(NodeId, String)> = Vec::new();
    let mut doomed: Vec<NodeId> = Vec::new();
    let mut seen: HashSet<NodeId> = HashSet::new();
    let max_chars = heuristics.thresholds.max_junk_element_chars;

    let mut push = |id: NodeId, doomed: &mut Vec<NodeId>| {
        if seen.insert(id) {
            doomed.push(id);
        }
    };

    for node in root_el.descendants().skip(1) {
        let element = match ElementRef::wrap(node) {
            Some(el) => el,
            None => continue,
        };

        if is_structural_junk(&element, heuristics) {
            push(element.id(), &mut doomed);
            continue;
        }

        let text = element_text(&element);
        if !heuristics.contains_junk(&text) || child_carries_junk(&element, heuristics) {
            continue;
        }

        if text.chars().count() <= max_chars {
            push(element.id(), &mut doomed);
            continue;
        }
        let carriers = junk_text_nodes(&element, heuristics);
        if carriers.is_empty() {
            rewrite.extend(splice_spanning_phrases(&element, heuristics));
        }
        for id in carriers {
            push(id, &mut doomed);
        }
    }

    // Phrases sitting directly in the root as bare text.
    for child in root_el.children() {
        if let Node::Text(text) = child.value() {
            if heuristics.contains_junk(text) {
                push(child.id(), &mut doomed);
            }
        }
    }

    JunkEdits {
        detach: doomed,
        rewrite,
    }
}

/// Removes junk under `root` in place and returns how many nodes were touched.
pub fn remove_junk(doc: &mut Html, root: NodeId, heuristics: &CompiledHeuristics) -> usize {
    let edits = collect_junk(doc, root, heuristics);
    for (id, kept) in &edits.rewrite {
        if let Some(mut node) = doc.tree.get_mut(*id) {
            if let Node::Text(text) = node.value() {
                text.text.clear();
                text.text.push_slice(kept);
            }
        }
    }
    for id in &edits.detach {
        if let Some(mut node) = doc.tree.get_mut(*id) {
            node.detach();
        }
    }
    edits.len()
}

fn is_structural_junk(element: &ElementRef, heuristics: &CompiledHeuristics) -> bool {
    if let Some(ref tags) = heuristics.junk_tags {
        if tags.matches(element) {
            return true;
        }
    }
    let value = element.value();
    heuristics.is_junk_attr(value.id().unwrap_or(""))
        || heuristics.is_junk_attr(value.attr("class").unwrap_or(""))
}

fn child_carries_junk(element: &ElementRef, heuristics: &CompiledHeuristics) -> bool {
    element
        .children()
        .filter_map(ElementRef::wrap)
        .any(|child| heuristics.contains_junk(&element_text(&child)))
}

fn junk_text_nodes(element: &ElementRef, heuristics: &CompiledHeuristics) -> Vec<NodeId> {
    element
        .descendants()
        .filter(|node| match node.value() {
            Node::Text(text) => heuristics.contains_junk(text),
            _ => false,
        })
        .map(|node| node.id())
        .collect()
}

/// Cuts phrases that only appear once the element's text nodes are joined.
fn splice_spanning_phrases(element: &ElementRef, heuristics: &CompiledHeuristics) -> Vec<(NodeId, String)> {
    let nodes: Vec<(NodeId, &str)> = element
        .descendants()
        .filter_map(|node| match node.value() {
            Node::Text(text) => Some((node.id(), &text[..])),
            _ => None,
        })
        .collect();
    let joined: String = nodes.iter().map(|(_, text)| *text).collect();
    let spans = heuristics.junk_spans(&joined);
    if spans.is_empty() {
        return Vec::new();
    }

    let mut edits = Vec::new();
    let mut offset = 0;
    for (id, text) in nodes {
        let (start, end) = (offset, offset + text.len());
        offset = end;

        let mut kept = String::with_capacity(text.len());
        let mut cursor = start;
        let mut cut = false;
        for &(s, e) in &spans {
            let (s, e) = (s.max(start), e.min(end));
            if s >= e {
                continue;
            }
            kept.push_str(&text[cursor - start..s - start]);
            cursor = e;
            cut = true;
        }
        if cut {
            kept.push_str(&text[cursor - start..]);
            edits.push((id, kept));
        }
    }
    edits
}
