// ABOUTME: Chapter extraction pipeline: select content roots, read title and links, strip junk, assemble paragraphs.
// ABOUTME: Only blank HTML, an invalid selector or a selector with no matches are errors; everything else degrades.

//! Chapter extraction.
//!
//! The pipeline, in order:
//! 1. parse the document and select the content roots with the user selector,
//! 2. read the title and the next/previous links from the untouched document,
//! 3. detach junk nodes under each root,
//! 4. assemble paragraphs with the ranked strategies,
//! 5. infer the chapter number from the title, then the URL.
//!
//! A selector may match several elements (e.g. `#content p`); every match
//! that is not nested inside an earlier one contributes paragraphs.

use std::collections::HashSet;

use ego_tree::NodeId;
use scraper::{ElementRef, Html};
use tracing::debug;

use crate::dom::cleaners::remove_junk;
use crate::dom::parse_document;
use crate::dom::selector_cache::get_or_compile;
use crate::error::ReaderError;
use crate::extractors::chapter_number::infer_chapter_number;
use crate::extractors::fields::{extract_title, resolve_link, LinkDirection};
use crate::extractors::paragraphs::{assemble_paragraphs, join_paragraphs};
use crate::result::{placeholder_content, ScrapedChapter, UNKNOWN_TITLE};
use crate::rules::CompiledHeuristics;

/// Ids of the selector's matches, dropping matches nested in an earlier one.
fn content_roots(doc: &Html, selector: &str, source_url: &str) -> Result<Vec<NodeId>, ReaderError> {
    let compiled = get_or_compile(selector)
        .map_err(|reason| ReaderError::invalid_selector(source_url, selector, reason))?;

    let mut kept: HashSet<NodeId> = HashSet::new();
    let mut roots = Vec::new();
    for element in doc.select(&compiled) {
        let nested = element.ancestors().any(|a| kept.contains(&a.id()));
        if nested {
            continue;
        }
        kept.insert(element.id());
        roots.push(element.id());
    }

    if roots.is_empty() {
        return Err(ReaderError::content_not_found(source_url, selector));
    }
    Ok(roots)
}

fn elements<'a>(doc: &'a Html, ids: &[NodeId]) -> Vec<ElementRef<'a>> {
    ids.iter()
        .filter_map(|id| doc.tree.get(*id))
        .filter_map(ElementRef::wrap)
        .collect()
}

/// Extracts a chapter from an already parsed document.
pub fn extract_from_document(
    mut doc: Html,
    selector: &str,
    source_url: &str,
    heuristics: &CompiledHeuristics,
) -> Result<ScrapedChapter, ReaderError> {
    let selector = selector.trim();
    let roots = content_roots(&doc, selector, source_url)?;

    let (title, next_url, prev_url) = {
        let root_elements = elements(&doc, &roots);
        (
            extract_title(&doc, &root_elements, heuristics),
            resolve_link(&doc, source_url, LinkDirection::Next, heuristics),
            resolve_link(&doc, source_url, LinkDirection::Prev, heuristics),
        )
    };

    let removed: usize = roots
        .iter()
        .map(|root| remove_junk(&mut doc, *root, heuristics))
        .sum();

    let paragraphs = assemble_paragraphs(&elements(&doc, &roots), heuristics);
    debug!(
        roots = roots.len(),
        removed,
        paragraphs = paragraphs.len(),
        "assembled chapter content"
    );

    let chapter_number = infer_chapter_number(
        title.as_deref(),
        source_url,
        &heuristics.chapter_number_patterns,
    );

    let content = if paragraphs.is_empty() {
        placeholder_content(selector, source_url)
    } else {
        join_paragraphs(&paragraphs)
    };

    Ok(ScrapedChapter {
        title: title.unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
        chapter_number,
        content,
        next_url,
        prev_url,
    })
}

/// Extracts the chapter under `selector` from raw HTML fetched from `source_url`.
pub fn extract_chapter(
    html: &str,
    selector: &str,
    source_url: &str,
    heuristics: &CompiledHeuristics,
) -> Result<ScrapedChapter, ReaderError> {
    let doc = parse_document(html)
        .ok_or_else(|| ReaderError::parse(source_url, "Extract", "document is empty"))?;
    extract_from_document(doc, selector, source_url, heuristics)
}
