// ABOUTME: Content selector suggestion: scores candidate containers and ranks minimal selectors for them.
// ABOUTME: Scored selectors come first, conventional fallbacks follow, and the list is capped.

//! Selector suggestion.
//!
//! Every `div`/`article`/`section`/`main`/`p` outside page chrome is scored on
//! its own text, its paragraph count, its link count and the hints carried by
//! its id and class. Accepted candidates are turned into `#id` or `.class`
//! selectors, deduplicated (best score wins) and ranked. The conventional
//! fallback selectors are appended so common layouts always get a suggestion.

use std::cmp::Ordering;
use std::collections::HashSet;

use scraper::{ElementRef, Html};
use tracing::debug;

use crate::dom::ancestry::is_within;
use crate::dom::parse_document;
use crate::dom::text::direct_text_chars;
use crate::error::ReaderError;
use crate::extractors::selector::minimal_selector;
use crate::rules::CompiledHeuristics;

/// A selector and the best score of any element it identifies.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub selector: String,
    pub score: f64,
}

/// Counts of `<p>` and `<a>` descendants.
fn count_paragraphs_and_links(element: &ElementRef) -> (usize, usize) {
    let mut paragraphs = 0;
    let mut links = 0;
    for node in element.descendants().skip(1) {
        if let Some(el) = ElementRef::wrap(node) {
            match el.value().name() {
                "p" => paragraphs += 1,
                "a" => links += 1,
                _ => {}
            }
        }
    }
    (paragraphs, links)
}

/// Bonus/penalty from content or sidebar hints in the id and class attributes.
pub fn hint_score(element: &ElementRef, heuristics: &CompiledHeuristics) -> f64 {
    let value = element.value();
    let id = value.id().unwrap_or("");
    let class = value.attr("class").unwrap_or("");
    if id.is_empty() && class.is_empty() {
        return 0.0;
    }

    let haystack = format!("{} {}", id, class).to_lowercase();
    let t = &heuristics.thresholds;
    let mut score = 0.0;

    if heuristics
        .positive_hints
        .iter()
        .any(|hint| haystack.contains(hint.as_str()))
    {
        score += t.positive_hint_bonus;
    }
    if heuristics
        .negative_hints
        .iter()
        .any(|hint| haystack.contains(hint.as_str()))
    {
        score += t.negative_hint_penalty;
    }
    score
}

/// Heuristic "main content" score of a single element.
///
/// Hints only count for elements that carry text or paragraphs of their own,
/// so an empty `div.content` shell never clears the threshold.
pub fn score_element(element: &ElementRef, heuristics: &CompiledHeuristics) -> f64 {
    let t = &heuristics.thresholds;
    let (paragraphs, links) = count_paragraphs_and_links(element);
    let direct = direct_text_chars(element);

    let hints = if direct > 0 || paragraphs > 0 {
        hint_score(element, heuristics)
    } else {
        0.0
    };

    direct as f64 * t.direct_text_weight
        + paragraphs as f64 * t.paragraph_weight
        + links as f64 * t.link_weight
        + hints
}

/// Scores all candidates in `doc`, returning deduplicated selectors best-first.
pub fn score_candidates(doc: &Html, heuristics: &CompiledHeuristics) -> Vec<ScoredCandidate> {
    let t = &heuristics.thresholds;
    let mut scored: Vec<ScoredCandidate> = Vec::new();

    for element in doc.select(&heuristics.candidates) {
        if is_within(element, &heuristics.forbidden) {
            continue;
        }

        let score = score_element(&element, heuristics);
        if score <= t.min_candidate_score {
            continue;
        }

        if let Some(selector) = minimal_selector(doc, &element, t.max_class_matches) {
            scored.push(ScoredCandidate { selector, score });
        }
    }

    // Stable sort keeps document order between equal scores.
    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

    let mut seen = HashSet::new();
    scored.retain(|c| seen.insert(c.selector.clone()));
    scored
}

/// Suggests content selectors for an already parsed document.
pub fn suggest_for_document(doc: &Html, heuristics: &CompiledHeuristics) -> Vec<String> {
    let cap = heuristics.thresholds.suggestion_cap;
    let scored = score_candidates(doc, heuristics);
    debug!(scored = scored.len(), "scored content selector candidates");

    let mut suggestions: Vec<String> = scored.into_iter().map(|c| c.selector).collect();
    for fallback in &heuristics.fallback_selectors {
        if !suggestions.iter().any(|s| s == fallback) {
            suggestions.push(fallback.clone());
        }
    }
    suggestions.truncate(cap);
    suggestions
}

/// Suggests content selectors for raw HTML, most likely first.
///
/// Fails only when the input is blank.
pub fn suggest_selectors(
    html: &str,
    heuristics: &CompiledHeuristics,
) -> Result<Vec<String>, ReaderError> {
    let doc = parse_document(html)
        .ok_or_else(|| ReaderError::parse("", "Suggest", "document is empty"))?;
    Ok(suggest_for_document(&doc, heuristics))
}
