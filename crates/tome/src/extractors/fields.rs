// ABOUTME: Title and pagination-link extraction driven by the ranked rule lists in the heuristic tables.
// ABOUTME: Links are resolved against the page URL; an unresolvable href is logged and dropped.

//! Chapter field extraction.
//!
//! Key behaviors:
//! - Rules are tried in order; the first non-empty match wins.
//! - Title rules scoped to `content` only look inside the content roots.
//! - Pagination rules always search the whole document, since navigation
//!   usually sits outside the content container.
//! - Whitespace is normalized (collapsed to single spaces, trimmed).

use scraper::{ElementRef, Html};
use tracing::{debug, warn};

use crate::dom::text::element_text;
use crate::rules::{CompiledHeuristics, CompiledLinkRule, CompiledTitleRule, RuleScope};
use crate::url_utils::{is_navigable_href, resolve_url};

/// Which pagination link to look for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkDirection {
    Next,
    Prev,
}

impl LinkDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            LinkDirection::Next => "next",
            LinkDirection::Prev => "prev",
        }
    }

    fn rules(self, heuristics: &CompiledHeuristics) -> &[CompiledLinkRule] {
        match self {
            LinkDirection::Next => &heuristics.next_rules,
            LinkDirection::Prev => &heuristics.prev_rules,
        }
    }
}

fn title_text(element: &ElementRef, rule: &CompiledTitleRule, max_chars: usize) -> Option<String> {
    let text = element_text(element);
    if text.is_empty() || text.chars().count() > max_chars {
        return None;
    }
    match &rule.text {
        Some(re) if !re.is_match(&text) => None,
        _ => Some(text),
    }
}

/// Finds the chapter title using the ranked title rules.
pub fn extract_title(
    doc: &Html,
    roots: &[ElementRef],
    heuristics: &CompiledHeuristics,
) -> Option<String> {
    let max_chars = heuristics.thresholds.max_title_chars;

    for (rank, rule) in heuristics.title_rules.iter().enumerate() {
        let found = match rule.scope {
            RuleScope::Document => doc
                .select(&rule.selector)
                .find_map(|el| title_text(&el, rule, max_chars)),
            RuleScope::Content => roots.iter().find_map(|root| {
                root.select(&rule.selector)
                    .find_map(|el| title_text(&el, rule, max_chars))
            }),
        };
        if let Some(title) = found {
            debug!(rule = rank, %title, "title rule matched");
            return Some(title);
        }
    }
    None
}

fn link_href<'a>(element: &ElementRef<'a>, rule: &CompiledLinkRule) -> Option<&'a str> {
    let href = element.value().attr("href")?;
    if !is_navigable_href(href) {
        return None;
    }
    match &rule.text {
        Some(re) if !re.is_match(&element_text(element)) => None,
        _ => Some(href.trim()),
    }
}

/// Raw `href` of the first pagination link matching the ranked rules.
pub fn find_link<'a>(doc: &'a Html, rules: &[CompiledLinkRule]) -> Option<&'a str> {
    rules.iter().find_map(|rule| {
        doc.select(&rule.selector)
            .find_map(|el| link_href(&el, rule))
    })
}

/// Absolute URL of the next or previous chapter, if any.
///
/// A link that cannot be resolved against `source_url` is logged at warn
/// level and treated as absent.
pub fn resolve_link(
    doc: &Html,
    source_url: &str,
    direction: LinkDirection,
    heuristics: &CompiledHeuristics,
) -> Option<String> {
    let href = find_link(doc, direction.rules(heuristics))?;
    match resolve_url(source_url, href) {
        Ok(url) => Some(url),
        Err(err) => {
            warn!(
                direction = direction.as_str(),
                href,
                source_url,
                error = %err,
                "could not resolve pagination link"
            );
            None
        }
    }
}
