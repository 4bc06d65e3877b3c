// ABOUTME: DOM traversal and manipulation utilities for chapter HTML.
// ABOUTME: Provides ancestor walks, text segmentation, junk cleaning and a selector cache over scraper.

//! DOM utilities for chapter documents.
//!
//! This module provides helpers for traversing and manipulating parsed HTML:
//! ancestor checks, text segmentation at line breaks, in-place junk removal
//! and cached compilation of user selectors.

pub mod ancestry;
pub mod cleaners;
pub mod selector_cache;
pub mod text;

use scraper::Html;

/// Parses a full HTML document.
///
/// Returns `None` for blank input; the HTML5 parser accepts anything else.
pub fn parse_document(html: &str) -> Option<Html> {
    if html.trim().is_empty() {
        return None;
    }
    Some(Html::parse_document(html))
}
