// ABOUTME: The two reader components: content selector suggestion and chapter extraction.
// ABOUTME: Both are synchronous pure functions of their HTML input and the compiled heuristics.

//! Extraction module.
//!
//! Submodules:
//! - `suggest`: scores candidate containers and proposes content selectors.
//! - `selector`: derives safe `#id` / `.class` selectors for candidates.
//! - `chapter`: the extraction pipeline producing a `ScrapedChapter`.
//! - `paragraphs`: ranked paragraph assembly strategies.
//! - `fields`: title and pagination links.
//! - `chapter_number`: chapter index inference.

pub mod chapter;
pub mod chapter_number;
pub mod fields;
pub mod paragraphs;
pub mod selector;
pub mod suggest;

pub use chapter::{extract_chapter, extract_from_document};
pub use suggest::{suggest_for_document, suggest_selectors};
