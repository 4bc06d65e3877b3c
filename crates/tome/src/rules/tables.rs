// ABOUTME: Serde data model for the heuristic tables driving suggestion and extraction.
// ABOUTME: Phrase lists, selector lists, title/pagination rules and chapter-number patterns live here as plain data.

//! Heuristic table definitions.
//!
//! Site conventions change faster than extraction logic, so every phrase,
//! selector and pattern the reader relies on is described by these types and
//! shipped as JSON. New conventions are added to the data, not the code.

use serde::{Deserialize, Serialize};

use crate::options::Thresholds;

/// Where a title rule looks for matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RuleScope {
    /// Anywhere in the page.
    #[default]
    Document,
    /// Only inside the chapter content subtree.
    Content,
}

/// One ranked entry of the title search.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TitleRule {
    /// CSS selector for title elements.
    pub selector: String,
    #[serde(default)]
    pub scope: RuleScope,
    /// Optional regex the element text must match.
    #[serde(default)]
    pub text: Option<String>,
}

/// One ranked entry of the next/previous link search.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LinkRule {
    /// CSS selector for the link element; its `href` is used.
    pub selector: String,
    /// Optional regex the link text must match.
    #[serde(default)]
    pub text: Option<String>,
}

/// The complete set of heuristic tables.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HeuristicTables {
    #[serde(default)]
    pub thresholds: Thresholds,
    /// Tags evaluated as possible content containers.
    #[serde(default)]
    pub candidate_tags: Vec<String>,
    /// Chrome tags; candidates inside (or equal to) one of these are rejected.
    #[serde(default)]
    pub forbidden_tags: Vec<String>,
    /// id/class substrings that suggest reading content.
    #[serde(default)]
    pub positive_hints: Vec<String>,
    /// id/class substrings that suggest sidebars or comments.
    #[serde(default)]
    pub negative_hints: Vec<String>,
    /// Conventional selectors always offered after scored candidates.
    #[serde(default)]
    pub fallback_selectors: Vec<String>,
    /// Tags stripped from the content subtree.
    #[serde(default)]
    pub junk_tags: Vec<String>,
    /// Regexes over id/class marking ad or comment containers.
    #[serde(default)]
    pub junk_attr_patterns: Vec<String>,
    /// Boilerplate phrases, matched case-insensitively.
    #[serde(default)]
    pub junk_phrases: Vec<String>,
    #[serde(default)]
    pub title_rules: Vec<TitleRule>,
    #[serde(default)]
    pub next_rules: Vec<LinkRule>,
    #[serde(default)]
    pub prev_rules: Vec<LinkRule>,
    /// Regexes whose first capture group is a chapter number.
    #[serde(default)]
    pub chapter_number_patterns: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_rule_scope_defaults_to_document() {
        let rule: TitleRule = serde_json::from_str(r#"{"selector": "h1"}"#).unwrap();
        assert_eq!(rule.scope, RuleScope::Document);
        assert!(rule.text.is_none());
    }

    #[test]
    fn content_scope_deserializes() {
        let rule: TitleRule =
            serde_json::from_str(r#"{"selector": "h2", "scope": "content"}"#).unwrap();
        assert_eq!(rule.scope, RuleScope::Content);
    }

    #[test]
    fn empty_object_is_valid_tables() {
        let tables: HeuristicTables = serde_json::from_str("{}").unwrap();
        assert!(tables.junk_phrases.is_empty());
        assert_eq!(tables.thresholds, Thresholds::default());
    }
}
