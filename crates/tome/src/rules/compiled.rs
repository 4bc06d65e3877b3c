// ABOUTME: Compiles HeuristicTables into ready-to-use selectors, regexes and an Aho-Corasick phrase matcher.
// ABOUTME: Compilation happens once per table set so extraction never parses a pattern twice.

use aho_corasick::{AhoCorasick, MatchKind};
use anyhow::{anyhow, Context};
use regex::Regex;
use scraper::Selector;

use crate::options::Thresholds;
use crate::rules::tables::{HeuristicTables, LinkRule, RuleScope, TitleRule};

/// A title rule with its selector and text pattern compiled.
#[derive(Debug, Clone)]
pub struct CompiledTitleRule {
    pub selector: Selector,
    pub scope: RuleScope,
    pub text: Option<Regex>,
}

/// A pagination rule with its selector and text pattern compiled.
#[derive(Debug, Clone)]
pub struct CompiledLinkRule {
    pub selector: Selector,
    pub text: Option<Regex>,
}

/// Immutable, compiled form of [`HeuristicTables`].
#[derive(Debug, Clone)]
pub struct CompiledHeuristics {
    pub thresholds: Thresholds,
    pub candidates: Selector,
    pub forbidden: Selector,
    pub positive_hints: Vec<String>,
    pub negative_hints: Vec<String>,
    pub fallback_selectors: Vec<String>,
    pub junk_tags: Option<Selector>,
    pub junk_attrs: Vec<Regex>,
    junk_phrases: Option<AhoCorasick>,
    pub title_rules: Vec<CompiledTitleRule>,
    pub next_rules: Vec<CompiledLinkRule>,
    pub prev_rules: Vec<CompiledLinkRule>,
    pub chapter_number_patterns: Vec<Regex>,
}

fn compile_selector(css: &str) -> anyhow::Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow!("invalid selector '{}': {}", css, e))
}

fn compile_tag_list(tags: &[String], what: &str) -> anyhow::Result<Selector> {
    if tags.is_empty() {
        return Err(anyhow!("{} must not be empty", what));
    }
    compile_selector(&tags.join(", ")).with_context(|| format!("compiling {}", what))
}

fn compile_regex(pattern: &str) -> anyhow::Result<Regex> {
    Regex::new(pattern).with_context(|| format!("invalid pattern '{}'", pattern))
}

fn compile_optional_regex(pattern: Option<&String>) -> anyhow::Result<Option<Regex>> {
    pattern.map(|p| compile_regex(p)).transpose()
}

fn compile_title_rule(rule: &TitleRule) -> anyhow::Result<CompiledTitleRule> {
    Ok(CompiledTitleRule {
        selector: compile_selector(&rule.selector)?,
        scope: rule.scope,
        text: compile_optional_regex(rule.text.as_ref())?,
    })
}

fn compile_link_rule(rule: &LinkRule) -> anyhow::Result<CompiledLinkRule> {
    Ok(CompiledLinkRule {
        selector: compile_selector(&rule.selector)?,
        text: compile_optional_regex(rule.text.as_ref())?,
    })
}

fn lowercase_all(items: &[String]) -> Vec<String> {
    items
        .iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

impl CompiledHeuristics {
    /// Compiles every selector, regex and phrase list in `tables`.
    ///
    /// Fails on the first invalid entry so bad tables surface at load time
    /// rather than in the middle of an extraction.
    pub fn compile(tables: &HeuristicTables) -> anyhow::Result<Self> {
        let candidates = compile_tag_list(&tables.candidate_tags, "candidate_tags")?;
        let forbidden = compile_tag_list(&tables.forbidden_tags, "forbidden_tags")?;

        let junk_tags = if tables.junk_tags.is_empty() {
            None
        } else {
            Some(compile_tag_list(&tables.junk_tags, "junk_tags")?)
        };

        let junk_attrs = tables
            .junk_attr_patterns
            .iter()
            .map(|p| compile_regex(p))
            .collect::<anyhow::Result<Vec<_>>>()?;

        let phrases: Vec<&str> = tables
            .junk_phrases
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect();
        let junk_phrases = if phrases.is_empty() {
            None
        } else {
            Some(
                AhoCorasick::builder()
                    .ascii_case_insensitive(true)
                    .match_kind(MatchKind::LeftmostFirst)
                    .build(phrases)
                    .context("building junk phrase matcher")?,
            )
        };

        let title_rules = tables
            .title_rules
            .iter()
            .map(compile_title_rule)
            .collect::<anyhow::Result<Vec<_>>>()?;
        let next_rules = tables
            .next_rules
            .iter()
            .map(compile_link_rule)
            .collect::<anyhow::Result<Vec<_>>>()?;
        let prev_rules = tables
            .prev_rules
            .iter()
            .map(compile_link_rule)
            .collect::<anyhow::Result<Vec<_>>>()?;

        let mut chapter_number_patterns = Vec::with_capacity(tables.chapter_number_patterns.len());
        for pattern in &tables.chapter_number_patterns {
            let re = compile_regex(pattern)?;
            if re.captures_len() < 2 {
                return Err(anyhow!(
                    "chapter number pattern '{}' has no capture group",
                    pattern
                ));
            }
            chapter_number_patterns.push(re);
        }

        for css in &tables.fallback_selectors {
            compile_selector(css).context("compiling fallback_selectors")?;
        }

        Ok(Self {
            thresholds: tables.thresholds.clone(),
            candidates,
            forbidden,
            positive_hints: lowercase_all(&tables.positive_hints),
            negative_hints: lowercase_all(&tables.negative_hints),
            fallback_selectors: tables.fallback_selectors.clone(),
            junk_tags,
            junk_attrs,
            junk_phrases,
            title_rules,
            next_rules,
            prev_rules,
            chapter_number_patterns,
        })
    }

    /// Returns true if `text` contains any configured junk phrase.
    pub fn contains_junk(&self, text: &str) -> bool {
        self.junk_phrases
            .as_ref()
            .is_some_and(|ac| ac.is_match(text))
    }

    /// Byte ranges of the junk phrases found in `text`, in order.
    pub fn junk_spans(&self, text: &str) -> Vec<(usize, usize)> {
        self.junk_phrases
            .as_ref()
            .map(|ac| ac.find_iter(text).map(|m| (m.start(), m.end())).collect())
            .unwrap_or_default()
    }

    /// Returns true if an id or class value marks an ad or comment container.
    pub fn is_junk_attr(&self, value: &str) -> bool {
        !value.is_empty() && self.junk_attrs.iter().any(|re| re.is_match(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_tables() -> HeuristicTables {
        HeuristicTables {
            candidate_tags: vec!["div".into()],
            forbidden_tags: vec!["nav".into()],
            ..Default::default()
        }
    }

    #[test]
    fn compiles_minimal_tables() {
        let compiled = CompiledHeuristics::compile(&minimal_tables()).unwrap();
        assert!(compiled.junk_tags.is_none());
        assert!(!compiled.contains_junk("anything at all"));
    }

    #[test]
    fn rejects_invalid_selector() {
        let mut tables = minimal_tables();
        tables.title_rules.push(TitleRule {
            selector: "[[[broken".into(),
            ..Default::default()
        });
        assert!(CompiledHeuristics::compile(&tables).is_err());
    }

    #[test]
    fn rejects_pattern_without_capture_group() {
        let mut tables = minimal_tables();
        tables.chapter_number_patterns.push(r"chapter\d+".into());
        let err = CompiledHeuristics::compile(&tables).unwrap_err();
        assert!(err.to_string().contains("capture group"));
    }

    #[test]
    fn requires_candidate_tags() {
        let mut tables = minimal_tables();
        tables.candidate_tags.clear();
        assert!(CompiledHeuristics::compile(&tables).is_err());
    }

    #[test]
    fn junk_phrases_ignore_ascii_case() {
        let mut tables = minimal_tables();
        tables.junk_phrases = vec!["Advertisement".into(), "最新章节".into()];
        let compiled = CompiledHeuristics::compile(&tables).unwrap();
        assert!(compiled.contains_junk("-- ADVERTISEMENT --"));
        assert!(compiled.contains_junk("看最新章节"));
        assert!(!compiled.contains_junk("She advertised nothing."));
    }

    #[test]
    fn junk_attr_matches_tokens_only() {
        let mut tables = minimal_tables();
        tables.junk_attr_patterns = vec![r"(?i)(^|[\s_-])(ads?|banner)($|[\s_-])".into()];
        let compiled = CompiledHeuristics::compile(&tables).unwrap();
        assert!(compiled.is_junk_attr("top-ad"));
        assert!(compiled.is_junk_attr("ads wide"));
        assert!(!compiled.is_junk_attr("read-content"));
        assert!(!compiled.is_junk_attr("header"));
        assert!(!compiled.is_junk_attr(""));
    }
}
