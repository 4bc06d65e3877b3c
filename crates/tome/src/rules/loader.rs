// ABOUTME: Loads heuristic tables from the embedded JSON document or from a user-supplied file.
// ABOUTME: Provides builtin_heuristics() which compiles the embedded tables exactly once per process.

//! Heuristic table loader.
//!
//! The builtin tables ship inside the binary. A rules file in the same JSON
//! format replaces them wholesale; missing keys fall back to empty lists and
//! default thresholds.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use once_cell::sync::Lazy;

use crate::error::ReaderError;
use crate::rules::compiled::CompiledHeuristics;
use crate::rules::tables::HeuristicTables;

/// Embedded JSON containing the default heuristic tables.
const BUILTIN_HEURISTICS_JSON: &str = include_str!("../../data/heuristics.json");

static BUILTIN: Lazy<Arc<CompiledHeuristics>> = Lazy::new(|| {
    let tables = builtin_tables();
    Arc::new(CompiledHeuristics::compile(&tables).expect("builtin heuristics must compile"))
});

/// Returns the embedded tables in their uncompiled form.
///
/// # Panics
///
/// Panics if the embedded JSON is malformed.
pub fn builtin_tables() -> HeuristicTables {
    serde_json::from_str(BUILTIN_HEURISTICS_JSON).expect("failed to parse builtin heuristics")
}

/// Returns the shared, compiled builtin heuristics.
pub fn builtin_heuristics() -> Arc<CompiledHeuristics> {
    Arc::clone(&BUILTIN)
}

/// Parses and compiles tables from a JSON string.
pub fn heuristics_from_json(json: &str, origin: &str) -> Result<CompiledHeuristics, ReaderError> {
    let tables: HeuristicTables = serde_json::from_str(json)
        .with_context(|| format!("parsing {}", origin))
        .map_err(|e| ReaderError::rules(origin, e))?;
    CompiledHeuristics::compile(&tables).map_err(|e| ReaderError::rules(origin, e))
}

/// Reads, parses and compiles a rules file.
pub fn load_heuristics_file(path: &Path) -> Result<CompiledHeuristics, ReaderError> {
    let origin = path.display().to_string();
    let json = fs::read_to_string(path)
        .with_context(|| format!("reading {}", origin))
        .map_err(|e| ReaderError::rules(&origin, e))?;
    heuristics_from_json(&json, &origin)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_tables_parse() {
        let tables = builtin_tables();
        assert!(!tables.junk_phrases.is_empty());
        assert!(!tables.fallback_selectors.is_empty());
        assert!(!tables.title_rules.is_empty());
    }

    #[test]
    fn builtin_heuristics_compile() {
        let compiled = builtin_heuristics();
        assert_eq!(compiled.chapter_number_patterns.len(), 8);
        assert!(compiled.contains_junk("Please support our website!"));
        assert!(compiled.contains_junk("광고"));
    }

    #[test]
    fn builtin_contains_conventional_fallbacks() {
        let compiled = builtin_heuristics();
        for css in ["#content", ".content", "#novel_content", ".chapter-content", "article"] {
            assert!(
                compiled.fallback_selectors.iter().any(|s| s == css),
                "{} missing",
                css
            );
        }
    }

    #[test]
    fn invalid_json_is_rules_error() {
        let err = heuristics_from_json("{ not json", "inline").unwrap_err();
        assert!(err.is_rules());
        assert_eq!(err.url, "inline");
    }

    #[test]
    fn invalid_pattern_is_rules_error() {
        let json = r#"{
            "candidate_tags": ["div"],
            "forbidden_tags": ["nav"],
            "chapter_number_patterns": ["(unclosed"]
        }"#;
        let err = heuristics_from_json(json, "inline").unwrap_err();
        assert!(err.is_rules());
    }

    #[test]
    fn loads_rules_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.json");
        fs::write(
            &path,
            r#"{
                "thresholds": {"suggestion_cap": 2},
                "candidate_tags": ["div"],
                "forbidden_tags": ["nav"],
                "junk_phrases": ["custom watermark"]
            }"#,
        )
        .unwrap();

        let compiled = load_heuristics_file(&path).unwrap();
        assert_eq!(compiled.thresholds.suggestion_cap, 2);
        assert!(compiled.contains_junk("A CUSTOM WATERMARK here"));
    }

    #[test]
    fn missing_file_is_rules_error() {
        let err = load_heuristics_file(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(err.is_rules());
    }
}
