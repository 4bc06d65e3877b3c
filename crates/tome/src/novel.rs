// ABOUTME: NovelConfig, the saved per-novel record (URL, content selector, language, glossary, provider).
// ABOUTME: The reader only consumes the selector and URL; the rest is carried for the translation layer.

use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Translation provider chosen for a novel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[default]
    Gemini,
    Groq,
    OpenRouter,
}

/// A saved novel as stored by the reader front end.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NovelConfig {
    /// URL of the chapter to open first.
    pub url: String,
    /// CSS selector of the chapter content container.
    pub selector: String,
    pub source_language: String,
    /// Free-form glossary passed to the translator.
    pub glossary: String,
    pub provider: Provider,
}

impl NovelConfig {
    /// Reads a novel record from a JSON file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("reading novel file {}", path.display()))?;
        let novel: NovelConfig = serde_json::from_str(&json)
            .with_context(|| format!("parsing novel file {}", path.display()))?;
        if novel.selector.trim().is_empty() {
            anyhow::bail!("novel file {} has no selector", path.display());
        }
        Ok(novel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn reads_camel_case_record() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r##"{{"url":"https://n.example/1.html","selector":"#content","sourceLanguage":"zh","glossary":"林 = Lin","provider":"openrouter"}}"##
        )
        .unwrap();

        let novel = NovelConfig::load(file.path()).unwrap();
        assert_eq!(
            novel,
            NovelConfig {
                url: "https://n.example/1.html".to_string(),
                selector: "#content".to_string(),
                source_language: "zh".to_string(),
                glossary: "林 = Lin".to_string(),
                provider: Provider::OpenRouter,
            }
        );
    }

    #[test]
    fn missing_selector_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"url":"https://n.example/1.html"}}"#).unwrap();
        let err = NovelConfig::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("no selector"));
    }

    #[test]
    fn unknown_provider_fails() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r##"{{"selector":"#c","provider":"carrier-pigeon"}}"##).unwrap();
        assert!(NovelConfig::load(file.path()).is_err());
    }
}
