// ABOUTME: ScrapedChapter struct holding the structured output of chapter extraction.
// ABOUTME: Serializes with camelCase keys and offers paragraph access and a markdown rendering.

use serde::{Deserialize, Serialize};

/// Title used when no title rule matches.
pub const UNKNOWN_TITLE: &str = "Unknown Chapter";

/// The structured result of extracting one chapter page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapedChapter {
    pub title: String,
    pub chapter_number: Option<u32>,
    pub content: String,
    pub next_url: Option<String>,
    pub prev_url: Option<String>,
}

impl Default for ScrapedChapter {
    fn default() -> Self {
        Self {
            title: UNKNOWN_TITLE.to_string(),
            chapter_number: None,
            content: String::new(),
            next_url: None,
            prev_url: None,
        }
    }
}

/// Diagnostic text substituted for content when nothing readable was found.
pub fn placeholder_content(selector: &str, url: &str) -> String {
    format!(
        "No readable content was found using selector '{}' on {}.",
        selector, url
    )
}

impl ScrapedChapter {
    /// The content split back into its paragraphs.
    pub fn paragraphs(&self) -> impl Iterator<Item = &str> {
        self.content.split("\n\n").filter(|p| !p.is_empty())
    }

    /// Returns true if a title rule matched.
    pub fn has_title(&self) -> bool {
        self.title != UNKNOWN_TITLE
    }

    /// Returns true if either pagination link was found.
    pub fn has_navigation(&self) -> bool {
        self.next_url.is_some() || self.prev_url.is_some()
    }

    /// Format the chapter as a markdown document with navigation links at the end.
    pub fn format_markdown(&self) -> String {
        let mut parts = Vec::new();

        let heading = match self.chapter_number {
            Some(n) if !self.title.contains(&n.to_string()) => {
                format!("# {} (#{})", self.title, n)
            }
            _ => format!("# {}", self.title),
        };
        parts.push(heading);
        parts.push(self.content.clone());

        let mut nav = Vec::new();
        if let Some(ref prev) = self.prev_url {
            nav.push(format!("[Previous]({})", prev));
        }
        if let Some(ref next) = self.next_url {
            nav.push(format!("[Next]({})", next));
        }
        if !nav.is_empty() {
            parts.push("---".to_string());
            parts.push(nav.join(" | "));
        }

        parts.join("\n\n")
    }
}
