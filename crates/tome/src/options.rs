// ABOUTME: Configuration for the Tome reader: tunable heuristic thresholds, client Options and ClientBuilder.
// ABOUTME: ClientBuilder provides a fluent API for constructing Client instances with custom settings.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::rules::CompiledHeuristics;

/// Numeric knobs used by the suggester and the extractor.
///
/// Every value is a tunable default; a rules file may override any subset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Maximum number of selectors returned by the suggester.
    pub suggestion_cap: usize,
    /// Candidates must score strictly above this to be kept.
    pub min_candidate_score: f64,
    /// Score per character of direct (own) text.
    pub direct_text_weight: f64,
    /// Score per descendant `<p>`.
    pub paragraph_weight: f64,
    /// Score per descendant `<a>`; negative.
    pub link_weight: f64,
    /// Bonus when id/class carries a content hint.
    pub positive_hint_bonus: f64,
    /// Penalty when id/class carries a sidebar/comment hint; negative.
    pub negative_hint_penalty: f64,
    /// A class selector matching more elements than this is too broad.
    pub max_class_matches: usize,
    /// Paragraph-tag strategy needs at least this many `<p>` descendants.
    pub min_paragraph_tags: usize,
    /// ...and at least this many characters of subtree text.
    pub min_paragraph_text_chars: usize,
    /// Title candidates longer than this are ignored.
    pub max_title_chars: usize,
    /// A junk-bearing element longer than this loses only its junk text nodes.
    pub max_junk_element_chars: usize,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            suggestion_cap: 7,
            min_candidate_score: 20.0,
            direct_text_weight: 0.1,
            paragraph_weight: 10.0,
            link_weight: -5.0,
            positive_hint_bonus: 25.0,
            negative_hint_penalty: -50.0,
            max_class_matches: 3,
            min_paragraph_tags: 3,
            min_paragraph_text_chars: 100,
            max_title_chars: 200,
            max_junk_element_chars: 200,
        }
    }
}

/// Configuration options for the Tome client.
#[derive(Debug, Clone)]
pub struct Options {
    pub timeout: Duration,
    pub user_agent: String,
    pub allow_private_networks: bool,
    pub http_client: Option<reqwest::Client>,
    pub headers: HashMap<String, String>,
    pub heuristics: Option<Arc<CompiledHeuristics>>,
    /// Overrides the thresholds carried by the heuristic tables.
    pub thresholds: Option<Thresholds>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: "Mozilla/5.0 (compatible; Tome/0.1)".to_string(),
            allow_private_networks: false,
            http_client: None,
            headers: HashMap::new(),
            heuristics: None,
            thresholds: None,
        }
    }
}

/// Builder for constructing Client instances with custom configuration.
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    opts: Options,
}

impl ClientBuilder {
    /// Create a new ClientBuilder with default options.
    pub fn new() -> Self {
        Self {
            opts: Options::default(),
        }
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.opts.timeout = timeout;
        self
    }

    /// Set the User-Agent header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.opts.user_agent = user_agent.into();
        self
    }

    /// Allow or disallow requests to private networks.
    pub fn allow_private_networks(mut self, allow: bool) -> Self {
        self.opts.allow_private_networks = allow;
        self
    }

    /// Use a custom HTTP client.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.opts.http_client = Some(client);
        self
    }

    /// Add a custom header to all requests.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.opts.headers.insert(key.into(), value.into());
        self
    }

    /// Replace the builtin heuristic tables.
    pub fn heuristics(mut self, heuristics: Arc<CompiledHeuristics>) -> Self {
        self.opts.heuristics = Some(heuristics);
        self
    }

    /// Override the numeric thresholds of whichever tables are in use.
    pub fn thresholds(mut self, thresholds: Thresholds) -> Self {
        self.opts.thresholds = Some(thresholds);
        self
    }

    /// Build the Client with the configured options.
    pub fn build(self) -> Client {
        Client::new(self.opts)
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_thresholds_keep_defaults() {
        let t: Thresholds = serde_json::from_str(r#"{"suggestion_cap": 5}"#).unwrap();
        assert_eq!(t.suggestion_cap, 5);
        assert_eq!(t.min_paragraph_tags, Thresholds::default().min_paragraph_tags);
    }
}
