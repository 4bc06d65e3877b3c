// ABOUTME: Error types for the Tome reader core including the ErrorCode enum and ReaderError struct.
// ABOUTME: Provides categorized errors with convenience constructors and boolean helpers.

use std::fmt;

/// Error codes representing different categories of reader failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    InvalidUrl,
    Fetch,
    Timeout,
    Ssrf,
    Parse,
    InvalidSelector,
    ContentNotFound,
    Rules,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::InvalidUrl => "invalid URL",
            ErrorCode::Fetch => "fetch error",
            ErrorCode::Timeout => "timeout",
            ErrorCode::Ssrf => "SSRF blocked",
            ErrorCode::Parse => "parse error",
            ErrorCode::InvalidSelector => "invalid selector",
            ErrorCode::ContentNotFound => "content not found",
            ErrorCode::Rules => "heuristic rules error",
        };
        write!(f, "{}", s)
    }
}

/// The main error type for reader operations.
#[derive(Debug, thiserror::Error)]
pub struct ReaderError {
    pub code: ErrorCode,
    pub url: String,
    pub op: String,
    #[source]
    pub source: Option<anyhow::Error>,
}

impl fmt::Display for ReaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tome: {} {}: {}", self.op, self.url, self.code)?;
        if let Some(ref src) = self.source {
            write!(f, ": {}", src)?;
        }
        Ok(())
    }
}

impl ReaderError {
    fn with_code(
        code: ErrorCode,
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self {
            code,
            url: url.into(),
            op: op.into(),
            source,
        }
    }

    /// Create an InvalidUrl error.
    pub fn invalid_url(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::with_code(ErrorCode::InvalidUrl, url, op, source)
    }

    /// Create a Fetch error.
    pub fn fetch(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::with_code(ErrorCode::Fetch, url, op, source)
    }

    /// Create a Timeout error.
    pub fn timeout(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::with_code(ErrorCode::Timeout, url, op, source)
    }

    /// Create an SSRF error.
    pub fn ssrf(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::with_code(ErrorCode::Ssrf, url, op, source)
    }

    /// Create a Parse error for HTML that yields no document.
    pub fn parse(url: impl Into<String>, op: impl Into<String>, reason: &str) -> Self {
        Self::with_code(
            ErrorCode::Parse,
            url,
            op,
            Some(anyhow::anyhow!("{}", reason)),
        )
    }

    /// Create an InvalidSelector error naming the offending selector.
    pub fn invalid_selector(url: impl Into<String>, selector: &str, reason: String) -> Self {
        Self::with_code(
            ErrorCode::InvalidSelector,
            url,
            "Extract",
            Some(anyhow::anyhow!("selector '{}' is not valid CSS: {}", selector, reason)),
        )
    }

    /// Create a ContentNotFound error naming both the selector and the page URL.
    pub fn content_not_found(url: impl Into<String>, selector: &str) -> Self {
        let url = url.into();
        let source = anyhow::anyhow!("selector '{}' matched no elements on {}", selector, url);
        Self::with_code(ErrorCode::ContentNotFound, url, "Extract", Some(source))
    }

    /// Create a Rules error for heuristic tables that fail to load or compile.
    pub fn rules(origin: impl Into<String>, source: anyhow::Error) -> Self {
        Self::with_code(ErrorCode::Rules, origin, "LoadRules", Some(source))
    }

    /// Replaces the URL the error refers to.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Returns true if this is a Timeout error.
    pub fn is_timeout(&self) -> bool {
        self.code == ErrorCode::Timeout
    }

    /// Returns true if this is an SSRF error.
    pub fn is_ssrf(&self) -> bool {
        self.code == ErrorCode::Ssrf
    }

    /// Returns true if this is a Fetch error.
    pub fn is_fetch(&self) -> bool {
        self.code == ErrorCode::Fetch
    }

    /// Returns true if this is an InvalidUrl error.
    pub fn is_invalid_url(&self) -> bool {
        self.code == ErrorCode::InvalidUrl
    }

    /// Returns true if this is a Parse error.
    pub fn is_parse(&self) -> bool {
        self.code == ErrorCode::Parse
    }

    /// Returns true if this is an InvalidSelector error.
    pub fn is_invalid_selector(&self) -> bool {
        self.code == ErrorCode::InvalidSelector
    }

    /// Returns true if the selector matched nothing.
    pub fn is_content_not_found(&self) -> bool {
        self.code == ErrorCode::ContentNotFound
    }

    /// Returns true if this is a Rules error.
    pub fn is_rules(&self) -> bool {
        self.code == ErrorCode::Rules
    }
}
