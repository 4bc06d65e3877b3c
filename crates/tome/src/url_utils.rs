// ABOUTME: URL helpers for pagination links: href filtering, resolution against the page URL, and decoding.
// ABOUTME: Protocol-relative hrefs borrow the page scheme; only http(s) results are accepted.

use anyhow::{anyhow, bail, Context};
use percent_encoding::percent_decode_str;
use url::Url;

/// Returns false for hrefs that never lead to another page.
pub fn is_navigable_href(href: &str) -> bool {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return false;
    }
    let lower = href.to_ascii_lowercase();
    !(lower.starts_with("javascript:")
        || lower.starts_with("mailto:")
        || lower.starts_with("tel:")
        || lower.starts_with("data:"))
}

/// Resolve `href` against `base` into an absolute http(s) URL.
///
/// - absolute `http://` / `https://` hrefs are validated and returned,
/// - `//host/path` takes the scheme of `base`,
/// - anything else is joined onto `base`.
pub fn resolve_url(base: &str, href: &str) -> anyhow::Result<String> {
    let href = href.trim();
    if href.is_empty() {
        bail!("empty href");
    }

    let base_url = Url::parse(base.trim()).with_context(|| format!("invalid base URL '{}'", base))?;

    let resolved = if let Some(rest) = href.strip_prefix("//") {
        Url::parse(&format!("{}://{}", base_url.scheme(), rest))
            .with_context(|| format!("invalid protocol-relative href '{}'", href))?
    } else {
        base_url
            .join(href)
            .with_context(|| format!("cannot join '{}' onto '{}'", href, base))?
    };

    match resolved.scheme() {
        "http" | "https" if resolved.host().is_some() => Ok(resolved.to_string()),
        scheme => Err(anyhow!("resolved URL '{}' has unsupported scheme '{}'", resolved, scheme)),
    }
}

/// Percent-decode a URL so non-ASCII path segments can be pattern-matched.
pub fn decode_url(url: &str) -> String {
    percent_decode_str(url).decode_utf8_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://novels.example.com/book/12/100.html";

    #[test]
    fn relative_href_keeps_origin() {
        assert_eq!(
            resolve_url(BASE, "101.html").unwrap(),
            "https://novels.example.com/book/12/101.html"
        );
        assert_eq!(
            resolve_url(BASE, "/book/12/99.html").unwrap(),
            "https://novels.example.com/book/12/99.html"
        );
        assert_eq!(
            resolve_url(BASE, "../13/1.html").unwrap(),
            "https://novels.example.com/book/13/1.html"
        );
    }

    #[test]
    fn protocol_relative_uses_base_scheme() {
        assert_eq!(
            resolve_url("http://a.example/x", "//cdn.example/ch/2").unwrap(),
            "http://cdn.example/ch/2"
        );
    }

    #[test]
    fn absolute_href_passes_through() {
        assert_eq!(
            resolve_url(BASE, "https://other.example/c/5").unwrap(),
            "https://other.example/c/5"
        );
    }

    #[test]
    fn bad_inputs_fail() {
        assert!(resolve_url("not a url", "1.html").is_err());
        assert!(resolve_url(BASE, "").is_err());
        assert!(resolve_url(BASE, "ftp://files.example/1").is_err());
    }

    #[test]
    fn navigable_href_filter() {
        assert!(is_navigable_href("/next.html"));
        assert!(!is_navigable_href("#"));
        assert!(!is_navigable_href("JavaScript:void(0)"));
        assert!(!is_navigable_href("   "));
    }

    #[test]
    fn decodes_percent_escapes() {
        assert_eq!(decode_url("/%E7%AC%AC12%E7%AB%A0"), "/第12章");
    }
}
