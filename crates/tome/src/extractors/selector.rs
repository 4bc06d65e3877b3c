// ABOUTME: Derives a minimal, safe CSS selector (#id or .class) for a candidate content element.
// ABOUTME: Identifiers are validated before interpolation; an unusable id/class yields no selector rather than an error.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

static CSS_IDENTIFIER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^-?(?:[_a-zA-Z]|[^\x00-\x7F])(?:[_a-zA-Z0-9-]|[^\x00-\x7F])*$").unwrap()
});

/// Returns the identifier if it can be used verbatim after `#` or `.`.
pub fn css_identifier(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    if CSS_IDENTIFIER.is_match(trimmed) {
        Some(trimmed)
    } else {
        None
    }
}

fn count_matches(doc: &Html, css: &str) -> Option<usize> {
    let selector = Selector::parse(css).ok()?;
    Some(doc.select(&selector).count())
}

/// `#id` when the id is a valid identifier that occurs exactly once.
pub fn id_selector(doc: &Html, element: &ElementRef) -> Option<String> {
    let id = css_identifier(element.value().id()?)?;
    let css = format!("#{}", id);
    (count_matches(doc, &css)? == 1).then_some(css)
}

/// `.class` from the first class token when it matches at most `max_matches` elements.
pub fn class_selector(doc: &Html, element: &ElementRef, max_matches: usize) -> Option<String> {
    let first = element.value().attr("class")?.split_whitespace().next()?;
    let class = css_identifier(first)?;
    let css = format!(".{}", class);
    let count = count_matches(doc, &css)?;
    (count >= 1 && count <= max_matches).then_some(css)
}

/// The shortest selector that reliably isolates `element` across chapter pages.
pub fn minimal_selector(doc: &Html, element: &ElementRef, max_class_matches: usize) -> Option<String> {
    id_selector(doc, element).or_else(|| class_selector(doc, element, max_class_matches))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first<'a>(doc: &'a Html, css: &str) -> ElementRef<'a> {
        doc.select(&Selector::parse(css).unwrap()).next().unwrap()
    }

    #[test]
    fn validates_identifiers() {
        assert_eq!(css_identifier("content"), Some("content"));
        assert_eq!(css_identifier("-chapter_body2"), Some("-chapter_body2"));
        assert_eq!(css_identifier("正文"), Some("正文"));
        assert_eq!(css_identifier("1abc"), None);
        assert_eq!(css_identifier("a\"],body[x"), None);
        assert_eq!(css_identifier("two words"), None);
        assert_eq!(css_identifier(""), None);
    }

    #[test]
    fn prefers_unique_id() {
        let doc = Html::parse_document(r#"<div id="text" class="box">x</div>"#);
        let el = first(&doc, "div");
        assert_eq!(minimal_selector(&doc, &el, 3), Some("#text".to_string()));
    }

    #[test]
    fn duplicated_id_falls_back_to_class() {
        let doc = Html::parse_document(
            r#"<div id="dup" class="read-box">x</div><div id="dup">y</div>"#,
        );
        let el = first(&doc, "div");
        assert_eq!(minimal_selector(&doc, &el, 3), Some(".read-box".to_string()));
    }

    #[test]
    fn rejects_broad_class() {
        let doc = Html::parse_document(
            r#"<div class="row">a</div><div class="row">b</div><div class="row">c</div><div class="row">d</div>"#,
        );
        let el = first(&doc, "div");
        assert_eq!(minimal_selector(&doc, &el, 3), None);
    }

    #[test]
    fn unsafe_id_produces_nothing() {
        let doc = Html::parse_document(r#"<div id="a b">x</div>"#);
        let el = first(&doc, "div");
        assert_eq!(minimal_selector(&doc, &el, 3), None);
    }
}
