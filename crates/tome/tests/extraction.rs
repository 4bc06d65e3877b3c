// ABOUTME: Integration tests for the public suggest/extract API: documented scenarios and invariants.
// ABOUTME: Includes sweeps over generated documents for non-empty content and junk-free paragraphs.

use pretty_assertions::assert_eq;
use tome::url_utils::resolve_url;
use tome::{builtin_heuristics, extract_chapter, suggest_selectors, ScrapedChapter};
use url::Url;

const URL: &str = "https://reader.example.org/novel/77/17.html";

fn extract(html: &str, selector: &str) -> ScrapedChapter {
    extract_chapter(html, selector, URL, &builtin_heuristics()).unwrap()
}

#[test]
fn hello_world_scenario() {
    let chapter = extract(r#"<div id="content"><p>Hello</p><p>World</p></div>"#, "#content");
    assert_eq!(chapter.content, "Hello\n\nWorld");
}

#[test]
fn missing_selector_scenario() {
    let err = extract_chapter("<html><body><p>x</p></body></html>", "#missing", URL, &builtin_heuristics())
        .unwrap_err();
    assert!(err.is_content_not_found());
    assert!(err.to_string().contains("#missing"));
}

#[test]
fn br_fallback_scenario() {
    let chapter = extract(r#"<div id="content"><div>Hello<br>World</div></div>"#, "#content");
    assert_eq!(chapter.paragraphs().collect::<Vec<_>>(), vec!["Hello", "World"]);
}

#[test]
fn font_wrapped_chapter_keeps_line_breaks() {
    let chapter = extract(
        r#"<div id="content"><font>First line.<br><br>Second line.</font></div>"#,
        "#content",
    );
    assert_eq!(chapter.content, "First line.\n\nSecond line.");
}

#[test]
fn watermark_split_by_markup_keeps_long_prose() {
    let prose = "The lanterns along the canal were lit one by one. ".repeat(6);
    let html = format!(
        r#"<div id="content"><p>{}Please support our <b>website</b> now. {}</p><p>a</p><p>b</p></div>"#,
        prose, prose
    );
    let chapter = extract(&html, "#content");
    let first = chapter.paragraphs().next().unwrap();
    assert!(first.starts_with("The lanterns along the canal"));
    assert!(!first.contains("Please support"));
}

#[test]
fn article_body_suggestion_scenario() {
    let paragraphs: String = (1..=10)
        .map(|i| format!("<p>Sentence number {} of this chapter.</p>", i))
        .collect();
    let html = format!(
        r#"<html><body><div class="wrap"><article id="article-body">{}</article></div></body></html>"#,
        paragraphs
    );
    let suggestions = suggest_selectors(&html, &builtin_heuristics()).unwrap();
    assert_eq!(suggestions[0], "#article-body");
}

#[test]
fn title_number_beats_url_number() {
    let html = r#"<html><head><title>Chapter 42</title></head><body><div id="c">text</div></body></html>"#;
    let chapter = extract(html, "#c");
    assert_eq!(chapter.chapter_number, Some(42));
}

#[test]
fn body_digits_never_become_chapter_number() {
    let html = r#"<body><div id="c"><p>Chapter 99 was the one she loved.</p></div></body>"#;
    let chapter = extract_chapter(html, "#c", "https://reader.example.org/novel/latest", &builtin_heuristics())
        .unwrap();
    assert_eq!(chapter.chapter_number, None);
}

#[test]
fn relative_links_keep_origin() {
    let base = Url::parse(URL).unwrap();
    for href in ["18.html", "/novel/77/18.html", "../78/1.html", "?page=2", "18.html#top"] {
        let resolved = Url::parse(&resolve_url(URL, href).unwrap()).unwrap();
        assert_eq!(resolved.origin(), base.origin(), "href {}", href);
    }
}

#[test]
fn pagination_found_outside_content() {
    let html = r#"<body>
        <div id="c"><p>Text.</p></div>
        <div class="footer-nav"><a href="16.html">← Prev</a> <a href="18.html">Next →</a></div>
    </body>"#;
    let chapter = extract(html, "#c");
    assert_eq!(chapter.prev_url.as_deref(), Some("https://reader.example.org/novel/77/16.html"));
    assert_eq!(chapter.next_url.as_deref(), Some("https://reader.example.org/novel/77/18.html"));
}

#[test]
fn selector_with_multiple_paragraph_matches() {
    let html = r#"<body><div id="c"><p>One.</p><p>Two.</p></div><p>Outside.</p></body>"#;
    let chapter = extract(html, "#c p");
    assert_eq!(chapter.content, "One.\n\nTwo.");
}

const JUNK_SAMPLES: &[&str] = &[
    "Advertisement",
    "Please support our website",
    "请在",
    "最新章节",
    "광고",
];

fn generated_documents() -> Vec<String> {
    let bodies = [
        "",
        "   ",
        "<script>var a = 1;</script>",
        "Plain text only",
        "<p>One</p>",
        "<p>One</p><p>Two</p><p>Three</p>",
        "Line<br>Line<br><br>Other",
        "<div>Nested<br><span>inline</span> text</div>",
        "<pre>first\nsecond</pre>",
        "<iframe src=\"x\"></iframe><ins>ad</ins>",
        "<div class=\"comments\">Great chapter!</div>",
    ];
    let mut docs = Vec::new();
    for body in bodies {
        docs.push(format!(r#"<div id="c">{}</div>"#, body));
        for junk in JUNK_SAMPLES {
            docs.push(format!(r#"<div id="c">{}<p>{} here</p>{}<br>tail</div>"#, body, junk, junk));
        }
    }
    docs
}

#[test]
fn content_is_never_empty() {
    for html in generated_documents() {
        let chapter = extract(&html, "#c");
        assert!(!chapter.content.is_empty(), "empty content for {}", html);
        assert!(!chapter.content.contains('<'), "markup leaked for {}", html);
    }
}

#[test]
fn no_paragraph_contains_a_junk_phrase() {
    for html in generated_documents() {
        let chapter = extract(&html, "#c");
        for paragraph in chapter.paragraphs() {
            for junk in JUNK_SAMPLES {
                assert!(
                    !paragraph.contains(junk),
                    "paragraph {:?} kept junk {:?} from {}",
                    paragraph,
                    junk,
                    html
                );
            }
        }
    }
}

#[test]
fn extraction_is_idempotent() {
    for html in generated_documents() {
        assert_eq!(extract(&html, "#c"), extract(&html, "#c"));
    }
}

#[test]
fn chapter_numbers_are_positive() {
    for url in [
        "https://x.example/chapter-0",
        "https://x.example/0.html",
        "https://x.example/book/3/",
        "https://x.example/ch-12",
    ] {
        let chapter = extract_chapter("<div id=c>x</div>", "#c", url, &builtin_heuristics()).unwrap();
        if let Some(n) = chapter.chapter_number {
            assert!(n > 0, "{} gave {}", url, n);
        }
    }
}
