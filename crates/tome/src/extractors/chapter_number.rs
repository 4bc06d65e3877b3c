// ABOUTME: Chapter number inference from the chapter title and, failing that, the source URL.
// ABOUTME: The body text is never consulted; prose is full of unrelated numbers.

use regex::Regex;

use crate::url_utils::decode_url;

/// First positive number captured by any pattern, trying patterns in order.
pub fn first_number(text: &str, patterns: &[Regex]) -> Option<u32> {
    patterns.iter().find_map(|re| {
        re.captures(text)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<u32>().ok())
            .filter(|n| *n > 0)
    })
}

/// Infers the chapter index: title first, then the percent-decoded URL.
pub fn infer_chapter_number(title: Option<&str>, source_url: &str, patterns: &[Regex]) -> Option<u32> {
    title
        .and_then(|t| first_number(t, patterns))
        .or_else(|| first_number(&decode_url(source_url), patterns))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::builtin_heuristics;

    fn infer(title: Option<&str>, url: &str) -> Option<u32> {
        infer_chapter_number(title, url, &builtin_heuristics().chapter_number_patterns)
    }

    #[test]
    fn title_beats_url() {
        assert_eq!(infer(Some("Chapter 42"), "https://x.example/book/17.html"), Some(42));
    }

    #[test]
    fn title_formats() {
        assert_eq!(infer(Some("chapter-7: Dawn"), ""), Some(7));
        assert_eq!(infer(Some("Episode 12"), ""), Some(12));
        assert_eq!(infer(Some("Ch. 300 - Return"), ""), Some(300));
        assert_eq!(infer(Some("第 15 章 回家"), ""), Some(15));
        assert_eq!(infer(Some("第8話"), ""), Some(8));
        assert_eq!(infer(Some("23화"), ""), Some(23));
        assert_eq!(infer(Some("分卷阅读 5"), ""), Some(5));
    }

    #[test]
    fn falls_back_to_url() {
        assert_eq!(infer(Some("The Long Road"), "https://x.example/b/1/88.html"), Some(88));
        assert_eq!(infer(None, "https://x.example/novel/chapter_19"), Some(19));
        assert_eq!(infer(None, "https://x.example/book/5/204/"), Some(204));
        assert_eq!(infer(None, "https://x.example/book/5/204?page=2"), Some(204));
    }

    #[test]
    fn decodes_cjk_url_segments() {
        assert_eq!(
            infer(None, "https://x.example/%E7%AC%AC31%E7%AB%A0"),
            Some(31)
        );
    }

    #[test]
    fn zero_is_not_a_chapter() {
        assert_eq!(infer(Some("Chapter 0"), "https://x.example/read/9.html"), Some(9));
        assert_eq!(infer(Some("Prologue"), "https://x.example/about"), None);
    }

    #[test]
    fn overflow_is_ignored() {
        assert_eq!(infer(Some("Chapter 99999999999999"), ""), None);
    }
}
