// ABOUTME: Compiled CSS selector cache for user-supplied content selectors.
// ABOUTME: A novel's selector is reused for every chapter, so it is parsed once per process.

//! Selector caching for repeated scrapes.
//!
//! The same user selector is applied to every chapter of a novel. This cache
//! compiles it once and hands out clones; parse failures are cached too so a
//! broken selector is reported consistently without being reparsed.

use std::collections::HashMap;
use std::sync::RwLock;

use once_cell::sync::Lazy;
use scraper::Selector;

/// Upper bound on cached entries; beyond it selectors are compiled but not stored.
const MAX_CACHED_SELECTORS: usize = 512;

type CacheEntry = Result<Selector, String>;

static SELECTOR_CACHE: Lazy<RwLock<HashMap<String, CacheEntry>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

fn compile(css: &str) -> CacheEntry {
    Selector::parse(css).map_err(|e| e.to_string())
}

/// Gets or compiles a CSS selector, caching the result.
///
/// Returns the parse error message for invalid selectors.
pub fn get_or_compile(css: &str) -> Result<Selector, String> {
    if let Ok(cache) = SELECTOR_CACHE.read() {
        if let Some(cached) = cache.get(css) {
            return cached.clone();
        }
    }

    let compiled = compile(css);
    if let Ok(mut cache) = SELECTOR_CACHE.write() {
        if cache.len() < MAX_CACHED_SELECTORS {
            cache
                .entry(css.to_string())
                .or_insert_with(|| compiled.clone());
        }
    }
    compiled
}
