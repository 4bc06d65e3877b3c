// ABOUTME: The main Client struct for Tome that fetches chapter pages and runs suggestion or extraction.
// ABOUTME: Provides async suggest()/scrape() over URLs and sync suggest_html()/scrape_html() over HTML strings.

use std::net::ToSocketAddrs;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::ReaderError;
use crate::extractors::{extract_chapter, suggest_selectors};
use crate::novel::NovelConfig;
use crate::options::{ClientBuilder, Options};
use crate::resource::{fetch, is_private_ip, parse_page_url, FetchOptions, FetchedPage};
use crate::result::ScrapedChapter;
use crate::rules::{builtin_heuristics, CompiledHeuristics};

/// Redirect policy that refuses hops onto private networks.
fn redirect_policy(allow_private: bool) -> reqwest::redirect::Policy {
    reqwest::redirect::Policy::custom(move |attempt| {
        if attempt.previous().len() >= 10 {
            return attempt.error("too many redirects");
        }
        if allow_private {
            return attempt.follow();
        }

        let next = attempt.url().clone();
        let Some(host) = next.host_str() else {
            return attempt.follow();
        };
        let host = host.trim_start_matches('[').trim_end_matches(']');
        if let Ok(ip) = host.parse::<std::net::IpAddr>() {
            if is_private_ip(&ip) {
                return attempt.error("redirect to private IP blocked");
            }
            return attempt.follow();
        }

        // The policy callback is synchronous, so resolve with the blocking resolver.
        let port = next.port_or_known_default().unwrap_or(80);
        match (host, port).to_socket_addrs() {
            Ok(mut addrs) => {
                if addrs.any(|sa| is_private_ip(&sa.ip())) {
                    attempt.error("redirect to private IP blocked")
                } else {
                    attempt.follow()
                }
            }
            Err(_) => attempt.error("DNS lookup failed during redirect"),
        }
    })
}

fn build_http_client(opts: &Options) -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(redirect_policy(opts.allow_private_networks))
        .user_agent(&opts.user_agent)
        .timeout(opts.timeout)
        .cookie_store(true)
        .gzip(true)
        .brotli(true)
        .deflate(true)
        .build()
        .unwrap_or_else(|err| {
            warn!(error = %err, "falling back to default HTTP client");
            reqwest::Client::new()
        })
}

/// The main Tome client for suggesting selectors and scraping chapters.
pub struct Client {
    opts: Options,
    http_client: reqwest::Client,
    heuristics: Arc<CompiledHeuristics>,
}

impl Client {
    /// Create a new ClientBuilder for configuring the client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Create a new Client with the given options.
    pub fn new(opts: Options) -> Self {
        let http_client = opts
            .http_client
            .clone()
            .unwrap_or_else(|| build_http_client(&opts));
        let mut heuristics = opts.heuristics.clone().unwrap_or_else(builtin_heuristics);
        if let Some(thresholds) = &opts.thresholds {
            Arc::make_mut(&mut heuristics).thresholds = thresholds.clone();
        }

        Self {
            opts,
            http_client,
            heuristics,
        }
    }

    /// The heuristic tables this client extracts with.
    pub fn heuristics(&self) -> &CompiledHeuristics {
        &self.heuristics
    }

    /// Fetch a chapter page.
    pub async fn fetch_page(&self, url: &str) -> Result<FetchedPage, ReaderError> {
        let fetch_opts = FetchOptions {
            headers: self.opts.headers.clone(),
            allow_private_networks: self.opts.allow_private_networks,
        };
        let page = fetch(&self.http_client, url, &fetch_opts).await?;
        debug!(
            url,
            final_url = %page.final_url,
            bytes = page.body.len(),
            "fetched page"
        );
        Ok(page)
    }

    /// Suggest content selectors for the page at `url`.
    pub async fn suggest(&self, url: &str) -> Result<Vec<String>, ReaderError> {
        let page = self.fetch_page(url).await?;
        self.suggest_html(&page.html(), &page.final_url)
    }

    /// Scrape the chapter at `url` using `selector` for the content container.
    ///
    /// Links and the chapter number are read relative to the URL reached after
    /// redirects.
    pub async fn scrape(&self, url: &str, selector: &str) -> Result<ScrapedChapter, ReaderError> {
        let page = self.fetch_page(url).await?;
        self.scrape_html(&page.html(), &page.final_url, selector)
    }

    /// Scrape a chapter of a saved novel; `chapter_url` defaults to the novel's URL.
    pub async fn scrape_novel(
        &self,
        novel: &NovelConfig,
        chapter_url: Option<&str>,
    ) -> Result<ScrapedChapter, ReaderError> {
        let url = chapter_url.unwrap_or(&novel.url);
        self.scrape(url, &novel.selector).await
    }

    /// Suggest content selectors for an HTML string fetched from `url`.
    pub fn suggest_html(&self, html: &str, url: &str) -> Result<Vec<String>, ReaderError> {
        suggest_selectors(html, &self.heuristics).map_err(|e| e.with_url(url))
    }

    /// Scrape a chapter from an HTML string fetched from `url`.
    pub fn scrape_html(
        &self,
        html: &str,
        url: &str,
        selector: &str,
    ) -> Result<ScrapedChapter, ReaderError> {
        parse_page_url(url).map_err(|mut e| {
            e.op = "Extract".to_string();
            e
        })?;
        extract_chapter(html, selector, url.trim(), &self.heuristics)
    }
}
