// ABOUTME: Chapter page fetching: HTTP GET with SSRF protection, a size cap and charset-aware decoding.
// ABOUTME: Legacy CJK encodings (GBK, Big5, EUC-KR, Shift_JIS) are decoded via header, meta tag or detection.

use std::collections::HashMap;
use std::net::IpAddr;

use bytes::Bytes;
use encoding_rs::Encoding;
use ipnet::IpNet;
use once_cell::sync::Lazy;
use regex::bytes::Regex;
use url::Url;

use crate::error::ReaderError;

/// Maximum allowed content length (10 MB).
pub const MAX_CONTENT_LENGTH: usize = 10 * 1024 * 1024;

/// How far into the body to look for a `<meta charset>` declaration.
const META_SNIFF_BYTES: usize = 2048;

static PRIVATE_NETS: Lazy<Vec<IpNet>> = Lazy::new(|| {
    [
        "10.0.0.0/8",
        "172.16.0.0/12",
        "192.168.0.0/16",
        "127.0.0.0/8",
        "169.254.0.0/16",
        "0.0.0.0/8",
        "100.64.0.0/10",
        "::1/128",
        "::/128",
        "fc00::/7",
        "fe80::/10",
    ]
    .iter()
    .filter_map(|net| net.parse().ok())
    .collect()
});

static META_CHARSET: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i-u)<meta[^>]+charset\s*=\s*["']?\s*([a-z0-9_\-:.]+)"#).unwrap()
});

/// Options for fetching a chapter page.
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    pub headers: HashMap<String, String>,
    pub allow_private_networks: bool,
}

/// A fetched and decoded page.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub status: u16,
    pub url: String,
    /// URL after redirects; relative links resolve against this.
    pub final_url: String,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl FetchedPage {
    /// The body decoded to UTF-8.
    pub fn html(&self) -> String {
        decode_body(&self.body, self.content_type.as_deref())
    }
}

/// Check if an IP address is in a private, loopback or link-local range.
pub(crate) fn is_private_ip(addr: &IpAddr) -> bool {
    let addr = match addr {
        IpAddr::V6(v6) => v6.to_ipv4_mapped().map(IpAddr::V4).unwrap_or(*addr),
        v4 => *v4,
    };
    PRIVATE_NETS.iter().any(|net| net.contains(&addr))
}

/// Fails with an SSRF error when `target` points at a private address.
async fn ensure_public_host(target: &Url, requested: &str, what: &str) -> Result<(), ReaderError> {
    let host = match target.host_str() {
        Some(host) => host.trim_start_matches('[').trim_end_matches(']'),
        None => return Ok(()),
    };

    if let Ok(ip) = host.parse::<IpAddr>() {
        if is_private_ip(&ip) {
            return Err(ReaderError::ssrf(
                requested,
                "Fetch",
                Some(anyhow::anyhow!("{} resolves to private address {}", what, ip)),
            ));
        }
        return Ok(());
    }

    let port = target.port_or_known_default().unwrap_or(80);
    let addrs = tokio::net::lookup_host((host, port)).await.map_err(|e| {
        ReaderError::fetch(
            requested,
            "Fetch",
            Some(anyhow::anyhow!("DNS lookup failed for {}: {}", what, e)),
        )
    })?;

    for socket_addr in addrs {
        if is_private_ip(&socket_addr.ip()) {
            return Err(ReaderError::ssrf(
                requested,
                "Fetch",
                Some(anyhow::anyhow!(
                    "{} resolves to private address {}",
                    what,
                    socket_addr.ip()
                )),
            ));
        }
    }
    Ok(())
}

fn encoding_for_label(label: &str) -> Option<&'static Encoding> {
    Encoding::for_label(label.trim().trim_matches(|c| c == '"' || c == '\'').as_bytes())
}

/// Extract charset value from a Content-Type header.
fn header_charset(content_type: &str) -> Option<&'static Encoding> {
    content_type
        .split(';')
        .filter_map(|part| {
            let (key, value) = part.split_once('=')?;
            key.trim().eq_ignore_ascii_case("charset").then_some(value)
        })
        .find_map(encoding_for_label)
}

/// Charset declared by a `<meta>` tag near the start of the document.
fn meta_charset(body: &[u8]) -> Option<&'static Encoding> {
    let head = &body[..body.len().min(META_SNIFF_BYTES)];
    let caps = META_CHARSET.captures(head)?;
    let label = std::str::from_utf8(caps.get(1)?.as_bytes()).ok()?;
    encoding_for_label(label)
}

/// Decode body bytes using the header charset, a meta declaration, or detection.
fn decode_body(body: &[u8], content_type: Option<&str>) -> String {
    let encoding = content_type
        .and_then(header_charset)
        .or_else(|| meta_charset(body))
        .unwrap_or_else(|| {
            let mut detector = chardetng::EncodingDetector::new();
            detector.feed(body, true);
            detector.guess(None, true)
        });
    let (decoded, _, _) = encoding.decode(body);
    decoded.into_owned()
}

fn request_error(url: &str, err: reqwest::Error) -> ReaderError {
    if err.is_timeout() {
        ReaderError::timeout(url, "Fetch", Some(anyhow::anyhow!("request timed out: {}", err)))
    } else {
        ReaderError::fetch(url, "Fetch", Some(anyhow::anyhow!("request failed: {}", err)))
    }
}

fn too_large(url: &str) -> ReaderError {
    ReaderError::fetch(
        url,
        "Fetch",
        Some(anyhow::anyhow!(
            "content larger than {} bytes",
            MAX_CONTENT_LENGTH
        )),
    )
}

/// Validates that `url` is an absolute http(s) URL.
pub fn parse_page_url(url: &str) -> Result<Url, ReaderError> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return Err(ReaderError::invalid_url(
            url,
            "Fetch",
            Some(anyhow::anyhow!("URL is empty")),
        ));
    }
    let parsed = Url::parse(trimmed).map_err(|e| {
        ReaderError::invalid_url(url, "Fetch", Some(anyhow::anyhow!("invalid URL: {}", e)))
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        _ => Err(ReaderError::invalid_url(
            url,
            "Fetch",
            Some(anyhow::anyhow!("scheme must be http or https")),
        )),
    }
}

/// Fetch a chapter page.
pub async fn fetch(
    client: &reqwest::Client,
    url: &str,
    opts: &FetchOptions,
) -> Result<FetchedPage, ReaderError> {
    let parsed_url = parse_page_url(url)?;

    if !opts.allow_private_networks {
        ensure_public_host(&parsed_url, url, "host").await?;
    }

    let mut request = client.get(parsed_url.as_str());
    for (key, value) in &opts.headers {
        request = request.header(key, value);
    }

    let response = request.send().await.map_err(|e| request_error(url, e))?;

    if !opts.allow_private_networks && response.url() != &parsed_url {
        ensure_public_host(response.url(), url, "redirect target").await?;
    }

    if let Some(len) = response.content_length() {
        if len as usize > MAX_CONTENT_LENGTH {
            return Err(too_large(url));
        }
    }

    let status = response.status().as_u16();
    let final_url = response.url().to_string();
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_lowercase());

    let body = response.bytes().await.map_err(|e| request_error(url, e))?;
    if body.len() > MAX_CONTENT_LENGTH {
        return Err(too_large(url));
    }

    if status != 200 {
        return Err(ReaderError::fetch(
            url,
            "Fetch",
            Some(anyhow::anyhow!("HTTP status {}", status)),
        ));
    }

    Ok(FetchedPage {
        status,
        url: url.to_string(),
        final_url,
        content_type,
        body,
    })
}
