// ABOUTME: Main library entry point for Tome, the web-novel chapter reader core.
// ABOUTME: Re-exports the public API: Client, ClientBuilder, ScrapedChapter, ReaderError, ErrorCode, Options.

//! Tome - content selector suggestion and chapter extraction for web novels.
//!
//! Given a chapter page, Tome proposes CSS selectors for the prose container
//! and, given a selector, extracts clean paragraphs, the chapter title and
//! number, and the next/previous chapter links.
//!
//! # Example
//!
//! ```no_run
//! use tome::{Client, ReaderError};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), ReaderError> {
//!     let client = Client::builder().build();
//!     let url = "https://example.com/book/1/1.html";
//!     let selectors = client.suggest(url).await?;
//!     let chapter = client.scrape(url, &selectors[0]).await?;
//!     println!("{}", chapter.format_markdown());
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod dom;
pub mod error;
pub mod extractors;
pub mod novel;
pub mod options;
pub mod resource;
pub mod result;
pub mod rules;
pub mod url_utils;

pub use crate::client::Client;
pub use crate::error::{ErrorCode, ReaderError};
pub use crate::extractors::{extract_chapter, suggest_selectors};
pub use crate::novel::{NovelConfig, Provider};
pub use crate::options::{ClientBuilder, Options, Thresholds};
pub use crate::result::{ScrapedChapter, UNKNOWN_TITLE};
pub use crate::rules::{builtin_heuristics, load_heuristics_file, CompiledHeuristics};
