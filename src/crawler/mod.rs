//! Crawler module for fetching and processing documentation pages
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching (async and blocking)
//! - HTML parsing, link classification and text extraction
//! - Per-crawl session state
//! - The sequential and concurrent traversal schedules

mod fetcher;
mod loader;
mod parser;
mod session;

pub use fetcher::{
    build_blocking_client, build_http_client, fetch_page, fetch_page_blocking, ClientOptions,
};
pub use loader::SiteLoader;
pub use parser::{extract_text, parse_page, ParsedPage};
pub use session::CrawlSession;

use crate::config::Config;
use crate::document::Document;
use crate::LoaderError;

/// Runs a complete concurrent crawl described by `config`
///
/// # Example
///
/// ```no_run
/// use mkdocs_site_loader::config::load_config;
/// use mkdocs_site_loader::crawler::crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("loader.toml"))?;
/// let documents = crawl(&config).await?;
/// # Ok(())
/// # }
/// ```
pub async fn crawl(config: &Config) -> Result<Vec<Document>, LoaderError> {
    SiteLoader::from_config(config)?.aload().await
}

/// Runs a complete sequential crawl described by `config`
///
/// Blocks the calling thread until the crawl is done.
pub fn crawl_blocking(config: &Config) -> Result<Vec<Document>, LoaderError> {
    SiteLoader::from_config(config)?.load()
}
