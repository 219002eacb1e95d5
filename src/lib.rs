//! MkDocs site loader: a recursive documentation-site crawler
//!
//! This crate walks the internal link graph of a documentation website,
//! extracts page text and link metadata, and returns one document per page
//! for a downstream indexing pipeline.

pub mod config;
pub mod crawler;
pub mod document;
pub mod output;
pub mod url;

use thiserror::Error;

/// Main error type for loader operations
///
/// Only errors that prevent a crawl from starting surface here. Failures of
/// individual pages are recorded as degraded documents instead.
#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),
}

/// Errors for a single page
///
/// These never escape `load`/`aload`; their text becomes the body of a
/// degraded document.
#[derive(Debug, Error)]
pub enum PageError {
    #[error("Request to {url} failed: {source}")]
    Request { url: String, source: reqwest::Error },

    #[error("HTTP status {status} for url '{url}'")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("Failed to read body of {url}: {source}")]
    Body { url: String, source: reqwest::Error },

    #[error("HTML parse error for {url}: {message}")]
    Parse { url: String, message: String },
}

/// Result type alias for loader operations
pub type Result<T> = std::result::Result<T, LoaderError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::SiteLoader;
pub use document::{CrawlResult, Document};
pub use crate::url::{normalize_path, SectionFilter};
