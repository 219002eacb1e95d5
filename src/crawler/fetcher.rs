//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the loader:
//! - Building async and blocking clients from the same options
//! - GET requests that treat any non-2xx status as a page failure
//! - Error classification into [`PageError`]
//!
//! Redirects are not followed. A 3xx answer is reported as a status failure
//! so that every record is keyed by the URL whose body it holds.

use crate::config::HttpConfig;
use crate::PageError;
use reqwest::redirect::Policy;
use reqwest::StatusCode;
use std::time::Duration;
use url::Url;

/// Settings shared by the async and blocking clients
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientOptions {
    pub user_agent: String,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
}

impl From<&HttpConfig> for ClientOptions {
    fn from(config: &HttpConfig) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            request_timeout: Duration::from_secs(config.request_timeout_secs),
            connect_timeout: Duration::from_secs(config.connect_timeout_secs),
        }
    }
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self::from(&HttpConfig::default())
    }
}

/// Builds the async HTTP client used by `aload`
///
/// # Example
///
/// ```
/// use mkdocs_site_loader::crawler::{build_http_client, ClientOptions};
///
/// let client = build_http_client(&ClientOptions::default()).unwrap();
/// ```
pub fn build_http_client(options: &ClientOptions) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .user_agent(options.user_agent.as_str())
        .timeout(options.request_timeout)
        .connect_timeout(options.connect_timeout)
        .redirect(Policy::none())
        .gzip(true)
        .brotli(true)
        .build()
}

/// Builds the blocking HTTP client used by `load`
///
/// Must not be called from a thread that is driving an async runtime.
pub fn build_blocking_client(
    options: &ClientOptions,
) -> Result<reqwest::blocking::Client, reqwest::Error> {
    reqwest::blocking::Client::builder()
        .user_agent(options.user_agent.as_str())
        .timeout(options.request_timeout)
        .connect_timeout(options.connect_timeout)
        .redirect(Policy::none())
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a page body, failing on transport errors and non-2xx statuses
pub async fn fetch_page(client: &reqwest::Client, url: &Url) -> Result<String, PageError> {
    tracing::debug!("GET {}", url);

    let response = client
        .get(url.as_str())
        .send()
        .await
        .map_err(|source| PageError::Request {
            url: url.to_string(),
            source,
        })?;

    check_status(url, response.status())?;

    response.text().await.map_err(|source| PageError::Body {
        url: url.to_string(),
        source,
    })
}

/// Blocking counterpart of [`fetch_page`]
pub fn fetch_page_blocking(
    client: &reqwest::blocking::Client,
    url: &Url,
) -> Result<String, PageError> {
    tracing::debug!("GET {} (blocking)", url);

    let response = client
        .get(url.as_str())
        .send()
        .map_err(|source| PageError::Request {
            url: url.to_string(),
            source,
        })?;

    check_status(url, response.status())?;

    response.text().map_err(|source| PageError::Body {
        url: url.to_string(),
        source,
    })
}

/// Maps a non-success status to a page error
fn check_status(url: &Url, status: StatusCode) -> Result<(), PageError> {
    if status.is_success() {
        Ok(())
    } else {
        Err(PageError::Status {
            url: url.to_string(),
            status,
        })
    }
}
