//! Per-crawl state
//!
//! A [`CrawlSession`] is created fresh by every `load`/`aload` call and owned
//! by the traversal that drives it. It holds the set of claimed URLs and the
//! ordered list of crawl records that becomes the returned documents.

use crate::document::{CrawlResult, Document};
use crate::PageError;
use std::collections::HashSet;
use std::time::{Duration, Instant};
use url::Url;

/// State of a single crawl invocation
#[derive(Debug)]
pub struct CrawlSession {
    /// Every URL that has been handed to a fetch, keyed by normalized string
    claimed: HashSet<String>,

    /// One record per fetched page, in completion order
    results: Vec<CrawlResult>,

    /// Number of records that stand in for failed pages
    degraded: usize,

    started: Instant,
    deadline: Option<Duration>,
}

impl CrawlSession {
    /// Creates an empty session; `deadline` bounds the whole crawl
    pub fn new(deadline: Option<Duration>) -> Self {
        Self {
            claimed: HashSet::new(),
            results: Vec::new(),
            degraded: 0,
            started: Instant::now(),
            deadline,
        }
    }

    /// Registers `url` for fetching
    ///
    /// Returns false if the URL was already claimed. Check and registration
    /// happen in one step, so a URL is fetched at most once per session.
    pub fn claim(&mut self, url: &str) -> bool {
        if self.claimed.contains(url) {
            return false;
        }
        self.claimed.insert(url.to_string())
    }

    /// Returns true if `url` has already been claimed
    pub fn is_claimed(&self, url: &str) -> bool {
        self.claimed.contains(url)
    }

    /// Stores the outcome of fetching `url` and returns the page's paths
    ///
    /// A failed page becomes a degraded record carrying the error text and
    /// no paths.
    pub fn record(&mut self, url: &Url, outcome: Result<CrawlResult, PageError>) -> Vec<String> {
        let result = match outcome {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!("Error processing {}: {}", url, e);
                self.degraded += 1;
                CrawlResult::degraded(url.as_str(), &e)
            }
        };

        let paths = result.related_paths.clone();
        self.results.push(result);
        paths
    }

    /// Time left before the deadline, or None without a deadline
    pub fn time_left(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_sub(self.started.elapsed()))
    }

    /// Returns true once the crawl deadline has passed
    pub fn deadline_exceeded(&self) -> bool {
        self.time_left() == Some(Duration::ZERO)
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Number of pages recorded so far
    pub fn page_count(&self) -> usize {
        self.results.len()
    }

    /// Number of degraded records so far
    pub fn degraded_count(&self) -> usize {
        self.degraded
    }

    /// Consumes the session, producing documents with filtered metadata
    pub fn into_documents(self, metadata_filter: &[String]) -> Vec<Document> {
        self.results
            .into_iter()
            .map(|result| result.into_document(metadata_filter))
            .collect()
    }
}
