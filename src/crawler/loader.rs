//! Site loader - recursive crawl orchestration
//!
//! [`SiteLoader`] walks the internal link graph of a documentation site from
//! its start page. Two schedules share the same traversal rules:
//!
//! - [`SiteLoader::load`]: one blocking request at a time, depth-first
//! - [`SiteLoader::aload`]: tokio tasks gated by a semaphore of
//!   `max_in_flight` permits
//!
//! In both, a page is fetched at most once, a failed page becomes a degraded
//! document, and recursion only follows links that pass the section filter.

use crate::config::Config;
use crate::crawler::fetcher::{
    build_blocking_client, build_http_client, fetch_page, fetch_page_blocking, ClientOptions,
};
use crate::crawler::parser::parse_page;
use crate::crawler::session::CrawlSession;
use crate::document::{CrawlResult, Document};
use crate::url::{is_fetchable, normalize_path, parse_site_url, SectionFilter};
use crate::{ConfigError, LoaderError, PageError, UrlResult};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use url::Url;

/// Recursive loader for a documentation site
///
/// # Example
///
/// ```no_run
/// use mkdocs_site_loader::SiteLoader;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let loader = SiteLoader::new(
///     "https://docs.hummingbot.org",
///     Some(vec!["/strategies/".to_string(), "/installation/".to_string()]),
///     Some(vec!["related_urls".to_string()]),
/// )?;
/// let documents = loader.aload().await?;
/// println!("Loaded {} pages", documents.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SiteLoader {
    site_url: Url,
    start_path: String,
    filter: SectionFilter,
    metadata_filter: Vec<String>,
    client: ClientOptions,
    max_in_flight: usize,
    crawl_deadline: Option<Duration>,
    text_separator: String,
}

impl SiteLoader {
    /// Creates a loader for `site_url`
    ///
    /// # Arguments
    ///
    /// * `site_url` - The crawl root
    /// * `sections_filter` - URL substrings a link must contain to be followed
    /// * `metadata_filter` - Metadata keys removed from the returned documents
    ///
    /// # Returns
    ///
    /// * `Err(ConfigError::InvalidUrl)` - `site_url` is not an http(s) URL
    pub fn new(
        site_url: &str,
        sections_filter: Option<Vec<String>>,
        metadata_filter: Option<Vec<String>>,
    ) -> Result<Self, ConfigError> {
        let site_url = parse_site_url(site_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid site url: {}", e)))?;

        Ok(Self {
            site_url,
            start_path: "/".to_string(),
            filter: SectionFilter::new(sections_filter.unwrap_or_default(), Vec::new(), false),
            metadata_filter: metadata_filter.unwrap_or_default(),
            client: ClientOptions::default(),
            max_in_flight: 8,
            crawl_deadline: None,
            text_separator: "\n".to_string(),
        })
    }

    /// Creates a loader from a validated configuration
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let site = &config.site;
        let sections_filter = Some(site.sections_filter.clone());
        let metadata_filter = Some(site.metadata_filter.clone());

        Ok(Self::new(&site.url, sections_filter, metadata_filter)?
            .start_path(&site.start_path)
            .sections_exclude(site.sections_exclude.clone())
            .allow_all_when_no_filter(site.allow_all_when_no_filter)
            .client_options(ClientOptions::from(&config.http))
            .max_in_flight(config.crawler.max_in_flight)
            .crawl_deadline(config.crawler.crawl_deadline_secs.map(Duration::from_secs))
            .text_separator(&config.crawler.text_separator))
    }

    /// Decides what an empty sections filter means: follow every link
    /// (`true`) or stop at the start page (`false`, the default)
    pub fn allow_all_when_no_filter(mut self, allow: bool) -> Self {
        self.filter.set_allow_all_when_empty(allow);
        self
    }

    /// URL substrings that are never followed, even when they pass the filter
    pub fn sections_exclude(mut self, sections: Vec<String>) -> Self {
        self.filter.set_exclude(sections);
        self
    }

    /// Path of the first page, resolved against the site URL
    pub fn start_path(mut self, path: &str) -> Self {
        self.start_path = path.to_string();
        self
    }

    /// Maximum number of fetches in flight during `aload`
    pub fn max_in_flight(mut self, max: usize) -> Self {
        self.max_in_flight = max.max(1);
        self
    }

    /// Wall-clock budget for one crawl; pages not started by then are skipped
    pub fn crawl_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.crawl_deadline = deadline;
        self
    }

    pub fn text_separator(mut self, separator: &str) -> Self {
        self.text_separator = separator.to_string();
        self
    }

    /// Upper bound for a single page request, body included
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.client.request_timeout = timeout;
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.client.connect_timeout = timeout;
        self
    }

    pub fn user_agent(mut self, user_agent: &str) -> Self {
        self.client.user_agent = user_agent.to_string();
        self
    }

    fn client_options(mut self, options: ClientOptions) -> Self {
        self.client = options;
        self
    }

    /// The first page of the crawl
    pub fn root_url(&self) -> UrlResult<Url> {
        normalize_path(&self.site_url, &self.start_path)
    }

    /// Crawls the site sequentially with a blocking HTTP client
    ///
    /// Pages are visited depth-first in document order. Must not be called
    /// from inside an async runtime; use `spawn_blocking` there.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<Document>)` - One document per visited page
    /// * `Err(LoaderError)` - The crawl could not start
    pub fn load(&self) -> Result<Vec<Document>, LoaderError> {
        let client = build_blocking_client(&self.client)?;
        let root = self.root_url()?;
        self.log_start(&root, "sequential");

        let mut session = CrawlSession::new(self.crawl_deadline);
        let mut stack = vec![root];

        while let Some(url) = stack.pop() {
            if session.deadline_exceeded() {
                tracing::warn!(
                    "Crawl deadline reached, {} pending links not visited",
                    stack.len() + 1
                );
                break;
            }

            if !session.claim(url.as_str()) {
                continue;
            }

            let outcome = fetch_page_blocking(&client, &url)
                .and_then(|body| self.extract(&url, &body));
            let paths = session.record(&url, outcome);

            let next = self.next_urls(&url, &paths, &session);
            stack.extend(next.into_iter().rev());
        }

        Ok(self.finish(session))
    }

    /// Crawls the site concurrently on the current tokio runtime
    ///
    /// # Request Flow
    ///
    /// 1. The start page is claimed and queued
    /// 2. Queued URLs are spawned while semaphore permits remain
    /// 3. Each finished task yields one crawl record
    /// 4. Its paths are resolved against its URL, filtered, claimed and queued
    /// 5. The crawl ends when no task is running and the queue is empty, or
    ///    when the deadline passes, which aborts running tasks and spawns no more
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<Document>)` - One document per visited page
    /// * `Err(LoaderError)` - The crawl could not start
    pub async fn aload(&self) -> Result<Vec<Document>, LoaderError> {
        let client = build_http_client(&self.client)?;
        let root = self.root_url()?;
        self.log_start(&root, "concurrent");

        let mut session = CrawlSession::new(self.crawl_deadline);
        let semaphore = Arc::new(Semaphore::new(self.max_in_flight));
        let separator: Arc<str> = Arc::from(self.text_separator.as_str());
        let mut frontier: VecDeque<Url> = VecDeque::new();
        let mut tasks: JoinSet<(Url, Result<CrawlResult, PageError>)> = JoinSet::new();

        session.claim(root.as_str());
        frontier.push_back(root);

        loop {
            if session.deadline_exceeded() {
                self.abandon(&mut tasks, frontier.len());
                break;
            }

            while let Some(url) = frontier.pop_front() {
                let permit = match semaphore.clone().try_acquire_owned() {
                    Ok(permit) => permit,
                    Err(_) => {
                        frontier.push_front(url);
                        break;
                    }
                };

                let client = client.clone();
                let separator = separator.clone();
                tasks.spawn(async move {
                    let _permit = permit;
                    let outcome = match fetch_page(&client, &url).await {
                        Ok(body) => parse_page(&url, &body, &separator)
                            .map(|page| page.into_result(&url)),
                        Err(e) => Err(e),
                    };
                    (url, outcome)
                });
            }

            let within_deadline = match session.time_left() {
                Some(left) => tokio::time::timeout(left, tasks.join_next()).await.ok(),
                None => Some(tasks.join_next().await),
            };

            let joined = match within_deadline {
                Some(joined) => joined,
                None => {
                    self.abandon(&mut tasks, frontier.len());
                    break;
                }
            };

            let (url, outcome) = match joined {
                Some(Ok(done)) => done,
                Some(Err(e)) => {
                    tracing::error!("Fetch task failed: {}", e);
                    continue;
                }
                None => break,
            };

            let paths = session.record(&url, outcome);
            for next in self.next_urls(&url, &paths, &session) {
                if session.claim(next.as_str()) {
                    frontier.push_back(next);
                }
            }
        }

        Ok(self.finish(session))
    }

    /// Parses a fetched body into the crawl record for `url`
    fn extract(&self, url: &Url, body: &str) -> Result<CrawlResult, PageError> {
        parse_page(url, body, &self.text_separator).map(|page| page.into_result(url))
    }

    /// Resolves a page's paths against the page URL and keeps the ones the
    /// crawl should visit next
    ///
    /// A path is kept if it resolves to an http(s) URL that has not been
    /// claimed and that passes the section filter.
    fn next_urls(&self, page_url: &Url, paths: &[String], session: &CrawlSession) -> Vec<Url> {
        let mut next = Vec::new();

        for path in paths {
            let url = match normalize_path(page_url, path) {
                Ok(url) => url,
                Err(e) => {
                    tracing::debug!("Skipping link {} on {}: {}", path, page_url, e);
                    continue;
                }
            };

            if !is_fetchable(&url) || session.is_claimed(url.as_str()) {
                continue;
            }

            if !self.filter.allows(url.as_str()) {
                tracing::trace!("Filtered out {}", url);
                continue;
            }

            next.push(url);
        }

        next
    }

    /// Stops a concurrent crawl whose deadline has passed
    fn abandon<T: 'static>(&self, tasks: &mut JoinSet<T>, queued: usize) {
        tracing::warn!(
            "Crawl deadline reached, abandoning {} running and {} queued pages",
            tasks.len(),
            queued
        );
        tasks.abort_all();
    }

    fn log_start(&self, root: &Url, mode: &str) {
        tracing::info!("Starting {} crawl of {}", mode, root);

        if self.filter.blocks_everything() {
            tracing::warn!(
                "No sections filter and allow_all_when_no_filter is off; only {} will be loaded",
                root
            );
        }
    }

    fn finish(&self, session: CrawlSession) -> Vec<Document> {
        tracing::info!(
            "Crawl finished: {} pages ({} failed) in {:?}",
            session.page_count(),
            session.degraded_count(),
            session.elapsed()
        );
        session.into_documents(&self.metadata_filter)
    }
}
