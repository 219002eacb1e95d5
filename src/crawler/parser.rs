//! HTML parser for extracting page text and link metadata
//!
//! This module turns a fetched page into:
//! - Anchor titles (`#fragment` links, without code-line anchors)
//! - External URLs (links carrying an http(s) scheme)
//! - Internal paths (scheme-less links containing `/`), in document order
//! - Normalized page text

use crate::document::CrawlResult;
use crate::url::{classify_href, LinkKind};
use crate::PageError;
use scraper::{Html, Node, Selector};
use std::collections::{BTreeSet, HashSet};
use url::Url;

/// Elements whose text is never part of the page content
const SKIPPED_TEXT_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Extracted information from an HTML page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedPage {
    /// Distinct anchor fragments in first-seen order, joined with `\n`
    pub titles: String,

    /// External URLs found on the page
    pub related_urls: BTreeSet<String>,

    /// Internal link targets as written, in document order
    pub related_paths: Vec<String>,

    /// Page text nodes, trimmed and joined with the separator
    pub text: String,
}

impl ParsedPage {
    /// Turns the parsed page into the crawl record for `url`
    pub fn into_result(self, url: &Url) -> CrawlResult {
        CrawlResult {
            url: url.to_string(),
            page_content: self.text,
            titles: self.titles,
            related_urls: self.related_urls,
            related_paths: self.related_paths,
        }
    }
}

/// Parses HTML content and extracts text and links
///
/// # Arguments
///
/// * `page_url` - The URL the page was fetched from; used to resolve
///   protocol-relative external links and to label errors
/// * `html` - The HTML content
/// * `separator` - Inserted between text nodes
///
/// # Example
///
/// ```
/// use mkdocs_site_loader::crawler::parse_page;
/// use url::Url;
///
/// let html = r##"<html><body><h1 id="intro">Intro</h1>
///     <a href="#intro">¶</a><a href="setup/">Setup</a>
///     <a href="https://github.com/hummingbot">GitHub</a></body></html>"##;
/// let url = Url::parse("https://docs.example.com/").unwrap();
/// let page = parse_page(&url, html, "\n").unwrap();
///
/// assert_eq!(page.titles, "#intro");
/// assert_eq!(page.related_paths, vec!["setup/"]);
/// assert!(page.related_urls.contains("https://github.com/hummingbot"));
/// assert_eq!(page.text, "Intro\n¶\nSetup\nGitHub");
/// ```
pub fn parse_page(page_url: &Url, html: &str, separator: &str) -> Result<ParsedPage, PageError> {
    let document = Html::parse_document(html);

    let anchor_selector = Selector::parse("a[href]").map_err(|e| PageError::Parse {
        url: page_url.to_string(),
        message: format!("invalid anchor selector: {:?}", e),
    })?;

    let mut titles: Vec<&str> = Vec::new();
    let mut seen_titles: HashSet<&str> = HashSet::new();
    let mut related_urls = BTreeSet::new();
    let mut related_paths = Vec::new();

    for element in document.select(&anchor_selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let href = href.trim();

        match classify_href(href) {
            LinkKind::Anchor => {
                if seen_titles.insert(href) {
                    titles.push(href);
                }
            }
            LinkKind::External => {
                if let Some(external) = resolve_external(page_url, href) {
                    related_urls.insert(external);
                }
            }
            LinkKind::Path => related_paths.push(href.to_string()),
            LinkKind::Ignored => {}
        }
    }

    Ok(ParsedPage {
        titles: titles.join("\n"),
        related_urls,
        related_paths,
        text: extract_text(&document, separator),
    })
}

/// Collects every visible text node of the document
///
/// Each node is trimmed, empty nodes are dropped, and the rest are joined
/// with `separator`.
pub fn extract_text(document: &Html, separator: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();

    for node in document.root_element().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };

        let hidden = node
            .parent()
            .and_then(|parent| parent.value().as_element().map(|e| e.name()))
            .map(|name| SKIPPED_TEXT_ELEMENTS.contains(&name))
            .unwrap_or(false);
        if hidden {
            continue;
        }

        let trimmed = text.trim();
        if !trimmed.is_empty() {
            parts.push(trimmed);
        }
    }

    parts.join(separator)
}

/// Keeps absolute http(s) links as written, completing `//host/...` with the
/// page scheme
fn resolve_external(page_url: &Url, href: &str) -> Option<String> {
    if href.starts_with("//") {
        return page_url.join(href).ok().map(|url| url.to_string());
    }
    Some(href.to_string())
}
