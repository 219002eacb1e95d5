//! Crawl records and the documents handed to the indexing pipeline

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::fmt;

/// Metadata key holding the normalized page URL
pub const URL_KEY: &str = "url";
/// Metadata key holding the newline-joined anchor titles
pub const TITLES_KEY: &str = "titles";
/// Metadata key holding the internal link targets in document order
pub const RELATED_PATHS_KEY: &str = "related_paths";
/// Metadata key holding the external URLs found on the page
pub const RELATED_URLS_KEY: &str = "related_urls";

/// Every metadata key a document can carry
pub const METADATA_KEYS: [&str; 4] = [URL_KEY, TITLES_KEY, RELATED_PATHS_KEY, RELATED_URLS_KEY];

/// One fetched (or failed) page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlResult {
    /// Normalized absolute URL, unique within a crawl
    pub url: String,

    /// Page text with tags stripped
    pub page_content: String,

    /// In-page anchor identifiers joined with `\n`
    pub titles: String,

    /// External URLs found on the page
    pub related_urls: BTreeSet<String>,

    /// Internal link targets, as written in the page, in document order
    pub related_paths: Vec<String>,
}

impl CrawlResult {
    /// Builds the degraded record stored in place of a page that failed
    pub fn degraded(url: impl Into<String>, error: &impl fmt::Display) -> Self {
        Self {
            url: url.into(),
            page_content: error.to_string(),
            titles: String::new(),
            related_urls: BTreeSet::new(),
            related_paths: Vec::new(),
        }
    }

    /// Converts the record into a document, dropping filtered metadata keys
    pub fn into_document(self, metadata_filter: &[String]) -> Document {
        let mut metadata = Map::new();
        metadata.insert(URL_KEY.to_string(), Value::from(self.url));
        metadata.insert(
            RELATED_PATHS_KEY.to_string(),
            Value::from(self.related_paths),
        );
        metadata.insert(TITLES_KEY.to_string(), Value::from(self.titles));
        metadata.insert(
            RELATED_URLS_KEY.to_string(),
            Value::from(self.related_urls.into_iter().collect::<Vec<_>>()),
        );

        for key in metadata_filter {
            metadata.remove(key.as_str());
        }

        Document {
            page_content: self.page_content,
            metadata,
        }
    }
}

/// A page body plus its metadata mapping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub page_content: String,
    pub metadata: Map<String, Value>,
}

impl Document {
    /// Returns the page URL unless it was filtered out of the metadata
    pub fn url(&self) -> Option<&str> {
        self.metadata.get(URL_KEY).and_then(Value::as_str)
    }

    /// Returns the anchor titles unless they were filtered out
    pub fn titles(&self) -> Option<&str> {
        self.metadata.get(TITLES_KEY).and_then(Value::as_str)
    }

    /// Returns the string items of a list-valued metadata key
    pub fn metadata_list(&self, key: &str) -> Option<Vec<&str>> {
        self.metadata
            .get(key)
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(Value::as_str).collect())
    }
}

/// Returns true if `key` names a metadata field
pub fn is_metadata_key(key: &str) -> bool {
    METADATA_KEYS.contains(&key)
}
