//! Output sink trait and error types
//!
//! A sink receives the documents of one crawl, in order, and hands them to
//! whatever indexing pipeline sits downstream.

use crate::document::Document;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to serialize document {url}: {source}")]
    Serialize {
        url: String,
        source: serde_json::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Trait for document sinks
pub trait DocumentSink {
    /// Writes one document
    fn write_document(&mut self, document: &Document) -> OutputResult<()>;

    /// Flushes buffered output; no documents may be written afterwards
    ///
    /// # Returns
    ///
    /// The number of documents written over the sink's lifetime
    fn finish(&mut self) -> OutputResult<usize>;
}
