//! Output module for handing crawled documents downstream
//!
//! This module handles:
//! - The [`DocumentSink`] interface consumed by indexing pipelines
//! - Writing documents as JSON lines

mod jsonl;
mod traits;

pub use jsonl::JsonlWriter;
pub use traits::{DocumentSink, OutputError, OutputResult};

use crate::document::Document;

/// Writes every document to `sink` in order, then finishes it
///
/// # Returns
///
/// * `Ok(usize)` - Number of documents written
/// * `Err(OutputError)` - A document could not be written
pub fn write_all(sink: &mut dyn DocumentSink, documents: &[Document]) -> OutputResult<usize> {
    for document in documents {
        sink.write_document(document)?;
    }
    sink.finish()
}
