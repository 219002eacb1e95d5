//! JSON-lines document writer
//!
//! Each line is one `{"page_content": ..., "metadata": {...}}` object, the
//! shape document loaders in retrieval pipelines consume.

use crate::document::Document;
use crate::output::traits::{DocumentSink, OutputError, OutputResult};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes documents as JSON lines to any writer
pub struct JsonlWriter<W: Write> {
    writer: W,
    written: usize,
}

impl JsonlWriter<BufWriter<File>> {
    /// Creates (or truncates) the file at `path`
    pub fn create(path: &Path) -> OutputResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = File::create(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> JsonlWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0 }
    }

    /// Returns the underlying writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> DocumentSink for JsonlWriter<W> {
    fn write_document(&mut self, document: &Document) -> OutputResult<()> {
        serde_json::to_writer(&mut self.writer, document).map_err(|source| {
            OutputError::Serialize {
                url: document.url().unwrap_or("<unknown>").to_string(),
                source,
            }
        })?;
        self.writer.write_all(b"\n")?;
        self.written += 1;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<usize> {
        self.writer.flush()?;
        Ok(self.written)
    }
}
