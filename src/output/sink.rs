//! Document sink: the hand-off between the crawl and embedding stages
//!
//! The whole collection is held in memory until the crawl ends and then
//! written in one go, replacing whatever was at the target path.

use crate::crawler::ScrapedDocument;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while writing or reading the document record
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to encode documents: {0}")]
    Encode(serde_json::Error),

    #[error("Malformed document record {path}: {source}")]
    Decode {
        path: String,
        source: serde_json::Error,
    },
}

/// Result type for sink operations
pub type SinkResult<T> = Result<T, SinkError>;

/// Destination for a finished document collection
pub trait DocumentSink {
    /// Persists the full collection, preserving order
    fn write(&self, documents: &[ScrapedDocument]) -> SinkResult<()>;
}

/// Writes the collection as a pretty-printed JSON array
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> SinkError {
        SinkError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}

impl DocumentSink for JsonFileSink {
    fn write(&self, documents: &[ScrapedDocument]) -> SinkResult<()> {
        let json = serde_json::to_string_pretty(documents).map_err(SinkError::Encode)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        fs::write(&self.path, json).map_err(|e| self.io_error(e))?;
        tracing::debug!(
            "Wrote {} documents to {}",
            documents.len(),
            self.path.display()
        );
        Ok(())
    }
}

/// Reads a document record written by [`JsonFileSink`]
pub fn load_documents(path: &Path) -> SinkResult<Vec<ScrapedDocument>> {
    let content = fs::read_to_string(path).map_err(|source| SinkError::Io {
        path: path.display().to_string(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|source| SinkError::Decode {
        path: path.display().to_string(),
        source,
    })
}
