//! Vector index storage for embedded documents
//!
//! The indexing and question stages only see the [`VectorStore`] trait; the
//! Pinecone REST implementation lives in `pinecone`.

mod pinecone;

pub use pinecone::{
    IndexDescription, IndexStatus, PineconeClient, PineconeIndex, DEFAULT_CONTROL_PLANE_URL,
};

use crate::crawler::ScrapedDocument;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors returned by the vector index
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Index API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Index {name} not ready after {attempts} checks")]
    NotReady { name: String, attempts: u32 },
}

/// Result type for vector index operations
pub type IndexResult<T> = Result<T, IndexError>;

/// Document fields stored next to each vector
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VectorMetadata {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub youtube_links: Vec<String>,
}

impl From<&ScrapedDocument> for VectorMetadata {
    fn from(doc: &ScrapedDocument) -> Self {
        Self {
            url: doc.url.clone(),
            title: doc.title.clone(),
            content: doc.content.clone(),
            images: doc.images.clone(),
            youtube_links: doc.videos.clone(),
        }
    }
}

/// One vector to write, keyed by document URL
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VectorRecord {
    pub id: String,
    pub values: Vec<f32>,
    pub metadata: VectorMetadata,
}

/// One nearest-neighbour hit
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct QueryMatch {
    pub id: String,
    #[serde(default)]
    pub score: f32,
    #[serde(default)]
    pub metadata: Option<VectorMetadata>,
}

/// Storage and similarity search over document vectors
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Inserts or replaces one vector by id
    async fn upsert(&self, record: VectorRecord) -> IndexResult<()>;

    /// Returns up to `top_k` matches with metadata, best first
    async fn query(&self, vector: &[f32], top_k: u32) -> IndexResult<Vec<QueryMatch>>;
}
