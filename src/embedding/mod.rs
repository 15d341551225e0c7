//! Indexing stage: embed each scraped document and store it in the vector index
//!
//! Documents are processed one at a time, in record order. Each document
//! gets one embedding call and one single-vector upsert keyed by its URL, so
//! re-indexing the same record replaces vectors instead of duplicating them.

use crate::crawler::ScrapedDocument;
use crate::index::{VectorMetadata, VectorRecord, VectorStore};
use crate::llm::EmbeddingProvider;
use crate::QuarryError;
use tracing::{debug, info};

/// Embeds and upserts every document.
///
/// # Arguments
///
/// * `documents` - The document record, in crawl order
/// * `embedder` - Produces one vector per document body
/// * `store` - Receives one upsert per document
///
/// # Returns
///
/// The number of documents indexed. The first API failure aborts the run;
/// documents already upserted stay in the index.
pub async fn index_documents(
    documents: &[ScrapedDocument],
    embedder: &dyn EmbeddingProvider,
    store: &dyn VectorStore,
) -> Result<usize, QuarryError> {
    info!("Indexing {} documents", documents.len());

    for (position, doc) in documents.iter().enumerate() {
        let values = embedder.embed(&doc.content).await?;
        store
            .upsert(VectorRecord {
                id: doc.url.clone(),
                values,
                metadata: VectorMetadata::from(doc),
            })
            .await?;
        debug!("Indexed {}/{}: {}", position + 1, documents.len(), doc.url);
    }

    info!("Indexed {} documents", documents.len());
    Ok(documents.len())
}
