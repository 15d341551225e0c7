//! Question answering over the indexed documentation
//!
//! A question is embedded, the closest documents are fetched from the vector
//! index, and their text becomes the context of a single prompt to the chat
//! model.

mod prompt;

pub use prompt::{build_context, build_prompt};

use crate::index::{QueryMatch, VectorStore};
use crate::llm::{ChatCompletionStream, CompletionProvider, EmbeddingProvider};
use crate::QuarryError;
use tracing::{debug, info};

/// A finished answer and the documents it was grounded on
#[derive(Debug, Clone, PartialEq)]
pub struct Answer {
    pub text: String,
    /// URLs of the matched documents, best match first
    pub sources: Vec<String>,
}

/// A streamed answer; `sources` is known before the first token arrives
pub struct AnswerStream {
    pub sources: Vec<String>,
    pub chunks: ChatCompletionStream,
}

/// Retrieval-augmented question answering
pub struct Retriever<'a> {
    embedder: &'a dyn EmbeddingProvider,
    store: &'a dyn VectorStore,
    completer: &'a dyn CompletionProvider,
    top_k: u32,
}

impl<'a> Retriever<'a> {
    pub fn new(
        embedder: &'a dyn EmbeddingProvider,
        store: &'a dyn VectorStore,
        completer: &'a dyn CompletionProvider,
        top_k: u32,
    ) -> Self {
        Self {
            embedder,
            store,
            completer,
            top_k,
        }
    }

    /// Answers `question` from the `top_k` closest documents
    pub async fn ask(&self, question: &str) -> Result<Answer, QuarryError> {
        let (prompt, sources) = self.prepare(question).await?;
        let text = self.completer.complete(&prompt).await?;
        Ok(Answer { text, sources })
    }

    /// Like [`Retriever::ask`], but streams the answer as it is generated
    pub async fn ask_stream(&self, question: &str) -> Result<AnswerStream, QuarryError> {
        let (prompt, sources) = self.prepare(question).await?;
        let chunks = self.completer.complete_stream(&prompt).await?;
        Ok(AnswerStream { sources, chunks })
    }

    /// Retrieves matches for `question` without calling the chat model
    pub async fn search(&self, question: &str) -> Result<Vec<QueryMatch>, QuarryError> {
        let vector = self.embedder.embed(question).await?;
        let matches = self.store.query(&vector, self.top_k).await?;
        info!("Retrieved {} documents for question", matches.len());
        Ok(matches)
    }

    async fn prepare(&self, question: &str) -> Result<(String, Vec<String>), QuarryError> {
        let matches = self.search(question).await?;
        let context = build_context(&matches);
        debug!("Context is {} chars", context.len());

        let sources = matches
            .iter()
            .filter_map(|m| m.metadata.as_ref().map(|meta| meta.url.clone()))
            .collect();
        Ok((build_prompt(&context, question), sources))
    }
}
