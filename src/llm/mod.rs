//! Language model access: embeddings and chat completions
//!
//! This module handles:
//! - The OpenAI REST client used by the indexing and question stages
//! - Streaming chat completions over server-sent events
//! - The provider traits those stages are written against

mod client;
mod streaming;
mod types;

pub use client::{OpenAiClient, DEFAULT_OPENAI_BASE_URL};
pub use streaming::{ChatCompletionChunk, ChatCompletionStream};
pub use types::{ChatRequest, ChatResponse, Message, Usage};

use async_trait::async_trait;
use thiserror::Error;

/// Errors returned by the language model APIs
#[derive(Debug, Error)]
pub enum LlmError {
    /// Missing model or other client setup problem
    #[error("Configuration error: {0}")]
    Config(String),

    /// Connection failed or timed out
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx response or an empty answer
    #[error("API error: {0}")]
    Api(String),

    /// Response body did not have the expected shape
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Result type for language model operations
pub type LlmResult<T> = Result<T, LlmError>;

/// Turns text into a vector
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, text: &str) -> LlmResult<Vec<f32>>;
}

/// Answers a prompt sent as a single user message
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Returns the whole answer once generation has finished
    async fn complete(&self, prompt: &str) -> LlmResult<String>;

    /// Returns the answer as a stream of text deltas
    async fn complete_stream(&self, prompt: &str) -> LlmResult<ChatCompletionStream>;
}
