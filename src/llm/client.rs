//! OpenAI REST client
//!
//! Covers the two endpoints the pipeline needs: `/embeddings` and
//! `/chat/completions` (whole or streamed).

use crate::llm::streaming::ChatCompletionStream;
use crate::llm::types::{
    ChatRequest, ChatResponse, ChatResponseRaw, EmbeddingRequest, EmbeddingResponse, Message,
};
use crate::llm::{CompletionProvider, EmbeddingProvider, LlmError, LlmResult};
use async_trait::async_trait;
use reqwest::{header, Client, Response};
use std::time::Instant;
use tracing::{debug, warn};

/// Public OpenAI API root
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";

/// OpenAI API client bound to one embedding model and, optionally, one chat model
#[derive(Clone)]
pub struct OpenAiClient {
    http_client: Client,
    api_key: String,
    base_url: String,
    embedding_model: String,
    completion_model: Option<String>,
}

impl OpenAiClient {
    /// Creates a client for the public API with the default embedding model
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            completion_model: None,
        }
    }

    /// Sets a custom base URL (proxies, test servers)
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Reuses an existing HTTP client
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http_client = client;
        self
    }

    pub fn with_embedding_model(mut self, model: impl Into<String>) -> Self {
        self.embedding_model = model.into();
        self
    }

    pub fn with_completion_model(mut self, model: impl Into<String>) -> Self {
        self.completion_model = Some(model.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn embedding_model(&self) -> &str {
        &self.embedding_model
    }

    pub fn completion_model(&self) -> Option<&str> {
        self.completion_model.as_deref()
    }

    /// Creates an embedding for `input` with the given model.
    ///
    /// # Arguments
    ///
    /// * `input` - Text to embed
    /// * `model` - Embedding model name (e.g., "text-embedding-3-small")
    ///
    /// # Returns
    ///
    /// The first embedding vector in the response
    pub async fn create_embedding(&self, input: &str, model: &str) -> LlmResult<Vec<f32>> {
        let start = Instant::now();
        let request = EmbeddingRequest {
            model: model.to_string(),
            input: input.to_string(),
        };

        let response = self.post("embeddings", &request, "embedding").await?;
        let body: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Parse(e.to_string()))?;

        let embedding = body
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| LlmError::Api("No embedding returned".into()))?;

        debug!(
            model = %model,
            dimension = embedding.len(),
            duration_ms = start.elapsed().as_millis(),
            "OpenAI embedding"
        );
        Ok(embedding)
    }

    /// Sends a chat completion request and waits for the whole answer
    pub async fn chat_completion(&self, request: ChatRequest) -> LlmResult<ChatResponse> {
        let start = Instant::now();

        let response = self.post("chat/completions", &request, "chat").await?;
        let chat_response: ChatResponseRaw = response
            .json()
            .await
            .map_err(|e| LlmError::Parse(e.to_string()))?;

        let content = chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| LlmError::Api("No response from OpenAI".into()))?;

        debug!(
            model = %request.model,
            duration_ms = start.elapsed().as_millis(),
            "OpenAI chat completion"
        );

        Ok(ChatResponse {
            content,
            usage: chat_response.usage,
        })
    }

    /// Sends a chat completion request with `stream: true`.
    ///
    /// The returned stream yields text deltas as the server sends them and
    /// ends after `data: [DONE]`.
    pub async fn chat_completion_stream(
        &self,
        request: ChatRequest,
    ) -> LlmResult<ChatCompletionStream> {
        let response = self
            .post("chat/completions", &request.streaming(), "streaming chat")
            .await?;
        Ok(ChatCompletionStream::new(response.bytes_stream()))
    }

    async fn post<T: serde::Serialize>(
        &self,
        path: &str,
        body: &T,
        operation: &str,
    ) -> LlmResult<Response> {
        let response = self
            .http_client
            .post(format!("{}/{}", self.base_url, path))
            .header(header::AUTHORIZATION, format!("Bearer {}", self.api_key))
            .header(header::CONTENT_TYPE, "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "OpenAI {} request failed", operation);
                LlmError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %error_text, "OpenAI {} API error", operation);
            return Err(LlmError::Api(format!(
                "OpenAI {} error ({}): {}",
                operation, status, error_text
            )));
        }

        Ok(response)
    }

    fn require_completion_model(&self) -> LlmResult<&str> {
        self.completion_model
            .as_deref()
            .ok_or_else(|| LlmError::Config("No completion model configured".into()))
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiClient {
    async fn embed(&self, text: &str) -> LlmResult<Vec<f32>> {
        self.create_embedding(text, &self.embedding_model).await
    }
}

#[async_trait]
impl CompletionProvider for OpenAiClient {
    async fn complete(&self, prompt: &str) -> LlmResult<String> {
        let request =
            ChatRequest::new(self.require_completion_model()?).message(Message::user(prompt));
        Ok(self.chat_completion(request).await?.content)
    }

    async fn complete_stream(&self, prompt: &str) -> LlmResult<ChatCompletionStream> {
        let request =
            ChatRequest::new(self.require_completion_model()?).message(Message::user(prompt));
        self.chat_completion_stream(request).await
    }
}
