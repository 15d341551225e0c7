//! Pinecone REST client
//!
//! `PineconeClient` talks to the control plane (list, describe, create
//! indexes). `PineconeIndex` talks to one index's data plane host (upsert,
//! query) and implements [`VectorStore`].

use crate::config::EmbeddingConfig;
use crate::index::{IndexError, IndexResult, QueryMatch, VectorRecord, VectorStore};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Public control plane root
pub const DEFAULT_CONTROL_PLANE_URL: &str = "https://api.pinecone.io";

const API_VERSION: &str = "2024-07";
const DEFAULT_READY_ATTEMPTS: u32 = 60;
const DEFAULT_READY_INTERVAL: Duration = Duration::from_secs(1);

/// Index as reported by the control plane
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IndexDescription {
    pub name: String,
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub dimension: Option<u32>,
    #[serde(default)]
    pub metric: Option<String>,
    #[serde(default)]
    pub status: IndexStatus,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct IndexStatus {
    #[serde(default)]
    pub ready: bool,
    #[serde(default)]
    pub state: Option<String>,
}

#[derive(Debug, Deserialize)]
struct IndexList {
    #[serde(default)]
    indexes: Vec<IndexDescription>,
}

#[derive(Debug, Serialize)]
struct CreateIndexRequest<'a> {
    name: &'a str,
    dimension: u32,
    metric: &'a str,
    spec: IndexSpec<'a>,
}

#[derive(Debug, Serialize)]
struct IndexSpec<'a> {
    serverless: ServerlessSpec<'a>,
}

#[derive(Debug, Serialize)]
struct ServerlessSpec<'a> {
    cloud: &'a str,
    region: &'a str,
}

#[derive(Debug, Serialize)]
struct UpsertRequest<'a> {
    vectors: [&'a VectorRecord; 1],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    vector: &'a [f32],
    top_k: u32,
    include_metadata: bool,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<QueryMatch>,
}

/// Pinecone control plane client
#[derive(Clone)]
pub struct PineconeClient {
    http_client: Client,
    api_key: String,
    control_plane_url: String,
    ready_attempts: u32,
    ready_interval: Duration,
}

impl PineconeClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            api_key: api_key.into(),
            control_plane_url: DEFAULT_CONTROL_PLANE_URL.to_string(),
            ready_attempts: DEFAULT_READY_ATTEMPTS,
            ready_interval: DEFAULT_READY_INTERVAL,
        }
    }

    /// Sets a custom control plane URL (test servers)
    pub fn with_control_plane_url(mut self, url: impl Into<String>) -> Self {
        self.control_plane_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http_client = client;
        self
    }

    /// How often, and how many times, `ensure_index` checks for readiness
    pub fn with_ready_polling(mut self, attempts: u32, interval: Duration) -> Self {
        self.ready_attempts = attempts.max(1);
        self.ready_interval = interval;
        self
    }

    /// Lists all indexes in the project
    pub async fn list_indexes(&self) -> IndexResult<Vec<IndexDescription>> {
        let request = self
            .http_client
            .get(format!("{}/indexes", self.control_plane_url));
        let list: IndexList = parse_json(self.send(request, "list indexes").await?).await?;
        Ok(list.indexes)
    }

    /// Describes one index by name
    pub async fn describe_index(&self, name: &str) -> IndexResult<IndexDescription> {
        let request = self
            .http_client
            .get(format!("{}/indexes/{}", self.control_plane_url, name));
        parse_json(self.send(request, "describe index").await?).await
    }

    /// Creates a serverless index with the configured dimension and metric
    pub async fn create_index(
        &self,
        name: &str,
        embedding: &EmbeddingConfig,
    ) -> IndexResult<IndexDescription> {
        let body = CreateIndexRequest {
            name,
            dimension: embedding.dimension,
            metric: &embedding.metric,
            spec: IndexSpec {
                serverless: ServerlessSpec {
                    cloud: &embedding.cloud,
                    region: &embedding.region,
                },
            },
        };
        let request = self
            .http_client
            .post(format!("{}/indexes", self.control_plane_url))
            .json(&body);
        parse_json(self.send(request, "create index").await?).await
    }

    /// Makes sure the named index exists and is ready, then opens it.
    ///
    /// # Arguments
    ///
    /// * `name` - Index name
    /// * `embedding` - Dimension, metric and serverless placement used when creating
    ///
    /// # Returns
    ///
    /// A handle on the index data plane
    pub async fn ensure_index(
        &self,
        name: &str,
        embedding: &EmbeddingConfig,
    ) -> IndexResult<PineconeIndex> {
        let exists = self.list_indexes().await?.iter().any(|i| i.name == name);
        if exists {
            debug!("Index {} already exists", name);
        } else {
            info!(
                "Creating index {} (dimension {}, metric {})",
                name, embedding.dimension, embedding.metric
            );
            self.create_index(name, embedding).await?;
        }

        for attempt in 1..=self.ready_attempts {
            let description = self.describe_index(name).await?;
            if description.status.ready && !description.host.is_empty() {
                info!("Index {} ready at {}", name, description.host);
                return Ok(self.index(&description.host));
            }
            debug!(
                "Index {} not ready (attempt {}/{}, state {:?})",
                name, attempt, self.ready_attempts, description.status.state
            );
            if attempt < self.ready_attempts {
                tokio::time::sleep(self.ready_interval).await;
            }
        }

        Err(IndexError::NotReady {
            name: name.to_string(),
            attempts: self.ready_attempts,
        })
    }

    /// Opens an index by its data plane host
    pub fn index(&self, host: &str) -> PineconeIndex {
        PineconeIndex {
            http_client: self.http_client.clone(),
            api_key: self.api_key.clone(),
            host_url: host_url(host),
        }
    }

    async fn send(&self, request: RequestBuilder, operation: &str) -> IndexResult<Response> {
        send(request, &self.api_key, operation).await
    }
}

/// Data plane handle on one index
#[derive(Debug, Clone)]
pub struct PineconeIndex {
    http_client: Client,
    api_key: String,
    host_url: String,
}

impl PineconeIndex {
    pub fn host_url(&self) -> &str {
        &self.host_url
    }
}

#[async_trait]
impl VectorStore for PineconeIndex {
    async fn upsert(&self, record: VectorRecord) -> IndexResult<()> {
        let request = self
            .http_client
            .post(format!("{}/vectors/upsert", self.host_url))
            .json(&UpsertRequest { vectors: [&record] });
        send(request, &self.api_key, "upsert").await?;
        debug!("Upserted vector {}", record.id);
        Ok(())
    }

    async fn query(&self, vector: &[f32], top_k: u32) -> IndexResult<Vec<QueryMatch>> {
        let request = self
            .http_client
            .post(format!("{}/query", self.host_url))
            .json(&QueryRequest {
                vector,
                top_k,
                include_metadata: true,
            });
        let response: QueryResponse =
            parse_json(send(request, &self.api_key, "query").await?).await?;
        Ok(response.matches)
    }
}

/// Data plane hosts come back without a scheme
fn host_url(host: &str) -> String {
    let host = host.trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{}", host)
    }
}

async fn send(request: RequestBuilder, api_key: &str, operation: &str) -> IndexResult<Response> {
    let response = request
        .header("Api-Key", api_key)
        .header("X-Pinecone-API-Version", API_VERSION)
        .send()
        .await
        .map_err(|e| {
            warn!(error = %e, "Pinecone {} request failed", operation);
            IndexError::Network(e.to_string())
        })?;

    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        warn!(status = %status, error = %message, "Pinecone {} API error", operation);
        return Err(IndexError::Api {
            status: status.as_u16(),
            message,
        });
    }

    Ok(response)
}

async fn parse_json<T: serde::de::DeserializeOwned>(response: Response) -> IndexResult<T> {
    response
        .json()
        .await
        .map_err(|e| IndexError::Parse(e.to_string()))
}
