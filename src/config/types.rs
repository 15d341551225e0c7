use serde::Deserialize;

/// Main configuration structure for docquarry
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Scheme and host that root-relative links are joined onto (e.g. "https://da.live")
    #[serde(rename = "base-domain")]
    pub base_domain: String,

    /// Prefix that absolute links must start with to be followed (e.g. "https://da.live/docs")
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// First page to visit; defaults to `base-url`
    #[serde(rename = "seed-url", default)]
    pub seed_url: Option<String>,

    /// Pause before each outbound fetch after the seed (milliseconds)
    #[serde(rename = "politeness-delay-ms", default = "default_politeness_delay")]
    pub politeness_delay_ms: u64,

    /// Stop after this many pages have been visited
    #[serde(rename = "max-pages", default)]
    pub max_pages: Option<usize>,

    /// Do not schedule links found deeper than this many hops from the seed
    #[serde(rename = "max-depth", default)]
    pub max_depth: Option<u32>,

    #[serde(rename = "title-placeholder", default = "default_title_placeholder")]
    pub title_placeholder: String,

    #[serde(rename = "content-placeholder", default = "default_content_placeholder")]
    pub content_placeholder: String,

    /// Selector for the page heading
    #[serde(rename = "title-selector", default = "default_title_selector")]
    pub title_selector: String,

    /// Selector for the main-content region
    #[serde(rename = "content-selector", default = "default_content_selector")]
    pub content_selector: String,
}

impl CrawlerConfig {
    /// The seed URL, falling back to the base URL
    pub fn seed(&self) -> &str {
        self.seed_url.as_deref().unwrap_or(&self.base_url)
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl UserAgentConfig {
    /// Formats the header value: `Name/Version (+ContactURL; ContactEmail)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the JSON document record handed to the embedding stage
    #[serde(rename = "documents-path", default = "default_documents_path")]
    pub documents_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            documents_path: default_documents_path(),
        }
    }
}

/// Embedding model and vector index shape
#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingConfig {
    #[serde(default = "default_embedding_model")]
    pub model: String,

    /// Vector dimension the index is created with
    #[serde(default = "default_dimension")]
    pub dimension: u32,

    #[serde(default = "default_metric")]
    pub metric: String,

    /// Serverless cloud provider for a newly created index
    #[serde(default = "default_cloud")]
    pub cloud: String,

    #[serde(default = "default_region")]
    pub region: String,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: default_embedding_model(),
            dimension: default_dimension(),
            metric: default_metric(),
            cloud: default_cloud(),
            region: default_region(),
        }
    }
}

/// Question answering configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RetrievalConfig {
    /// Number of nearest documents placed in the prompt context
    #[serde(rename = "top-k", default = "default_top_k")]
    pub top_k: u32,

    /// Chat model; when absent the `OPENAI_MODEL` environment variable is used
    #[serde(rename = "completion-model", default)]
    pub completion_model: Option<String>,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            completion_model: None,
        }
    }
}

fn default_politeness_delay() -> u64 {
    1000
}

fn default_title_placeholder() -> String {
    "No Title".to_string()
}

fn default_content_placeholder() -> String {
    "No Content".to_string()
}

fn default_title_selector() -> String {
    "h1".to_string()
}

fn default_content_selector() -> String {
    "main".to_string()
}

fn default_documents_path() -> String {
    "data/da_live_docs.json".to_string()
}

fn default_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}

fn default_dimension() -> u32 {
    1536
}

fn default_metric() -> String {
    "cosine".to_string()
}

fn default_cloud() -> String {
    "aws".to_string()
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_top_k() -> u32 {
    3
}
