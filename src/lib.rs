//! docquarry: crawl a documentation site, index it, and answer questions about it
//!
//! The pipeline has three stages:
//! 1. `crawler` walks the site depth-first and `output` writes the document record
//! 2. `embedding` turns each document into a vector stored in the `index`
//! 3. `retrieval` finds the closest documents for a question and asks the `llm`

pub mod config;
pub mod crawler;
pub mod embedding;
pub mod index;
pub mod llm;
pub mod output;
pub mod retrieval;
pub mod url;

use thiserror::Error;

/// Main error type for docquarry operations
#[derive(Debug, Error)]
pub enum QuarryError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Document sink error: {0}")]
    Sink(#[from] output::SinkError),

    #[error("Language model error: {0}")]
    Llm(#[from] llm::LlmError),

    #[error("Vector index error: {0}")]
    Index(#[from] index::IndexError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid CSS selector in config: {0}")]
    InvalidSelector(String),

    #[error("Missing required environment variable {0}")]
    MissingCredential(&'static str),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Result type alias for docquarry operations
pub type Result<T> = std::result::Result<T, QuarryError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::{Config, Credentials};
pub use crawler::{crawl, CrawlSession, ScrapedDocument};
pub use url::{CrawlScope, CrawlTarget};
