//! Configuration module for docquarry
//!
//! This module handles loading, parsing, and validating TOML configuration files,
//! and reading API credentials from the environment.
//!
//! # Example
//!
//! ```no_run
//! use docquarry::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("docquarry.toml")).unwrap();
//! println!("Crawl will start at: {}", config.crawler.seed());
//! ```

mod credentials;
mod parser;
mod types;
mod validation;

// Re-export types
pub use credentials::Credentials;
pub use types::{
    Config, CrawlerConfig, EmbeddingConfig, OutputConfig, RetrievalConfig, UserAgentConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
