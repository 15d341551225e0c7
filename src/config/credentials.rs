//! API credentials read from the process environment
//!
//! Credentials never live in the TOML file. The embedding and retrieval stages
//! refuse to start when any of them is missing.

use crate::config::types::RetrievalConfig;
use crate::ConfigError;

pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const PINECONE_API_KEY: &str = "PINECONE_API_KEY";
pub const INDEX_NAME: &str = "INDEX_NAME";
pub const OPENAI_MODEL: &str = "OPENAI_MODEL";

/// Secrets and identifiers needed to talk to the embedding, index and completion APIs
#[derive(Clone)]
pub struct Credentials {
    pub openai_api_key: String,
    pub pinecone_api_key: String,
    pub index_name: String,
    /// Chat model from `OPENAI_MODEL`, if set
    pub completion_model: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("openai_api_key", &"<redacted>")
            .field("pinecone_api_key", &"<redacted>")
            .field("index_name", &self.index_name)
            .field("completion_model", &self.completion_model)
            .finish()
    }
}

impl Credentials {
    /// Reads credentials from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads credentials through an arbitrary lookup; empty values count as missing
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &'static str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::MissingCredential(key))
        };

        Ok(Self {
            openai_api_key: require(OPENAI_API_KEY)?,
            pinecone_api_key: require(PINECONE_API_KEY)?,
            index_name: require(INDEX_NAME)?,
            completion_model: lookup(OPENAI_MODEL)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
        })
    }

    /// Picks the chat model: config first, then `OPENAI_MODEL`
    pub fn resolve_completion_model(&self, retrieval: &RetrievalConfig) -> Result<String, ConfigError> {
        retrieval
            .completion_model
            .clone()
            .or_else(|| self.completion_model.clone())
            .ok_or(ConfigError::MissingCredential(OPENAI_MODEL))
    }
}
