use crate::config::types::{
    Config, CrawlerConfig, EmbeddingConfig, OutputConfig, RetrievalConfig, UserAgentConfig,
};
use crate::ConfigError;
use scraper::Selector;
use url::Url;

/// Upper bound for the politeness delay; anything longer is almost certainly a typo
const MAX_POLITENESS_DELAY_MS: u64 = 60_000;

const SUPPORTED_METRICS: &[&str] = &["cosine", "euclidean", "dotproduct"];

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    validate_embedding_config(&config.embedding)?;
    validate_retrieval_config(&config.retrieval)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    let domain = parse_http_url("base_domain", &config.base_domain)?;
    if domain.path() != "/" || domain.query().is_some() {
        return Err(ConfigError::Validation(format!(
            "base_domain must be a bare origin like 'https://da.live', got '{}'",
            config.base_domain
        )));
    }

    let base = parse_http_url("base_url", &config.base_url)?;
    let origin = config.base_domain.trim_end_matches('/');
    if !config.base_url.starts_with(origin) || base.host_str() != domain.host_str() {
        return Err(ConfigError::Validation(format!(
            "base_url '{}' must live under base_domain '{}'",
            config.base_url, config.base_domain
        )));
    }

    if let Some(seed) = &config.seed_url {
        let seed_url = parse_http_url("seed_url", seed)?;
        if seed_url.host_str() != domain.host_str() {
            return Err(ConfigError::Validation(format!(
                "seed_url '{}' must be on the same host as base_domain '{}'",
                seed, config.base_domain
            )));
        }
    }

    if config.politeness_delay_ms > MAX_POLITENESS_DELAY_MS {
        return Err(ConfigError::Validation(format!(
            "politeness_delay_ms must be <= {}ms, got {}ms",
            MAX_POLITENESS_DELAY_MS, config.politeness_delay_ms
        )));
    }

    if config.max_pages == Some(0) {
        return Err(ConfigError::Validation(
            "max_pages must be >= 1 when set".to_string(),
        ));
    }

    validate_selector("title_selector", &config.title_selector)?;
    validate_selector("content_selector", &config.content_selector)?;

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Validate crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    validate_email(&config.contact_email)?;

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.documents_path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "documents_path cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Validates embedding and index shape
fn validate_embedding_config(config: &EmbeddingConfig) -> Result<(), ConfigError> {
    if config.model.trim().is_empty() {
        return Err(ConfigError::Validation(
            "embedding model cannot be empty".to_string(),
        ));
    }

    if config.dimension == 0 {
        return Err(ConfigError::Validation(
            "embedding dimension must be >= 1".to_string(),
        ));
    }

    if !SUPPORTED_METRICS.contains(&config.metric.as_str()) {
        return Err(ConfigError::Validation(format!(
            "metric must be one of {:?}, got '{}'",
            SUPPORTED_METRICS, config.metric
        )));
    }

    Ok(())
}

/// Validates retrieval configuration
fn validate_retrieval_config(config: &RetrievalConfig) -> Result<(), ConfigError> {
    if config.top_k < 1 || config.top_k > 100 {
        return Err(ConfigError::Validation(format!(
            "top_k must be between 1 and 100, got {}",
            config.top_k
        )));
    }

    if let Some(model) = &config.completion_model {
        if model.trim().is_empty() {
            return Err(ConfigError::Validation(
                "completion_model cannot be empty when set".to_string(),
            ));
        }
    }

    Ok(())
}

fn parse_http_url(field: &str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", field, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' must use http or https",
            field, value
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' has no host",
            field, value
        )));
    }

    Ok(url)
}

fn validate_selector(field: &str, selector: &str) -> Result<(), ConfigError> {
    Selector::parse(selector)
        .map(|_| ())
        .map_err(|e| ConfigError::InvalidSelector(format!("{} '{}': {:?}", field, selector, e)))
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "contact_email cannot be empty".to_string(),
        ));
    }

    // Basic email format check: must contain @ and have text on both sides
    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    let local = parts[0];
    let domain = parts[1];

    if local.is_empty() || domain.is_empty() {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !domain.contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}
