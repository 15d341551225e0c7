//! HTTP fetcher implementation
//!
//! This module handles page requests for the crawler:
//! - Building HTTP clients with proper user agent strings
//! - One GET per page, no retry and no cache
//! - Classifying the outcome as content or a soft failure

use crate::config::UserAgentConfig;
use crate::url::CrawlTarget;
use reqwest::Client;

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched the page
    Success {
        /// Page body content
        body: String,
    },

    /// The server answered with a non-success status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, unreadable body)
    NetworkError {
        /// Error description
        error: String,
    },
}

/// Builds an HTTP client with proper configuration
///
/// Timeouts are left at reqwest's defaults, so a slow page is waited for
/// rather than skipped.
///
/// # Example
///
/// ```no_run
/// use docquarry::config::UserAgentConfig;
/// use docquarry::crawler::build_http_client;
///
/// let config = UserAgentConfig {
///     crawler_name: "docquarry".to_string(),
///     crawler_version: "0.1".to_string(),
///     contact_url: "https://example.com/about".to_string(),
///     contact_email: "admin@example.com".to_string(),
/// };
///
/// let client = build_http_client(&config).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a page with a single GET
///
/// Any non-success status is a failure. Failures are logged here and returned
/// as values; the caller skips the page and keeps crawling.
pub async fn fetch_page(client: &Client, target: &CrawlTarget) -> FetchResult {
    let response = match client.get(target.as_str()).send().await {
        Ok(response) => response,
        Err(e) => {
            let error = if e.is_timeout() {
                "Request timeout".to_string()
            } else if e.is_connect() {
                format!("Connection failed: {}", e)
            } else {
                e.to_string()
            };
            tracing::warn!("Failed to fetch {}: {}", target, error);
            return FetchResult::NetworkError { error };
        }
    };

    let status = response.status();
    if !status.is_success() {
        tracing::warn!("Failed to fetch {}: {}", target, status.as_u16());
        return FetchResult::HttpError {
            status_code: status.as_u16(),
        };
    }

    match response.text().await {
        Ok(body) => FetchResult::Success { body },
        Err(e) => {
            tracing::warn!("Failed to read body of {}: {}", target, e);
            FetchResult::NetworkError {
                error: e.to_string(),
            }
        }
    }
}
