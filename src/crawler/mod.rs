//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching
//! - HTML parsing into documents
//! - In-scope link extraction
//! - Depth-first traversal over an explicit work-list

mod coordinator;
mod document;
mod fetcher;
mod links;
mod parser;
mod session;

pub use coordinator::Coordinator;
pub use document::ScrapedDocument;
pub use fetcher::{build_http_client, fetch_page, FetchResult};
pub use links::extract_links;
pub use parser::{is_video_link, PageParser};
pub use session::{CrawlSession, FailedFetch, FailureReason, PendingTarget, VisitedSet};

use crate::config::Config;
use crate::output::{CrawlReport, DocumentSink, JsonFileSink};
use crate::QuarryError;

/// Runs a complete crawl operation
///
/// This is the main entry point for the crawl stage. It will:
/// 1. Build the coordinator (scope, selectors, HTTP client)
/// 2. Walk the site depth-first from the seed
/// 3. Write the whole document collection to the configured path
/// 4. Return a report of the run
///
/// # Example
///
/// ```no_run
/// use docquarry::config::load_config;
/// use docquarry::crawler::crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("docquarry.toml"))?;
/// let report = crawl(&config).await?;
/// println!("Scraped {} pages.", report.documents);
/// # Ok(())
/// # }
/// ```
pub async fn crawl(config: &Config) -> Result<CrawlReport, QuarryError> {
    let coordinator = Coordinator::new(config)?;
    let session = coordinator.run().await;
    let report = CrawlReport::from_session(&session);

    let sink = JsonFileSink::new(&config.output.documents_path);
    sink.write(session.documents())?;
    tracing::info!(
        "Scraped data saved to {}",
        config.output.documents_path
    );

    Ok(report)
}
