//! Crawler coordinator - main crawl orchestration logic
//!
//! This module drives the depth-first walk over a documentation site:
//! - Popping targets from the session's work-list
//! - Re-checking the visited set at visit time
//! - Pausing before every fetch after the seed
//! - Fetching, parsing and extracting links from each page
//! - Enforcing the optional page and depth caps

use crate::config::Config;
use crate::crawler::links::extract_links;
use crate::crawler::parser::PageParser;
use crate::crawler::session::{CrawlSession, FailureReason, PendingTarget, VisitedSet};
use crate::crawler::{build_http_client, fetch_page, FetchResult, ScrapedDocument};
use crate::url::{CrawlScope, CrawlTarget};
use crate::QuarryError;
use reqwest::Client;
use scraper::Html;
use std::time::Duration;

/// Main crawler coordinator structure
pub struct Coordinator {
    scope: CrawlScope,
    parser: PageParser,
    client: Client,
    seed: CrawlTarget,
    politeness_delay: Duration,
    max_pages: Option<usize>,
    max_depth: Option<u32>,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Scope, selectors and HTTP client are ready
    /// * `Err(QuarryError)` - The seed or scope URLs are invalid, a selector does
    ///   not compile, or the HTTP client could not be built
    pub fn new(config: &Config) -> Result<Self, QuarryError> {
        let crawler = &config.crawler;

        let scope = CrawlScope::from_config(crawler)?;
        let seed = CrawlTarget::parse(crawler.seed())?;
        let parser = PageParser::from_config(crawler)?;
        let client = build_http_client(&config.user_agent)?;

        Ok(Self {
            scope,
            parser,
            client,
            seed,
            politeness_delay: Duration::from_millis(crawler.politeness_delay_ms),
            max_pages: crawler.max_pages,
            max_depth: crawler.max_depth,
        })
    }

    pub fn scope(&self) -> &CrawlScope {
        &self.scope
    }

    /// Runs the crawl to completion on a fresh session
    ///
    /// The walk stops when the work-list is empty or the page cap is reached.
    /// Fetch failures never stop it.
    pub async fn run(&self) -> CrawlSession {
        let mut session = CrawlSession::new(self.seed.clone());
        tracing::info!("Starting crawl at {}", self.seed);

        while let Some(PendingTarget { target, depth }) = session.next_pending() {
            // Several pages may have discovered this target before it was popped
            if session.is_visited(&target) {
                tracing::trace!("Already visited {}", target);
                continue;
            }

            if let Some(max_pages) = self.max_pages {
                if session.pages_visited() >= max_pages {
                    tracing::info!(
                        "Page cap of {} reached with {} targets still pending",
                        max_pages,
                        session.pending_len() + 1
                    );
                    break;
                }
            }

            if session.pages_visited() > 0 && !self.politeness_delay.is_zero() {
                tokio::time::sleep(self.politeness_delay).await;
            }

            self.visit(&mut session, target, depth).await;
        }

        session.finish();
        tracing::info!(
            "Crawl finished: {} pages visited, {} documents, {} failed",
            session.pages_visited(),
            session.documents().len(),
            session.failures().len()
        );

        session
    }

    /// Visits one target: mark, fetch, parse, schedule children
    async fn visit(&self, session: &mut CrawlSession, target: CrawlTarget, depth: u32) {
        tracing::info!("Visiting: {}", target);
        // Marked before children are scheduled so cycles terminate
        session.mark_visited(target.clone());

        match fetch_page(&self.client, &target).await {
            FetchResult::Success { body } => {
                let (document, links) = self.process_page(&target, &body, session.visited());
                session.record_document(document);

                tracing::debug!("Found {} new links on {}", links.len(), target);
                let child_depth = depth + 1;
                match self.max_depth {
                    Some(max_depth) if child_depth > max_depth => {
                        tracing::debug!(
                            "Not following {} links from {}: depth {} exceeds {}",
                            links.len(),
                            target,
                            child_depth,
                            max_depth
                        );
                        session.record_skipped_by_depth(links.len());
                    }
                    _ => session.schedule(links, child_depth),
                }
            }
            FetchResult::HttpError { status_code } => {
                session.record_failure(&target, FailureReason::Status(status_code));
            }
            FetchResult::NetworkError { error } => {
                session.record_failure(&target, FailureReason::Transport(error));
            }
        }
    }

    /// Parses a fetched body once for both the document and its links
    fn process_page(
        &self,
        target: &CrawlTarget,
        body: &str,
        visited: &VisitedSet,
    ) -> (ScrapedDocument, Vec<CrawlTarget>) {
        let html = Html::parse_document(body);
        let document = self.parser.parse(&html, target, &self.scope);
        let links = extract_links(&html, &self.scope, visited);
        (document, links)
    }
}
