//! Crawl reports and document record statistics
//!
//! This module summarizes a finished crawl session, or an existing document
//! record, and prints the summary to stdout.

use crate::config::CrawlerConfig;
use crate::crawler::{CrawlSession, FailedFetch, ScrapedDocument};
use chrono::{DateTime, Utc};
use std::collections::HashSet;

/// Summary of one crawl run
#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub seed: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,

    /// Targets fetched, successfully or not
    pub pages_visited: usize,

    /// Documents in the collection
    pub documents: usize,

    pub failures: Vec<FailedFetch>,

    /// Links dropped by the depth cap
    pub skipped_by_depth: usize,

    pub total_images: usize,
    pub total_videos: usize,
}

impl CrawlReport {
    /// Builds a report from a session
    pub fn from_session(session: &CrawlSession) -> Self {
        let documents = session.documents();
        Self {
            seed: session.seed().to_string(),
            started_at: session.started_at(),
            finished_at: session.finished_at(),
            pages_visited: session.pages_visited(),
            documents: documents.len(),
            failures: session.failures().to_vec(),
            skipped_by_depth: session.skipped_by_depth(),
            total_images: documents.iter().map(|d| d.images.len()).sum(),
            total_videos: documents.iter().map(|d| d.videos.len()).sum(),
        }
    }

    /// Wall-clock duration, once the run has finished
    pub fn duration_seconds(&self) -> Option<f64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_milliseconds() as f64 / 1000.0)
    }
}

/// Prints a crawl report to stdout
pub fn print_report(report: &CrawlReport) {
    println!("=== Crawl Report ===\n");

    println!("Seed: {}", report.seed);
    println!("Started: {}", report.started_at.to_rfc3339());
    if let Some(duration) = report.duration_seconds() {
        println!("Duration: {:.1}s", duration);
    }
    println!();

    println!("Overview:");
    println!("  Pages visited: {}", report.pages_visited);
    println!("  Documents scraped: {}", report.documents);
    println!("  Failed fetches: {}", report.failures.len());
    println!("  Images referenced: {}", report.total_images);
    println!("  Video references: {}", report.total_videos);
    if report.skipped_by_depth > 0 {
        println!("  Links beyond depth cap: {}", report.skipped_by_depth);
    }
    println!();

    if !report.failures.is_empty() {
        println!("Failed Fetches:");
        for failure in &report.failures {
            println!("  - {} ({})", failure.url, failure.reason);
        }
        println!();
    }
}

/// Statistics over an existing document record
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentStatistics {
    pub total_documents: usize,

    /// Documents whose title fell back to the placeholder
    pub untitled: usize,

    /// Documents whose content fell back to the placeholder
    pub without_content: usize,

    /// Documents with both a real heading and real content
    pub complete: usize,

    pub total_images: usize,
    pub unique_images: usize,
    pub total_videos: usize,
    pub unique_videos: usize,

    /// Mean content length in characters
    pub average_content_chars: usize,
}

impl DocumentStatistics {
    /// Computes statistics, recognizing placeholders from the crawler config
    pub fn from_documents(documents: &[ScrapedDocument], crawler: &CrawlerConfig) -> Self {
        let total_documents = documents.len();
        let untitled = documents
            .iter()
            .filter(|d| d.title == crawler.title_placeholder)
            .count();
        let without_content = documents
            .iter()
            .filter(|d| d.content == crawler.content_placeholder)
            .count();
        let complete = documents
            .iter()
            .filter(|d| {
                d.title != crawler.title_placeholder && d.content != crawler.content_placeholder
            })
            .count();

        let images: Vec<&String> = documents.iter().flat_map(|d| &d.images).collect();
        let videos: Vec<&String> = documents.iter().flat_map(|d| &d.videos).collect();

        let content_chars: usize = documents.iter().map(|d| d.content.chars().count()).sum();
        let average_content_chars = if total_documents > 0 {
            content_chars / total_documents
        } else {
            0
        };

        Self {
            total_documents,
            untitled,
            without_content,
            complete,
            total_images: images.len(),
            unique_images: images.iter().collect::<HashSet<_>>().len(),
            total_videos: videos.len(),
            unique_videos: videos.iter().collect::<HashSet<_>>().len(),
            average_content_chars,
        }
    }
}

/// Prints record statistics to stdout in a formatted manner
pub fn print_statistics(stats: &DocumentStatistics) {
    println!("=== Document Statistics ===\n");

    println!("Overview:");
    println!("  Documents: {}", stats.total_documents);
    println!("  Without heading: {}", stats.untitled);
    println!("  Without main content: {}", stats.without_content);
    println!("  Average content length: {} chars", stats.average_content_chars);
    println!();

    println!("Media:");
    println!(
        "  Images: {} ({} unique)",
        stats.total_images, stats.unique_images
    );
    println!(
        "  Video references: {} ({} unique)",
        stats.total_videos, stats.unique_videos
    );
    println!();

    let percentage = if stats.total_documents > 0 {
        (stats.complete as f64 / stats.total_documents as f64) * 100.0
    } else {
        0.0
    };
    println!(
        "Completeness: {:.1}% ({} / {} documents have a heading and main content)",
        percentage, stats.complete, stats.total_documents
    );
}
