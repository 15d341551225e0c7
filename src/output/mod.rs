//! Output module for the crawl stage
//!
//! This module handles:
//! - Writing the document record consumed by the embedding stage
//! - Reading it back
//! - Reporting crawl runs and record statistics

mod report;
mod sink;

pub use report::{print_report, print_statistics, CrawlReport, DocumentStatistics};
pub use sink::{load_documents, DocumentSink, JsonFileSink, SinkError, SinkResult};
