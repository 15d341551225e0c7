//! URL handling module for docquarry
//!
//! This module provides crawl-target normalization and the host/prefix scope
//! rule that decides which discovered links the crawler follows.

mod scope;
mod target;

pub use scope::CrawlScope;
pub use target::CrawlTarget;
