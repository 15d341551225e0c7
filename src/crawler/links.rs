//! Link extraction for the crawl frontier
//!
//! Only anchor elements are followed. An href qualifies when the scope accepts
//! it and it has not been visited yet. This discovery-time check only trims the
//! work-list; the coordinator re-checks at visit time.

use crate::crawler::VisitedSet;
use crate::url::{CrawlScope, CrawlTarget};
use scraper::{Html, Selector};
use std::collections::HashSet;

/// Returns the in-scope, not-yet-visited anchor targets in document order
///
/// Repeated links on one page keep their first position only.
pub fn extract_links(document: &Html, scope: &CrawlScope, visited: &VisitedSet) -> Vec<CrawlTarget> {
    let Ok(anchors) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    document
        .select(&anchors)
        .filter_map(|a| a.value().attr("href"))
        .filter_map(|href| scope.resolve_link(href))
        .filter(|target| !visited.contains(target))
        .filter(|target| seen.insert(target.clone()))
        .collect()
}
