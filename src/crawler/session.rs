//! Per-run crawl state
//!
//! A [`CrawlSession`] owns everything one crawl mutates: the visited set, the
//! document collection, the depth-first work-list and the failure log. A new
//! session is built for every run, so nothing leaks between runs.

use crate::crawler::ScrapedDocument;
use crate::url::CrawlTarget;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::fmt;

/// Targets already fetched in this run; append-only
#[derive(Debug, Default, Clone)]
pub struct VisitedSet {
    targets: HashSet<CrawlTarget>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a target; returns false if it was already present
    pub fn insert(&mut self, target: CrawlTarget) -> bool {
        self.targets.insert(target)
    }

    pub fn contains(&self, target: &CrawlTarget) -> bool {
        self.targets.contains(target)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// A discovered target waiting on the work-list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTarget {
    pub target: CrawlTarget,
    /// Hops from the seed
    pub depth: u32,
}

/// Why a visited page produced no document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// The server answered with a non-success status
    Status(u16),
    /// The request never got a response
    Transport(String),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status(code) => write!(f, "HTTP {}", code),
            Self::Transport(error) => write!(f, "{}", error),
        }
    }
}

/// A page that was visited but could not be fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedFetch {
    pub url: String,
    pub reason: FailureReason,
}

/// State of a single crawl run
#[derive(Debug)]
pub struct CrawlSession {
    seed: CrawlTarget,
    visited: VisitedSet,
    documents: Vec<ScrapedDocument>,
    pending: Vec<PendingTarget>,
    failures: Vec<FailedFetch>,
    skipped_by_depth: usize,
    started_at: DateTime<Utc>,
    finished_at: Option<DateTime<Utc>>,
}

impl CrawlSession {
    /// Creates a session whose work-list holds only the seed
    pub fn new(seed: CrawlTarget) -> Self {
        let pending = vec![PendingTarget {
            target: seed.clone(),
            depth: 0,
        }];

        Self {
            seed,
            visited: VisitedSet::new(),
            documents: Vec::new(),
            pending,
            failures: Vec::new(),
            skipped_by_depth: 0,
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    pub fn seed(&self) -> &CrawlTarget {
        &self.seed
    }

    pub fn visited(&self) -> &VisitedSet {
        &self.visited
    }

    /// Number of targets visited so far (fetched, successfully or not)
    pub fn pages_visited(&self) -> usize {
        self.visited.len()
    }

    /// Documents in visit order
    pub fn documents(&self) -> &[ScrapedDocument] {
        &self.documents
    }

    pub fn failures(&self) -> &[FailedFetch] {
        &self.failures
    }

    /// Links not scheduled because they sat past the depth cap
    pub fn skipped_by_depth(&self) -> usize {
        self.skipped_by_depth
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    /// Targets still on the work-list
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Pops the next target depth-first
    pub fn next_pending(&mut self) -> Option<PendingTarget> {
        self.pending.pop()
    }

    /// Marks a target visited; returns false if it already was
    pub fn mark_visited(&mut self, target: CrawlTarget) -> bool {
        self.visited.insert(target)
    }

    pub fn is_visited(&self, target: &CrawlTarget) -> bool {
        self.visited.contains(target)
    }

    /// Pushes a page's children so the first link is popped first
    ///
    /// This reproduces the order of a recursive depth-first walk: the whole
    /// subtree under the first link is explored before the second link.
    pub fn schedule(&mut self, children: Vec<CrawlTarget>, depth: u32) {
        self.pending.extend(
            children
                .into_iter()
                .rev()
                .map(|target| PendingTarget { target, depth }),
        );
    }

    pub fn record_skipped_by_depth(&mut self, count: usize) {
        self.skipped_by_depth += count;
    }

    pub fn record_document(&mut self, document: ScrapedDocument) {
        self.documents.push(document);
    }

    pub fn record_failure(&mut self, target: &CrawlTarget, reason: FailureReason) {
        self.failures.push(FailedFetch {
            url: target.to_string(),
            reason,
        });
    }

    /// Stamps the finish time
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Gives up the document collection for serialization
    pub fn into_documents(self) -> Vec<ScrapedDocument> {
        self.documents
    }
}
