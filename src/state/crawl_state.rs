//! Per-seed frontier state
//!
//! A `CrawlState` is created when a seed's frontier crawl starts and dropped
//! when it ends. Nothing here is shared between seeds or persisted.

use super::PageOutcome;
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;
use url::Url;

/// Per-outcome counters of one crawl
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStats {
    counts: HashMap<PageOutcome, usize>,
}

impl CrawlStats {
    /// Creates empty counters
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one outcome
    pub fn record(&mut self, outcome: PageOutcome) {
        *self.counts.entry(outcome).or_insert(0) += 1;
    }

    /// Number of pages that ended with `outcome`
    pub fn count(&self, outcome: PageOutcome) -> usize {
        self.counts.get(&outcome).copied().unwrap_or(0)
    }

    /// Files actually written (diff skips excluded)
    pub fn files_written(&self) -> usize {
        self.count(PageOutcome::Written)
    }

    /// Pages that count against the page budget
    pub fn pages_processed(&self) -> usize {
        self.count(PageOutcome::Written) + self.count(PageOutcome::Unchanged)
    }

    /// Adds another set of counters into this one
    pub fn merge(&mut self, other: &CrawlStats) {
        for (outcome, count) in &other.counts {
            *self.counts.entry(*outcome).or_insert(0) += count;
        }
    }
}

impl fmt::Display for CrawlStats {
    /// Non-zero counters as `name=count`, in reporting order
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = PageOutcome::ALL
            .iter()
            .filter(|outcome| self.count(**outcome) > 0)
            .map(|outcome| format!("{}={}", outcome, self.count(*outcome)))
            .collect();
        if parts.is_empty() {
            f.write_str("nothing processed")
        } else {
            f.write_str(&parts.join(" "))
        }
    }
}

/// FIFO frontier with visited and content-hash sets
#[derive(Debug)]
pub struct CrawlState {
    queue: VecDeque<(Url, u32)>,
    visited: HashSet<String>,
    content_hashes: HashSet<String>,
    stats: CrawlStats,
}

impl CrawlState {
    /// Creates a state whose queue holds only `(seed, 0)`
    pub fn new(seed: Url) -> Self {
        let mut queue = VecDeque::new();
        queue.push_back((seed, 0));
        Self {
            queue,
            visited: HashSet::new(),
            content_hashes: HashSet::new(),
            stats: CrawlStats::new(),
        }
    }

    /// Takes the next URL off the front of the queue
    pub fn next(&mut self) -> Option<(Url, u32)> {
        self.queue.pop_front()
    }

    /// Enqueues a URL unless it was already visited
    ///
    /// Returns true if the URL was added.
    pub fn enqueue(&mut self, url: Url, depth: u32) -> bool {
        if self.visited.contains(url.as_str()) {
            return false;
        }
        self.queue.push_back((url, depth));
        true
    }

    /// Marks a URL visited
    ///
    /// Returns false if it had been visited before.
    pub fn mark_visited(&mut self, url: &Url) -> bool {
        self.visited.insert(url.as_str().to_string())
    }

    /// True if a page with this content hash was already written
    pub fn has_content(&self, hash: &str) -> bool {
        self.content_hashes.contains(hash)
    }

    /// Remembers the content hash of a written page
    pub fn remember_content(&mut self, hash: String) {
        self.content_hashes.insert(hash);
    }

    /// Number of URLs waiting in the queue
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Records the outcome of one page
    pub fn record(&mut self, outcome: PageOutcome) {
        self.stats.record(outcome);
    }

    /// The counters so far
    pub fn stats(&self) -> &CrawlStats {
        &self.stats
    }

    /// Consumes the state, keeping only its counters
    pub fn into_stats(self) -> CrawlStats {
        self.stats
    }
}
