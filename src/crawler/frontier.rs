//! Frontier crawler - breadth-first traversal of one seed's scope
//!
//! Every dequeued URL runs through a fixed pipeline of stages. A stage that
//! stops the page returns the [`PageOutcome`] naming why:
//!
//! 1. visited check (`AlreadyVisited`)
//! 2. robots.txt check (`RobotsDenied`)
//! 3. include/exclude check (`FilteredOut`)
//! 4. fetch (`FetchFailed`, `HttpError`, `NotHtml`)
//! 5. content-hash check (`DuplicateContent`, links are still followed)
//! 6. extract and write (`Written`, `Unchanged`, `WriteFailed`)
//! 7. child discovery, while the depth limit allows it

use crate::config::UrlFilters;
use crate::crawler::parser::discover_links;
use crate::crawler::{fetch_url, ContentKind, FetchResult};
use crate::extract::extract;
use crate::output::{OutputWriter, WriteOutcome};
use crate::robots::{self, RobotsPolicy};
use crate::state::{CrawlState, CrawlStats, PageOutcome};
use crate::url::in_scope;
use reqwest::Client;
use sha2::{Digest, Sha256};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Limits and collaborators of a frontier crawl
pub struct FrontierCrawler<'a> {
    pub client: &'a Client,
    pub writer: &'a OutputWriter,
    pub filters: &'a UrlFilters,
    /// robots.txt product token
    pub agent: &'a str,
    /// Page budget: written plus unchanged pages
    pub max_pages: usize,
    /// `None` for unlimited depth
    pub depth_limit: Option<u32>,
    /// Fixed pause after every network request
    pub interval: Duration,
}

impl FrontierCrawler<'_> {
    /// Crawls everything reachable from `seed` within its scope
    ///
    /// Stops when the queue is empty or the page budget is used up.
    pub async fn crawl(&self, seed: &Url) -> CrawlStats {
        let robots = robots::load(self.client, seed).await;
        if let Some(delay) = robots.crawl_delay(self.agent) {
            tracing::info!(
                "robots.txt asks for a Crawl-delay of {}s; keeping the fixed {:?} interval",
                delay,
                self.interval
            );
        }

        let mut state = CrawlState::new(seed.clone());

        while let Some((url, depth)) = state.next() {
            tracing::trace!("Dequeued {} (depth {}, {} pending)", url, depth, state.pending());

            let outcome = self.process(&mut state, &robots, seed, &url, depth).await;
            state.record(outcome);

            if outcome.is_success() && state.stats().pages_processed() >= self.max_pages {
                tracing::info!("Reached the limit of {} pages for {}", self.max_pages, seed);
                break;
            }
            if outcome.made_request() && !self.interval.is_zero() {
                tokio::time::sleep(self.interval).await;
            }
        }

        state.into_stats()
    }

    async fn process(
        &self,
        state: &mut CrawlState,
        robots: &RobotsPolicy,
        seed: &Url,
        url: &Url,
        depth: u32,
    ) -> PageOutcome {
        if !state.mark_visited(url) {
            return PageOutcome::AlreadyVisited;
        }

        if !robots.allows(self.agent, url.as_str()) {
            tracing::debug!("Disallowed by robots.txt: {}", url);
            return PageOutcome::RobotsDenied;
        }

        if !self.filters.allows(url.as_str()) {
            tracing::debug!("Filtered out: {}", url);
            return PageOutcome::FilteredOut;
        }

        let (final_url, html) = match fetch_page(self.client, url).await {
            Ok(fetched) => fetched,
            Err(outcome) => return outcome,
        };

        let hash = hex::encode(Sha256::digest(html.as_bytes()));
        let outcome = if state.has_content(&hash) {
            tracing::debug!("Duplicate content, not writing: {}", url);
            PageOutcome::DuplicateContent
        } else {
            let (outcome, path) = store_page(self.writer, seed, url, &html);
            if let Some(path) = path {
                state.remember_content(hash);
                let counter = state.stats().pages_processed() + 1;
                report_progress(self.writer, &format!("[{}]", counter), &path, outcome);
            }
            outcome
        };

        if self.depth_limit.map_or(true, |limit| depth < limit) {
            let added = discover_links(&html, &final_url)
                .into_iter()
                .filter(|link| in_scope(seed, link))
                .filter(|link| state.enqueue(link.clone(), depth + 1))
                .count();
            tracing::trace!("Queued {} links from {}", added, url);
        }

        outcome
    }
}

/// Fetches a page as HTML
///
/// Returns the final URL and body, or the outcome that ends the page.
pub(super) async fn fetch_page(client: &Client, url: &Url) -> Result<(Url, String), PageOutcome> {
    match fetch_url(client, url.as_str(), ContentKind::Html).await {
        FetchResult::Success {
            final_url, body, ..
        } => Ok((final_url, body)),
        FetchResult::ContentMismatch { content_type } => {
            tracing::debug!("Not HTML ({}): {}", content_type, url);
            Err(PageOutcome::NotHtml)
        }
        FetchResult::HttpError { status_code } => {
            tracing::debug!("HTTP {} for {}", status_code, url);
            Err(PageOutcome::HttpError)
        }
        FetchResult::NetworkError { error } => {
            tracing::warn!("Failed to fetch {}: {}", url, error);
            Err(PageOutcome::FetchFailed)
        }
    }
}

/// Extracts a page and writes it
///
/// Returns the outcome and, when the write step succeeded, the file path.
pub(super) fn store_page(
    writer: &OutputWriter,
    seed: &Url,
    url: &Url,
    html: &str,
) -> (PageOutcome, Option<PathBuf>) {
    let page = extract(html, url);
    match writer.write(seed, url, &page) {
        Ok(WriteOutcome::Written(path)) => (PageOutcome::Written, Some(path)),
        Ok(WriteOutcome::Unchanged(path)) => (PageOutcome::Unchanged, Some(path)),
        Err(e) => {
            tracing::warn!("Failed to write {}: {}", url, e);
            (PageOutcome::WriteFailed, None)
        }
    }
}

/// Prints a progress line to stdout
pub(super) fn report_progress(
    writer: &OutputWriter,
    counter: &str,
    path: &std::path::Path,
    outcome: PageOutcome,
) {
    let shown = writer.display_path(path).display();
    if outcome == PageOutcome::Unchanged {
        println!("{} {} (unchanged)", counter, shown);
    } else {
        println!("{} {}", counter, shown);
    }
}
