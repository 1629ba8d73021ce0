//! Crawler coordinator - main crawl orchestration logic
//!
//! This module drives a run over its seeds:
//! - Building the shared HTTP client, output writer and URL filters
//! - Choosing sitemap-first or frontier crawling for each seed
//! - Falling back to the frontier when the sitemap has nothing in scope
//! - Summing per-seed counters into the run summary

use crate::config::{Config, UrlFilters};
use crate::crawler::build_http_client;
use crate::crawler::frontier::{fetch_page, report_progress, store_page, FrontierCrawler};
use crate::output::{OutputWriter, RunSummary};
use crate::sitemap::SitemapResolver;
use crate::state::CrawlStats;
use crate::url::in_scope;
use crate::MirrorError;
use reqwest::Client;
use std::collections::HashSet;
use url::Url;

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Config,
    client: Client,
    writer: OutputWriter,
    filters: UrlFilters,
    sitemap: SitemapResolver,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - A validated configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(MirrorError)` - The filters do not compile or the HTTP client cannot be built
    pub fn new(config: Config) -> Result<Self, MirrorError> {
        let client = build_http_client(&config.user_agent, config.crawler.request_timeout())?;
        let filters = UrlFilters::from_config(&config.crawler)?;
        let writer = OutputWriter::new(
            config.output.directory.clone(),
            config.output.format,
            config.output.diff,
        );
        let sitemap = SitemapResolver::new(client.clone());

        Ok(Self {
            config,
            client,
            writer,
            filters,
            sitemap,
        })
    }

    /// Mirrors every seed in order
    ///
    /// A seed's failures only affect that seed; the run always completes.
    pub async fn run(&self, seeds: &[Url]) -> RunSummary {
        let mut summary = RunSummary::new(self.writer.root());
        let start_time = std::time::Instant::now();

        for seed in seeds {
            tracing::info!(
                "Mirroring {} into {}",
                seed,
                self.writer.site_dir(seed).display()
            );
            let stats = self.crawl_seed(seed).await;
            tracing::info!("Finished {}: {}", seed, stats);
            summary.add_seed(&stats);
        }

        tracing::info!(
            "Run completed: {} files written for {} seed(s) in {:?}",
            summary.files_written,
            seeds.len(),
            start_time.elapsed()
        );
        summary
    }

    /// Mirrors one seed, sitemap-first when configured
    pub async fn crawl_seed(&self, seed: &Url) -> CrawlStats {
        if self.config.crawler.prefer_sitemap {
            if self.filters.is_empty() {
                let urls = self.sitemap_urls(seed).await;
                if !urls.is_empty() {
                    return self.crawl_sitemap(seed, &urls).await;
                }
                tracing::info!("No sitemap URLs in scope of {}, following links instead", seed);
            } else {
                tracing::info!("Include/exclude patterns set, following links instead of the sitemap");
            }
        }

        self.frontier().crawl(seed).await
    }

    /// In-scope sitemap URLs of a seed, deduplicated and capped at the page limit
    pub async fn sitemap_urls(&self, seed: &Url) -> Vec<Url> {
        let listed = self.sitemap.resolve(seed).await;
        let total = listed.len();

        let mut seen = HashSet::new();
        let urls: Vec<Url> = listed
            .into_iter()
            .filter(|url| in_scope(seed, url))
            .filter(|url| seen.insert(url.as_str().to_string()))
            .take(self.max_pages())
            .collect();

        if total > 0 {
            tracing::info!(
                "Sitemap found: {} pages in scope (from {} total)",
                urls.len(),
                total
            );
        }
        urls
    }

    async fn crawl_sitemap(&self, seed: &Url, urls: &[Url]) -> CrawlStats {
        let interval = self.config.crawler.request_interval();
        let total = urls.len();
        let mut stats = CrawlStats::new();

        for (index, url) in urls.iter().enumerate() {
            let outcome = match fetch_page(&self.client, url).await {
                Ok((_, html)) => {
                    let (outcome, path) = store_page(&self.writer, seed, url, &html);
                    if let Some(path) = path {
                        let counter = format!("[{}/{}]", index + 1, total);
                        report_progress(&self.writer, &counter, &path, outcome);
                    }
                    outcome
                }
                Err(outcome) => outcome,
            };
            stats.record(outcome);

            if !interval.is_zero() {
                tokio::time::sleep(interval).await;
            }
        }

        stats
    }

    fn frontier(&self) -> FrontierCrawler<'_> {
        FrontierCrawler {
            client: &self.client,
            writer: &self.writer,
            filters: &self.filters,
            agent: &self.config.user_agent.crawler_name,
            max_pages: self.max_pages(),
            depth_limit: self.config.crawler.depth_limit(),
            interval: self.config.crawler.request_interval(),
        }
    }

    fn max_pages(&self) -> usize {
        self.config.crawler.max_pages as usize
    }
}

/// Runs a complete mirror operation
///
/// This is the main entry point of the library. It will:
/// 1. Build the HTTP client and output writer
/// 2. Crawl each seed through its sitemap or its links
/// 3. Extract and write every page found
/// 4. Return the totals
///
/// # Arguments
///
/// * `config` - A validated configuration
/// * `seeds` - Normalized seed URLs
///
/// # Returns
///
/// * `Ok(RunSummary)` - Run completed
/// * `Err(MirrorError)` - The run could not start
pub async fn run_mirror(config: Config, seeds: &[Url]) -> crate::Result<RunSummary> {
    let coordinator = Coordinator::new(config)?;
    Ok(coordinator.run(seeds).await)
}
