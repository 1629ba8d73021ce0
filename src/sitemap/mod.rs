//! Sitemap discovery module
//!
//! Resolves a seed to the page URLs listed in the site's sitemap. A missing,
//! unreachable or malformed sitemap is a normal outcome and yields no URLs;
//! the orchestrator then falls back to frontier crawling.
//!
//! # Example
//!
//! ```no_run
//! use docmirror::sitemap::SitemapResolver;
//! use url::Url;
//!
//! # async fn example(client: reqwest::Client) {
//! let resolver = SitemapResolver::new(client);
//! let seed = Url::parse("https://example.com/docs/").unwrap();
//! for url in resolver.resolve(&seed).await {
//!     println!("{}", url);
//! }
//! # }
//! ```

mod parser;

pub use parser::{parse_sitemap, SitemapDocument, SitemapError};

use crate::crawler::{fetch_url, ContentKind, FetchResult};
use crate::url::origin_of;
use reqwest::Client;
use url::Url;

/// Resolves seeds to sitemap URL lists
#[derive(Debug, Clone)]
pub struct SitemapResolver {
    client: Client,
}

impl SitemapResolver {
    /// Creates a resolver that fetches with `client`
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Candidate sitemap locations for a seed, in the order they are tried
    ///
    /// `/sitemap.xml` at the origin first, then `sitemap.xml` under the seed
    /// path. A root seed yields a single candidate.
    pub fn candidates(seed: &Url) -> Vec<Url> {
        let mut candidates: Vec<Url> = Vec::new();
        for base in [origin_of(seed), seed.clone()] {
            if let Ok(candidate) = base.join("sitemap.xml") {
                if !candidates.contains(&candidate) {
                    candidates.push(candidate);
                }
            }
        }
        candidates
    }

    /// Collects every page URL the seed's sitemap lists
    ///
    /// The first candidate that answers 200 with an XML content type and
    /// parses is used. For an index, each child sitemap is fetched and parsed
    /// as a url-set; a failing child is logged and skipped. Nested indexes
    /// are not followed.
    ///
    /// Each call fetches again. URLs are returned as listed, without scope
    /// filtering or deduplication.
    pub async fn resolve(&self, seed: &Url) -> Vec<Url> {
        for candidate in Self::candidates(seed) {
            let body = match fetch_url(&self.client, candidate.as_str(), ContentKind::Xml).await {
                FetchResult::Success { body, .. } => body,
                other => {
                    tracing::debug!("No sitemap at {}: {}", candidate, other.describe());
                    continue;
                }
            };

            match parse_sitemap(body.as_bytes()) {
                Ok(SitemapDocument::UrlSet(urls)) => {
                    tracing::info!("Sitemap {} lists {} URLs", candidate, urls.len());
                    return urls;
                }
                Ok(SitemapDocument::Index(children)) => {
                    tracing::info!(
                        "Sitemap index {} lists {} child sitemaps",
                        candidate,
                        children.len()
                    );
                    return self.resolve_children(&children).await;
                }
                Err(e) => {
                    tracing::warn!("Ignoring sitemap {}: {}", candidate, e);
                }
            }
        }

        Vec::new()
    }

    async fn resolve_children(&self, children: &[Url]) -> Vec<Url> {
        let mut urls = Vec::new();

        for child in children {
            let body = match fetch_url(&self.client, child.as_str(), ContentKind::Any).await {
                FetchResult::Success { body, .. } => body,
                other => {
                    tracing::warn!("Skipping child sitemap {}: {}", child, other.describe());
                    continue;
                }
            };

            match parse_sitemap(body.as_bytes()) {
                Ok(SitemapDocument::UrlSet(found)) => {
                    tracing::debug!("Child sitemap {} lists {} URLs", child, found.len());
                    urls.extend(found);
                }
                Ok(SitemapDocument::Index(_)) => {
                    tracing::warn!("Skipping nested sitemap index {}", child);
                }
                Err(e) => {
                    tracing::warn!("Skipping child sitemap {}: {}", child, e);
                }
            }
        }

        urls
    }
}
