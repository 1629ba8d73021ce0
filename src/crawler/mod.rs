//! Crawler module for page discovery and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with content-type checks
//! - Link discovery from anchors and meta refresh
//! - Breadth-first frontier traversal
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod frontier;
mod parser;

pub use coordinator::{run_mirror, Coordinator};
pub use fetcher::{build_http_client, fetch_url, ContentKind, FetchResult};
pub use frontier::FrontierCrawler;
pub use parser::discover_links;
