//! State module for tracking crawl progress
//!
//! This module provides the in-memory state of a seed's crawl.
//!
//! # Components
//!
//! - `PageOutcome`: How the processing of one page ended (written, skipped, failed)
//! - `CrawlState`: FIFO frontier, visited set and content-hash set of one seed
//! - `CrawlStats`: Per-outcome counters

mod crawl_state;
mod page_state;

// Re-export main types
pub use crawl_state::{CrawlState, CrawlStats};
pub use page_state::PageOutcome;
