//! Configuration module for docmirror
//!
//! This module handles the optional TOML configuration file, its validation,
//! the include/exclude URL filters and the seed list of a run.
//!
//! # Example
//!
//! ```no_run
//! use docmirror::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("docmirror.toml")).unwrap();
//! println!("Crawler will fetch at most {} pages", config.crawler.max_pages);
//! ```

mod filters;
mod parser;
mod seeds;
mod types;
mod validation;

// Re-export types
pub use filters::UrlFilters;
pub use seeds::{load_seeds, SeedSource};
pub use types::{Config, CrawlerConfig, OutputConfig, UserAgentConfig};

// Re-export parser and validation functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::{ensure_output_dir, validate};
