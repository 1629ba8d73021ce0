//! Output module for writing extracted pages
//!
//! This module handles:
//! - Deriving each page's file path from its URL
//! - Serializing pages as Markdown, JSON, plain text or HTML
//! - Skipping unchanged files in diff mode
//! - Writing the run summary file

mod path;
mod summary;
mod writer;

pub use path::relative_output_path;
pub use summary::RunSummary;
pub use writer::{render_document, OutputWriter, WriteOutcome};

use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to format output: {0}")]
    Format(#[from] serde_json::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// File format of the written pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown with a front-matter block
    #[default]
    #[serde(rename = "md", alias = "markdown")]
    #[value(name = "md")]
    Markdown,

    /// Pretty-printed JSON object
    #[serde(rename = "json")]
    #[value(name = "json")]
    Json,

    /// Plain text without markup
    #[serde(rename = "txt", alias = "text")]
    #[value(name = "txt")]
    Text,

    /// The cleaned HTML of the content root
    #[serde(rename = "html")]
    #[value(name = "html")]
    Html,
}

impl OutputFormat {
    /// File extension, without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Markdown => "md",
            Self::Json => "json",
            Self::Text => "txt",
            Self::Html => "html",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}
