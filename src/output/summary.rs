use super::{OutputError, OutputResult};
use crate::state::CrawlStats;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Result of a whole run, across all seeds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Files actually written; diff-mode skips are not counted
    pub files_written: usize,
    /// The run's output directory
    pub output_dir: PathBuf,
    /// Per-outcome counters of every seed
    pub stats: CrawlStats,
}

impl RunSummary {
    /// Creates an empty summary for an output directory
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            files_written: 0,
            output_dir: output_dir.into(),
            stats: CrawlStats::new(),
        }
    }

    /// Adds the counters of one seed
    pub fn add_seed(&mut self, stats: &CrawlStats) {
        self.files_written += stats.files_written();
        self.stats.merge(stats);
    }

    /// Writes the `count:` / `out:` summary file read by wrapping scripts
    ///
    /// # Example
    ///
    /// ```no_run
    /// use docmirror::RunSummary;
    /// use std::path::Path;
    ///
    /// let summary = RunSummary::new("sites");
    /// summary.write_to(Path::new("/tmp/docmirror-summary")).unwrap();
    /// ```
    pub fn write_to(&self, path: &Path) -> OutputResult<()> {
        let content = format!(
            "count: {}\nout: {}\n",
            self.files_written,
            self.output_dir.display()
        );
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| OutputError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(path, content).map_err(|source| OutputError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Wrote {} files to {}",
            self.files_written,
            self.output_dir.display()
        )
    }
}
