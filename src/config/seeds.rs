use crate::url::normalize_seed;
use crate::{ConfigError, ConfigResult};
use std::path::PathBuf;
use url::Url;

/// Where the seed URLs of a run come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedSource {
    /// A single seed URL
    Url(String),
    /// A newline-delimited file of seed URLs
    BatchFile(PathBuf),
}

/// Resolves a seed source into normalized seed URLs
///
/// A single URL that cannot be parsed is a configuration error. In a batch
/// file, blank lines and `#` comments are ignored and unparsable lines are
/// logged and skipped; a file without a single usable seed is an error.
pub fn load_seeds(source: &SeedSource) -> ConfigResult<Vec<Url>> {
    match source {
        SeedSource::Url(raw) => {
            if raw.trim().is_empty() {
                return Err(ConfigError::MissingSeed);
            }
            let seed = normalize_seed(raw)
                .map_err(|e| ConfigError::InvalidUrl(format!("'{}': {}", raw, e)))?;
            Ok(vec![seed])
        }
        SeedSource::BatchFile(path) => {
            let content =
                std::fs::read_to_string(path).map_err(|source| ConfigError::BatchFile {
                    path: path.clone(),
                    source,
                })?;
            let seeds = parse_batch(&content);
            if seeds.is_empty() {
                return Err(ConfigError::MissingSeed);
            }
            Ok(seeds)
        }
    }
}

fn parse_batch(content: &str) -> Vec<Url> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| match normalize_seed(line) {
            Ok(seed) => Some(seed),
            Err(e) => {
                tracing::warn!("Skipping invalid seed '{}': {}", line, e);
                None
            }
        })
        .collect()
}
