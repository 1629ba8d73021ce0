use crate::config::types::CrawlerConfig;
use crate::ConfigError;
use regex::Regex;

/// Compiled include/exclude URL patterns
///
/// Patterns are searched anywhere in the absolute URL (not anchored).
#[derive(Debug, Clone, Default)]
pub struct UrlFilters {
    include: Option<Regex>,
    exclude: Option<Regex>,
}

impl UrlFilters {
    /// Compiles the patterns from the crawler configuration
    pub fn from_config(config: &CrawlerConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            include: compile(config.include.as_deref())?,
            exclude: compile(config.exclude.as_deref())?,
        })
    }

    /// True when neither pattern is configured
    pub fn is_empty(&self) -> bool {
        self.include.is_none() && self.exclude.is_none()
    }

    /// Checks a URL against both patterns
    pub fn allows(&self, url: &str) -> bool {
        if let Some(include) = &self.include {
            if !include.is_match(url) {
                return false;
            }
        }
        if let Some(exclude) = &self.exclude {
            if exclude.is_match(url) {
                return false;
            }
        }
        true
    }
}

fn compile(pattern: Option<&str>) -> Result<Option<Regex>, ConfigError> {
    pattern
        .map(|p| {
            Regex::new(p)
                .map_err(|e| ConfigError::InvalidPattern(format!("'{}': {}", p, e)))
        })
        .transpose()
}
