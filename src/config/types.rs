use crate::output::OutputFormat;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure for docmirror
///
/// Every section and key is optional in the TOML file; missing values take
/// the defaults below, and command-line flags override whatever the file says.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum number of pages to process per seed
    #[serde(rename = "max-pages")]
    pub max_pages: u32,

    /// Maximum link depth from the seed (0 = unlimited)
    #[serde(rename = "max-depth")]
    pub max_depth: u32,

    /// Fixed request rate; the crawler sleeps `1 / rate` seconds after each request
    #[serde(rename = "requests-per-second")]
    pub requests_per_second: f64,

    /// Per-request timeout in seconds
    #[serde(rename = "request-timeout")]
    pub request_timeout_secs: u64,

    /// Try the site's sitemap before falling back to link traversal
    #[serde(rename = "prefer-sitemap")]
    pub prefer_sitemap: bool,

    /// Only crawl URLs matching this regex
    pub include: Option<String>,

    /// Never crawl URLs matching this regex
    pub exclude: Option<String>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_pages: 10_000,
            max_depth: 0,
            requests_per_second: 1.5,
            request_timeout_secs: 20,
            prefer_sitemap: false,
            include: None,
            exclude: None,
        }
    }
}

impl CrawlerConfig {
    /// Delay inserted after every request
    pub fn request_interval(&self) -> Duration {
        if self.requests_per_second.is_finite() && self.requests_per_second > 0.0 {
            Duration::from_secs_f64(1.0 / self.requests_per_second)
        } else {
            Duration::ZERO
        }
    }

    /// Total timeout of a single request
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Depth ceiling, `None` when unbounded
    pub fn depth_limit(&self) -> Option<u32> {
        (self.max_depth > 0).then_some(self.max_depth)
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Product token, also used to match robots.txt groups
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "docmirror".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl UserAgentConfig {
    /// The `User-Agent` header value: `Name/Version`
    pub fn header_value(&self) -> String {
        format!("{}/{}", self.crawler_name, self.crawler_version)
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Root directory; each seed writes into `<directory>/<domain>/`
    pub directory: PathBuf,

    /// Output format for every page
    pub format: OutputFormat,

    /// Skip rewriting files whose content did not change
    pub diff: bool,

    /// Where to write the `count:`/`out:` run summary, if anywhere
    #[serde(rename = "summary-path")]
    pub summary_path: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("sites"),
            format: OutputFormat::Markdown,
            diff: false,
            summary_path: None,
        }
    }
}
