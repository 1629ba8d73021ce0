//! docmirror main entry point
//!
//! This is the command-line interface for the docmirror documentation mirror.

use anyhow::Context;
use clap::{ArgGroup, Parser};
use docmirror::config::{
    ensure_output_dir, load_config_with_hash, load_seeds, validate, Config, SeedSource,
};
use docmirror::crawler::run_mirror;
use docmirror::OutputFormat;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use url::Url;

/// docmirror: mirror a documentation site as clean text
///
/// docmirror discovers the pages under a seed URL, through the site's sitemap
/// or by following links, extracts the main content of each page and writes
/// it to `<out>/<domain>/<path>.<ext>`.
#[derive(Parser, Debug)]
#[command(name = "docmirror")]
#[command(version)]
#[command(about = "Mirror a documentation site as Markdown, JSON, text or HTML", long_about = None)]
#[command(group(ArgGroup::new("seed").required(true).args(["url", "urls_file"])))]
struct Cli {
    /// Seed URL; only pages under its path are mirrored
    #[arg(long, value_name = "URL")]
    url: Option<String>,

    /// File with one seed URL per line (blank lines and # comments are skipped)
    #[arg(long, value_name = "FILE")]
    urls_file: Option<PathBuf>,

    /// Output directory [default: sites]
    #[arg(long, value_name = "DIR")]
    out: Option<PathBuf>,

    /// Output format [default: md]
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Use the site's sitemap before following links
    #[arg(long, visible_alias = "sitemap-only")]
    sitemap: bool,

    /// Leave files whose content did not change untouched
    #[arg(long)]
    diff: bool,

    /// Maximum pages per seed [default: 10000]
    #[arg(long, value_name = "N")]
    max_pages: Option<u32>,

    /// Maximum link depth, 0 for unlimited [default: 0]
    #[arg(long, value_name = "N")]
    depth: Option<u32>,

    /// Requests per second [default: 1.5]
    #[arg(long, value_name = "RPS")]
    rate: Option<f64>,

    /// Only crawl URLs matching this regex
    #[arg(long, value_name = "REGEX")]
    include: Option<String>,

    /// Never crawl URLs matching this regex
    #[arg(long, value_name = "REGEX")]
    exclude: Option<String>,

    /// Path to TOML configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write a `count:`/`out:` summary of the run to this file
    #[arg(long, value_name = "FILE", env = "DOCMIRROR_SUMMARY_PATH")]
    summary_path: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be mirrored without fetching anything
    #[arg(long)]
    dry_run: bool,
}

impl Cli {
    /// Layers the command-line flags over the configuration file values
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(out) = &self.out {
            config.output.directory = out.clone();
        }
        if let Some(format) = self.format {
            config.output.format = format;
        }
        if self.sitemap {
            config.crawler.prefer_sitemap = true;
        }
        if self.diff {
            config.output.diff = true;
        }
        if let Some(max_pages) = self.max_pages {
            config.crawler.max_pages = max_pages;
        }
        if let Some(depth) = self.depth {
            config.crawler.max_depth = depth;
        }
        if let Some(rate) = self.rate {
            config.crawler.requests_per_second = rate;
        }
        if let Some(include) = &self.include {
            config.crawler.include = Some(include.clone());
        }
        if let Some(exclude) = &self.exclude {
            config.crawler.exclude = Some(exclude.clone());
        }
        if let Some(path) = &self.summary_path {
            config.output.summary_path = Some(path.clone());
        }
    }

    fn seed_source(&self) -> SeedSource {
        match (&self.url, &self.urls_file) {
            (_, Some(file)) => SeedSource::BatchFile(file.clone()),
            (Some(url), None) => SeedSource::Url(url.clone()),
            (None, None) => SeedSource::Url(String::new()),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path).with_context(|| {
                format!("Failed to load configuration from {}", path.display())
            })?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };
    cli.apply_overrides(&mut config);
    validate(&config).context("Invalid configuration")?;

    let seeds = load_seeds(&cli.seed_source()).context("Cannot determine seed URLs")?;
    tracing::info!("{} seed URL(s)", seeds.len());

    if cli.dry_run {
        handle_dry_run(&config, &seeds);
        return Ok(());
    }

    ensure_output_dir(&config.output.directory)?;

    let summary_path = config.output.summary_path.clone();
    let summary = run_mirror(config, &seeds)
        .await
        .context("Mirror run failed")?;

    tracing::info!("Outcomes: {}", summary.stats);
    println!("{}", summary);

    if let Some(path) = summary_path {
        summary
            .write_to(&path)
            .with_context(|| format!("Failed to write run summary to {}", path.display()))?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("docmirror=info,warn"),
            1 => EnvFilter::new("docmirror=debug,info"),
            2 => EnvFilter::new("docmirror=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the effective settings and seeds
fn handle_dry_run(config: &Config, seeds: &[Url]) {
    println!("=== docmirror Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Max pages per seed: {}", config.crawler.max_pages);
    match config.crawler.depth_limit() {
        Some(depth) => println!("  Max depth: {}", depth),
        None => println!("  Max depth: unlimited"),
    }
    println!(
        "  Request interval: {:?}",
        config.crawler.request_interval()
    );
    println!("  Request timeout: {:?}", config.crawler.request_timeout());
    println!("  Prefer sitemap: {}", config.crawler.prefer_sitemap);
    if let Some(include) = &config.crawler.include {
        println!("  Include: {}", include);
    }
    if let Some(exclude) = &config.crawler.exclude {
        println!("  Exclude: {}", exclude);
    }

    println!("\nUser Agent: {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  Directory: {}", config.output.directory.display());
    println!("  Format: {}", config.output.format);
    println!("  Diff mode: {}", config.output.diff);
    if let Some(path) = &config.output.summary_path {
        println!("  Summary: {}", path.display());
    }

    println!("\nSeeds ({}):", seeds.len());
    for seed in seeds {
        println!("  - {}", seed);
    }

    println!("\n✓ Configuration is valid");
}
