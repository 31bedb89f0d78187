//! link-audit main entry point
//!
//! This is the command-line interface for the link-audit broken link checker.

use anyhow::Context;
use clap::Parser;
use link_audit::config::{read_config_with_hash, validate, Config};
use link_audit::output::{default_csv_path, print_summary, CsvExporter, Exporter, JsonExporter};
use link_audit::{parse_start_url, Coordinator};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// link-audit: a site-wide broken link checker
///
/// Crawls every page reachable from the start URL on the same host,
/// checks each one once, and reports broken links, redirects and errors
/// as a summary plus a CSV (and optionally JSON) report.
#[derive(Parser, Debug)]
#[command(name = "link-audit")]
#[command(version = "1.0.0")]
#[command(about = "A site-wide broken link checker", long_about = None)]
struct Cli {
    /// URL to start crawling from
    #[arg(value_name = "START_URL")]
    start_url: String,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Maximum number of pages to check
    #[arg(long, value_name = "N")]
    max_pages: Option<u32>,

    /// Minimum delay between requests to the same host, in milliseconds
    #[arg(long, value_name = "MS")]
    delay_ms: Option<u64>,

    /// Number of fetches allowed in flight at once
    #[arg(long, value_name = "N")]
    concurrency: Option<u32>,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Write the CSV report to this path
    #[arg(long, value_name = "FILE")]
    csv: Option<String>,

    /// Also write a JSON report to this path
    #[arg(long, value_name = "FILE")]
    json: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and start URL, print the effective settings, and exit
    #[arg(long)]
    dry_run: bool,
}

impl Cli {
    /// Reads the file configuration, applies overrides, then validates once
    fn effective_config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => {
                tracing::info!("Loading configuration from: {}", path.display());
                let (config, hash) = read_config_with_hash(path).with_context(|| {
                    format!("Failed to load configuration from {}", path.display())
                })?;
                tracing::info!("Configuration loaded successfully (hash: {})", hash);
                config
            }
            None => Config::default(),
        };

        self.apply_overrides(&mut config);
        validate(&config).context("Invalid configuration")?;
        Ok(config)
    }

    /// Applies command-line overrides on top of the file configuration
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(max_pages) = self.max_pages {
            config.crawler.max_pages = max_pages;
        }
        if let Some(delay_ms) = self.delay_ms {
            config.crawler.politeness_delay_ms = delay_ms;
        }
        if let Some(concurrency) = self.concurrency {
            config.crawler.max_concurrent_fetches = concurrency;
        }
        if let Some(timeout) = self.timeout {
            config.crawler.request_timeout_secs = timeout;
        }
        if let Some(csv) = &self.csv {
            config.output.csv_path = Some(csv.clone());
        }
        if let Some(json) = &self.json {
            config.output.json_path = Some(json.clone());
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = cli.effective_config()?;

    if cli.dry_run {
        return handle_dry_run(&cli.start_url, &config);
    }

    handle_crawl(&cli.start_url, config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("link_audit=info,warn"),
            1 => EnvFilter::new("link_audit=debug,info"),
            2 => EnvFilter::new("link_audit=trace,debug"),
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

/// Handles the --dry-run mode: validates input and shows what would be crawled
fn handle_dry_run(start_url: &str, config: &Config) -> anyhow::Result<()> {
    let start = parse_start_url(start_url).context("Invalid start URL")?;

    println!("=== link-audit Dry Run ===\n");
    println!("Start URL: {}", start);
    println!("Scope: {}", start.host().unwrap_or_default());

    println!("\nCrawler Configuration:");
    println!("  Max pages: {}", config.crawler.max_pages);
    println!("  Politeness delay: {}ms", config.crawler.politeness_delay_ms);
    println!("  Request timeout: {}s", config.crawler.request_timeout_secs);
    println!(
        "  Max concurrent fetches: {}",
        config.crawler.max_concurrent_fetches
    );
    println!("  Max redirects: {}", config.crawler.max_redirects);

    println!("\nUser Agent: {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!(
        "  CSV: {}",
        config
            .output
            .csv_path
            .as_deref()
            .unwrap_or("link_report_<timestamp>.csv")
    );
    println!(
        "  JSON: {}",
        config.output.json_path.as_deref().unwrap_or("(none)")
    );

    println!("\n✓ Configuration is valid");
    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(start_url: &str, config: Config) -> anyhow::Result<()> {
    let csv_path = config
        .output
        .csv_path
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(|| default_csv_path(chrono::Local::now()));
    let json_path = config.output.json_path.as_ref().map(PathBuf::from);

    let coordinator =
        Coordinator::new(start_url, config).context("Could not start the crawl")?;
    let report = coordinator.run().await;

    print_summary(&report.summary());

    export(&CsvExporter, &report.sink, &csv_path)?;
    if let Some(path) = json_path {
        export(&JsonExporter, &report.sink, &path)?;
    }

    Ok(())
}

fn export(
    exporter: &dyn Exporter,
    sink: &link_audit::output::ResultSink,
    path: &Path,
) -> anyhow::Result<()> {
    exporter.export_to_path(sink, path).with_context(|| {
        format!(
            "Failed to write {} report to {}",
            exporter.format_name(),
            path.display()
        )
    })?;
    println!("{} report saved to: {}", exporter.format_name(), path.display());
    Ok(())
}
