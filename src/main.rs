//! Thread-Scrape main entry point
//!
//! This is the command-line interface for the Thread-Scrape forum thread harvester.

use anyhow::Context;
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use thread_scrape::config::{load_config_with_hash, Config};
use thread_scrape::crawler::crawl;
use thread_scrape::output::resolve_output_path;
use thread_scrape::url::normalize_start_url;
use tracing_subscriber::EnvFilter;

/// Thread-Scrape: a resilient forum thread harvester
///
/// Thread-Scrape follows a discussion thread from its first page to its last,
/// extracts every post despite shifting forum markup, and streams the posts
/// into a spreadsheet-friendly CSV file.
#[derive(Parser, Debug)]
#[command(name = "thread-scrape")]
#[command(version = "1.0.0")]
#[command(about = "A resilient forum thread harvester", long_about = None)]
struct Cli {
    /// Thread URL to start from (prompted for when omitted)
    #[arg(value_name = "URL")]
    url: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output CSV file (overrides the configured or derived name)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    let url = match cli.url.clone() {
        Some(url) => url,
        None => match prompt_for_url()? {
            Some(url) => url,
            None => {
                println!("No URL given. Exiting.");
                return Ok(ExitCode::SUCCESS);
            }
        },
    };

    if cli.dry_run {
        handle_dry_run(&config, &url, cli.output)?;
        return Ok(ExitCode::SUCCESS);
    }

    handle_crawl(config, &url, cli.output).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("thread_scrape=info,warn"),
            1 => EnvFilter::new("thread_scrape=debug,info"),
            2 => EnvFilter::new("thread_scrape=trace,debug"),
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

/// Asks for the thread URL on stdin; `None` when the answer is empty
fn prompt_for_url() -> anyhow::Result<Option<String>> {
    println!("--- Thread-Scrape ---");
    print!("Paste the thread URL (e.g. https://www.flashback.org/t123456): ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read URL from stdin")?;

    let url = line.trim();
    Ok((!url.is_empty()).then(|| url.to_string()))
}

/// Handles the --dry-run mode: validates inputs and shows what would be crawled
fn handle_dry_run(config: &Config, url: &str, output: Option<PathBuf>) -> anyhow::Result<()> {
    let start = normalize_start_url(url).context("Invalid thread URL")?;
    let output = output
        .unwrap_or_else(|| resolve_output_path(config.output.path.as_deref(), &start));

    println!("=== Thread-Scrape Dry Run ===\n");

    println!("Thread:");
    println!("  Start URL: {}", start);
    println!("  Output: {}", output.display());

    println!("\nSite:");
    println!("  Base URL: {}", config.site.base_url);
    println!("  Next label: {}", config.site.next_label);

    println!("\nCrawler Configuration:");
    println!("  Politeness delay: {}ms", config.crawler.politeness_delay_ms);
    println!("  Request timeout: {}s", config.crawler.request_timeout_secs);
    if config.crawler.max_pages == 0 {
        println!("  Max pages: unlimited");
    } else {
        println!("  Max pages: {}", config.crawler.max_pages);
    }
    println!("  Block markers: {}", config.crawler.block_markers.join(", "));

    println!("\nRequest Headers ({}):", config.request.headers.len());
    for (name, value) in &config.request.headers {
        println!("  {}: {}", name, value);
    }

    println!("\n✓ Configuration is valid");
    println!("✓ Would start crawling at {}", start);

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(
    config: Config,
    url: &str,
    output: Option<PathBuf>,
) -> anyhow::Result<ExitCode> {
    let report = crawl(config, url, output.as_deref())
        .await
        .context("Crawl could not start")?;

    let destination = report
        .output_path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_default();

    if report.is_fatal() {
        tracing::error!("Crawl failed: {}", report.termination);
        println!(
            "✗ Stopped early: {} posts saved to {}",
            report.records_written, destination
        );
        return Ok(ExitCode::FAILURE);
    }

    println!(
        "✓ Done! {} posts saved to {}",
        report.records_written, destination
    );
    Ok(ExitCode::SUCCESS)
}
