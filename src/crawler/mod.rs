//! Crawler module for walking a thread page by page
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching behind the `Fetcher` seam
//! - Politeness pacing behind the `Delay` seam
//! - The crawl loop and its final report

mod coordinator;
mod delay;
mod fetcher;

pub use coordinator::{Coordinator, CrawlReport};
pub use delay::{Delay, NoDelay, TokioDelay};
pub use fetcher::{build_http_client, FetchResponse, Fetcher, HttpFetcher, TransportError};

use crate::config::{validate, Config};
use crate::output::{resolve_output_path, CsvSink};
use crate::url::normalize_start_url;
use crate::Result;
use std::path::Path;

/// Crawls a whole thread into a delimited file
///
/// This is the main entry point for a crawl. It will:
/// 1. Validate the configuration and the start URL (nothing is created when
///    either is unusable)
/// 2. Build the coordinator from the configuration
/// 3. Open the output file: `output` if given, else the configured path,
///    else a name derived from the thread URL
/// 4. Run the crawl loop until the thread ends, a block page appears, or a
///    fetch or write fails
///
/// # Returns
///
/// * `Ok(CrawlReport)` - The crawl ran; check `termination` for how it ended
/// * `Err(ScrapeError)` - The crawl could not start
pub async fn crawl(config: Config, start_url: &str, output: Option<&Path>) -> Result<CrawlReport> {
    validate(&config)?;
    let start = normalize_start_url(start_url)?;
    let delimiter = config.output.delimiter_byte()?;

    let path = match output {
        Some(path) => path.to_path_buf(),
        None => resolve_output_path(config.output.path.as_deref(), &start),
    };

    let coordinator = Coordinator::new(config)?;

    let mut sink = CsvSink::create(&path, delimiter)?;
    tracing::info!("Writing posts to {}", path.display());

    let mut report = coordinator.run(start, &mut sink).await?;
    report.output_path = Some(path);
    Ok(report)
}
