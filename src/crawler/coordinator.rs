//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl loop that walks one thread page by page:
//! fetch, check for a block page, locate posts, extract and write records,
//! then resolve and pace towards the next page.

use crate::config::Config;
use crate::crawler::delay::{Delay, TokioDelay};
use crate::crawler::fetcher::{FetchResponse, Fetcher, HttpFetcher, TransportError};
use crate::document::{decode_body, PageDocument};
use crate::extract::{BlockDetector, FieldExtractor, PaginationResolver, PostLocator};
use crate::output::RecordSink;
use crate::state::{CrawlPhase, CrawlState, Termination};
use crate::Result;
use std::path::PathBuf;
use url::Url;

/// Outcome of one finished crawl
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// Pages fetched and processed
    pub pages_processed: u32,
    /// Records written to the sink
    pub records_written: u64,
    /// Post containers skipped as unusable
    pub faults_skipped: u64,
    /// Why the crawl stopped
    pub termination: Termination,
    /// Where the records went, when written to a file
    pub output_path: Option<PathBuf>,
}

impl CrawlReport {
    /// Returns true if the crawl ended on a transport or output failure
    pub fn is_fatal(&self) -> bool {
        self.termination.is_fatal()
    }
}

/// What to do once a page has been handled
enum PageOutcome {
    Next(Url),
    Stop(Termination),
}

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Config,
    fetcher: Box<dyn Fetcher>,
    delay: Box<dyn Delay>,
    locator: PostLocator,
    extractor: FieldExtractor,
    pagination: PaginationResolver,
    detector: BlockDetector,
}

impl Coordinator {
    /// Creates a coordinator using the default HTTP transport and tokio pacing
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(ScrapeError)` - The site settings are unusable or the HTTP client failed to build
    pub fn new(config: Config) -> Result<Self> {
        let base = config.site.base()?;
        let pagination = PaginationResolver::new(base.clone(), &config.site.next_label)?;
        let detector = BlockDetector::new(config.crawler.block_markers.iter().cloned());

        Ok(Self {
            fetcher: Box::new(HttpFetcher::new()?),
            delay: Box::new(TokioDelay),
            locator: PostLocator::new(),
            extractor: FieldExtractor::new(base),
            pagination,
            detector,
            config,
        })
    }

    /// Replaces the transport
    pub fn with_fetcher(mut self, fetcher: impl Fetcher + 'static) -> Self {
        self.fetcher = Box::new(fetcher);
        self
    }

    /// Replaces the pacing between fetches
    pub fn with_delay(mut self, delay: impl Delay + 'static) -> Self {
        self.delay = Box::new(delay);
        self
    }

    /// Runs the crawl loop from `start_url` until a terminal phase
    ///
    /// Transport failures, block pages and write failures end the crawl but
    /// are reported through [`CrawlReport::termination`]; records written
    /// before the stop stay written. The sink is finished on every path.
    pub async fn run(&self, start_url: Url, sink: &mut dyn RecordSink) -> Result<CrawlReport> {
        tracing::info!("Starting crawl of {}", start_url);

        let mut state = CrawlState::new(start_url);
        let mut pages_processed = 0u32;

        let termination = loop {
            let url = state.current_url().clone();
            tracing::info!("Processing page {}: {}", state.page_number(), url);

            let response = match self.fetch_page(&url).await {
                Ok(response) => response,
                Err(e) => {
                    tracing::error!("Fetch failed: {}", e);
                    let cause = Termination::Fatal {
                        url: url.to_string(),
                        cause: e.to_string(),
                    };
                    state.terminate(cause.clone())?;
                    break cause;
                }
            };
            pages_processed += 1;

            match self.process_page(&mut state, &url, response, sink)? {
                PageOutcome::Next(next) => {
                    self.delay.wait(self.config.crawler.politeness_delay()).await;
                    state.begin_page(next)?;
                }
                PageOutcome::Stop(cause) => {
                    state.terminate(cause.clone())?;
                    break cause;
                }
            }
        };

        sink.finish()?;

        match &termination {
            Termination::Blocked { .. } | Termination::Fatal { .. } => {
                tracing::warn!("Crawl stopped: {}", termination)
            }
            _ => tracing::info!("Crawl finished: {}", termination),
        }
        tracing::info!(
            "{} posts saved from {} pages ({} skipped)",
            state.records_written(),
            pages_processed,
            state.faults_skipped()
        );

        Ok(CrawlReport {
            pages_processed,
            records_written: state.records_written(),
            faults_skipped: state.faults_skipped(),
            termination,
            output_path: None,
        })
    }

    async fn fetch_page(&self, url: &Url) -> std::result::Result<FetchResponse, TransportError> {
        let response = self
            .fetcher
            .fetch(
                url,
                &self.config.request.headers,
                self.config.crawler.request_timeout(),
            )
            .await?;

        if !response.is_success() {
            return Err(TransportError::Status {
                url: url.to_string(),
                status: response.status,
            });
        }

        Ok(response)
    }

    /// Handles one fetched page, from block check to next-page decision
    ///
    /// Kept synchronous so the parsed document never lives across an await.
    fn process_page(
        &self,
        state: &mut CrawlState,
        url: &Url,
        response: FetchResponse,
        sink: &mut dyn RecordSink,
    ) -> Result<PageOutcome> {
        let markup = decode_body(&response.body, response.content_type.as_deref());
        let doc = PageDocument::parse(&markup, url.clone());

        state.advance_to(CrawlPhase::CheckingBlock)?;
        if let Some(marker) = self.detector.matched_marker(&doc) {
            tracing::error!("Blocked by anti-bot protection on {} ('{}')", url, marker);
            return Ok(PageOutcome::Stop(Termination::Blocked {
                url: url.to_string(),
                marker: marker.to_string(),
            }));
        }

        state.advance_to(CrawlPhase::Locating)?;
        let posts = self.locator.locate(&doc);

        if posts.is_empty() {
            tracing::warn!(
                "No posts found on {}; the page may require login or its layout changed",
                url
            );
        } else {
            state.advance_to(CrawlPhase::Extracting)?;
            let before = state.records_written();

            for (index, node) in posts.into_iter().enumerate() {
                let record = match self.extractor.try_extract(node, index, url) {
                    Ok(record) => record,
                    Err(fault) => {
                        tracing::warn!("Skipping post on page {}: {}", state.page_number(), fault);
                        state.record_fault();
                        continue;
                    }
                };

                if let Err(e) = sink.write(&record) {
                    tracing::error!("Failed to write record: {}", e);
                    return Ok(PageOutcome::Stop(Termination::Fatal {
                        url: url.to_string(),
                        cause: e.to_string(),
                    }));
                }
                state.record_written();
            }

            tracing::info!(
                "Page {}: {} posts saved ({} total)",
                state.page_number(),
                state.records_written() - before,
                state.records_written()
            );
        }

        state.advance_to(CrawlPhase::Advancing)?;
        Ok(self.next_step(state, &doc))
    }

    fn next_step(&self, state: &CrawlState, doc: &PageDocument) -> PageOutcome {
        let Some(next) = self.pagination.next_url(doc) else {
            tracing::info!("No more pages found");
            return PageOutcome::Stop(Termination::NoNextPage);
        };

        if state.has_visited(&next) {
            tracing::warn!("Next page {} was already visited; stopping", next);
            return PageOutcome::Stop(Termination::RevisitedUrl {
                url: next.to_string(),
            });
        }

        let limit = self.config.crawler.max_pages;
        if limit > 0 && state.page_number() >= limit {
            tracing::info!("Reached page limit of {}", limit);
            return PageOutcome::Stop(Termination::PageLimit { limit });
        }

        PageOutcome::Next(next)
    }
}
