//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the main crawl loop, which:
//! - Pops URLs from the frontier within the page budget
//! - Dispatches fetches to a bounded pool of tokio tasks
//! - Classifies and records every fetch outcome
//! - Extracts same-host links from healthy HTML pages and feeds the frontier
//! - Runs the configured page analyzers
//!
//! The coordinator task is the only owner of the `CrawlState`. Fetch tasks
//! send their results back through the `JoinSet`, so frontier access needs
//! no lock.

use crate::config::Config;
use crate::crawler::fetcher::{build_http_client, fetch_url, FetchOptions, FetchedPage};
use crate::crawler::parser::{links_from_document, ParsedDocument};
use crate::crawler::scheduler::HostPacer;
use crate::crawler::{classify, IssueCategory};
use crate::output::{CrawlRecord, CrawlSummary, ResultSink};
use crate::page::{PageAnalyzer, PageReport, ParsedPage};
use crate::state::{CrawlPhase, CrawlState};
use crate::url::{in_scope, parse_start_url, CrawlUrl};
use crate::{AuditError, UrlError};
use reqwest::Client;
use std::time::{Duration, Instant};
use tokio::task::JoinSet;

/// Number of records between two progress log lines
const PROGRESS_INTERVAL: usize = 10;

/// Everything a finished crawl hands back to the caller
#[derive(Debug)]
pub struct CrawlReport {
    /// The canonical start URL
    pub start_url: CrawlUrl,

    /// Per-URL records in the order the fetches completed
    pub sink: ResultSink,

    /// Reports of the page analyzers, one per analyzer and parsed page
    pub page_reports: Vec<PageReport>,

    /// Wall-clock duration of the crawl
    pub elapsed: Duration,
}

impl CrawlReport {
    pub fn records(&self) -> &[CrawlRecord] {
        self.sink.records()
    }

    /// Number of URLs fetched
    pub fn pages_crawled(&self) -> usize {
        self.sink.len()
    }

    pub fn summary(&self) -> CrawlSummary {
        self.sink.summary()
    }
}

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Config,
    client: Client,
    start_url: CrawlUrl,
    root_domain: String,
    analyzers: Vec<Box<dyn PageAnalyzer>>,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `start_url` - Absolute HTTP(S) URL the crawl starts from
    /// * `config` - The crawler configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(AuditError)` - The start URL is invalid or the HTTP client could
    ///   not be built; nothing has been fetched
    pub fn new(start_url: &str, config: Config) -> Result<Self, AuditError> {
        let start_url = parse_start_url(start_url)?;
        let root_domain = start_url.host().ok_or(UrlError::MissingDomain)?;
        let client = build_http_client(&config.user_agent, &config.crawler)?;

        Ok(Self {
            config,
            client,
            start_url,
            root_domain,
            analyzers: Vec::new(),
        })
    }

    /// Adds an analyzer that runs on every page the crawl parses
    pub fn with_analyzer<A>(mut self, analyzer: A) -> Self
    where
        A: PageAnalyzer + 'static,
    {
        self.analyzers.push(Box::new(analyzer));
        self
    }

    pub fn start_url(&self) -> &CrawlUrl {
        &self.start_url
    }

    /// The host every crawled URL must have
    pub fn root_domain(&self) -> &str {
        &self.root_domain
    }

    /// Runs the crawl to completion
    ///
    /// The crawl completes normally when the frontier is empty or the page
    /// budget is used up. Once the budget is reached no new fetch starts;
    /// fetches already in flight are drained and recorded.
    pub async fn run(self) -> CrawlReport {
        let crawler = &self.config.crawler;
        let budget = crawler.max_pages as usize;
        let concurrency = crawler.max_concurrent_fetches.max(1) as usize;
        let options = FetchOptions::from_config(crawler);
        let mut pacer = HostPacer::new(Duration::from_millis(crawler.politeness_delay_ms));

        let mut state = CrawlState::new(self.start_url.clone(), budget);
        let mut tasks: JoinSet<(CrawlUrl, FetchedPage)> = JoinSet::new();
        let mut page_reports = Vec::new();
        let start_time = Instant::now();

        state.transition(CrawlPhase::Running);
        tracing::info!(
            "Starting crawl of {} (budget {} pages, {} concurrent fetches)",
            self.start_url,
            budget,
            concurrency
        );

        loop {
            // Fill the worker pool
            while state.in_flight() < concurrency {
                let Some(url) = state.next_for_fetch() else {
                    break;
                };

                let wait = url
                    .host()
                    .map_or(Duration::ZERO, |host| pacer.reserve(&host));
                let client = self.client.clone();

                tracing::debug!("Dispatching {} (wait {:?})", url, wait);
                tasks.spawn(async move {
                    if !wait.is_zero() {
                        tokio::time::sleep(wait).await;
                    }
                    let page = fetch_url(&client, &url, &options).await;
                    (url, page)
                });
            }

            // Nothing in flight and nothing dispatchable: frontier or budget exhausted
            let Some(joined) = tasks.join_next().await else {
                break;
            };

            match joined {
                Ok((url, page)) => {
                    self.handle_fetch(&mut state, &mut page_reports, url, page);

                    let recorded = state.sink().len();
                    if recorded % PROGRESS_INTERVAL == 0 {
                        let elapsed = start_time.elapsed();
                        tracing::info!(
                            "Progress: {} URLs checked, {} in frontier, {:.2} URLs/sec",
                            recorded,
                            state.frontier().len(),
                            recorded as f64 / elapsed.as_secs_f64().max(f64::EPSILON)
                        );
                    }
                }
                Err(e) => {
                    tracing::error!("Fetch task failed: {}", e);
                    state.abandon_fetch();
                }
            }
        }

        state.transition(CrawlPhase::Completed);
        tracing::debug!(
            "{} requests paced to {} ({} hosts contacted)",
            pacer.request_count(&self.root_domain),
            self.root_domain,
            pacer.host_count()
        );

        let elapsed = start_time.elapsed();
        let reason = if state.budget_exhausted() {
            "page budget reached"
        } else {
            "frontier exhausted"
        };
        tracing::info!(
            "Crawl completed ({}): {} URLs checked in {:?}",
            reason,
            state.sink().len(),
            elapsed
        );

        CrawlReport {
            start_url: self.start_url,
            sink: state.into_sink(),
            page_reports,
            elapsed,
        }
    }

    /// Classifies and records one finished fetch, then follows its links
    ///
    /// Parsing happens here, synchronously: the HTML tree is not `Send` and
    /// never lives across an await point.
    fn handle_fetch(
        &self,
        state: &mut CrawlState,
        page_reports: &mut Vec<PageReport>,
        url: CrawlUrl,
        page: FetchedPage,
    ) {
        let category = classify(&page.outcome);
        log_outcome(&url, &page, category);

        if !category.is_transport_error() {
            if let Some((status_code, html)) = page.html() {
                let parsed = ParsedPage {
                    url: page.outcome.final_url().clone(),
                    status_code,
                    elapsed: page.outcome.elapsed(),
                    document: ParsedDocument::parse(html),
                };

                let added = self.enqueue_links(state, &parsed);
                tracing::debug!("{} new URLs queued from {}", added, parsed.url);

                for analyzer in &self.analyzers {
                    page_reports.push(analyzer.analyze(&parsed));
                }
            }
        }

        state.finish_fetch(CrawlRecord::new(url, page.outcome, category));
    }

    /// Pushes the unseen same-host links of a page; returns how many were new
    fn enqueue_links(&self, state: &mut CrawlState, page: &ParsedPage) -> usize {
        let mut added = 0;

        for link in links_from_document(&page.url, &page.document) {
            let Some(target) = link.resolve() else {
                continue;
            };

            if !in_scope(&target, &self.root_domain) {
                tracing::trace!("Out of scope: {}", target);
                continue;
            }

            if state.enqueue(target) {
                added += 1;
            }
        }

        added
    }
}

fn log_outcome(url: &CrawlUrl, page: &FetchedPage, category: IssueCategory) {
    let outcome = &page.outcome;
    match (outcome.status_code(), outcome.transport_error()) {
        (Some(status), _) => tracing::debug!(
            "{} -> {} in {:?} ({} redirects): {}",
            url,
            status,
            outcome.elapsed(),
            outcome.redirect_count(),
            category
        ),
        (None, Some(error)) => tracing::debug!("{} failed: {} ({})", url, error, category),
        (None, None) => tracing::warn!("{} produced neither status nor error", url),
    }
}

/// Runs a complete crawl from `start_url`
///
/// Convenience wrapper around [`Coordinator::new`] and [`Coordinator::run`].
///
/// # Example
///
/// ```no_run
/// use link_audit::{run_crawl, Config};
///
/// # async fn demo() -> Result<(), link_audit::AuditError> {
/// let report = run_crawl("https://example.com/", Config::default()).await?;
/// println!("{} URLs checked", report.pages_crawled());
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(start_url: &str, config: Config) -> Result<CrawlReport, AuditError> {
    let coordinator = Coordinator::new(start_url, config)?;
    Ok(coordinator.run().await)
}
