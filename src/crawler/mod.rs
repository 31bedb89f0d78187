//! Crawler module for fetching and classifying pages
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with redirect counting and hard timeouts
//! - Issue classification of fetch outcomes
//! - HTML parsing and link extraction
//! - Per-host request pacing
//! - Overall crawl coordination

mod classifier;
mod coordinator;
mod fetcher;
mod parser;
mod scheduler;

pub use classifier::{classify, IssueCategory};
pub use coordinator::{run_crawl, Coordinator, CrawlReport};
pub use fetcher::{
    build_http_client, fetch_url, FetchOptions, FetchOutcome, FetchedPage, TransportError,
};
pub use parser::{extract_links, links_from_document, LinkEdge, ParsedDocument, MAX_ANCHOR_TEXT_CHARS};
pub use scheduler::HostPacer;
