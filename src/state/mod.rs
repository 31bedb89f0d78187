//! State module for tracking crawl progress
//!
//! This module holds everything the crawl controller mutates across requests.
//!
//! # Components
//!
//! - `Frontier`: FIFO of pending URLs plus the visited set
//! - `CrawlState`: frontier, page budget and result log of one crawl, with its `CrawlPhase`
//! - `HostState`: per-host request pacing

mod crawl_state;
mod frontier;
mod host_state;

// Re-export main types
pub use crawl_state::{CrawlPhase, CrawlState};
pub use frontier::Frontier;
pub use host_state::HostState;
