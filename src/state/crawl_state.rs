//! Crawl-wide state owned by the controller
//!
//! One `CrawlState` exists per crawl invocation. It is created when the crawl
//! starts, mutated only by the controller, and converted into the final
//! report when the crawl completes.

use crate::output::{CrawlRecord, ResultSink};
use crate::state::Frontier;
use crate::url::CrawlUrl;
use std::fmt;

/// Lifecycle of the crawl controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlPhase {
    /// Created, nothing fetched yet
    Idle,

    /// Dispatching and processing fetches
    Running,

    /// Frontier exhausted or page budget reached
    Completed,
}

impl CrawlPhase {
    /// Returns true if the phase may move to `next`
    ///
    /// Only `Idle -> Running -> Completed` is allowed; an empty crawl may
    /// still not skip `Running`.
    pub fn can_transition_to(&self, next: CrawlPhase) -> bool {
        matches!(
            (*self, next),
            (Self::Idle, Self::Running) | (Self::Running, Self::Completed)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Frontier, page budget and result log of one crawl
#[derive(Debug)]
pub struct CrawlState {
    frontier: Frontier,
    budget: usize,
    in_flight: usize,
    sink: ResultSink,
    phase: CrawlPhase,
}

impl CrawlState {
    /// Creates the state for a crawl seeded with `start`
    pub fn new(start: CrawlUrl, budget: usize) -> Self {
        Self {
            frontier: Frontier::with_seed(start),
            budget,
            in_flight: 0,
            sink: ResultSink::new(),
            phase: CrawlPhase::Idle,
        }
    }

    pub fn phase(&self) -> CrawlPhase {
        self.phase
    }

    /// Moves to the next lifecycle phase
    ///
    /// Returns false and leaves the phase unchanged for an illegal move.
    pub fn transition(&mut self, next: CrawlPhase) -> bool {
        if !self.phase.can_transition_to(next) {
            tracing::warn!("Ignoring crawl phase change {} -> {}", self.phase, next);
            return false;
        }
        tracing::debug!("Crawl phase {} -> {}", self.phase, next);
        self.phase = next;
        true
    }

    /// Returns true once the fetched plus in-flight pages use up the budget
    pub fn budget_exhausted(&self) -> bool {
        self.sink.len() + self.in_flight >= self.budget
    }

    /// Hands out the next URL to fetch, if the budget and frontier allow it
    ///
    /// The URL is marked visited and counted as in flight until
    /// [`CrawlState::finish_fetch`] records its result.
    pub fn next_for_fetch(&mut self) -> Option<CrawlUrl> {
        if self.phase != CrawlPhase::Running || self.budget_exhausted() {
            return None;
        }

        let url = self.frontier.pop_for_fetch()?;
        self.in_flight += 1;
        Some(url)
    }

    /// Records the result of a fetch previously handed out
    pub fn finish_fetch(&mut self, record: CrawlRecord) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.sink.record(record);
    }

    /// Releases an in-flight slot whose fetch produced no result
    ///
    /// The URL stays visited and is not retried.
    pub fn abandon_fetch(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }

    /// Queues a discovered URL; false if it was already seen
    pub fn enqueue(&mut self, url: CrawlUrl) -> bool {
        self.frontier.push(url)
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn budget(&self) -> usize {
        self.budget
    }

    pub fn frontier(&self) -> &Frontier {
        &self.frontier
    }

    pub fn sink(&self) -> &ResultSink {
        &self.sink
    }

    /// Consumes the state, returning the result log
    pub fn into_sink(self) -> ResultSink {
        self.sink
    }
}
