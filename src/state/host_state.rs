use std::time::{Duration, Instant};

/// Tracks request pacing for one host during a crawl
///
/// The slot model lets concurrent workers reserve request times ahead:
/// each reservation takes the earliest slot at or after `now`, and pushes
/// the next free slot one politeness interval further.
#[derive(Debug, Clone)]
pub struct HostState {
    /// Number of requests reserved for this host in the current crawl
    pub request_count: u32,

    /// Earliest instant the next request may start
    pub next_slot: Option<Instant>,
}

impl HostState {
    /// Creates a new HostState with default values
    pub fn new() -> Self {
        Self {
            request_count: 0,
            next_slot: None,
        }
    }

    /// Reserves the next request slot, returning how long to wait for it
    ///
    /// # Arguments
    ///
    /// * `min_interval` - The politeness delay between requests to this host
    /// * `now` - The current time instant
    pub fn reserve(&mut self, min_interval: Duration, now: Instant) -> Duration {
        let slot = match self.next_slot {
            Some(next) if next > now => next,
            _ => now,
        };

        self.request_count += 1;
        self.next_slot = Some(slot + min_interval);

        slot - now
    }
}

impl Default for HostState {
    fn default() -> Self {
        Self::new()
    }
}
