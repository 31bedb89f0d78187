//! Per-host request pacing
//!
//! This module handles:
//! - Per-host minimum spacing between requests (the politeness delay)
//! - Per-host request counting
//!
//! The pacer never sleeps itself. It hands out the wait a fetch task must
//! observe before sending its request, so the controller stays free to keep
//! dispatching fetches to other hosts.

use crate::state::HostState;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Minimum-interval gate keyed by host
#[derive(Debug)]
pub struct HostPacer {
    /// Per-host state tracking
    hosts: HashMap<String, HostState>,

    /// Minimum spacing between two requests to the same host
    min_interval: Duration,
}

impl HostPacer {
    /// Creates a new pacer
    ///
    /// # Arguments
    ///
    /// * `min_interval` - The politeness delay; zero disables pacing
    pub fn new(min_interval: Duration) -> Self {
        Self {
            hosts: HashMap::new(),
            min_interval,
        }
    }

    /// Reserves the next request slot for `host`
    ///
    /// # Returns
    ///
    /// How long the caller must wait before sending the request. The first
    /// request to a host never waits.
    pub fn reserve(&mut self, host: &str) -> Duration {
        self.reserve_at(host, Instant::now())
    }

    fn reserve_at(&mut self, host: &str, now: Instant) -> Duration {
        let wait = self
            .hosts
            .entry(host.to_lowercase())
            .or_default()
            .reserve(self.min_interval, now);

        if !wait.is_zero() {
            tracing::trace!("Pacing {} by {:?}", host, wait);
        }
        wait
    }

    /// Number of requests reserved for `host` so far
    pub fn request_count(&self, host: &str) -> u32 {
        self.hosts
            .get(&host.to_lowercase())
            .map_or(0, |state| state.request_count)
    }

    /// Number of distinct hosts seen
    pub fn host_count(&self) -> usize {
        self.hosts.len()
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }
}
