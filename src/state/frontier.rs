//! Breadth-first crawl frontier
//!
//! The frontier is the only component with cross-request state: the FIFO of
//! discovered-but-unfetched URLs and the set of URLs already handed out for
//! fetching. It is owned by the crawl controller, which is the single
//! serialization point for every `push` and `pop_for_fetch`.

use crate::url::CrawlUrl;
use std::collections::{HashSet, VecDeque};

/// Queue of pending URLs plus the visited set
#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<CrawlUrl>,
    queued: HashSet<CrawlUrl>,
    visited: HashSet<CrawlUrl>,
}

impl Frontier {
    /// Creates an empty frontier
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a frontier seeded with one URL
    pub fn with_seed(seed: CrawlUrl) -> Self {
        let mut frontier = Self::new();
        frontier.push(seed);
        frontier
    }

    /// Appends a URL to the back of the queue
    ///
    /// Returns false (and does nothing) if the URL was already visited or is
    /// already waiting in the queue.
    pub fn push(&mut self, url: CrawlUrl) -> bool {
        if self.visited.contains(&url) || self.queued.contains(&url) {
            return false;
        }

        self.queued.insert(url.clone());
        self.queue.push_back(url);
        true
    }

    /// Pops the oldest pending URL and marks it visited in the same step
    ///
    /// Once returned here a URL can never be queued again, so it is fetched
    /// at most once per crawl.
    pub fn pop_for_fetch(&mut self) -> Option<CrawlUrl> {
        let url = self.queue.pop_front()?;
        self.queued.remove(&url);
        self.mark_visited(url.clone());
        Some(url)
    }

    /// Marks a URL as visited without going through the queue
    ///
    /// Returns false if it had already been visited. A queued copy of the
    /// URL is dropped so the queue never holds a visited URL.
    pub fn mark_visited(&mut self, url: CrawlUrl) -> bool {
        if self.queued.remove(&url) {
            self.queue.retain(|queued| queued != &url);
        }
        self.visited.insert(url)
    }

    /// Returns true if the URL has been handed out for fetching
    pub fn is_visited(&self, url: &CrawlUrl) -> bool {
        self.visited.contains(url)
    }

    /// Number of URLs waiting to be fetched
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns whether no URL is waiting
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Number of URLs marked visited so far
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }
}
