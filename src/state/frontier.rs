//! Crawl frontier: pending and visited URL sets

use std::collections::{HashSet, VecDeque};
use url::Url;

/// Pending and visited URLs of one crawl session
///
/// `pending` is served first-in first-out, which makes the crawl a
/// breadth-first traversal in discovery order. A URL is in at most one of the
/// two sets, and once visited it is never admitted again.
#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<Url>,
    pending: HashSet<Url>,
    visited: HashSet<Url>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `url` to pending unless it is already pending or visited
    ///
    /// Returns true if the URL was admitted.
    pub fn admit(&mut self, url: Url) -> bool {
        if self.visited.contains(&url) || self.pending.contains(&url) {
            return false;
        }

        self.pending.insert(url.clone());
        self.queue.push_back(url);
        true
    }

    /// Removes and returns the oldest pending URL
    pub fn pop_next(&mut self) -> Option<Url> {
        let url = self.queue.pop_front()?;
        self.pending.remove(&url);
        Some(url)
    }

    /// Records that a fetch of `url` was attempted
    ///
    /// Returns false if it had already been marked.
    pub fn mark_visited(&mut self, url: &Url) -> bool {
        if self.pending.remove(url) {
            self.queue.retain(|u| u != url);
        }
        self.visited.insert(url.clone())
    }

    pub fn is_visited(&self, url: &Url) -> bool {
        self.visited.contains(url)
    }

    pub fn is_pending(&self, url: &Url) -> bool {
        self.pending.contains(url)
    }

    /// True when nothing is left to fetch
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn pending_len(&self) -> usize {
        self.queue.len()
    }

    pub fn visited_len(&self) -> usize {
        self.visited.len()
    }

    /// Pending URLs in the order they will be popped
    pub fn pending_urls(&self) -> impl Iterator<Item = &Url> {
        self.queue.iter()
    }
}
