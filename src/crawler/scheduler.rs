//! Crawl frontier
//!
//! This module handles:
//! - FIFO queue of `(url, depth)` entries, giving breadth-first order
//! - The visited set (URLs already dequeued for fetching)
//! - The enqueued set, so a URL enters the queue at most once per session

use std::collections::{HashSet, VecDeque};

/// A URL waiting to be fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    pub url: String,
    pub depth: u32,
}

impl FrontierEntry {
    pub fn new(url: impl Into<String>, depth: u32) -> Self {
        Self {
            url: url.into(),
            depth,
        }
    }
}

/// Breadth-first frontier with deduplication
///
/// Entries are consumed exactly once. A URL is recorded as enqueued when it is
/// pushed and as visited when it is popped; both sets only grow.
#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<FrontierEntry>,
    enqueued: HashSet<String>,
    visited: HashSet<String>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueues a URL at `depth` unless it was enqueued before
    ///
    /// # Returns
    ///
    /// * `true` - The URL was added
    /// * `false` - The URL was already enqueued at some point in this session
    pub fn push(&mut self, url: &str, depth: u32) -> bool {
        if !self.enqueued.insert(url.to_string()) {
            return false;
        }
        self.queue.push_back(FrontierEntry::new(url, depth));
        true
    }

    /// Enqueues seeds at depth 0, skipping duplicates
    ///
    /// Returns the number of seeds added.
    pub fn push_seeds<S: AsRef<str>>(&mut self, seeds: &[S]) -> usize {
        seeds
            .iter()
            .filter(|seed| self.push(seed.as_ref(), 0))
            .count()
    }

    /// Enqueues discovered links at `depth`, up to `limit` new ones
    ///
    /// Links already enqueued do not count towards the limit. Returns the number
    /// of links added.
    pub fn push_links(&mut self, links: &[String], depth: u32, limit: usize) -> usize {
        let mut added = 0;
        for link in links {
            if added == limit {
                break;
            }
            if self.push(link, depth) {
                added += 1;
            }
        }
        added
    }

    /// Dequeues the next entry and marks its URL visited
    ///
    /// Entries whose URL was visited already are discarded.
    pub fn pop(&mut self) -> Option<FrontierEntry> {
        while let Some(entry) = self.queue.pop_front() {
            if self.visited.insert(entry.url.clone()) {
                return Some(entry);
            }
        }
        None
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    pub fn is_enqueued(&self, url: &str) -> bool {
        self.enqueued.contains(url)
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// Number of entries still queued
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Drops every queued entry; the visited and enqueued sets are kept
    pub fn clear(&mut self) -> usize {
        let dropped = self.queue.len();
        self.queue.clear();
        dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn links(urls: &[&str]) -> Vec<String> {
        urls.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_fifo_order() {
        let mut frontier = Frontier::new();
        frontier.push("https://a.com/", 0);
        frontier.push("https://b.com/", 0);
        frontier.push("https://c.com/", 1);

        assert_eq!(frontier.pop().unwrap().url, "https://a.com/");
        assert_eq!(frontier.pop().unwrap().url, "https://b.com/");
        let last = frontier.pop().unwrap();
        assert_eq!(last, FrontierEntry::new("https://c.com/", 1));
        assert!(frontier.pop().is_none());
    }

    #[test]
    fn test_push_deduplicates() {
        let mut frontier = Frontier::new();
        assert!(frontier.push("https://a.com/", 0));
        assert!(!frontier.push("https://a.com/", 1));
        assert_eq!(frontier.len(), 1);
    }

    #[test]
    fn test_url_never_reenqueued_after_visit() {
        let mut frontier = Frontier::new();
        frontier.push("https://a.com/", 0);
        frontier.pop();
        assert!(frontier.is_visited("https://a.com/"));
        assert!(!frontier.push("https://a.com/", 2));
        assert!(frontier.is_empty());
    }

    #[test]
    fn test_push_seeds_skips_duplicates() {
        let mut frontier = Frontier::new();
        let added = frontier.push_seeds(&["https://a.com/", "https://b.com/", "https://a.com/"]);
        assert_eq!(added, 2);
        assert_eq!(frontier.len(), 2);
    }

    #[test]
    fn test_push_links_limit_counts_only_new() {
        let mut frontier = Frontier::new();
        frontier.push("https://a.com/1", 0);

        let discovered = links(&[
            "https://a.com/1",
            "https://a.com/2",
            "https://a.com/3",
            "https://a.com/4",
        ]);
        let added = frontier.push_links(&discovered, 1, 2);

        assert_eq!(added, 2);
        assert!(frontier.is_enqueued("https://a.com/3"));
        assert!(!frontier.is_enqueued("https://a.com/4"));
    }

    #[test]
    fn test_clear_keeps_history() {
        let mut frontier = Frontier::new();
        frontier.push_seeds(&["https://a.com/", "https://b.com/"]);
        assert_eq!(frontier.clear(), 2);
        assert!(frontier.is_empty());
        assert!(!frontier.push("https://a.com/", 0));
        assert_eq!(frontier.visited_count(), 0);
    }
}
