use std::collections::HashSet;

use tracing::debug;

/// Identity key of an entry: its link with surrounding whitespace removed.
/// Comparison is exact, so scheme, case and query strings all matter.
pub fn canonical_link(link: &str) -> String {
    link.trim().to_string()
}

/// Run-scoped set of links already admitted. First seen wins.
#[derive(Debug, Default)]
pub struct Deduplicator {
    seen: HashSet<String>,
}

impl Deduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true the first time a canonical link is offered.
    pub fn admit(&mut self, link: &str) -> bool {
        let key = canonical_link(link);
        if self.seen.contains(&key) {
            debug!("Skipping duplicate entry with URL: {}", key);
            return false;
        }
        self.seen.insert(key);
        true
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_seen_wins() {
        let mut dedup = Deduplicator::new();
        assert!(dedup.admit("https://a.example/story"));
        assert!(!dedup.admit("  https://a.example/story\n"));
        assert!(dedup.admit("https://a.example/story?ref=rss"));
        assert_eq!(dedup.len(), 2);
    }
}
