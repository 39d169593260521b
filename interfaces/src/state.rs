use std::collections::HashSet;

use indexmap::IndexMap;

use crate::defs::NewsItem;
use crate::defs::PodcastItem;

/// Merge freshly fetched podcasts into a stored list. Fetched episodes whose
/// URL is not stored yet come first, followed by everything already stored.
pub fn merge_podcasts(existing: &[PodcastItem], fetched: Vec<PodcastItem>) -> Vec<PodcastItem> {
    let known: HashSet<&str> = existing.iter().map(|p| p.url.as_str()).collect();
    let mut seen = HashSet::new();
    let mut merged: Vec<PodcastItem> = fetched
        .into_iter()
        .filter(|p| !known.contains(p.url.as_str()) && seen.insert(p.url.clone()))
        .collect();
    merged.extend(existing.iter().cloned());
    merged
}

/// Flatten the per-source startup groups into one list, newest first.
/// Items with equal dates keep their group order.
pub fn flatten_startups(grouped: &IndexMap<String, Vec<NewsItem>>) -> Vec<NewsItem> {
    let mut all: Vec<NewsItem> = grouped.values().flatten().cloned().collect();
    all.sort_by(|a, b| b.date.cmp(&a.date));
    all
}
