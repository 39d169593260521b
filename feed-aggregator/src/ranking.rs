use chrono::NaiveDate;
use tracing::debug;

use crate::types::{AggregatorConfig, NewsItem};

pub const DEFAULT_TOP_K: usize = 12;

pub const TODAY_POINTS: u32 = 5;
pub const TRUSTED_SOURCE_POINTS: u32 = 3;
pub const IMPORTANCE_POINTS: u32 = 4;

pub const TRUSTED_SOURCES: &[&str] = &["TechCrunch", "The Verge", "PitchBook", "Wired"];

pub const IMPORTANCE_KEYWORDS: &[&str] = &[
    "launch", "unveil", "acquire", "acquisition", "billion", "million", "ipo", "series a",
    "series b", "unicorn", "funding", "raise", "apple", "google", "openai", "meta", "nvidia",
    "amazon", "egypt", "saudi",
];

/// Scores the latest pool and keeps the best `top_k`.
#[derive(Debug, Clone)]
pub struct Ranker {
    trusted_sources: Vec<String>,
    importance_keywords: Vec<String>,
    top_k: usize,
}

impl Ranker {
    pub fn new(trusted_sources: Vec<String>, importance_keywords: Vec<String>, top_k: usize) -> Self {
        Self {
            trusted_sources,
            importance_keywords: importance_keywords.into_iter().map(|k| k.to_lowercase()).collect(),
            top_k,
        }
    }

    pub fn from_config(config: &AggregatorConfig) -> Self {
        Self::new(
            config.trusted_sources.clone(),
            config.importance_keywords.clone(),
            config.top_k,
        )
    }

    pub fn score(&self, item: &NewsItem, today: NaiveDate) -> u32 {
        let mut score = 0;
        if item.date == today {
            score += TODAY_POINTS;
        }
        if self.trusted_sources.iter().any(|s| *s == item.source) {
            score += TRUSTED_SOURCE_POINTS;
        }
        let title = item.title.to_lowercase();
        if self.importance_keywords.iter().any(|k| title.contains(k.as_str())) {
            score += IMPORTANCE_POINTS;
        }
        score
    }

    /// Highest score first, newer date breaking ties. The sort is stable, so
    /// items equal on both keep their pool order.
    pub fn rank(&self, pool: Vec<NewsItem>, today: NaiveDate) -> Vec<NewsItem> {
        let candidates = pool.len();
        let mut scored: Vec<(u32, NewsItem)> = pool
            .into_iter()
            .map(|item| (self.score(&item, today), item))
            .collect();

        scored.sort_by(|(score_a, a), (score_b, b)| score_b.cmp(score_a).then_with(|| b.date.cmp(&a.date)));
        scored.truncate(self.top_k);

        debug!("Ranked {} candidates, kept {}", candidates, scored.len());
        scored.into_iter().map(|(_, item)| item).collect()
    }
}

impl Default for Ranker {
    fn default() -> Self {
        Self::from_config(&AggregatorConfig::default())
    }
}
