mod common;

use chrono::{Duration, NaiveDate};
use common::*;
use feed_aggregator::ranking::{Ranker, DEFAULT_TOP_K};

fn today() -> NaiveDate {
    run_clock().date_naive()
}

fn news(id: &str, title: &str, source: &str, date: NaiveDate) -> NewsItem {
    NewsItem {
        id: id.to_string(),
        title: title.to_string(),
        description: String::new(),
        url: format!("https://news.example.com/{}", id),
        source: source.to_string(),
        date,
        region: Region::Global,
        category: Category::Tech,
        sector: Sector::General,
        image_url: String::new(),
        tags: vec![],
    }
}

fn ids(items: &[NewsItem]) -> Vec<&str> {
    items.iter().map(|i| i.id.as_str()).collect()
}

#[test]
fn test_today_outranks_older_with_equal_contributions() {
    let ranker = Ranker::default();
    let older = news("older", "Quiet update", "Blog", today() - Duration::days(1));
    let fresh = news("fresh", "Quiet update", "Blog", today());

    assert!(ranker.score(&fresh, today()) > ranker.score(&older, today()));
    let ranked = ranker.rank(vec![older, fresh], today());
    assert_eq!(ids(&ranked), vec!["fresh", "older"]);
}

#[test]
fn test_top_k_is_bounded() {
    let ranker = Ranker::default();
    let pool: Vec<NewsItem> = (0..30)
        .map(|i| news(&format!("n{}", i), "Quiet update", "Blog", today() - Duration::days(i % 5)))
        .collect();

    let ranked = ranker.rank(pool, today());
    assert_eq!(ranked.len(), DEFAULT_TOP_K);

    let small: Vec<NewsItem> = (0..4)
        .map(|i| news(&format!("s{}", i), "Quiet update", "Blog", today()))
        .collect();
    assert_eq!(ranker.rank(small, today()).len(), 4);
    assert!(ranker.rank(Vec::new(), today()).is_empty());
}

#[test]
fn test_ties_break_by_date_then_pool_order() {
    let ranker = Ranker::default();
    let two_days = today() - Duration::days(2);
    let yesterday = today() - Duration::days(1);
    let pool = vec![
        news("a", "Quiet update", "Blog", two_days),
        news("b", "Quiet update", "Blog", yesterday),
        news("c", "Quiet update", "Blog", two_days),
        news("d", "Nvidia unveils chips", "Wired", two_days),
        news("e", "Quiet update", "Blog", yesterday),
    ];

    let ranked = ranker.rank(pool, today());
    // d scores 7; the rest score 0 and sort newest first, stable within a day.
    assert_eq!(ids(&ranked), vec!["d", "b", "e", "a", "c"]);
}

#[test]
fn test_custom_top_k_and_trust_list() {
    let config = AggregatorConfig {
        top_k: 2,
        trusted_sources: vec!["Daily Egypt".to_string()],
        ..Default::default()
    };
    let ranker = Ranker::from_config(&config);
    let pool = vec![
        news("tc", "Quiet update", "TechCrunch", today()),
        news("de", "Quiet update", "Daily Egypt", today()),
        news("old", "Quiet update", "Daily Egypt", today() - Duration::days(3)),
    ];

    let ranked = ranker.rank(pool, today());
    assert_eq!(ids(&ranked), vec!["de", "tc"]);
}
