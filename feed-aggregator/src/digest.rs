use interfaces::defs::ContentAnalyzer;
use tracing::{debug, info};

use crate::types::NewsItem;

pub const TREND_HEADLINES: usize = 10;

/// Prompt asking an analyzer for the trends behind the top headlines.
pub fn trend_prompt(latest: &[NewsItem]) -> String {
    let headlines = latest
        .iter()
        .take(TREND_HEADLINES)
        .map(|item| format!("- {} ({}, {})", item.title, item.source, item.sector))
        .collect::<Vec<String>>()
        .join("\n");

    format!(
        "Analyze these tech and startup headlines and identify the three most important trends. \
         Keep each trend to one sentence.\n\n{}",
        headlines
    )
}

/// Hand the latest collection to an external analyzer. An empty collection
/// yields an empty analysis without calling it.
pub async fn analyze_trends<A: ContentAnalyzer>(analyzer: &A, latest: &[NewsItem]) -> anyhow::Result<String> {
    if latest.is_empty() {
        debug!("No headlines to analyze");
        return Ok(String::new());
    }

    let prompt = trend_prompt(latest);
    info!(
        "Requesting trend analysis from {} over {} headlines",
        analyzer.analyzer_name(),
        latest.len().min(TREND_HEADLINES)
    );
    analyzer.analyze(&prompt).await
}
