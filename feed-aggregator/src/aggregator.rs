use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::classifier::{classify, is_relevant, resolve_region};
use crate::dedup::Deduplicator;
use crate::extractor::{extract, EntryDate, Extracted};
use crate::fetcher::Fetcher;
use crate::parser::FeedParser;
use crate::ranking::Ranker;
use crate::router::{category_for, route, Destination};
use crate::traits::FeedFetcher;
use crate::types::{
    AggregateOutput, AggregatorConfig, AggregatorError, ContentType, FailureKind, FetchConfig,
    IngestMode, NewsItem, PodcastItem, RawEntry, Result, SourceDescriptor, StartupPolicy,
};
use crate::utils::generate_id;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SourceStatus {
    Ok,
    Failed,
    /// The descriptor had no feed URL.
    Skipped,
}

#[derive(Debug, Clone, Serialize)]
pub struct SourceReport {
    pub source: String,
    pub status: SourceStatus,
    pub failure: Option<FailureKind>,
    pub error: Option<String>,
    /// Entries found in the document
    pub entries_parsed: usize,
    /// Entries that reached an output collection
    pub entries_kept: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub elapsed_ms: u64,
    pub sources: Vec<SourceReport>,
}

impl RunReport {
    pub fn failed(&self) -> impl Iterator<Item = &SourceReport> {
        self.sources.iter().filter(|s| s.status == SourceStatus::Failed)
    }

    pub fn source(&self, name: &str) -> Option<&SourceReport> {
        self.sources.iter().find(|s| s.source == name)
    }
}

#[derive(Debug)]
enum Candidate {
    News { item: NewsItem, destination: Destination },
    Podcast(PodcastItem),
}

impl Candidate {
    fn url(&self) -> &str {
        match self {
            Candidate::News { item, .. } => &item.url,
            Candidate::Podcast(podcast) => &podcast.url,
        }
    }
}

#[derive(Debug, Default)]
struct SourceOutcome {
    parsed: usize,
    candidates: Vec<Candidate>,
    error: Option<AggregatorError>,
    skipped: bool,
}

/// Drives one aggregation run: concurrent fetch and parse per source, then
/// a single merge that dedups, routes and ranks.
pub struct FeedAggregator {
    fetcher: Arc<dyn FeedFetcher>,
    parser: FeedParser,
    ranker: Ranker,
    config: AggregatorConfig,
}

impl FeedAggregator {
    pub fn new(fetch_config: FetchConfig, config: AggregatorConfig) -> Result<Self> {
        let fetcher = Fetcher::new(fetch_config)?;
        Ok(Self::with_fetcher(Arc::new(fetcher), config))
    }

    pub fn with_fetcher(fetcher: Arc<dyn FeedFetcher>, config: AggregatorConfig) -> Self {
        Self {
            fetcher,
            parser: FeedParser::new(),
            ranker: Ranker::from_config(&config),
            config,
        }
    }

    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    /// Aggregate `sources` into the latest, startup and podcast collections.
    /// Per-source failures are logged and contribute nothing; only an
    /// invalid configuration fails the call.
    pub async fn aggregate(&self, sources: &[SourceDescriptor]) -> Result<AggregateOutput> {
        let (output, _) = self.aggregate_with_report(sources).await?;
        Ok(output)
    }

    pub async fn aggregate_with_report(&self, sources: &[SourceDescriptor]) -> Result<(AggregateOutput, RunReport)> {
        self.aggregate_at(sources, Utc::now()).await
    }

    /// Same as [`aggregate_with_report`](Self::aggregate_with_report) with
    /// the run clock pinned to `now`.
    pub async fn aggregate_at(
        &self,
        sources: &[SourceDescriptor],
        now: DateTime<Utc>,
    ) -> Result<(AggregateOutput, RunReport)> {
        self.config.validate()?;
        let start_time = Instant::now();

        info!(
            "Aggregating {} sources via {} fetcher ({:?} mode)",
            sources.len(),
            self.fetcher.fetcher_name(),
            self.config.mode
        );

        // All sources settle before anything is merged.
        let outcomes = join_all(sources.iter().map(|source| self.process_source(source, now))).await;

        let (output, reports) = self.merge(sources, outcomes, now);

        let report = RunReport {
            started_at: now,
            elapsed_ms: start_time.elapsed().as_millis() as u64,
            sources: reports,
        };

        info!(
            "Aggregation complete: {} latest, {} startup groups, {} podcasts, {}/{} sources failed",
            output.latest.len(),
            output.startups.len(),
            output.podcasts.len(),
            report.failed().count(),
            sources.len()
        );

        Ok((output, report))
    }

    async fn process_source(&self, source: &SourceDescriptor, now: DateTime<Utc>) -> SourceOutcome {
        if !source.has_feed_url() {
            debug!("Skipping {}: no feed URL", source.name);
            return SourceOutcome {
                skipped: true,
                ..Default::default()
            };
        }

        match self.collect_source(source, now).await {
            Ok((parsed, candidates)) => SourceOutcome {
                parsed,
                candidates,
                ..Default::default()
            },
            Err(e) => {
                warn!("Failed to ingest {} ({:?} failure): {}", source.name, e.kind(), e);
                SourceOutcome {
                    error: Some(e),
                    ..Default::default()
                }
            }
        }
    }

    async fn collect_source(&self, source: &SourceDescriptor, now: DateTime<Utc>) -> Result<(usize, Vec<Candidate>)> {
        let content = match tokio::time::timeout(self.config.source_timeout, self.fetcher.fetch(source)).await {
            Ok(fetched) => fetched?,
            Err(_) => {
                return Err(AggregatorError::Timeout {
                    url: source.feed_url.clone(),
                    after: self.config.source_timeout,
                })
            }
        };

        let parsed = self.parser.parse_feed(&content)?;
        let candidates: Vec<Candidate> = parsed
            .entries
            .iter()
            .filter_map(|raw| self.admit_entry(raw, source, now))
            .collect();

        info!(
            "Feed {}: found {} entries, admitted {}",
            source.name,
            parsed.entries.len(),
            candidates.len()
        );
        Ok((parsed.entries.len(), candidates))
    }

    /// Apply the date policy and, in strict mode, the recency window and the
    /// relevance gate. Podcasts bypass the window and the gate.
    fn admit_entry(&self, raw: &RawEntry, source: &SourceDescriptor, now: DateTime<Utc>) -> Option<Candidate> {
        let extracted = extract(raw, source)?;
        let strict = self.config.mode == IngestMode::Strict;
        let podcast = source.is_podcast();

        let date = match extracted.date {
            EntryDate::Valid(at) => {
                if strict && !podcast && at < now - self.config.recency_window {
                    debug!("Dropping stale entry from {}: {}", source.name, extracted.link);
                    return None;
                }
                at.date_naive()
            }
            EntryDate::Invalid if strict => {
                debug!("Dropping undated entry from {}: {}", source.name, extracted.link);
                return None;
            }
            EntryDate::Invalid => now.date_naive(),
        };

        if podcast {
            return Some(Candidate::Podcast(podcast_item(extracted, source, date)));
        }

        let text = extracted.classification_text();
        if strict && !is_relevant(&text) {
            debug!("Dropping off-topic entry from {}: {}", source.name, extracted.title);
            return None;
        }

        let classification = classify(&text, source);
        let destination = route(source, &classification);

        Some(Candidate::News {
            item: NewsItem {
                id: generate_id("rss"),
                title: extracted.title,
                description: extracted.description,
                url: extracted.link,
                source: source.name.clone(),
                date,
                region: classification.region,
                category: category_for(source, destination),
                sector: classification.sector,
                image_url: extracted.image_url,
                tags: classification.tags(),
            },
            destination,
        })
    }

    fn merge(
        &self,
        sources: &[SourceDescriptor],
        outcomes: Vec<SourceOutcome>,
        now: DateTime<Utc>,
    ) -> (AggregateOutput, Vec<SourceReport>) {
        let mut dedup = Deduplicator::new();
        let mut pool: Vec<NewsItem> = Vec::new();
        let mut startups: IndexMap<String, Vec<NewsItem>> = IndexMap::new();
        let mut podcasts: Vec<PodcastItem> = Vec::new();
        let mut reports = Vec::with_capacity(sources.len());

        // Registry order, not completion order.
        for (source, outcome) in sources.iter().zip(outcomes) {
            if source.has_feed_url()
                && matches!(source.content_type, ContentType::Startup | ContentType::Investment)
            {
                startups.entry(source.name.clone()).or_default();
            }

            let mut kept = 0;
            for candidate in outcome.candidates {
                if !dedup.admit(candidate.url()) {
                    continue;
                }
                kept += 1;

                match candidate {
                    Candidate::Podcast(podcast) => podcasts.push(podcast),
                    Candidate::News {
                        item,
                        destination: Destination::Startup,
                    } => {
                        if self.config.startup_policy == StartupPolicy::DualMembership {
                            pool.push(item.clone());
                        }
                        startups.entry(source.name.clone()).or_default().push(item);
                    }
                    Candidate::News { item, .. } => pool.push(item),
                }
            }

            let status = if outcome.skipped {
                SourceStatus::Skipped
            } else if outcome.error.is_some() {
                SourceStatus::Failed
            } else {
                SourceStatus::Ok
            };

            reports.push(SourceReport {
                source: source.name.clone(),
                status,
                failure: outcome.error.as_ref().map(AggregatorError::kind),
                error: outcome.error.as_ref().map(|e| e.to_string()),
                entries_parsed: outcome.parsed,
                entries_kept: kept,
            });
        }

        let latest = self.ranker.rank(pool, now.date_naive());

        (
            AggregateOutput {
                latest,
                startups,
                podcasts,
            },
            reports,
        )
    }
}

fn podcast_item(extracted: Extracted, source: &SourceDescriptor, date: chrono::NaiveDate) -> PodcastItem {
    let channel_url = source
        .site_url
        .clone()
        .filter(|url| !url.trim().is_empty())
        .unwrap_or_else(|| source.feed_url.clone());

    PodcastItem {
        id: generate_id("pod"),
        title: extracted.title,
        description: extracted.description,
        url: extracted.link,
        source: source.name.clone(),
        date,
        region: resolve_region(source),
        image_url: extracted.podcast.thumbnail_url.unwrap_or(extracted.image_url),
        duration: extracted.podcast.duration,
        youtube_url: extracted.podcast.youtube_url,
        audio_url: extracted.podcast.audio_url,
        channel_url: Some(channel_url),
    }
}
