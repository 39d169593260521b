use std::fmt;

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Region {
    #[default]
    Global,
    Egypt,
    #[serde(rename = "MENA")]
    Mena,
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Region::Global => "Global",
            Region::Egypt => "Egypt",
            Region::Mena => "MENA",
        })
    }
}

/// What kind of content a source publishes. Drives routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ContentType {
    #[default]
    #[serde(alias = "Tech")]
    News,
    Startup,
    Investment,
    Business,
    Podcast,
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ContentType::News => "News",
            ContentType::Startup => "Startup",
            ContentType::Investment => "Investment",
            ContentType::Business => "Business",
            ContentType::Podcast => "Podcast",
        })
    }
}

/// One entry of the feed registry.
///
/// The registry is owned and edited outside the pipeline; a run only reads
/// the descriptors it is handed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceDescriptor {
    pub name: String,
    #[serde(alias = "rssUrl", alias = "url", default)]
    pub feed_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_url: Option<String>,
    #[serde(default)]
    pub region: Region,
    #[serde(rename = "type", default)]
    pub content_type: ContentType,
}

impl SourceDescriptor {
    pub fn new(name: &str, feed_url: &str, region: Region, content_type: ContentType) -> Self {
        Self {
            name: name.to_string(),
            feed_url: feed_url.to_string(),
            site_url: None,
            region,
            content_type,
        }
    }

    pub fn with_site_url(mut self, site_url: &str) -> Self {
        self.site_url = Some(site_url.to_string());
        self
    }

    /// Descriptors without a feed URL are skipped by every run.
    pub fn has_feed_url(&self) -> bool {
        !self.feed_url.trim().is_empty()
    }

    pub fn is_podcast(&self) -> bool {
        self.content_type == ContentType::Podcast
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Category {
    #[default]
    Tech,
    Startup,
    Economy,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Category::Tech => "Tech",
            Category::Startup => "Startup",
            Category::Economy => "Economy",
        })
    }
}

/// Single-label topical classification. `General` is the fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Sector {
    Fintech,
    #[serde(rename = "AI")]
    Ai,
    Healthtech,
    Proptech,
    #[serde(rename = "E-commerce")]
    ECommerce,
    #[serde(rename = "SaaS")]
    SaaS,
    #[serde(rename = "Deep Tech")]
    DeepTech,
    Investment,
    Technology,
    Entrepreneurship,
    Business,
    #[default]
    General,
}

impl Sector {
    pub fn label(&self) -> &'static str {
        match self {
            Sector::Fintech => "Fintech",
            Sector::Ai => "AI",
            Sector::Healthtech => "Healthtech",
            Sector::Proptech => "Proptech",
            Sector::ECommerce => "E-commerce",
            Sector::SaaS => "SaaS",
            Sector::DeepTech => "Deep Tech",
            Sector::Investment => "Investment",
            Sector::Technology => "Technology",
            Sector::Entrepreneurship => "Entrepreneurship",
            Sector::Business => "Business",
            Sector::General => "General",
        }
    }
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A news or startup article as handed to the display layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    pub id: String,
    pub title: String,
    pub description: String,
    pub url: String,
    pub source: String,
    pub date: NaiveDate,
    pub region: Region,
    pub category: Category,
    pub sector: Sector,
    pub image_url: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodcastItem {
    pub id: String,
    pub title: String,
    pub description: String,
    pub url: String,
    pub source: String,
    pub date: NaiveDate,
    pub region: Region,
    pub image_url: String,
    pub duration: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub youtube_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_url: Option<String>,
}

/// The three collections produced by one aggregation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateOutput {
    pub latest: Vec<NewsItem>,
    pub startups: IndexMap<String, Vec<NewsItem>>,
    pub podcasts: Vec<PodcastItem>,
}

// Object style note:
// Analyzers stand in for an external AI assistant. The pipeline only ever
// hands them a prompt and takes back text; summarization, translation and
// trend analysis all live on the other side of this trait.

#[allow(async_fn_in_trait)]
pub trait ContentAnalyzer {
    fn analyzer_name(&self) -> String;
    async fn analyze(&self, prompt: &str) -> anyhow::Result<String>;
}
