use std::time::Duration;

use serde::{Deserialize, Serialize};

pub use interfaces::defs::{
    AggregateOutput, Category, ContentType, NewsItem, PodcastItem, Region, Sector, SourceDescriptor,
};

use crate::ranking::{DEFAULT_TOP_K, IMPORTANCE_KEYWORDS, TRUSTED_SOURCES};

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout_seconds: u64,
    pub max_retries: u32,
    pub retry_delay_seconds: u64,
    pub max_feed_size_mb: usize,
    pub follow_redirects: bool,
    pub max_redirects: usize,
    /// When set, every feed is requested as `proxy_prefix + urlencode(feed_url)`.
    pub proxy_prefix: Option<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "Feed-Aggregator/1.0".to_string(),
            timeout_seconds: 20,
            max_retries: 1,
            retry_delay_seconds: 1,
            max_feed_size_mb: 10,
            follow_redirects: true,
            max_redirects: 5,
            proxy_prefix: None,
        }
    }
}

/// How entries are admitted into a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum IngestMode {
    /// Every linked entry is kept; unparsable dates fall back to today.
    #[default]
    Ranked,
    /// Entries must match a topic keyword, carry a valid date and fall
    /// inside the recency window.
    Strict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StartupPolicy {
    /// Startup entries live only in their source group.
    #[default]
    Exclusive,
    /// Startup entries also compete for the latest collection.
    DualMembership,
}

#[derive(Debug, Clone)]
pub struct AggregatorConfig {
    pub mode: IngestMode,
    pub startup_policy: StartupPolicy,
    pub top_k: usize,
    /// Upper bound on one source's fetch, retries included.
    pub source_timeout: Duration,
    /// Only consulted in strict mode.
    pub recency_window: chrono::Duration,
    pub trusted_sources: Vec<String>,
    pub importance_keywords: Vec<String>,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            mode: IngestMode::default(),
            startup_policy: StartupPolicy::default(),
            top_k: DEFAULT_TOP_K,
            source_timeout: Duration::from_secs(30),
            recency_window: chrono::Duration::hours(24),
            trusted_sources: TRUSTED_SOURCES.iter().map(|s| s.to_string()).collect(),
            importance_keywords: IMPORTANCE_KEYWORDS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl AggregatorConfig {
    pub fn strict() -> Self {
        Self {
            mode: IngestMode::Strict,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.top_k == 0 {
            return Err(AggregatorError::InvalidConfig("top_k must be at least 1".to_string()));
        }
        if self.source_timeout.is_zero() {
            return Err(AggregatorError::InvalidConfig("source_timeout must be non-zero".to_string()));
        }
        if self.mode == IngestMode::Strict && self.recency_window <= chrono::Duration::zero() {
            return Err(AggregatorError::InvalidConfig("recency_window must be positive".to_string()));
        }
        Ok(())
    }
}

/// Media references found on one entry, before any precedence is applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MediaRefs {
    pub media_content: Option<String>,
    pub media_thumbnail: Option<String>,
    pub enclosure: Option<Enclosure>,
    pub itunes_image: Option<String>,
    pub itunes_duration: Option<String>,
    pub video_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Enclosure {
    pub url: String,
    pub mime_type: Option<String>,
}

impl Enclosure {
    pub fn is_image(&self) -> bool {
        self.mime_type.as_deref().is_some_and(|t| t.starts_with("image"))
    }

    pub fn is_audio(&self) -> bool {
        self.mime_type.as_deref().is_some_and(|t| t.starts_with("audio"))
    }
}

/// One entry as read off the wire, independent of dialect.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawEntry {
    pub title: Option<String>,
    pub link: Option<String>,
    pub date: Option<String>,
    pub description: Option<String>,
    /// Full HTML body (`content:encoded` or Atom `content`), scanned for images.
    pub content_html: Option<String>,
    pub media: MediaRefs,
}

#[derive(Debug, Clone)]
pub struct ParsedFeed {
    pub dialect: crate::dialects::FeedDialect,
    pub title: Option<String>,
    pub site_url: Option<String>,
    pub entries: Vec<RawEntry>,
}

/// Where an error belongs in the failure taxonomy of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureKind {
    Fetch,
    Parse,
    Orchestration,
}

#[derive(Debug, thiserror::Error)]
pub enum AggregatorError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Timed out after {after:?} fetching {url}")]
    Timeout { url: String, after: Duration },

    #[error("Response from {url} is not XML")]
    NotXml { url: String },

    #[error("Feed size exceeds limit: {size_mb}MB")]
    FeedTooLarge { size_mb: usize },

    #[error("Feed parse error: {0}")]
    Parse(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("General error: {0}")]
    General(String),
}

impl AggregatorError {
    pub fn kind(&self) -> FailureKind {
        match self {
            AggregatorError::Http(_)
            | AggregatorError::Status { .. }
            | AggregatorError::Timeout { .. }
            | AggregatorError::NotXml { .. }
            | AggregatorError::FeedTooLarge { .. }
            | AggregatorError::InvalidUrl(_) => FailureKind::Fetch,
            AggregatorError::Parse(_) => FailureKind::Parse,
            _ => FailureKind::Orchestration,
        }
    }
}

pub type Result<T> = std::result::Result<T, AggregatorError>;
