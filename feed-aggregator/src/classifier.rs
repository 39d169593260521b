use serde::{Deserialize, Serialize};
use url::Url;

use crate::types::{Region, Sector, SourceDescriptor};

/// Keyword-driven topic labels. An entry may carry several.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Topic {
    Tech,
    #[serde(rename = "AI")]
    Ai,
    Business,
    Entrepreneur,
    Fintech,
    Investment,
}

impl Topic {
    pub const ALL: [Topic; 6] = [
        Topic::Tech,
        Topic::Ai,
        Topic::Business,
        Topic::Entrepreneur,
        Topic::Fintech,
        Topic::Investment,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Topic::Tech => "Tech",
            Topic::Ai => "AI",
            Topic::Business => "Business",
            Topic::Entrepreneur => "Entrepreneur",
            Topic::Fintech => "Fintech",
            Topic::Investment => "Investment",
        }
    }

    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Topic::Tech => &[
                "hardware", "moore's law", "robotaxi", "ar/vr", "aws", "chips", "silicon",
                "meta glasses", "waymo", "gelsinger", "apple", "nvidia", "tech", "technology",
            ],
            Topic::Ai => &[
                "ai agents", "chatgpt", "synthetic", "meta ai", "yoodli", "llm", "generative",
                "openai", "anthropic", "intelligence", "ai", "artificial intelligence",
            ],
            Topic::Business => &[
                "netflix", "deal", "market analysis", "energy storage", "esim", "warner",
                "acquisition", "merger", "revenue", "business", "stock", "economy",
            ],
            Topic::Entrepreneur => &[
                "founder", "refound", "beeple", "limitless", "startup story", "bootstrapping",
                "entrepreneur",
            ],
            Topic::Fintech => &[
                "fintech", "valuation", "series a", "series b", "seed", "secondary sale",
                "funding", "payment", "bank", "invest",
            ],
            Topic::Investment => &[
                "valuation", "capital", "venture", "equity", "spacex", "pitchbook", "investor",
                "$", "fund", "raising",
            ],
        }
    }

    pub fn matches(&self, text: &str) -> bool {
        self.keywords().iter().any(|keyword| text.contains(keyword))
    }
}

/// Sector rules in priority order; the first rule with a matching keyword wins.
pub const SECTOR_RULES: &[(Sector, &[&str])] = &[
    (Sector::Fintech, &["fintech", "bank", "payment"]),
    (Sector::Ai, &["ai ", "artificial intelligence", "llm", "openai", "chatgpt"]),
    (Sector::Healthtech, &["health", "medtech"]),
    (Sector::Proptech, &["proptech", "real estate"]),
    (Sector::ECommerce, &["e-commerce", "retail"]),
    (Sector::SaaS, &["saas", "cloud"]),
    (Sector::DeepTech, &["deep tech", "biotech"]),
    (Sector::Investment, &["invest", "fund", "venture"]),
    (Sector::Technology, &["tech", "software", "hardware"]),
    (Sector::Entrepreneurship, &["startup", "founder", "entrepreneur"]),
    (Sector::Business, &["business", "market", "stock"]),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub topics: Vec<Topic>,
    pub sector: Sector,
    pub region: Region,
}

impl Classification {
    pub fn has_topic(&self, topic: Topic) -> bool {
        self.topics.contains(&topic)
    }

    pub fn tags(&self) -> Vec<String> {
        self.topics.iter().map(|t| t.label().to_string()).collect()
    }
}

/// Topics whose keyword list hits `text`, in [`Topic::ALL`] order.
/// `text` is expected lowercased.
pub fn topics_for(text: &str) -> Vec<Topic> {
    Topic::ALL.into_iter().filter(|topic| topic.matches(text)).collect()
}

pub fn sector_for(text: &str) -> Sector {
    SECTOR_RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|keyword| text.contains(keyword)))
        .map(|(sector, _)| *sector)
        .unwrap_or(Sector::General)
}

fn host_of(url: &str) -> Option<String> {
    Url::parse(url.trim())
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_lowercase()))
}

/// Declared region of a source, overridden by what its URL or name says.
pub fn resolve_region(source: &SourceDescriptor) -> Region {
    let egyptian_host = [Some(source.feed_url.as_str()), source.site_url.as_deref()]
        .into_iter()
        .flatten()
        .filter_map(host_of)
        .any(|host| host.ends_with(".eg"));

    let name = source.name.as_str();
    if egyptian_host || ["Egypt", "Al Mal", "Elmal"].iter().any(|n| name.contains(n)) {
        Region::Egypt
    } else if ["Wamda", "MENA"].iter().any(|n| name.contains(n)) {
        Region::Mena
    } else {
        source.region
    }
}

/// Classify lowercased entry text from `source`. Pure: the same input always
/// yields the same result.
pub fn classify(text: &str, source: &SourceDescriptor) -> Classification {
    Classification {
        topics: topics_for(text),
        sector: sector_for(text),
        region: resolve_region(source),
    }
}

/// Relevance gate: true iff at least one topic keyword occurs in `text`.
pub fn is_relevant(text: &str) -> bool {
    Topic::ALL.iter().any(|topic| topic.matches(text))
}
