use std::path::Path;

use tracing::info;

use crate::types::{ContentType, Region, Result, SourceDescriptor};

const BUILTIN_FEEDS: &[(&str, &str, Region, ContentType)] = &[
    ("TechCrunch", "https://rss.app/feeds/QuECLd94BZYymuXm.xml", Region::Global, ContentType::News),
    ("The Verge", "https://rss.app/feeds/kbQFmIIkxmghARwP.xml", Region::Global, ContentType::News),
    ("Wired", "https://rss.app/feeds/ryhuzL1yWfePPf8a.xml", Region::Global, ContentType::News),
    ("PitchBook", "https://rss.app/feeds/tveGkbeoNHNBi5Nl.xml", Region::Global, ContentType::Investment),
    ("Crunchbase", "https://rss.app/feeds/3GNKIqni3yaWtZ2g.xml", Region::Global, ContentType::Startup),
    ("VC LinkedIn", "https://rss.app/feeds/Lx2DptjiB72xD02R.xml", Region::Global, ContentType::Investment),
    ("MENAbytes", "https://rss.app/feeds/u2NLarkFLra75E5Q.xml", Region::Mena, ContentType::Startup),
    ("Daily Egypt", "https://rss.app/feeds/M8240CPa4y6GPq1A.xml", Region::Egypt, ContentType::Business),
    ("Al Mal News", "https://rss.app/feeds/HIhpZO6fuME1qzme.xml", Region::Egypt, ContentType::Business),
    ("Wamda", "https://rss.app/feeds/tkwEU2EqOIvEnUz7.xml", Region::Mena, ContentType::Startup),
];

/// An ordered list of sources. The registry is owned by the caller and
/// handed to each run; runs never mutate it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceRegistry {
    sources: Vec<SourceDescriptor>,
}

impl SourceRegistry {
    pub fn new(sources: Vec<SourceDescriptor>) -> Self {
        Self { sources }
    }

    pub fn builtin() -> Self {
        Self::new(
            BUILTIN_FEEDS
                .iter()
                .map(|(name, url, region, content_type)| SourceDescriptor::new(name, url, *region, *content_type))
                .collect(),
        )
    }

    /// Parse a JSON array of source descriptors.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let sources: Vec<SourceDescriptor> = serde_json::from_str(json)?;
        Ok(Self::new(sources))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let registry = Self::from_json_str(&json)?;
        info!("Loaded {} sources from {}", registry.len(), path.display());
        Ok(registry)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.sources)?)
    }

    /// Add a source, replacing any existing one with the same name in place.
    /// Returns true if the name was new.
    pub fn add(&mut self, source: SourceDescriptor) -> bool {
        match self.sources.iter_mut().find(|s| s.name == source.name) {
            Some(existing) => {
                *existing = source;
                false
            }
            None => {
                self.sources.push(source);
                true
            }
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<SourceDescriptor> {
        let index = self.sources.iter().position(|s| s.name == name)?;
        Some(self.sources.remove(index))
    }

    pub fn sources(&self) -> &[SourceDescriptor] {
        &self.sources
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}
