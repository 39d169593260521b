use crate::classifier::{Classification, Topic};
use crate::types::{Category, ContentType, SourceDescriptor};

/// The output collection an entry is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    Podcast,
    Startup,
    Latest,
}

pub fn route(source: &SourceDescriptor, classification: &Classification) -> Destination {
    match source.content_type {
        ContentType::Podcast => Destination::Podcast,
        ContentType::Startup | ContentType::Investment => Destination::Startup,
        ContentType::News | ContentType::Business => {
            if classification.has_topic(Topic::Entrepreneur) {
                Destination::Startup
            } else {
                Destination::Latest
            }
        }
    }
}

pub fn category_for(source: &SourceDescriptor, destination: Destination) -> Category {
    match destination {
        Destination::Startup => Category::Startup,
        _ if source.content_type == ContentType::Business => Category::Economy,
        _ => Category::Tech,
    }
}
