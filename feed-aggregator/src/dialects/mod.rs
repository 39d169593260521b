//! Per-dialect adapters that map a parsed document onto [`RawEntry`]s.

pub mod atom;
pub mod rss;
pub mod youtube;

use crate::parser::Element;
use crate::types::{AggregatorError, Enclosure, MediaRefs, RawEntry, Result};

pub use atom::AtomAdapter;
pub use rss::RssAdapter;
pub use youtube::YouTubeAdapter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedDialect {
    /// RSS 2.0, and RSS 1.0 (RDF) which shares its item shape
    Rss,
    Atom,
    /// Atom with the YouTube extension namespace
    YouTube,
}

impl FeedDialect {
    pub fn detect(root: &Element) -> Result<Self> {
        match root.name.as_str() {
            "rss" | "rdf:RDF" => Ok(FeedDialect::Rss),
            "feed" => {
                let youtube = root.child("yt:channelId").is_some()
                    || root
                        .children_named("entry")
                        .any(|entry| entry.child("yt:videoId").is_some());
                Ok(if youtube { FeedDialect::YouTube } else { FeedDialect::Atom })
            }
            other => Err(AggregatorError::Parse(format!("unrecognized feed root <{}>", other))),
        }
    }

    pub fn adapter(&self) -> &'static dyn DialectAdapter {
        match self {
            FeedDialect::Rss => &RssAdapter,
            FeedDialect::Atom => &AtomAdapter,
            FeedDialect::YouTube => &YouTubeAdapter,
        }
    }
}

pub trait DialectAdapter: Send + Sync {
    /// Entry elements in document order
    fn entries<'a>(&self, root: &'a Element) -> Vec<&'a Element>;

    fn raw_entry(&self, entry: &Element) -> RawEntry;

    fn feed_title(&self, root: &Element) -> Option<String>;

    /// The publisher's homepage, when the feed names one
    fn site_url(&self, root: &Element) -> Option<String>;
}

/// Text of `<link>`, else the `href` of an alternate `<link>`, else any `href`.
pub fn link_of(entry: &Element) -> Option<String> {
    if let Some(text) = entry.child_text("link") {
        return Some(text);
    }

    let hrefs = || {
        entry
            .children_named("link")
            .filter_map(|link| link.attr("href").map(|href| (link.attr("rel"), href.trim())))
            .filter(|(_, href)| !href.is_empty())
    };

    hrefs()
        .find(|(rel, _)| matches!(rel, None | Some("alternate")))
        .or_else(|| hrefs().find(|(rel, _)| *rel != Some("self") && *rel != Some("enclosure")))
        .map(|(_, href)| href.to_string())
}

pub fn date_of(entry: &Element) -> Option<String> {
    ["pubDate", "published", "dc:date", "updated"]
        .iter()
        .find_map(|name| entry.child_text(name))
}

fn is_playable(media: &Element) -> bool {
    let medium = media.attr("medium").unwrap_or_default();
    let mime = media.attr("type").unwrap_or_default();
    matches!(medium, "video" | "audio")
        || mime.starts_with("video")
        || mime.starts_with("audio")
        || mime.starts_with("application")
}

fn media_scopes(entry: &Element) -> impl Iterator<Item = &Element> {
    std::iter::once(entry).chain(entry.children_named("media:group"))
}

pub fn media_refs(entry: &Element) -> MediaRefs {
    let media_content = media_scopes(entry)
        .flat_map(|scope| scope.children_named("media:content"))
        .filter(|media| !is_playable(media))
        .find_map(|media| media.attr("url"))
        .map(str::to_string);

    let media_thumbnail = media_scopes(entry)
        .flat_map(|scope| scope.children_named("media:thumbnail"))
        .find_map(|thumb| thumb.attr("url"))
        .map(str::to_string);

    let enclosure = entry
        .children_named("enclosure")
        .find_map(|enc| {
            enc.attr("url").map(|url| Enclosure {
                url: url.trim().to_string(),
                mime_type: enc.attr("type").map(str::to_string),
            })
        })
        .or_else(|| {
            entry
                .children_named("link")
                .filter(|link| link.attr("rel") == Some("enclosure"))
                .find_map(|link| {
                    link.attr("href").map(|url| Enclosure {
                        url: url.trim().to_string(),
                        mime_type: link.attr("type").map(str::to_string),
                    })
                })
        });

    let itunes_image = entry.child("itunes:image").and_then(|image| {
        image
            .attr("href")
            .map(str::to_string)
            .or_else(|| entry.child_text("itunes:image"))
    });

    MediaRefs {
        media_content,
        media_thumbnail,
        enclosure,
        itunes_image,
        itunes_duration: entry.child_text("itunes:duration"),
        video_id: entry.child_text("yt:videoId"),
    }
}

pub(crate) fn non_empty(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
