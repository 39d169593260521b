use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use tracing::debug;

use crate::types::{RawEntry, SourceDescriptor};
use crate::utils::{decode_entities, first_image, placeholder_image, strip_html, truncate_chars};

pub const DESCRIPTION_LIMIT: usize = 200;
pub const UNKNOWN_DURATION: &str = "N/A";

const YOUTUBE_WATCH_BASE: &str = "https://www.youtube.com/watch?v=";
const YOUTUBE_THUMBNAIL_HOST: &str = "https://img.youtube.com";

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%d %b %Y %H:%M:%S",
    "%a, %d %b %Y %H:%M:%S",
    "%a, %d %b %Y %H:%M",
];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%B %d, %Y", "%b %d, %Y", "%d %B %Y", "%d %b %Y"];

/// Publish date of an entry. `Invalid` covers both a missing and an
/// unparsable date; the caller picks the fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryDate {
    Valid(DateTime<Utc>),
    Invalid,
}

impl EntryDate {
    pub fn is_valid(&self) -> bool {
        matches!(self, EntryDate::Valid(_))
    }

    pub fn calendar_date(&self) -> Option<NaiveDate> {
        match self {
            EntryDate::Valid(at) => Some(at.date_naive()),
            EntryDate::Invalid => None,
        }
    }
}

/// Permissive date parsing: RFC 2822, RFC 3339, then a list of common
/// zone-less layouts read as UTC.
pub fn parse_date(raw: &str) -> EntryDate {
    let raw = raw.trim();
    if raw.is_empty() {
        return EntryDate::Invalid;
    }

    if let Ok(at) = DateTime::parse_from_rfc2822(raw) {
        return EntryDate::Valid(at.with_timezone(&Utc));
    }
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return EntryDate::Valid(at.with_timezone(&Utc));
    }

    // Trailing zone names chrono cannot read, e.g. "... 10:00:00 GMT+2".
    let zoneless = raw
        .rsplit_once(' ')
        .filter(|(_, zone)| zone.chars().all(|c| c.is_ascii_alphabetic() || "+-:0123456789".contains(c)))
        .filter(|(_, zone)| zone.chars().any(|c| c.is_ascii_alphabetic()))
        .map(|(head, _)| head);

    for candidate in std::iter::once(raw).chain(zoneless) {
        for format in DATETIME_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(candidate, format) {
                return EntryDate::Valid(Utc.from_utc_datetime(&naive));
            }
        }
        for format in DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(candidate, format) {
                if let Some(naive) = date.and_hms_opt(0, 0, 0) {
                    return EntryDate::Valid(Utc.from_utc_datetime(&naive));
                }
            }
        }
    }

    EntryDate::Invalid
}

/// Strip CDATA markers that survived as literal text, decode entities and
/// collapse whitespace.
pub fn clean_title(raw: &str) -> String {
    let without_cdata = raw.replace("<![CDATA[", "").replace("]]>", "");
    decode_entities(&without_cdata)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Tag-stripped description, cut to [`DESCRIPTION_LIMIT`] characters.
pub fn clean_description(raw: &str) -> String {
    truncate_chars(&strip_html(raw), DESCRIPTION_LIMIT)
}

pub fn youtube_watch_url(video_id: &str) -> String {
    format!("{}{}", YOUTUBE_WATCH_BASE, video_id)
}

pub fn youtube_thumbnail_url(video_id: &str) -> String {
    format!("{}/vi/{}/mqdefault.jpg", YOUTUBE_THUMBNAIL_HOST, video_id)
}

#[derive(Debug, Clone, PartialEq)]
pub struct PodcastFields {
    pub youtube_url: Option<String>,
    pub audio_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub duration: String,
}

/// One entry with every field normalized.
#[derive(Debug, Clone, PartialEq)]
pub struct Extracted {
    pub title: String,
    pub link: String,
    pub date: EntryDate,
    pub description: String,
    /// Full tag-stripped description, before truncation.
    pub plain_text: String,
    pub image_url: String,
    pub podcast: PodcastFields,
}

impl Extracted {
    /// Lowercased title and description, the classifier's input.
    pub fn classification_text(&self) -> String {
        format!("{} {}", self.title, self.plain_text).to_lowercase()
    }
}

fn pick_image(raw: &RawEntry) -> String {
    let media = &raw.media;
    media
        .media_content
        .clone()
        .or_else(|| media.media_thumbnail.clone())
        .or_else(|| {
            media
                .enclosure
                .as_ref()
                .filter(|enc| enc.is_image())
                .map(|enc| enc.url.clone())
        })
        .or_else(|| raw.description.as_deref().and_then(first_image))
        .or_else(|| raw.content_html.as_deref().and_then(first_image))
        .or_else(|| media.itunes_image.clone())
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty())
        .unwrap_or_else(placeholder_image)
}

fn podcast_fields(raw: &RawEntry) -> PodcastFields {
    let video_id = raw
        .media
        .video_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty());

    match video_id {
        Some(id) => PodcastFields {
            youtube_url: Some(youtube_watch_url(id)),
            audio_url: None,
            thumbnail_url: Some(youtube_thumbnail_url(id)),
            duration: raw
                .media
                .itunes_duration
                .clone()
                .unwrap_or_else(|| UNKNOWN_DURATION.to_string()),
        },
        None => PodcastFields {
            youtube_url: None,
            audio_url: raw
                .media
                .enclosure
                .as_ref()
                .filter(|enc| enc.is_audio())
                .map(|enc| enc.url.clone()),
            thumbnail_url: None,
            duration: raw
                .media
                .itunes_duration
                .clone()
                .unwrap_or_else(|| UNKNOWN_DURATION.to_string()),
        },
    }
}

/// Normalize one raw entry. Returns `None` for entries without any link,
/// since identity and dedup depend on it.
pub fn extract(raw: &RawEntry, source: &SourceDescriptor) -> Option<Extracted> {
    let podcast = podcast_fields(raw);

    let link = raw
        .link
        .as_deref()
        .map(str::trim)
        .filter(|link| !link.is_empty())
        .map(str::to_string)
        .or_else(|| podcast.youtube_url.clone());

    let Some(link) = link else {
        debug!(
            "Dropping entry without link from {}: {:?}",
            source.name,
            raw.title.as_deref().unwrap_or("")
        );
        return None;
    };

    let title = raw
        .title
        .as_deref()
        .map(clean_title)
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| "Untitled".to_string());

    let plain_text = raw.description.as_deref().map(strip_html).unwrap_or_default();

    Some(Extracted {
        title,
        link,
        date: raw.date.as_deref().map(parse_date).unwrap_or(EntryDate::Invalid),
        description: truncate_chars(&plain_text, DESCRIPTION_LIMIT),
        plain_text,
        image_url: pick_image(raw),
        podcast,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Enclosure, MediaRefs};
    use crate::utils::is_placeholder_image;
    use chrono::{Datelike, Timelike};

    fn source() -> SourceDescriptor {
        SourceDescriptor::new(
            "Test",
            "https://feeds.example.com/rss.xml",
            interfaces::defs::Region::Global,
            interfaces::defs::ContentType::News,
        )
    }

    #[test]
    fn parses_common_date_layouts() {
        let rfc2822 = parse_date("Tue, 14 May 2024 09:30:00 GMT");
        assert_eq!(rfc2822.calendar_date(), NaiveDate::from_ymd_opt(2024, 5, 14));

        match parse_date("2024-05-14T23:30:00-02:00") {
            EntryDate::Valid(at) => {
                assert_eq!(at.day(), 15);
                assert_eq!(at.hour(), 1);
            }
            EntryDate::Invalid => panic!("rfc3339 should parse"),
        }

        assert!(parse_date("2024-05-14").is_valid());
        assert!(parse_date("May 14, 2024").is_valid());
        assert!(parse_date("2024-05-14 08:00:00 UTC").is_valid());
        assert_eq!(parse_date("yesterday-ish"), EntryDate::Invalid);
        assert_eq!(parse_date("   "), EntryDate::Invalid);
    }

    #[test]
    fn cleans_cdata_titles() {
        assert_eq!(clean_title("  <![CDATA[ Big   news ]]>  "), "Big news");
    }

    #[test]
    fn image_precedence() {
        let mut raw = RawEntry {
            link: Some("https://x.example/a".to_string()),
            description: Some(r#"<img src="https://x.example/inline.jpg">"#.to_string()),
            media: MediaRefs {
                enclosure: Some(Enclosure {
                    url: "https://x.example/enc.jpg".to_string(),
                    mime_type: Some("image/jpeg".to_string()),
                }),
                itunes_image: Some("https://x.example/itunes.jpg".to_string()),
                media_thumbnail: Some("https://x.example/thumb.jpg".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(extract(&raw, &source()).unwrap().image_url, "https://x.example/thumb.jpg");

        raw.media.media_thumbnail = None;
        assert_eq!(extract(&raw, &source()).unwrap().image_url, "https://x.example/enc.jpg");

        raw.media.enclosure = None;
        assert_eq!(extract(&raw, &source()).unwrap().image_url, "https://x.example/inline.jpg");

        raw.description = Some("plain".to_string());
        assert_eq!(extract(&raw, &source()).unwrap().image_url, "https://x.example/itunes.jpg");

        raw.media.itunes_image = None;
        assert!(is_placeholder_image(&extract(&raw, &source()).unwrap().image_url));
    }

    #[test]
    fn entry_without_link_is_dropped() {
        let raw = RawEntry {
            title: Some("orphan".to_string()),
            ..Default::default()
        };
        assert!(extract(&raw, &source()).is_none());
    }

    #[test]
    fn video_id_implies_watch_and_thumbnail_urls() {
        let raw = RawEntry {
            media: MediaRefs {
                video_id: Some("abc123".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let extracted = extract(&raw, &source()).unwrap();
        assert_eq!(extracted.link, "https://www.youtube.com/watch?v=abc123");
        assert_eq!(
            extracted.podcast.thumbnail_url.as_deref(),
            Some("https://img.youtube.com/vi/abc123/mqdefault.jpg")
        );
        assert_eq!(extracted.podcast.duration, UNKNOWN_DURATION);
    }
}
