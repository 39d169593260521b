#![allow(dead_code)]

// Shared fixtures for the feed-aggregator integration tests
pub use feed_aggregator::types::*;
pub use feed_aggregator::{FeedAggregator, StaticFetcher};

use chrono::{DateTime, TimeZone, Utc};
use std::sync::Arc;

/// Fixed run clock so "today" is stable across test runs
pub fn run_clock() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 14, 12, 0, 0).unwrap()
}

pub const TODAY: &str = "Tue, 14 May 2024 09:00:00 GMT";
pub const YESTERDAY: &str = "Mon, 13 May 2024 09:00:00 GMT";
pub const LAST_WEEK: &str = "Tue, 07 May 2024 09:00:00 GMT";

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

pub fn source(name: &str, url: &str, region: Region, content_type: ContentType) -> SourceDescriptor {
    SourceDescriptor::new(name, url, region, content_type)
}

/// One RSS 2.0 `<item>`. The description goes in CDATA so it may hold HTML.
pub fn rss_item(title: &str, link: &str, date: Option<&str>, description: &str) -> String {
    let date = date
        .map(|d| format!("<pubDate>{}</pubDate>", d))
        .unwrap_or_default();
    format!(
        "<item><title><![CDATA[{}]]></title><link>{}</link>{}<description><![CDATA[{}]]></description></item>",
        title, link, date, description
    )
}

pub fn rss_feed(title: &str, items: &[String]) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:media="http://search.yahoo.com/mrss/" xmlns:content="http://purl.org/rss/1.0/modules/content/">
  <channel>
    <title>{}</title>
    <link>https://example.com/</link>
    {}
  </channel>
</rss>"#,
        title,
        items.join("\n    ")
    )
}

pub fn youtube_feed(channel: &str, videos: &[(&str, &str, &str)]) -> String {
    let entries = videos
        .iter()
        .map(|(id, title, published)| {
            format!(
                r#"<entry>
    <id>yt:video:{id}</id>
    <yt:videoId>{id}</yt:videoId>
    <title>{title}</title>
    <link rel="alternate" href="https://www.youtube.com/watch?v={id}"/>
    <published>{published}</published>
    <media:group>
      <media:title>{title}</media:title>
      <media:content url="https://www.youtube.com/v/{id}?version=3" type="application/x-shockwave-flash" width="640" height="390"/>
      <media:thumbnail url="https://i1.ytimg.com/vi/{id}/hqdefault.jpg" width="480" height="360"/>
      <media:description>Episode notes for {title}</media:description>
    </media:group>
  </entry>"#
            )
        })
        .collect::<Vec<_>>()
        .join("\n  ");

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns:yt="http://www.youtube.com/xml/schemas/2015" xmlns:media="http://search.yahoo.com/mrss/" xmlns="http://www.w3.org/2005/Atom">
  <title>{channel}</title>
  <link rel="alternate" href="https://www.youtube.com/channel/UC123"/>
  <yt:channelId>UC123</yt:channelId>
  {entries}
</feed>"#
    )
}

pub fn aggregator(fetcher: StaticFetcher, config: AggregatorConfig) -> FeedAggregator {
    FeedAggregator::with_fetcher(Arc::new(fetcher), config)
}
