use super::{date_of, link_of, media_refs, DialectAdapter};
use crate::parser::Element;
use crate::types::RawEntry;

/// RSS 2.0 `<rss><channel><item>` and RSS 1.0 `<rdf:RDF><item>`.
pub struct RssAdapter;

impl RssAdapter {
    fn channel<'a>(&self, root: &'a Element) -> Option<&'a Element> {
        root.child("channel")
    }
}

impl DialectAdapter for RssAdapter {
    fn entries<'a>(&self, root: &'a Element) -> Vec<&'a Element> {
        let mut items: Vec<&Element> = root.children_named("item").collect();
        if let Some(channel) = self.channel(root) {
            items.extend(channel.children_named("item"));
        }
        items
    }

    fn raw_entry(&self, entry: &Element) -> RawEntry {
        let content_html = entry.child_text("content:encoded");
        RawEntry {
            title: entry.child_text("title"),
            link: link_of(entry),
            date: date_of(entry),
            description: entry.child_text("description").or_else(|| content_html.clone()),
            content_html,
            media: media_refs(entry),
        }
    }

    fn feed_title(&self, root: &Element) -> Option<String> {
        self.channel(root).and_then(|c| c.child_text("title"))
    }

    fn site_url(&self, root: &Element) -> Option<String> {
        self.channel(root).and_then(|c| c.child_text("link"))
    }
}
