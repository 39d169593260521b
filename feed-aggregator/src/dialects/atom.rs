use super::{date_of, link_of, media_refs, non_empty, DialectAdapter};
use crate::parser::Element;
use crate::types::RawEntry;

pub struct AtomAdapter;

impl AtomAdapter {
    /// Body HTML of an entry. Escaped HTML arrives as text; inline XHTML is
    /// serialized back so its markup, images included, survives.
    pub(crate) fn content_of(entry: &Element) -> Option<String> {
        entry.child("content").and_then(|c| match c.attr("type") {
            Some("xhtml") => non_empty(&c.inner_html()),
            _ => non_empty(&c.deep_text()),
        })
    }
}

impl DialectAdapter for AtomAdapter {
    fn entries<'a>(&self, root: &'a Element) -> Vec<&'a Element> {
        root.children_named("entry").collect()
    }

    fn raw_entry(&self, entry: &Element) -> RawEntry {
        let content_html = Self::content_of(entry);
        RawEntry {
            title: entry.child("title").and_then(|t| non_empty(&t.deep_text())),
            link: link_of(entry),
            date: date_of(entry),
            description: entry
                .child("summary")
                .and_then(|s| non_empty(&s.deep_text()))
                .or_else(|| content_html.clone()),
            content_html,
            media: media_refs(entry),
        }
    }

    fn feed_title(&self, root: &Element) -> Option<String> {
        root.child_text("title")
    }

    fn site_url(&self, root: &Element) -> Option<String> {
        link_of(root)
    }
}
