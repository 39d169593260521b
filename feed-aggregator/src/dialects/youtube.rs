use super::{AtomAdapter, DialectAdapter};
use crate::parser::Element;
use crate::types::RawEntry;

/// YouTube channel feeds: Atom entries carrying `yt:videoId` and a
/// `media:group` with the real description.
pub struct YouTubeAdapter;

impl DialectAdapter for YouTubeAdapter {
    fn entries<'a>(&self, root: &'a Element) -> Vec<&'a Element> {
        AtomAdapter.entries(root)
    }

    fn raw_entry(&self, entry: &Element) -> RawEntry {
        let mut raw = AtomAdapter.raw_entry(entry);
        let group_description = entry
            .child("media:group")
            .and_then(|group| group.child_text("media:description"));
        if group_description.is_some() {
            raw.description = group_description;
        }
        raw
    }

    fn feed_title(&self, root: &Element) -> Option<String> {
        AtomAdapter.feed_title(root)
    }

    fn site_url(&self, root: &Element) -> Option<String> {
        AtomAdapter.site_url(root)
    }
}
