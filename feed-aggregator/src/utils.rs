use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use uuid::Uuid;

static IMG_SRC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)<img[^>]+src\s*=\s*["']([^"']+)["']"#).unwrap());
// A tag must open with a letter, so "a < b" in decoded text survives.
static HTML_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<!--.*?-->|</?[a-z][^>]*>").unwrap());

const PLACEHOLDER_IMAGE_BASE: &str = "https://picsum.photos/800/400?random=";

/// Generate an item id: `{prefix}_{unix millis}_{random}`. The random part
/// keeps ids unique when many are minted in the same millisecond.
pub fn generate_id(prefix: &str) -> String {
    let random = Uuid::new_v4().simple().to_string();
    format!("{}_{}_{}", prefix, Utc::now().timestamp_millis(), &random[..12])
}

/// Placeholder image used when an entry carries no image at all.
pub fn placeholder_image() -> String {
    let key = Uuid::new_v4().as_u128() % 1000;
    format!("{}{}", PLACEHOLDER_IMAGE_BASE, key)
}

pub fn is_placeholder_image(url: &str) -> bool {
    url.starts_with(PLACEHOLDER_IMAGE_BASE)
}

/// First `<img src="...">` in an HTML fragment.
pub fn first_image(html: &str) -> Option<String> {
    IMG_SRC
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|src| !src.is_empty())
}

/// Decode HTML character references, named and numeric. Non-breaking
/// spaces become plain spaces.
pub fn decode_entities(text: &str) -> String {
    html_escape::decode_html_entities(text).replace('\u{a0}', " ")
}

/// Decode entities, then strip tags and collapse whitespace. Decoding first
/// means escaped markup is removed rather than revealed.
pub fn strip_html(html: &str) -> String {
    let decoded = decode_entities(html);
    HTML_TAG
        .replace_all(&decoded, "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Cut `text` to at most `max_chars` characters, appending "..." only when
/// something was removed.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => format!("{}...", &text[..byte_index]),
        None => text.to_string(),
    }
}
