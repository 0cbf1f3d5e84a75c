//! HTML parser for extracting outbound links
//!
//! Links are returned as raw `href` values; resolving them against the page
//! and filtering them is done by [`crate::url::resolve_link`] and the URL
//! validator.

use scraper::{Html, Selector};
use std::sync::OnceLock;

fn anchor_selector() -> &'static Selector {
    static SELECTOR: OnceLock<Selector> = OnceLock::new();
    SELECTOR.get_or_init(|| Selector::parse("a[href]").expect("anchor selector is valid"))
}

/// Extracts up to `max_links` anchor targets from an HTML document
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">` anywhere in the document, in document order
///
/// **Exclude:**
/// - `<a href="..." download>`
///
/// The limit counts anchors, not distinct or valid targets: an anchor that
/// is later rejected still uses up its slot.
///
/// # Example
///
/// ```
/// use shardcrawl::crawler::extract_links;
///
/// let html = r#"<html><body><a href="/a">A</a><a href="/b">B</a></body></html>"#;
/// assert_eq!(extract_links(html, 1), vec!["/a".to_string()]);
/// ```
pub fn extract_links(body: &str, max_links: usize) -> Vec<String> {
    let document = Html::parse_document(body);

    document
        .select(anchor_selector())
        .filter(|element| element.value().attr("download").is_none())
        .filter_map(|element| element.value().attr("href"))
        .take(max_links)
        .map(str::to_string)
        .collect()
}
