//! URL handling module
//!
//! This module provides URL normalization, host extraction, link resolution
//! and the validation rule chain applied before a URL is fetched or queued.

mod domain;
mod normalize;
mod rules;

pub use domain::extract_domain;
pub use normalize::normalize_url;
pub use rules::{ExtensionRule, Rejection, SchemeRule, StructureRule, UrlRule, UrlValidator};

use url::Url;

/// Schemes that never lead to a crawlable page
const SKIPPED_SCHEMES: &[&str] = &["javascript:", "mailto:", "tel:", "data:"];

/// Resolves an anchor `href` against the page it was found on
///
/// Root-relative and relative references are joined to the current page,
/// absolute ones are taken as-is. The result is normalized.
///
/// Returns None if the link should be dropped:
/// - empty or fragment-only hrefs (same-page anchors)
/// - `javascript:`, `mailto:`, `tel:` and `data:` links
/// - anything that does not resolve to an HTTP(S) URL with a host
///
/// # Examples
///
/// ```
/// use shardcrawl::url::resolve_link;
/// use url::Url;
///
/// let page = Url::parse("https://example.com/blog/post").unwrap();
/// assert_eq!(
///     resolve_link("/clubhouse/", &page),
///     Some("https://example.com/clubhouse".to_string())
/// );
/// assert_eq!(resolve_link("#top", &page), None);
/// ```
pub fn resolve_link(href: &str, page_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if SKIPPED_SCHEMES
        .iter()
        .any(|scheme| lowered.starts_with(scheme))
    {
        return None;
    }

    let absolute = page_url.join(href).ok()?;
    normalize_url(absolute.as_str())
        .ok()
        .map(|url| url.to_string())
}
