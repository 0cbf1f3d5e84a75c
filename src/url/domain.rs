use url::Url;

/// Extracts the lowercase host of a URL
///
/// The port is not part of the result, so `https://example.com:8443/` and
/// `https://example.com/` share a host and therefore a shard.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use shardcrawl::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str()
        .filter(|h| !h.is_empty())
        .map(|h| h.to_lowercase())
}
