use crate::UrlError;
use url::Url;

/// Normalizes a URL so that equal pages hash to the same page file
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Require an HTTP(S) scheme and a host
/// 3. Lowercase the host (done by the parser for special schemes)
/// 4. Normalize path:
///    - Remove dot segments (. and ..) and empty segments
///    - Remove trailing slash (except for root /)
///    - Empty path becomes /
/// 5. Remove fragment (everything after #)
///
/// The scheme and the query string are kept verbatim: the crawler fetches
/// exactly what the normalized URL says.
///
/// # Examples
///
/// ```
/// use shardcrawl::url::normalize_url;
///
/// let url = normalize_url("https://EXAMPLE.COM/a/./b/../page/#top").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/a/page");
/// ```
pub fn normalize_url(url_str: &str) -> Result<Url, UrlError> {
    let mut url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => {}
        _ => return Err(UrlError::MissingDomain),
    }

    let normalized_path = normalize_path(url.path());
    url.set_path(&normalized_path);

    url.set_fragment(None);

    if url.query() == Some("") {
        url.set_query(None);
    }

    Ok(url)
}

/// Normalizes a URL path by removing dot segments and trailing slashes
fn normalize_path(path: &str) -> String {
    if path.is_empty() {
        return "/".to_string();
    }

    let mut normalized_segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => continue,
            ".." => {
                normalized_segments.pop();
            }
            _ => normalized_segments.push(segment),
        }
    }

    if normalized_segments.is_empty() {
        return "/".to_string();
    }

    format!("/{}", normalized_segments.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_scheme() {
        let result = normalize_url("http://example.com/page").unwrap();
        assert_eq!(result.as_str(), "http://example.com/page");
    }

    #[test]
    fn test_keeps_www() {
        let result = normalize_url("https://www.example.com/").unwrap();
        assert_eq!(result.as_str(), "https://www.example.com/");
    }

    #[test]
    fn test_remove_trailing_slash() {
        let result = normalize_url("https://example.com/page/").unwrap();
        assert_eq!(result.as_str(), "https://example.com/page");
    }

    #[test]
    fn test_keep_root_slash() {
        let result = normalize_url("https://example.com/").unwrap();
        assert_eq!(result.as_str(), "https://example.com/");
    }

    #[test]
    fn test_empty_path_becomes_root() {
        let result = normalize_url("https://example.com").unwrap();
        assert_eq!(result.as_str(), "https://example.com/");
    }

    #[test]
    fn test_remove_fragment() {
        let result = normalize_url("https://example.com/page#section").unwrap();
        assert_eq!(result.as_str(), "https://example.com/page");
    }

    #[test]
    fn test_keeps_query_verbatim() {
        let result = normalize_url("https://example.com/search?q=rust&page=2").unwrap();
        assert_eq!(result.as_str(), "https://example.com/search?q=rust&page=2");
    }

    #[test]
    fn test_drops_empty_query() {
        let result = normalize_url("https://example.com/page?").unwrap();
        assert_eq!(result.as_str(), "https://example.com/page");
    }

    #[test]
    fn test_normalize_path_with_dots() {
        let result = normalize_url("https://example.com/a/./b/../c").unwrap();
        assert_eq!(result.as_str(), "https://example.com/a/c");
    }

    #[test]
    fn test_multiple_slashes() {
        let result = normalize_url("https://example.com//a///b").unwrap();
        assert_eq!(result.as_str(), "https://example.com/a/b");
    }

    #[test]
    fn test_lowercase_domain() {
        let result = normalize_url("https://EXAMPLE.COM/Page").unwrap();
        assert_eq!(result.as_str(), "https://example.com/Page");
    }

    #[test]
    fn test_invalid_scheme() {
        let result = normalize_url("ftp://example.com/file");
        assert!(matches!(result, Err(UrlError::InvalidScheme(_))));
    }

    #[test]
    fn test_malformed_url() {
        let result = normalize_url("not a url");
        assert!(matches!(result, Err(UrlError::Parse(_))));
    }
}
