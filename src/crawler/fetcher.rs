//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with proper user agent strings
//! - GET requests to fetch page content
//! - Classifying failures so the worker can decide what to do next
//! - The doctype check applied to fetched bodies

use crate::config::UserAgentConfig;
use reqwest::{redirect::Policy, Client, StatusCode};
use std::time::Duration;

/// Maximum number of redirects followed for one fetch
const MAX_REDIRECTS: usize = 10;

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// The server answered 200 and the body was read
    Success {
        /// HTTP status code
        status: u16,
        /// Page body content
        body: String,
    },

    /// The server answered with anything other than 200
    HttpError {
        /// The HTTP status code
        status: u16,
    },

    /// Network error (connection refused, timeout, TLS, too many redirects)
    NetworkError {
        /// Error description
        error: String,
    },

    /// The response started but its body could not be read
    BodyError {
        /// Error description
        error: String,
    },
}

/// Formats the User-Agent header value
///
/// Format: `CrawlerName/Version (+ContactURL; ContactEmail)`
pub fn user_agent_string(config: &UserAgentConfig) -> String {
    format!(
        "{}/{} (+{}; {})",
        config.crawler_name, config.crawler_version, config.contact_url, config.contact_email
    )
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
/// * `allow_insecure_http` - Permit plain `http` requests (local test servers)
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use shardcrawl::config::UserAgentConfig;
/// use shardcrawl::crawler::build_http_client;
///
/// let config = UserAgentConfig {
///     crawler_name: "ShardCrawl".to_string(),
///     crawler_version: "1.0".to_string(),
///     contact_url: "https://example.com/about".to_string(),
///     contact_email: "admin@example.com".to_string(),
/// };
///
/// let client = build_http_client(&config, false).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    allow_insecure_http: bool,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent_string(config))
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .https_only(!allow_insecure_http)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL
///
/// Only a 200 answer counts as success. No retries are attempted: the
/// caller discards the URL on any failure.
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The URL to fetch
///
/// # Returns
///
/// A FetchResult indicating success or the type of failure
pub async fn fetch_page(client: &Client, url: &str) -> FetchResult {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            let error = if e.is_timeout() {
                "Request timeout".to_string()
            } else if e.is_connect() {
                format!("Connection failed: {}", e)
            } else if e.is_redirect() {
                "Too many redirects".to_string()
            } else {
                e.to_string()
            };
            return FetchResult::NetworkError { error };
        }
    };

    let status = response.status();
    if status != StatusCode::OK {
        return FetchResult::HttpError {
            status: status.as_u16(),
        };
    }

    match response.text().await {
        Ok(body) => FetchResult::Success {
            status: status.as_u16(),
            body,
        },
        Err(e) => FetchResult::BodyError {
            error: e.to_string(),
        },
    }
}

/// Whether a body declares itself an HTML document
///
/// Leading whitespace is ignored; the doctype is matched case-insensitively.
pub fn is_html_document(body: &str) -> bool {
    const DOCTYPE: &str = "<!doctype html";
    let trimmed = body.trim_start();
    trimmed
        .get(..DOCTYPE.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(DOCTYPE))
}
