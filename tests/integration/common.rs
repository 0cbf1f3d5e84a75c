//! Shared helpers for the integration tests

use shardcrawl::config::{
    Config, CrawlerConfig, EligibilityConfig, OutputConfig, UserAgentConfig,
};
use shardcrawl::crawler::Crawler;
use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration with short delays and plain-HTTP access
pub fn create_test_config(dir: &Path, workers: usize, seeds: Vec<String>) -> Config {
    Config {
        crawler: CrawlerConfig {
            workers,
            max_links_per_page: 20,
            idle_delay: 10,
            fetch_delay: 10,
            shingle_size: 3,
            fingerprint_capacity: 10_000,
            similarity_threshold: 0.9,
            exclusive_admission: false,
            allow_insecure_http: true,
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
            contact_email: "test@example.com".to_string(),
        },
        output: OutputConfig {
            page_dir: dir.join("pages").to_string_lossy().into_owned(),
            frontier_path: dir.join("frontier.db").to_string_lossy().into_owned(),
            log_path: dir.join("crawl.log").to_string_lossy().into_owned(),
        },
        eligibility: EligibilityConfig::default(),
        seeds,
    }
}

/// An HTML page whose visible text is `word{start}` .. `word{end}`
pub fn article(words: std::ops::Range<usize>, extra: &str) -> String {
    let text: Vec<String> = words.map(|i| format!("word{}", i)).collect();
    format!(
        "<!DOCTYPE html>\n<html><head><title>t</title></head><body><p>{}</p>{}</body></html>",
        text.join(" "),
        extra
    )
}

/// Serves `body` as HTML at `route`
pub async fn serve_html(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

/// Runs the crawler until `done` holds or the timeout expires, then stops it
///
/// Returns whether the condition was reached.
pub async fn crawl_until<F, Fut>(crawler: Arc<Crawler>, timeout: Duration, done: F) -> bool
where
    F: Fn(Arc<Crawler>) -> Fut,
    Fut: Future<Output = bool>,
{
    let shutdown = crawler.shutdown_token();
    let runner = Arc::clone(&crawler);
    let handle = tokio::spawn(async move { runner.run().await });

    let deadline = tokio::time::Instant::now() + timeout;
    let mut reached = false;
    while tokio::time::Instant::now() < deadline {
        if done(Arc::clone(&crawler)).await {
            reached = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    shutdown.cancel();
    handle
        .await
        .expect("crawler task panicked")
        .expect("crawl failed");
    reached
}
