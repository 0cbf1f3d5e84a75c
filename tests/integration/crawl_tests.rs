//! End-to-end crawls against a mock server

use crate::common::{article, crawl_until, create_test_config, serve_html};
use shardcrawl::config::EligibilityMode;
use shardcrawl::crawler::Crawler;
use shardcrawl::pages::{page_file_name, PageStore};
use shardcrawl::storage::{open_frontier, Frontier};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn read_page(page_dir: &str, url: &str) -> serde_json::Value {
    let file = Path::new(page_dir).join(page_file_name(url));
    let content = std::fs::read_to_string(&file)
        .unwrap_or_else(|e| panic!("missing page file for {}: {}", url, e));
    serde_json::from_str(&content).unwrap()
}

#[tokio::test]
async fn test_crawl_admits_pages_and_drops_duplicates() {
    let server = MockServer::start().await;
    let base = server.uri();

    let links = r#"
        <a href="/page1">Page 1</a>
        <a href="page2/">Page 2</a>
        <a href="/doc.pdf">Report</a>
        <a href="javascript:void(0)">Nothing</a>
    "#;
    serve_html(&server, "/", article(0..150, links)).await;
    serve_html(&server, "/page1", article(1000..1150, "")).await;
    serve_html(
        &server,
        "/page2",
        article(1000..1150, "").replace(" word", "\n\t  word"),
    )
    .await;

    // The pdf link must never be queued, let alone fetched
    Mock::given(method("GET"))
        .and(path("/doc.pdf"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(dir.path(), 1, vec![format!("{}/", base)]);
    let crawler = Arc::new(Crawler::new(&config, true).unwrap());

    let reached = crawl_until(Arc::clone(&crawler), Duration::from_secs(10), |c| async move {
        let stats = c.context().stats.snapshot();
        stats.admitted == 2 && stats.duplicates == 1
    })
    .await;
    assert!(reached, "crawl did not reach the expected state");

    let ctx = crawler.context();
    let index_url = format!("{}/", base);
    let page1_url = format!("{}/page1", base);
    let page2_url = format!("{}/page2", base);

    assert!(ctx.pages.is_fetched(&index_url).unwrap());
    assert!(ctx.pages.is_fetched(&page1_url).unwrap());
    assert!(!ctx.pages.is_fetched(&page2_url).unwrap());
    assert_eq!(ctx.pages.count().unwrap(), 2);
    assert_eq!(ctx.dedup.admitted_pages(), 2);

    let page = read_page(&config.output.page_dir, &page1_url);
    assert_eq!(page["url"], page1_url);
    assert_eq!(page["status"], 200);
    assert!(page["fetched_at"].as_i64().unwrap() > 0);
    assert!(page["body"].as_str().unwrap().contains("word1000"));
    let fingerprints: Vec<u64> = page["fingerprints"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f.as_u64().unwrap())
        .collect();
    assert!(fingerprints.len() > 100);
    assert!(fingerprints.windows(2).all(|w| w[0] < w[1]));

    assert_eq!(ctx.stats.snapshot().links_queued, 2);
}

#[tokio::test]
async fn test_fetched_seed_is_not_requeued() {
    let server = MockServer::start().await;
    serve_html(&server, "/", article(0..50, "")).await;

    let dir = TempDir::new().unwrap();
    let seed = format!("{}/", server.uri());
    let config = create_test_config(dir.path(), 2, vec![seed]);

    let crawler = Arc::new(Crawler::new(&config, true).unwrap());
    let reached = crawl_until(crawler, Duration::from_secs(10), |c| async move {
        c.context().stats.snapshot().admitted == 1
    })
    .await;
    assert!(reached);

    // A second session finds the seed already stored
    let restarted = Crawler::new(&config, true).unwrap();
    assert_eq!(restarted.context().frontier.pending(0).unwrap(), 0);
    assert_eq!(restarted.context().pages.count().unwrap(), 1);
}

#[tokio::test]
async fn test_queued_urls_survive_restart() {
    let dir = TempDir::new().unwrap();
    let seeds = vec![
        "http://one.test/".to_string(),
        "http://two.test/".to_string(),
    ];
    let config = create_test_config(dir.path(), 3, seeds);

    drop(Crawler::new(&config, true).unwrap());

    let frontier = open_frontier(Path::new(&config.output.frontier_path), 3, false).unwrap();
    assert_eq!(frontier.pending(0).unwrap(), 2);
    assert_eq!(
        frontier.pop_url(0).unwrap().as_deref(),
        Some("http://one.test/")
    );
}

#[tokio::test]
async fn test_ineligible_host_is_never_fetched() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/wp-admin"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(article(0..50, "")))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(dir.path(), 1, vec![format!("{}/", server.uri())]);
    config.eligibility.mode = EligibilityMode::Wordpress;

    let crawler = Arc::new(Crawler::new(&config, true).unwrap());
    let reached = crawl_until(Arc::clone(&crawler), Duration::from_secs(10), |c| async move {
        c.context().stats.snapshot().rejected == 1
    })
    .await;

    assert!(reached);
    assert_eq!(crawler.context().pages.count().unwrap(), 0);
}

#[tokio::test]
async fn test_wordpress_host_is_crawled() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/wp-admin"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;
    serve_html(&server, "/", article(0..50, "")).await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(dir.path(), 1, vec![format!("{}/", server.uri())]);
    config.eligibility.mode = EligibilityMode::Wordpress;

    let crawler = Arc::new(Crawler::new(&config, true).unwrap());
    let reached = crawl_until(crawler, Duration::from_secs(10), |c| async move {
        c.context().stats.snapshot().admitted == 1
    })
    .await;
    assert!(reached);
}
