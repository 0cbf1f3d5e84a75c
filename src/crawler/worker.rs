//! Per-shard crawl worker
//!
//! Each worker owns one shard of the frontier and drives every URL it pops
//! through the same sequence:
//!
//! 1. Poll the shard; sleep the idle delay when it is empty
//! 2. Normalize and validate the URL, then ask the eligibility predicate
//! 3. Skip URLs whose page is already stored
//! 4. Fetch, read the body, require an HTML doctype
//! 5. Fingerprint the page and check it against the global index
//! 6. Admit and persist the page, then queue its outbound links
//! 7. Sleep the fetch delay
//!
//! Rejected and already-fetched URLs go straight back to polling. Every
//! other outcome is followed by the fetch delay, which together with the
//! host-to-shard routing is the crawler's politeness mechanism.
//!
//! Frontier and page store errors are returned from [`Worker::step`] and end
//! the worker; network failures only discard the URL.

use crate::config::CrawlerConfig;
use crate::crawler::fetcher::{fetch_page, is_html_document, FetchResult};
use crate::crawler::parser::extract_links;
use crate::crawler::router::shard_for_url;
use crate::crawler::stats::CrawlStats;
use crate::dedup::{Admission, DedupCoordinator};
use crate::eligibility::HostEligibility;
use crate::fingerprint::generate_fingerprints;
use crate::pages::{PageStore, StoredPage};
use crate::storage::Frontier;
use crate::url::{resolve_link, Rejection, UrlValidator};
use chrono::Utc;
use reqwest::Client;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use url::Url;

/// Log the crawl totals every this many admitted pages
const STATS_INTERVAL: u64 = 25;

/// Tuning values read by every worker
#[derive(Debug, Clone)]
pub struct WorkerSettings {
    pub max_links_per_page: usize,
    pub idle_delay: Duration,
    pub fetch_delay: Duration,
    pub shingle_size: usize,
    pub fingerprint_capacity: usize,
}

impl WorkerSettings {
    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self {
            max_links_per_page: config.max_links_per_page,
            idle_delay: Duration::from_millis(config.idle_delay),
            fetch_delay: Duration::from_millis(config.fetch_delay),
            shingle_size: config.shingle_size,
            fingerprint_capacity: config.fingerprint_capacity,
        }
    }
}

/// Everything the workers share
pub struct CrawlContext {
    pub frontier: Arc<dyn Frontier>,
    pub pages: Arc<dyn PageStore>,
    pub dedup: DedupCoordinator,
    pub eligibility: Arc<dyn HostEligibility>,
    pub validator: UrlValidator,
    pub client: Client,
    pub stats: CrawlStats,
    pub settings: WorkerSettings,
}

/// What one [`Worker::step`] did with the URL it popped
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The shard was empty
    Idle,
    /// The URL failed validation or the host is not eligible
    Rejected { url: String, reason: Rejection },
    /// A page for the URL is already stored
    AlreadyFetched { url: String },
    /// Fetch, body read or doctype check failed
    FetchFailed { url: String, reason: String },
    /// The page is a near-duplicate of an admitted page
    Duplicate {
        url: String,
        original: String,
        similarity: f64,
    },
    /// The page was admitted and persisted
    Admitted { url: String, links_queued: usize },
}

impl Outcome {
    /// How long the worker waits before polling again
    pub fn delay(&self, settings: &WorkerSettings) -> Option<Duration> {
        match self {
            Outcome::Idle => Some(settings.idle_delay),
            Outcome::Rejected { .. } | Outcome::AlreadyFetched { .. } => None,
            Outcome::FetchFailed { .. } | Outcome::Duplicate { .. } | Outcome::Admitted { .. } => {
                Some(settings.fetch_delay)
            }
        }
    }
}

/// Drains one shard of the frontier
pub struct Worker {
    shard: usize,
    ctx: Arc<CrawlContext>,
    cancel: CancellationToken,
}

impl Worker {
    pub fn new(shard: usize, ctx: Arc<CrawlContext>, cancel: CancellationToken) -> Self {
        Self { shard, ctx, cancel }
    }

    pub fn shard(&self) -> usize {
        self.shard
    }

    /// Runs until the cancellation token fires or a storage error occurs
    ///
    /// Cancellation is observed between steps and during the delays. A step
    /// that has popped a URL always runs to completion, so the URL is either
    /// stored or deliberately discarded before the worker stops.
    pub async fn run(self) -> crate::Result<()> {
        info!("Worker {} started", self.shard);

        while !self.cancel.is_cancelled() {
            let outcome = self.step().await?;

            if let Some(delay) = outcome.delay(&self.ctx.settings) {
                tokio::select! {
                    biased;
                    _ = self.cancel.cancelled() => break,
                    _ = tokio::time::sleep(delay) => {}
                }
            }
        }

        info!("Worker {} stopped", self.shard);
        Ok(())
    }

    /// Processes at most one URL from the shard
    pub async fn step(&self) -> crate::Result<Outcome> {
        let ctx = &self.ctx;

        let Some(raw) = ctx.frontier.pop_url(self.shard)? else {
            return Ok(Outcome::Idle);
        };

        let url = match ctx.validator.validate_str(&raw) {
            Ok(url) => url,
            Err(reason) => return Ok(self.reject(raw, reason)),
        };
        let url_str = url.to_string();

        let host = url.host_str().unwrap_or_default();
        if !ctx.eligibility.is_eligible(host, url.port()).await {
            return Ok(self.reject(url_str, Rejection::Ineligible));
        }

        if ctx.pages.is_fetched(&url_str)? {
            debug!("Already fetched: {}", url_str);
            return Ok(Outcome::AlreadyFetched { url: url_str });
        }

        let (status, body) = match fetch_page(&ctx.client, &url_str).await {
            FetchResult::Success { status, body } => (status, body),
            FetchResult::HttpError { status } => {
                info!("[{}] {} {}", self.shard, status, url_str);
                return Ok(self.fail(url_str, format!("HTTP {}", status)));
            }
            FetchResult::NetworkError { error } => {
                warn!("[{}] Failed to fetch {}: {}", self.shard, url_str, error);
                return Ok(self.fail(url_str, error));
            }
            FetchResult::BodyError { error } => {
                warn!("[{}] Failed to read body of {}: {}", self.shard, url_str, error);
                return Ok(self.fail(url_str, error));
            }
        };

        info!("[{}] {} {}", self.shard, status, url_str);
        ctx.stats.record_fetched();

        if !is_html_document(&body) {
            debug!("Not an HTML document: {}", url_str);
            return Ok(self.fail(url_str, "missing HTML doctype".to_string()));
        }

        let fingerprints = generate_fingerprints(
            &body,
            ctx.settings.shingle_size,
            ctx.settings.fingerprint_capacity,
        );
        let sorted = fingerprints.to_sorted_vec();

        if let Admission::Duplicate(duplicate) = ctx.dedup.check_and_admit(&url_str, fingerprints)
        {
            info!(
                "Near-duplicate: {} matches {} (similarity {:.3})",
                url_str, duplicate.original.url, duplicate.similarity
            );
            ctx.stats.record_duplicate();
            return Ok(Outcome::Duplicate {
                url: url_str,
                original: duplicate.original.url.clone(),
                similarity: duplicate.similarity,
            });
        }

        let page = StoredPage {
            url: url_str,
            fetched_at: Utc::now().timestamp(),
            status,
            body,
            fingerprints: sorted,
        };
        if !ctx.pages.persist(&page)? {
            debug!("Page already on disk: {}", page.url);
        }

        let admitted = ctx.stats.record_admitted();
        if admitted % STATS_INTERVAL == 0 {
            ctx.stats.log_summary();
        }

        let links_queued = self.discover_links(&url, &page.body)?;
        ctx.stats.record_links_queued(links_queued as u64);

        Ok(Outcome::Admitted {
            url: page.url,
            links_queued,
        })
    }

    /// Queues the valid, not yet fetched links of an admitted page
    fn discover_links(&self, page_url: &Url, body: &str) -> crate::Result<usize> {
        let ctx = &self.ctx;
        let num_shards = ctx.frontier.num_shards();
        let mut seen = HashSet::new();
        let mut queued = 0;

        for href in extract_links(body, ctx.settings.max_links_per_page) {
            let Some(resolved) = resolve_link(&href, page_url) else {
                continue;
            };

            let link = match ctx.validator.validate_str(&resolved) {
                Ok(link) => link,
                Err(reason) => {
                    debug!("Skipping link {} ({})", resolved, reason);
                    continue;
                }
            };

            let link_str = link.to_string();
            if !seen.insert(link_str.clone()) {
                continue;
            }
            if ctx.pages.is_fetched(&link_str)? {
                continue;
            }

            if let Some(shard) = shard_for_url(&link, num_shards) {
                ctx.frontier.insert_url(&link_str, shard)?;
                queued += 1;
            }
        }

        Ok(queued)
    }

    fn reject(&self, url: String, reason: Rejection) -> Outcome {
        debug!("Rejected {} ({})", url, reason);
        self.ctx.stats.record_rejected();
        Outcome::Rejected { url, reason }
    }

    fn fail(&self, url: String, reason: String) -> Outcome {
        self.ctx.stats.record_failed();
        Outcome::FetchFailed { url, reason }
    }
}
