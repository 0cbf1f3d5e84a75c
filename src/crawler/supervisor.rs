//! Crawl supervisor
//!
//! Builds the shared crawl context from the configuration, seeds the
//! frontier and runs one worker per shard until they are cancelled or one of
//! them hits a fatal error.

use crate::config::Config;
use crate::crawler::fetcher::build_http_client;
use crate::crawler::stats::CrawlStats;
use crate::crawler::worker::{CrawlContext, Worker, WorkerSettings};
use crate::dedup::{AdmissionMode, DedupCoordinator};
use crate::eligibility::build_eligibility;
use crate::pages::{FsPageStore, PageStore};
use crate::storage::{open_frontier, Frontier};
use crate::url::{normalize_url, UrlValidator};
use crate::{CrawlError, Result};
use std::path::Path;
use std::sync::Arc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Shard that receives every seed URL
pub const SEED_SHARD: usize = 0;

/// Owns the workers of one crawl
pub struct Crawler {
    ctx: Arc<CrawlContext>,
    cancel: CancellationToken,
}

impl Crawler {
    /// Opens the frontier and page store and seeds the crawl
    ///
    /// # Arguments
    ///
    /// * `config` - A validated configuration
    /// * `fresh` - Discard queued URLs (required when the worker count changes)
    ///
    /// # Returns
    ///
    /// * `Ok(Crawler)` - Ready to [`run`](Self::run)
    /// * `Err(CrawlError)` - The frontier, page store or HTTP client failed
    pub fn new(config: &Config, fresh: bool) -> Result<Self> {
        let num_shards = config.crawler.workers;

        let frontier = open_frontier(Path::new(&config.output.frontier_path), num_shards, fresh)?;
        let pages = FsPageStore::open(&config.output.page_dir)?;

        let allow_http = config.crawler.allow_insecure_http;
        let client = build_http_client(&config.user_agent, allow_http)?;
        let probe_scheme = if allow_http { "http" } else { "https" };
        let eligibility = build_eligibility(&config.eligibility, client.clone(), probe_scheme);

        let mode = if config.crawler.exclusive_admission {
            AdmissionMode::Exclusive
        } else {
            AdmissionMode::BestEffort
        };

        let ctx = CrawlContext {
            frontier: Arc::new(frontier),
            pages: Arc::new(pages),
            dedup: DedupCoordinator::new(config.crawler.similarity_threshold, mode),
            eligibility,
            validator: UrlValidator::new(allow_http),
            client,
            stats: CrawlStats::new(),
            settings: WorkerSettings::from_config(&config.crawler),
        };

        let seeded = seed_frontier(ctx.frontier.as_ref(), ctx.pages.as_ref(), &config.seeds)?;
        info!(
            "Queued {} of {} seed URLs on shard {}",
            seeded,
            config.seeds.len(),
            SEED_SHARD
        );

        Ok(Self {
            ctx: Arc::new(ctx),
            cancel: CancellationToken::new(),
        })
    }

    /// Token that stops every worker when cancelled
    pub fn shutdown_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn context(&self) -> &Arc<CrawlContext> {
        &self.ctx
    }

    /// Runs one worker per shard until all of them stop
    ///
    /// Without cancellation the crawl does not end on its own: workers keep
    /// polling their shards even when the whole frontier is empty. The
    /// first worker error cancels the others and is returned once every
    /// worker has stopped.
    pub async fn run(&self) -> Result<()> {
        let num_shards = self.ctx.frontier.num_shards();
        info!("Starting {} workers", num_shards);

        let mut workers = JoinSet::new();
        for shard in 0..num_shards {
            let worker = Worker::new(shard, Arc::clone(&self.ctx), self.cancel.clone());
            workers.spawn(async move { (shard, worker.run().await) });
        }

        let mut first_error = None;
        while let Some(joined) = workers.join_next().await {
            let failure = match joined {
                Ok((_, Ok(()))) => continue,
                Ok((shard, Err(e))) => {
                    error!("Worker {} failed: {}", shard, e);
                    e
                }
                Err(e) => {
                    error!("Worker task failed: {}", e);
                    CrawlError::Worker(e.to_string())
                }
            };

            self.cancel.cancel();
            first_error.get_or_insert(failure);
        }

        self.ctx.stats.log_summary();
        info!(
            "Fingerprint index holds {} pages, {} fingerprints",
            self.ctx.dedup.admitted_pages(),
            self.ctx.dedup.fingerprint_count()
        );

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

/// Queues every seed whose page is not stored yet on [`SEED_SHARD`]
///
/// Returns the number of seeds queued.
pub fn seed_frontier(
    frontier: &dyn Frontier,
    pages: &dyn PageStore,
    seeds: &[String],
) -> Result<usize> {
    let mut queued = 0;
    for seed in seeds {
        let url = normalize_url(seed)?.to_string();
        if pages.is_fetched(&url)? {
            info!("Seed already fetched: {}", url);
            continue;
        }
        frontier.insert_url(&url, SEED_SHARD)?;
        queued += 1;
    }
    Ok(queued)
}
