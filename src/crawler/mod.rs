//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - Routing hosts to shards
//! - HTTP fetching and link extraction
//! - The per-shard worker state machine
//! - Supervising the workers of a crawl

mod fetcher;
mod parser;
mod router;
mod stats;
mod supervisor;
mod worker;

pub use fetcher::{build_http_client, fetch_page, is_html_document, user_agent_string, FetchResult};
pub use parser::extract_links;
pub use router::{shard_for_url, shard_of};
pub use stats::{CrawlStats, StatsSnapshot};
pub use supervisor::{seed_frontier, Crawler, SEED_SHARD};
pub use worker::{CrawlContext, Outcome, Worker, WorkerSettings};
