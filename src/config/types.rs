use crate::dedup::DEFAULT_THRESHOLD;
use crate::eligibility::DEFAULT_CACHE_SIZE;
use crate::fingerprint::{DEFAULT_CAPACITY, DEFAULT_SHINGLE_SIZE};
use serde::Deserialize;

/// Main configuration structure for a crawl
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub eligibility: EligibilityConfig,
    /// Seed URLs; all of them enter shard 0
    pub seeds: Vec<String>,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Number of workers, which is also the number of frontier shards
    pub workers: usize,

    /// Maximum number of anchors extracted from a single page
    #[serde(rename = "max-links-per-page", default = "default_max_links")]
    pub max_links_per_page: usize,

    /// Sleep after polling an empty shard (milliseconds)
    #[serde(rename = "idle-delay", default = "default_idle_delay")]
    pub idle_delay: u64,

    /// Sleep after every fetch attempt (milliseconds)
    #[serde(rename = "fetch-delay", default = "default_fetch_delay")]
    pub fetch_delay: u64,

    /// Number of tokens per shingle
    #[serde(rename = "shingle-size", default = "default_shingle_size")]
    pub shingle_size: usize,

    /// Maximum number of fingerprints kept per page
    #[serde(rename = "fingerprint-capacity", default = "default_fingerprint_capacity")]
    pub fingerprint_capacity: usize,

    /// Pages more similar than this are near-duplicates
    #[serde(rename = "similarity-threshold", default = "default_similarity_threshold")]
    pub similarity_threshold: f64,

    /// Run the duplicate check and the admission in one critical section
    #[serde(rename = "exclusive-admission", default)]
    pub exclusive_admission: bool,

    /// Also accept plain `http://` URLs (local testing only)
    #[serde(rename = "allow-insecure-http", default)]
    pub allow_insecure_http: bool,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving one JSON file per admitted page
    #[serde(rename = "page-dir")]
    pub page_dir: String,

    /// Path to the SQLite frontier database
    #[serde(rename = "frontier-path")]
    pub frontier_path: String,

    /// Append-only crawl log
    #[serde(rename = "log-path", default = "default_log_path")]
    pub log_path: String,
}

/// Host eligibility configuration
#[derive(Debug, Clone, Deserialize)]
pub struct EligibilityConfig {
    #[serde(default)]
    pub mode: EligibilityMode,

    /// Number of host verdicts kept in the LRU cache
    #[serde(rename = "cache-size", default = "default_eligibility_cache_size")]
    pub cache_size: usize,
}

impl Default for EligibilityConfig {
    fn default() -> Self {
        Self {
            mode: EligibilityMode::default(),
            cache_size: default_eligibility_cache_size(),
        }
    }
}

/// Which host admission heuristic to use
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EligibilityMode {
    /// Every host is eligible
    #[default]
    Any,
    /// Only hosts that look like WordPress installations
    Wordpress,
}

fn default_max_links() -> usize {
    20
}

fn default_idle_delay() -> u64 {
    1000
}

fn default_fetch_delay() -> u64 {
    5000
}

fn default_shingle_size() -> usize {
    DEFAULT_SHINGLE_SIZE
}

fn default_fingerprint_capacity() -> usize {
    DEFAULT_CAPACITY
}

fn default_similarity_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

fn default_log_path() -> String {
    "shardcrawl.log".to_string()
}

fn default_eligibility_cache_size() -> usize {
    DEFAULT_CACHE_SIZE
}
