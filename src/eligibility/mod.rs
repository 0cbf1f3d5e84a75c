//! Host eligibility predicates
//!
//! Before fetching a URL the worker asks whether its host should be crawled
//! at all. The predicate is async because some implementations probe the
//! host over HTTP; [`CachedEligibility`] remembers verdicts so each host is
//! probed at most once while it stays in the cache.

mod cache;
mod wordpress;

pub use cache::{CachedEligibility, DEFAULT_CACHE_SIZE};
pub use wordpress::WordPressProbe;

use crate::config::{EligibilityConfig, EligibilityMode};
use async_trait::async_trait;
use std::sync::Arc;

/// Decides whether a host may be crawled
///
/// The verdict belongs to the hostname. `port` is the URL's explicit
/// non-default port and only tells probing predicates where to connect.
#[async_trait]
pub trait HostEligibility: Send + Sync {
    async fn is_eligible(&self, host: &str, port: Option<u16>) -> bool;
}

/// Every host is eligible
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

#[async_trait]
impl HostEligibility for AcceptAll {
    async fn is_eligible(&self, _host: &str, _port: Option<u16>) -> bool {
        true
    }
}

/// Builds the predicate selected by the configuration
///
/// # Arguments
///
/// * `config` - The `[eligibility]` section
/// * `client` - HTTP client used by probing predicates
/// * `scheme` - Scheme used for probes (`https`, or `http` in tests)
pub fn build_eligibility(
    config: &EligibilityConfig,
    client: reqwest::Client,
    scheme: &str,
) -> Arc<dyn HostEligibility> {
    match config.mode {
        EligibilityMode::Any => Arc::new(AcceptAll),
        EligibilityMode::Wordpress => Arc::new(CachedEligibility::new(
            WordPressProbe::with_scheme(client, scheme),
            config.cache_size,
        )),
    }
}
