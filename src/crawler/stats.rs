//! Crawl statistics shared by all workers

use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;

/// Running totals of what the workers did
#[derive(Debug, Default)]
pub struct CrawlStats {
    fetched: AtomicU64,
    admitted: AtomicU64,
    duplicates: AtomicU64,
    rejected: AtomicU64,
    failed: AtomicU64,
    links_queued: AtomicU64,
}

/// Point-in-time copy of [`CrawlStats`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub fetched: u64,
    pub admitted: u64,
    pub duplicates: u64,
    pub rejected: u64,
    pub failed: u64,
    pub links_queued: u64,
}

impl CrawlStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// A page body was read successfully
    pub fn record_fetched(&self) {
        self.fetched.fetch_add(1, Ordering::Relaxed);
    }

    /// A page was admitted; returns the new admitted total
    pub fn record_admitted(&self) -> u64 {
        self.admitted.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn record_duplicate(&self) {
        self.duplicates.fetch_add(1, Ordering::Relaxed);
    }

    /// A URL failed validation or eligibility
    pub fn record_rejected(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// A fetch, body read or doctype check failed
    pub fn record_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_links_queued(&self, count: u64) {
        self.links_queued.fetch_add(count, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            fetched: self.fetched.load(Ordering::Relaxed),
            admitted: self.admitted.load(Ordering::Relaxed),
            duplicates: self.duplicates.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            links_queued: self.links_queued.load(Ordering::Relaxed),
        }
    }

    /// Writes the current totals to the log
    pub fn log_summary(&self) {
        let s = self.snapshot();
        info!(
            "Crawl stats: {} fetched, {} admitted, {} duplicates, {} rejected, {} failed, {} links queued",
            s.fetched, s.admitted, s.duplicates, s.rejected, s.failed, s.links_queued
        );
    }
}
