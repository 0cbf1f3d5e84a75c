//! Near-duplicate detection shared by all workers
//!
//! The [`DedupCoordinator`] owns the global [`FingerprintIndex`] behind a
//! single exclusive lock. Workers ask it whether a freshly fetched page is a
//! near-duplicate of something already admitted, and register the page when
//! it is not.
//!
//! # Admission modes
//!
//! With [`AdmissionMode::BestEffort`] the duplicate check and the admission
//! are two separate lock acquisitions. Two workers may both pass the check
//! for mutually similar pages and both be admitted; at-most-one-admission is
//! not guaranteed. [`AdmissionMode::Exclusive`] performs both under one lock
//! so that among mutual near-duplicates exactly the first one is admitted,
//! at the cost of longer lock hold times.

mod index;

pub use index::{FingerprintIndex, IndexedPage, NearDuplicate, PageId};

use crate::fingerprint::FingerprintSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Default similarity above which two pages are near-duplicates
pub const DEFAULT_THRESHOLD: f64 = 0.9;

/// How the duplicate check and admission are sequenced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdmissionMode {
    /// Check and admit under separate lock acquisitions
    #[default]
    BestEffort,
    /// Check and admit in one critical section
    Exclusive,
}

/// Result of [`DedupCoordinator::check_and_admit`]
#[derive(Debug, Clone)]
pub enum Admission {
    /// The page was registered in the index
    Admitted(PageId),
    /// The page is a near-duplicate and was not registered
    Duplicate(NearDuplicate),
}

/// Global near-duplicate detector
#[derive(Debug)]
pub struct DedupCoordinator {
    index: Mutex<FingerprintIndex>,
    threshold: f64,
    mode: AdmissionMode,
}

impl DedupCoordinator {
    /// Creates a coordinator with an empty index
    pub fn new(threshold: f64, mode: AdmissionMode) -> Self {
        Self {
            index: Mutex::new(FingerprintIndex::new()),
            threshold,
            mode,
        }
    }

    pub fn mode(&self) -> AdmissionMode {
        self.mode
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    fn lock(&self) -> MutexGuard<'_, FingerprintIndex> {
        // The index is append-only, so a panic in another worker cannot leave it inconsistent
        self.index.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Checks whether a page is a near-duplicate of an admitted page
    pub fn is_near_duplicate(&self, url: &str, fingerprints: &FingerprintSet) -> Option<NearDuplicate> {
        self.lock()
            .find_near_duplicate(url, fingerprints, self.threshold)
    }

    /// Registers a page's fingerprints
    ///
    /// Callers must have checked [`is_near_duplicate`](Self::is_near_duplicate)
    /// first; this method does not re-check.
    pub fn admit(&self, url: &str, fingerprints: FingerprintSet) -> PageId {
        self.lock().admit(url, fingerprints)
    }

    /// Checks and, if the page is not a duplicate, admits it
    ///
    /// Honors the configured [`AdmissionMode`].
    pub fn check_and_admit(&self, url: &str, fingerprints: FingerprintSet) -> Admission {
        match self.mode {
            AdmissionMode::BestEffort => {
                if let Some(duplicate) = self.is_near_duplicate(url, &fingerprints) {
                    return Admission::Duplicate(duplicate);
                }
                Admission::Admitted(self.admit(url, fingerprints))
            }
            AdmissionMode::Exclusive => {
                let mut index = self.lock();
                if let Some(duplicate) =
                    index.find_near_duplicate(url, &fingerprints, self.threshold)
                {
                    return Admission::Duplicate(duplicate);
                }
                Admission::Admitted(index.admit(url, fingerprints))
            }
        }
    }

    /// Number of admitted pages
    pub fn admitted_pages(&self) -> usize {
        self.lock().len()
    }

    /// Number of distinct fingerprints in the index
    pub fn fingerprint_count(&self) -> usize {
        self.lock().fingerprint_count()
    }
}

impl Default for DedupCoordinator {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD, AdmissionMode::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fingerprint::generate_fingerprints;
    use std::sync::Arc;
    use std::thread;

    fn words(range: std::ops::Range<usize>) -> String {
        range
            .map(|i| format!("word{}", i))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn page(text: &str) -> String {
        format!("<!DOCTYPE html><html><body><p>{}</p></body></html>", text)
    }

    #[test]
    fn test_whitespace_variant_is_duplicate() {
        let dedup = DedupCoordinator::default();
        let body = page(&words(0..200));
        let variant = body.replace(' ', "  \n ");

        let original = generate_fingerprints(&body, 3, 10_000);
        dedup.admit("https://a.test/p", original);

        let candidate = generate_fingerprints(&variant, 3, 10_000);
        let found = dedup
            .is_near_duplicate("https://b.test/p", &candidate)
            .expect("whitespace variant must be a duplicate");
        assert_eq!(found.original.url, "https://a.test/p");
        assert_eq!(found.similarity, 1.0);
    }

    #[test]
    fn test_duplicate_fingerprints_never_enter_index() {
        let dedup = DedupCoordinator::default();
        let a: FingerprintSet = (0..1000).collect();
        // 95% shared with a, plus 50 of its own
        let b: FingerprintSet = (50..1000).chain(5000..5050).collect();

        assert!(matches!(
            dedup.check_and_admit("https://a.test/", a),
            Admission::Admitted(0)
        ));
        let before = dedup.fingerprint_count();

        match dedup.check_and_admit("https://b.test/", b) {
            Admission::Duplicate(found) => assert_eq!(found.original.url, "https://a.test/"),
            Admission::Admitted(_) => panic!("b should be a duplicate of a"),
        }
        assert_eq!(dedup.admitted_pages(), 1);
        assert_eq!(dedup.fingerprint_count(), before);
    }

    #[test]
    fn test_distinct_pages_both_admitted() {
        let dedup = DedupCoordinator::default();
        let a = generate_fingerprints(&page(&words(0..100)), 3, 10_000);
        let b = generate_fingerprints(&page(&words(100..200)), 3, 10_000);

        assert!(matches!(
            dedup.check_and_admit("https://a.test/", a),
            Admission::Admitted(_)
        ));
        assert!(matches!(
            dedup.check_and_admit("https://b.test/", b),
            Admission::Admitted(_)
        ));
        assert_eq!(dedup.admitted_pages(), 2);
    }

    #[test]
    fn test_exclusive_mode_admits_exactly_one() {
        let dedup = Arc::new(DedupCoordinator::new(0.9, AdmissionMode::Exclusive));
        let fingerprints: FingerprintSet = (0..500).collect();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let dedup = Arc::clone(&dedup);
                let fingerprints = fingerprints.clone();
                thread::spawn(move || {
                    dedup.check_and_admit(&format!("https://mirror{}.test/", i), fingerprints)
                })
            })
            .collect();

        let admitted = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|a| matches!(a, Admission::Admitted(_)))
            .count();

        assert_eq!(admitted, 1);
        assert_eq!(dedup.admitted_pages(), 1);
    }

    #[test]
    fn test_default_mode_is_best_effort() {
        let dedup = DedupCoordinator::default();
        assert_eq!(dedup.mode(), AdmissionMode::BestEffort);
        assert_eq!(dedup.threshold(), DEFAULT_THRESHOLD);
    }
}
