//! Inverted index from fingerprint to the admitted pages that produced it

use crate::fingerprint::{similarity, Fingerprint, FingerprintSet};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Position of an admitted page inside the index
pub type PageId = usize;

/// An admitted page as remembered by the index
///
/// Only the URL and the fingerprint set are kept; bodies live on disk.
#[derive(Debug)]
pub struct IndexedPage {
    pub id: PageId,
    pub url: String,
    pub fingerprints: FingerprintSet,
}

/// A positive near-duplicate verdict
#[derive(Debug, Clone)]
pub struct NearDuplicate {
    /// The page that was admitted first
    pub original: Arc<IndexedPage>,
    /// Jaccard similarity between the candidate and the original
    pub similarity: f64,
}

/// Fingerprint → pages postings
///
/// The index only grows: pages are never evicted for the lifetime of the
/// crawl, so memory is proportional to the number of admitted fingerprints.
#[derive(Debug, Default)]
pub struct FingerprintIndex {
    pages: Vec<Arc<IndexedPage>>,
    postings: HashMap<Fingerprint, Vec<PageId>>,
}

impl FingerprintIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of admitted pages
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Number of distinct fingerprints with at least one posting
    pub fn fingerprint_count(&self) -> usize {
        self.postings.len()
    }

    /// Looks up an admitted page by id
    pub fn page(&self, id: PageId) -> Option<&Arc<IndexedPage>> {
        self.pages.get(id)
    }

    /// Finds an admitted page whose similarity to `fingerprints` exceeds `threshold`
    ///
    /// Candidates are only the pages sharing at least one fingerprint with
    /// the candidate set, so the cost depends on overlap rather than on the
    /// number of admitted pages. Each candidate is compared once. A page
    /// with the same URL as the candidate is never reported.
    pub fn find_near_duplicate(
        &self,
        url: &str,
        fingerprints: &FingerprintSet,
        threshold: f64,
    ) -> Option<NearDuplicate> {
        let mut compared: HashSet<PageId> = HashSet::new();

        for fingerprint in fingerprints.iter() {
            let Some(page_ids) = self.postings.get(&fingerprint) else {
                continue;
            };

            for &page_id in page_ids {
                if !compared.insert(page_id) {
                    continue;
                }

                let page = &self.pages[page_id];
                if page.url == url {
                    continue;
                }

                let score = similarity(fingerprints, &page.fingerprints);
                if score > threshold {
                    return Some(NearDuplicate {
                        original: Arc::clone(page),
                        similarity: score,
                    });
                }
            }
        }

        None
    }

    /// Registers every fingerprint of a page
    pub fn admit(&mut self, url: &str, fingerprints: FingerprintSet) -> PageId {
        let id = self.pages.len();
        let page = Arc::new(IndexedPage {
            id,
            url: url.to_string(),
            fingerprints,
        });
        self.pages.push(Arc::clone(&page));

        // Postings are written after the page so they never point past `pages`
        for fingerprint in page.fingerprints.iter() {
            self.postings.entry(fingerprint).or_default().push(id);
        }

        id
    }
}
