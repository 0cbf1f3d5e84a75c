//! Content fingerprinting for near-duplicate detection
//!
//! A page is reduced to the set of hashes of its k-token shingles. Two pages
//! are compared by the Jaccard similarity of their sets.

mod tokenize;

pub use tokenize::tokenize;

use crate::hash::fnv1a_64;
use std::collections::HashSet;

/// Default number of tokens per shingle
pub const DEFAULT_SHINGLE_SIZE: usize = 3;

/// Default maximum number of fingerprints per page
pub const DEFAULT_CAPACITY: usize = 10_000;

/// A single shingle hash
pub type Fingerprint = u64;

/// The distinct fingerprints of one page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FingerprintSet {
    hashes: HashSet<Fingerprint>,
}

impl FingerprintSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Fingerprint> + '_ {
        self.hashes.iter().copied()
    }

    /// Fingerprints in ascending order, for stable serialization
    pub fn to_sorted_vec(&self) -> Vec<Fingerprint> {
        let mut hashes: Vec<_> = self.hashes.iter().copied().collect();
        hashes.sort_unstable();
        hashes
    }

    fn insert(&mut self, fingerprint: Fingerprint) {
        self.hashes.insert(fingerprint);
    }
}

impl FromIterator<Fingerprint> for FingerprintSet {
    fn from_iter<I: IntoIterator<Item = Fingerprint>>(iter: I) -> Self {
        Self {
            hashes: iter.into_iter().collect(),
        }
    }
}

/// Generates the fingerprint set of an HTML page
///
/// The visible text is tokenized and every run of `shingle_size` consecutive
/// tokens is hashed. Generation stops as soon as the set holds `capacity`
/// distinct fingerprints, so the kept fingerprints always come from a prefix
/// of the document.
///
/// A page with at least one but fewer than `shingle_size` tokens yields a
/// single shingle made of all of them.
///
/// # Examples
///
/// ```
/// use shardcrawl::fingerprint::generate_fingerprints;
///
/// let set = generate_fingerprints("<p>a b c d</p>", 3, 10_000);
/// assert_eq!(set.len(), 2);
/// ```
pub fn generate_fingerprints(body: &str, shingle_size: usize, capacity: usize) -> FingerprintSet {
    let tokens = tokenize(body);
    fingerprints_from_tokens(&tokens, shingle_size, capacity)
}

/// Generates fingerprints from an already tokenized text
pub fn fingerprints_from_tokens(
    tokens: &[String],
    shingle_size: usize,
    capacity: usize,
) -> FingerprintSet {
    let mut set = FingerprintSet::new();
    if tokens.is_empty() || capacity == 0 {
        return set;
    }

    let shingle_size = shingle_size.max(1);
    if tokens.len() < shingle_size {
        set.insert(hash_shingle(tokens));
        return set;
    }

    for shingle in tokens.windows(shingle_size) {
        set.insert(hash_shingle(shingle));
        if set.len() >= capacity {
            break;
        }
    }

    set
}

/// Hashes the tokens of one shingle joined by single spaces
fn hash_shingle(tokens: &[String]) -> Fingerprint {
    let joined = tokens.join(" ");
    fnv1a_64(joined.as_bytes())
}

/// Jaccard similarity of two fingerprint sets
///
/// Returns |A ∩ B| / |A ∪ B|. Two empty sets have similarity 0.0, so pages
/// without extractable text are never treated as duplicates of each other.
pub fn similarity(a: &FingerprintSet, b: &FingerprintSet) -> f64 {
    let (smaller, larger) = if a.len() <= b.len() { (a, b) } else { (b, a) };

    let intersection = smaller
        .hashes
        .iter()
        .filter(|hash| larger.hashes.contains(hash))
        .count();
    let union = a.len() + b.len() - intersection;

    if union == 0 {
        return 0.0;
    }
    intersection as f64 / union as f64
}
