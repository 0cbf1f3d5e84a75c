//! Stable 64-bit hashing
//!
//! FNV-1a is used wherever a hash must be identical across runs and
//! processes: shard routing, shingle fingerprints and page file names.
//! `std`'s default hasher is randomly seeded and cannot be used for any of these.

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Computes the 64-bit FNV-1a hash of a byte slice
///
/// # Examples
///
/// ```
/// use shardcrawl::hash::fnv1a_64;
///
/// assert_eq!(fnv1a_64(b""), 0xcbf29ce484222325);
/// assert_eq!(fnv1a_64(b"a"), 0xaf63dc4c8601ec8c);
/// ```
pub fn fnv1a_64(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ u64::from(*byte)).wrapping_mul(FNV_PRIME)
    })
}

/// Hashes a string with FNV-1a
pub fn fnv1a_str(value: &str) -> u64 {
    fnv1a_64(value.as_bytes())
}
