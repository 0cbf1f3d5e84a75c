//! Shard routing
//!
//! Every hostname is owned by exactly one shard, and each shard is drained
//! by exactly one worker. Routing all URLs of a host to the same shard is
//! what keeps concurrent workers from hitting the same server.

use crate::hash::fnv1a_str;
use crate::url::extract_domain;
use url::Url;

/// Shard owning `hostname` among `num_shards` shards
///
/// The mapping is a pure function of the hostname bytes and the shard count;
/// it is stable across processes and runs.
///
/// # Panics
///
/// Panics if `num_shards` is zero.
pub fn shard_of(hostname: &str, num_shards: usize) -> usize {
    let hash = fnv1a_str(hostname) as i64;
    (hash.unsigned_abs() % num_shards as u64) as usize
}

/// Shard owning the host of `url`, or None if the URL has no host
pub fn shard_for_url(url: &Url, num_shards: usize) -> Option<usize> {
    extract_domain(url).map(|host| shard_of(&host, num_shards))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_single_shard() {
        assert_eq!(shard_of("example.com", 1), 0);
        assert_eq!(shard_of("", 1), 0);
    }

    #[test]
    fn test_known_value() {
        // fnv1a("a") = 0xaf63dc4c8601ec8c, negative as i64
        let expected = ((0xaf63dc4c8601ec8c_u64 as i64).unsigned_abs() % 7) as usize;
        assert_eq!(shard_of("a", 7), expected);
    }

    #[test]
    fn test_url_routing_ignores_path_and_scheme() {
        let a = Url::parse("https://blog.example.com/one").unwrap();
        let b = Url::parse("http://blog.example.com/two/three?x=1").unwrap();
        assert_eq!(shard_for_url(&a, 16), shard_for_url(&b, 16));
        assert_eq!(shard_for_url(&a, 16), Some(shard_of("blog.example.com", 16)));
    }

    #[test]
    fn test_url_without_host() {
        let url = Url::parse("data:text/plain,hello").unwrap();
        assert_eq!(shard_for_url(&url, 4), None);
    }

    proptest! {
        #[test]
        fn prop_same_host_same_shard(host in "[a-z0-9.-]{1,40}", n in 1usize..512) {
            prop_assert_eq!(shard_of(&host, n), shard_of(&host, n));
        }

        #[test]
        fn prop_shard_in_range(host in ".{0,64}", n in 1usize..512) {
            prop_assert!(shard_of(&host, n) < n);
        }
    }
}
