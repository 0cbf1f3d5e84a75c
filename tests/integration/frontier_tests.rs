//! Frontier durability and shard ownership

use crate::common::create_test_config;
use shardcrawl::crawler::{shard_of, Crawler};
use shardcrawl::storage::{open_frontier, Frontier, StorageError};
use shardcrawl::CrawlError;
use tempfile::TempDir;

/// One hostname per shard, found by probing `host{i}.test`
fn host_per_shard(num_shards: usize) -> Vec<String> {
    let mut hosts: Vec<Option<String>> = vec![None; num_shards];
    for i in 0.. {
        let host = format!("host{}.test", i);
        let shard = shard_of(&host, num_shards);
        if hosts[shard].is_none() {
            hosts[shard] = Some(host);
        }
        if hosts.iter().all(Option::is_some) {
            break;
        }
    }
    hosts.into_iter().flatten().collect()
}

#[test]
fn test_urls_only_retrievable_from_owning_shard() {
    let dir = TempDir::new().unwrap();
    let frontier = open_frontier(&dir.path().join("frontier.db"), 4, false).unwrap();
    let hosts = host_per_shard(4);

    for host in &hosts {
        let url = format!("https://{}/", host);
        frontier.insert_url(&url, shard_of(host, 4)).unwrap();
    }

    for (shard, host) in hosts.iter().enumerate() {
        assert_eq!(shard_of(host, 4), shard);
        assert_eq!(
            frontier.pop_url(shard).unwrap(),
            Some(format!("https://{}/", host))
        );
        assert_eq!(frontier.pop_url(shard).unwrap(), None);
    }
}

#[test]
fn test_insert_reopen_pop_exactly_once() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("frontier.db");

    {
        let frontier = open_frontier(&path, 4, false).unwrap();
        frontier.insert_url("https://x.test/a", 2).unwrap();
    }

    let frontier = open_frontier(&path, 4, false).unwrap();
    assert_eq!(
        frontier.pop_url(2).unwrap().as_deref(),
        Some("https://x.test/a")
    );
    assert_eq!(frontier.pop_url(2).unwrap(), None);
}

#[test]
fn test_worker_count_change_requires_fresh_start() {
    let dir = TempDir::new().unwrap();
    let seeds = vec!["https://seed.test/".to_string()];

    let four = create_test_config(dir.path(), 4, seeds.clone());
    drop(Crawler::new(&four, true).unwrap());

    let two = create_test_config(dir.path(), 2, seeds);
    match Crawler::new(&two, false) {
        Err(CrawlError::Frontier(StorageError::ShardCountMismatch { stored, requested })) => {
            assert_eq!(stored, 4);
            assert_eq!(requested, 2);
        }
        Err(other) => panic!("unexpected error: {}", other),
        Ok(_) => panic!("changing the worker count must be refused"),
    }

    let crawler = Crawler::new(&two, true).unwrap();
    assert_eq!(crawler.context().frontier.num_shards(), 2);
    assert_eq!(crawler.context().frontier.pending(0).unwrap(), 1);
}
