//! Integration tests for shardcrawl
//!
//! These tests use wiremock to create mock HTTP servers and tempfile for
//! page directories and frontier databases.

mod common;
mod crawl_tests;
mod frontier_tests;
