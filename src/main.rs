//! shardcrawl main entry point
//!
//! This is the command-line interface for the shardcrawl crawler.

use anyhow::Context;
use clap::Parser;
use shardcrawl::config::{load_config_with_hash, Config};
use shardcrawl::crawler::{shard_of, user_agent_string, Crawler, SEED_SHARD};
use shardcrawl::pages::{FsPageStore, PageStore};
use shardcrawl::storage::{open_frontier, Frontier};
use shardcrawl::url::normalize_url;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// shardcrawl: a shard-partitioned, near-duplicate aware web crawler
///
/// Each worker owns the hosts routed to its shard, so no two workers ever
/// contact the same server. Pages that are near-duplicates of already
/// stored content are dropped before they reach the page directory.
#[derive(Parser, Debug)]
#[command(name = "shardcrawl")]
#[command(version)]
#[command(about = "A shard-partitioned, near-duplicate aware web crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Discard the queued frontier (required after changing the worker count)
    #[arg(long)]
    fresh: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show frontier and page store statistics and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;

    if cli.dry_run {
        setup_logging(cli.verbose, cli.quiet, None)?;
        return handle_dry_run(&config);
    }
    if cli.stats {
        setup_logging(cli.verbose, cli.quiet, None)?;
        return handle_stats(&config);
    }

    setup_logging(cli.verbose, cli.quiet, Some(Path::new(&config.output.log_path)))?;
    tracing::info!(
        "Configuration loaded from {} (hash: {})",
        cli.config.display(),
        config_hash
    );

    handle_crawl(&config, cli.fresh).await
}

fn env_filter(verbose: u8, quiet: bool) -> EnvFilter {
    if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("shardcrawl=info,warn"),
            1 => EnvFilter::new("shardcrawl=debug,info"),
            2 => EnvFilter::new("shardcrawl=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// With a log path, events are appended to that file without ANSI colors;
/// otherwise they go to stderr.
fn setup_logging(verbose: u8, quiet: bool, log_path: Option<&Path>) -> anyhow::Result<()> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbose, quiet))
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false);

    match log_path {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }

    Ok(())
}

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    println!("=== shardcrawl Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Workers (shards): {}", config.crawler.workers);
    println!("  Max links per page: {}", config.crawler.max_links_per_page);
    println!("  Idle delay: {}ms", config.crawler.idle_delay);
    println!("  Fetch delay: {}ms", config.crawler.fetch_delay);
    println!(
        "  Shingles: {} tokens, up to {} per page",
        config.crawler.shingle_size, config.crawler.fingerprint_capacity
    );
    println!(
        "  Similarity threshold: {} ({} admission)",
        config.crawler.similarity_threshold,
        if config.crawler.exclusive_admission {
            "exclusive"
        } else {
            "best-effort"
        }
    );
    println!("  Host eligibility: {:?}", config.eligibility.mode);

    println!("\nUser Agent:");
    println!("  {}", user_agent_string(&config.user_agent));

    println!("\nOutput:");
    println!("  Pages: {}", config.output.page_dir);
    println!("  Frontier: {}", config.output.frontier_path);
    println!("  Log: {}", config.output.log_path);

    println!("\nSeeds ({}), queued on shard {}:", config.seeds.len(), SEED_SHARD);
    for seed in &config.seeds {
        let url = normalize_url(seed)?;
        let owner = url
            .host_str()
            .map(|host| shard_of(host, config.crawler.workers));
        match owner {
            Some(shard) => println!("  - {} (host owned by shard {})", url, shard),
            None => println!("  - {}", url),
        }
    }

    println!("\n✓ Configuration is valid");

    Ok(())
}

/// Handles the --stats mode: shows queued URLs per shard and stored pages
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    println!("Frontier: {}", config.output.frontier_path);
    let frontier = open_frontier(
        Path::new(&config.output.frontier_path),
        config.crawler.workers,
        false,
    )?;

    let mut total = 0;
    for shard in 0..frontier.num_shards() {
        let pending = frontier.pending(shard)?;
        total += pending;
        println!("  Shard {:>3}: {} queued", shard, pending);
    }
    println!("  Total: {} queued\n", total);

    let pages = FsPageStore::open(&config.output.page_dir)?;
    println!("Pages: {}", config.output.page_dir);
    println!("  Stored: {}", pages.count()?);

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config, fresh: bool) -> anyhow::Result<()> {
    if fresh {
        tracing::info!("Starting fresh crawl (queued URLs discarded)");
    } else {
        tracing::info!("Starting crawl (resuming queued URLs)");
    }

    let crawler = Crawler::new(config, fresh).context("Failed to initialize crawl")?;

    let shutdown = crawler.shutdown_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received, stopping workers");
            shutdown.cancel();
        }
    });

    match crawler.run().await {
        Ok(()) => {
            tracing::info!("Crawl stopped");
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
