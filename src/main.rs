//! Transcript crawler main entry point
//!
//! This is the command-line interface for the transcript crawler.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use transcript_crawler::config::{apply_env_overrides, load_config_with_hash, Config};
use transcript_crawler::crawler::crawl;
use transcript_crawler::output::{
    load_statistics, print_object_listing, print_report, print_statistics,
};
use transcript_crawler::storage::open_store;
use tracing_subscriber::EnvFilter;

/// Transcript crawler: fetches a transcript page from an archive site,
/// parses it into speaker turns and stores it as JSON.
#[derive(Parser, Debug)]
#[command(name = "transcript-crawler")]
#[command(version)]
#[command(about = "Crawls a transcript archive into structured speaker turns", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults are used when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without crawling
    #[arg(long, conflicts_with = "list")]
    dry_run: bool,

    /// List stored transcripts with store statistics and exit
    #[arg(long, conflicts_with = "dry_run")]
    list: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    // A missing .env file is fine; the environment may already be set
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!("Loaded environment from {}", path.display());
    }

    let config = load_effective_config(cli.config.as_deref())?;

    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.list {
        handle_list(&config)?;
    } else {
        handle_crawl(&config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("transcript_crawler=info,warn"),
            1 => EnvFilter::new("transcript_crawler=debug,info"),
            2 => EnvFilter::new("transcript_crawler=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file (if any) and layers environment overrides on top
fn load_effective_config(path: Option<&std::path::Path>) -> anyhow::Result<Config> {
    let config = match path {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::info!("No configuration file given, using defaults");
            Config::default()
        }
    };

    apply_env_overrides(config, |key| std::env::var(key).ok())
        .context("Invalid environment override")
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== Transcript Crawler Dry Run ===\n");

    println!("Crawler:");
    println!("  Starting URL: {}", config.crawler.starting_url);
    println!("  Max depth: {}", config.crawler.max_depth);
    println!("  Content selector: {}", config.crawler.content_selector);

    println!("\nFetcher:");
    println!("  User agent: {}", config.fetcher.user_agent());
    println!("  Timeout: {}s", config.fetcher.timeout_secs);
    println!("  Connect timeout: {}s", config.fetcher.connect_timeout_secs);

    println!("\nStorage:");
    println!("  Bucket: {}", config.storage.bucket);
    println!("  Database: {}", config.storage.database_path);

    println!("\n✓ Configuration is valid");
}

/// Handles the --list mode: shows stored transcripts and statistics
fn handle_list(config: &Config) -> anyhow::Result<()> {
    let store = open_store(&config.storage)
        .with_context(|| format!("Failed to open {}", config.storage.database_path))?;

    print_object_listing(&store)?;
    println!();
    print_statistics(&load_statistics(&store)?);

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config) -> anyhow::Result<()> {
    match crawl(config).await {
        Ok(report) => {
            tracing::info!("Crawl completed successfully");
            print_report(&report);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
