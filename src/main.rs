//! Presspull main entry point
//!
//! This is the command-line interface for the presspull article scraper.
//! One invocation is one scrape run; scheduling repeated runs belongs to
//! whatever invokes the binary (the `schedule` config key is a hint for
//! that mechanism, not for this process).

use anyhow::Context;
use clap::Parser;
use presspull::config::{load_config_with_hash, Config};
use presspull::crawl::run_scrape;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Presspull: a paginated news-article scraper
///
/// Crawls a paginated news index, extracts each linked article with its
/// media, and writes new articles into a SQLite content store. Articles
/// already stored are detected and stop the crawl from paginating further.
#[derive(Parser, Debug)]
#[command(name = "presspull")]
#[command(version = "1.0.0")]
#[command(about = "A paginated news-article scraper", long_about = None)]
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

    /// Validate config and show what would be scraped without scraping
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show statistics from the content store and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded (hash: {})", config_hash);

    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.stats {
        handle_stats(&config)?;
    } else {
        handle_scrape(config, &config_hash).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("presspull=info,warn"),
            1 => EnvFilter::new("presspull=debug,info"),
            2 => EnvFilter::new("presspull=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows what would run
fn handle_dry_run(config: &Config) {
    println!("=== Presspull Dry Run ===\n");

    println!("Source:");
    println!("  Listing URL: {}", config.source.listing_url);
    println!("  Article limit: {}", config.source.article_limit);
    if let Some(schedule) = &config.source.schedule {
        println!("  Schedule hint: {}", schedule);
    }

    println!("\nHTTP:");
    println!("  User agent: {}", config.http.user_agent);
    println!("  Timeout: {}s", config.http.timeout_secs);
    println!("  TLS verification: {}", config.http.tls_verify);

    println!("\nStore:");
    println!("  Database: {}", config.store.database_path);
    println!("  Temp dir: {}", config.store.temp_dir);

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would scrape up to {} articles starting from {}",
        config.source.article_limit, config.source.listing_url
    );
}

/// Handles the --stats mode: shows statistics from the content store
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    use presspull::store::{ContentStore, SqliteStore};
    use std::path::Path;

    println!("Database: {}\n", config.store.database_path);

    let store = SqliteStore::new(Path::new(&config.store.database_path))?;

    println!("Articles stored: {}", store.count_articles()?);
    println!("Media imported:  {}", store.count_media()?);

    Ok(())
}

/// Handles the default mode: one scrape run
async fn handle_scrape(config: Config, config_hash: &str) -> anyhow::Result<()> {
    match run_scrape(config, config_hash).await {
        Ok(report) => {
            tracing::info!(
                "Scrape completed: {} articles from {} pages ({})",
                report.articles_scraped,
                report.pages_visited,
                report.stop.as_str()
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("Scrape failed: {}", e);
            Err(e.into())
        }
    }
}
