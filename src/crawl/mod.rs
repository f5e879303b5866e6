//! Crawl pipeline: orchestration, duplicate gating, media import
//!
//! This module contains the run-level logic that ties the fetcher, the
//! extractors, and the content store together:
//! - the orchestrator state machine walking listing pages and articles
//! - the duplicate gate deciding what is already stored
//! - the media importer staging and uploading referenced assets

mod gate;
mod importer;
mod orchestrator;

pub use gate::article_exists;
pub use importer::{ImportError, MediaImporter};
pub use orchestrator::{CrawlReport, Crawler, StopReason};

use crate::config::Config;
use crate::store::SqliteStore;
use crate::PressError;
use std::path::Path;

/// Runs one complete scrape against the configured SQLite store.
///
/// This is the trigger surface: one call, one run, a coarse report back.
/// All per-article and per-media failures are handled inside; an error
/// return means configuration, store setup, or a store operation failed.
pub async fn run_scrape(config: Config, config_hash: &str) -> Result<CrawlReport, PressError> {
    let store = SqliteStore::new(Path::new(&config.store.database_path))?;
    let mut crawler = Crawler::new(config, store)?;
    crawler.run(config_hash).await
}
