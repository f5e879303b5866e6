//! Presspull: a paginated news-article scraper
//!
//! This crate crawls a paginated news index, follows each listed article
//! link, extracts structured article data (title, publish timestamp, body,
//! inline media), downloads referenced media, and persists each article
//! exactly once into a SQLite content store, skipping articles already
//! recorded.

pub mod config;
pub mod crawl;
pub mod extract;
pub mod fetch;
pub mod store;

use thiserror::Error;

/// Main error type for presspull operations
#[derive(Debug, Error)]
pub enum PressError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] fetch::FetchError),

    #[error("Article parse error: {0}")]
    Parse(#[from] extract::ParseError),

    #[error("Media import error: {0}")]
    Import(#[from] crawl::ImportError),

    #[error("Store error: {0}")]
    Store(#[from] store::StoreError),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for presspull operations
pub type Result<T> = std::result::Result<T, PressError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawl::{run_scrape, CrawlReport, StopReason};
pub use extract::{parse_article, parse_listing, ArticleDraft, ListingPage, MediaItem, MediaKind};
pub use store::{ContentStore, SqliteStore, StoredMediaRef};
