//! Configuration module for presspull
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files. Every key has a default matching the reference deployment, so a
//! missing section degrades to the stock behavior rather than an error.

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, HttpConfig, SourceConfig, StoreConfig, DEFAULT_ARTICLE_LIMIT, DEFAULT_LISTING_URL,
    DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
