use serde::Deserialize;

/// Default listing page the scrape starts from when none is configured.
pub const DEFAULT_LISTING_URL: &str = "https://www.theguardian.com/world/natural-disasters/";

/// Default number of articles written per run.
pub const DEFAULT_ARTICLE_LIMIT: u32 = 20;

/// Request identity sent on every request. The target site serves the
/// expected page template to a desktop browser identity, so this is a fixed
/// browser string rather than a crawler signature.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_12_1) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/54.0.2840.71 Safari/537.36";

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Main configuration structure for presspull
///
/// Every section and key has a default, so an empty file (or a missing
/// section) yields a runnable configuration pointed at the reference
/// listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

/// What to scrape and how much of it
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// Listing page the crawl starts from
    #[serde(rename = "listing-url", default = "default_listing_url")]
    pub listing_url: String,

    /// Maximum number of articles written per run
    #[serde(rename = "article-limit", default = "default_article_limit")]
    pub article_limit: u32,

    /// Free-form schedule hint, consumed by whatever external mechanism
    /// triggers the binary (cron or similar), never by the core
    #[serde(default)]
    pub schedule: Option<String>,
}

/// HTTP client behavior
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// User-agent string sent on every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Per-request timeout in seconds
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// TLS certificate verification. The reference site is fetched with
    /// verification disabled, so this defaults to false; set true when the
    /// target's certificate chain is known good.
    #[serde(rename = "tls-verify", default)]
    pub tls_verify: bool,
}

/// Where articles, media, and staging files live
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path", default = "default_database_path")]
    pub database_path: String,

    /// Directory media downloads are staged in before import
    #[serde(rename = "temp-dir", default = "default_temp_dir")]
    pub temp_dir: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            listing_url: default_listing_url(),
            article_limit: default_article_limit(),
            schedule: None,
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            tls_verify: false,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            temp_dir: default_temp_dir(),
        }
    }
}

fn default_listing_url() -> String {
    DEFAULT_LISTING_URL.to_string()
}

fn default_article_limit() -> u32 {
    DEFAULT_ARTICLE_LIMIT
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_database_path() -> String {
    "./presspull.db".to_string()
}

fn default_temp_dir() -> String {
    "./presspull-tmp".to_string()
}
