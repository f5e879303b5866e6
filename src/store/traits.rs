//! Content store trait and error types

use crate::store::{ArticleRecord, NewArticle, StoredMediaRef};
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors that can occur during store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// The natural-key UNIQUE constraint rejected a write. The duplicate
    /// gate runs before every write, so hitting this means the gate and
    /// the write disagreed about the key.
    #[error("duplicate article: {title} @ {published_at}")]
    Duplicate {
        title: String,
        published_at: String,
    },

    #[error("article not found: {0}")]
    ArticleNotFound(i64),

    #[error("media not found: {0}")]
    MediaNotFound(i64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Trait for content store backends
///
/// Articles are keyed by the (title, published_at) pair; the store compares
/// the timestamp at its stored precision. Media rows live unattached until
/// their owning article exists.
pub trait ContentStore {
    // ===== Articles =====

    /// Looks up an article by its natural key.
    ///
    /// This is the duplicate gate's single source of truth; a failure here
    /// is fatal to the run, since duplicate detection correctness cannot be
    /// assumed otherwise.
    fn find_article(
        &self,
        title: &str,
        published_at: &DateTime<Utc>,
    ) -> StoreResult<Option<i64>>;

    /// Writes a new article and returns its id.
    fn create_article(&mut self, article: &NewArticle) -> StoreResult<i64>;

    /// Gets a stored article row by id.
    fn get_article(&self, article_id: i64) -> StoreResult<Option<ArticleRecord>>;

    /// Sets an article's cover image.
    fn set_cover_image(&mut self, article_id: i64, media_id: i64) -> StoreResult<()>;

    fn count_articles(&self) -> StoreResult<u64>;

    // ===== Media library =====

    /// Imports media bytes into the library, unattached to any article.
    /// The mime type is inferred from the suggested name's extension.
    fn import_media(&mut self, bytes: &[u8], suggested_name: &str)
        -> StoreResult<StoredMediaRef>;

    /// Finalizes a media row's parent association.
    fn attach_media(&mut self, media_id: i64, article_id: i64) -> StoreResult<()>;

    fn count_media(&self) -> StoreResult<u64>;

    // ===== Run tracking =====

    /// Records the start of a scrape run.
    fn create_run(&mut self, config_hash: &str) -> StoreResult<i64>;

    /// Records a run's outcome and how many articles it wrote.
    fn complete_run(
        &mut self,
        run_id: i64,
        outcome: &str,
        articles_scraped: u32,
    ) -> StoreResult<()>;
}
