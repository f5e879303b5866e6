//! SQLite content store implementation

use crate::store::schema::initialize_schema;
use crate::store::traits::{ContentStore, StoreError, StoreResult};
use crate::store::{format_timestamp, infer_mime_type, ArticleRecord, NewArticle, StoredMediaRef};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// SQLite-backed content store
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (or creates) the store at the given path.
    pub fn new(path: &Path) -> StoreResult<Self> {
        let conn = Connection::open(path)?;

        // Configure SQLite for better performance
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory store (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

impl ContentStore for SqliteStore {
    // ===== Articles =====

    fn find_article(
        &self,
        title: &str,
        published_at: &DateTime<Utc>,
    ) -> StoreResult<Option<i64>> {
        let id = self
            .conn
            .query_row(
                "SELECT id FROM articles WHERE title = ?1 AND published_at = ?2",
                params![title, format_timestamp(published_at)],
                |row| row.get(0),
            )
            .optional()?;
        Ok(id)
    }

    fn create_article(&mut self, article: &NewArticle) -> StoreResult<i64> {
        let now = Utc::now().to_rfc3339();
        let published_at = format_timestamp(&article.published_at);

        let result = self.conn.execute(
            "INSERT INTO articles (title, published_at, body, created_at, created_run)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![article.title, published_at, article.body, now, article.run_id],
        );

        match result {
            Ok(_) => Ok(self.conn.last_insert_rowid()),
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Err(StoreError::Duplicate {
                    title: article.title.clone(),
                    published_at,
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    fn get_article(&self, article_id: i64) -> StoreResult<Option<ArticleRecord>> {
        let record = self
            .conn
            .query_row(
                "SELECT id, title, published_at, body, cover_media_id
                 FROM articles WHERE id = ?1",
                params![article_id],
                |row| {
                    Ok(ArticleRecord {
                        id: row.get(0)?,
                        title: row.get(1)?,
                        published_at: row.get(2)?,
                        body: row.get(3)?,
                        cover_media_id: row.get(4)?,
                    })
                },
            )
            .optional()?;
        Ok(record)
    }

    fn set_cover_image(&mut self, article_id: i64, media_id: i64) -> StoreResult<()> {
        let updated = self.conn.execute(
            "UPDATE articles SET cover_media_id = ?1 WHERE id = ?2",
            params![media_id, article_id],
        )?;
        if updated == 0 {
            return Err(StoreError::ArticleNotFound(article_id));
        }
        Ok(())
    }

    fn count_articles(&self) -> StoreResult<u64> {
        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM articles", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    // ===== Media library =====

    fn import_media(
        &mut self,
        bytes: &[u8],
        suggested_name: &str,
    ) -> StoreResult<StoredMediaRef> {
        let mime_type = infer_mime_type(suggested_name);
        let now = Utc::now().to_rfc3339();

        self.conn.execute(
            "INSERT INTO media (file_name, mime_type, bytes, imported_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![suggested_name, mime_type, bytes, now],
        )?;

        Ok(StoredMediaRef {
            id: self.conn.last_insert_rowid(),
            mime_type: mime_type.to_string(),
        })
    }

    fn attach_media(&mut self, media_id: i64, article_id: i64) -> StoreResult<()> {
        let updated = self.conn.execute(
            "UPDATE media SET article_id = ?1 WHERE id = ?2",
            params![article_id, media_id],
        )?;
        if updated == 0 {
            return Err(StoreError::MediaNotFound(media_id));
        }
        Ok(())
    }

    fn count_media(&self) -> StoreResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM media", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    // ===== Run tracking =====

    fn create_run(&mut self, config_hash: &str) -> StoreResult<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO runs (started_at, config_hash) VALUES (?1, ?2)",
            params![now, config_hash],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn complete_run(
        &mut self,
        run_id: i64,
        outcome: &str,
        articles_scraped: u32,
    ) -> StoreResult<()> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "UPDATE runs SET finished_at = ?1, outcome = ?2, articles_scraped = ?3 WHERE id = ?4",
            params![now, outcome, articles_scraped, run_id],
        )?;
        Ok(())
    }
}
