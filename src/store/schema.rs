//! Database schema definitions
//!
//! This module contains all SQL schema definitions for the presspull
//! database.

use rusqlite::Connection;

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Track scrape runs
CREATE TABLE IF NOT EXISTS runs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    started_at TEXT NOT NULL,
    finished_at TEXT,
    config_hash TEXT NOT NULL,
    outcome TEXT,
    articles_scraped INTEGER NOT NULL DEFAULT 0
);

-- Imported media library; article_id stays NULL until the owning article
-- exists
CREATE TABLE IF NOT EXISTS media (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    file_name TEXT NOT NULL,
    mime_type TEXT NOT NULL,
    bytes BLOB NOT NULL,
    article_id INTEGER REFERENCES articles(id),
    imported_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_media_article ON media(article_id);

-- Stored articles; (title, published_at) is the natural key the duplicate
-- gate queries
CREATE TABLE IF NOT EXISTS articles (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    published_at TEXT NOT NULL,
    body TEXT NOT NULL,
    cover_media_id INTEGER REFERENCES media(id),
    created_at TEXT NOT NULL,
    created_run INTEGER REFERENCES runs(id),
    UNIQUE(title, published_at)
);

CREATE INDEX IF NOT EXISTS idx_articles_natural_key ON articles(title, published_at);
"#;

/// Initializes the schema on a fresh or existing connection
pub fn initialize_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)
}
