//! Content store for articles and media
//!
//! The store is the system of record the crawl writes into: articles keyed
//! by their (title, publish timestamp) natural key, and a media library of
//! imported assets. The trait keeps the orchestrator decoupled from SQLite;
//! the shipped backend is [`SqliteStore`].

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStore;
pub use traits::{ContentStore, StoreError, StoreResult};

use chrono::{DateTime, Utc};

/// Timestamp format articles are stored and compared at. Duplicate
/// detection happens at exactly this precision.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Formats a publish timestamp at the store's precision.
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

/// Infers a mime type from a file name's extension, the way the media
/// library tags uploads. Unknown extensions fall back to octet-stream.
pub fn infer_mime_type(file_name: &str) -> &'static str {
    let extension = file_name
        .rsplit('.')
        .next()
        .unwrap_or("")
        .to_ascii_lowercase();

    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "mov" => "video/quicktime",
        _ => "application/octet-stream",
    }
}

/// A new article ready to be written
#[derive(Debug, Clone)]
pub struct NewArticle {
    pub title: String,
    pub published_at: DateTime<Utc>,

    /// Final body markup, media placeholders already rewritten
    pub body: String,

    /// The run this article was scraped by, recorded for observability
    pub run_id: Option<i64>,
}

/// A stored article row
#[derive(Debug, Clone)]
pub struct ArticleRecord {
    pub id: i64,
    pub title: String,
    pub published_at: String,
    pub body: String,
    pub cover_media_id: Option<i64>,
}

/// Reference to media imported into the store's library
#[derive(Debug, Clone, PartialEq)]
pub struct StoredMediaRef {
    pub id: i64,
    pub mime_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_timestamp_format_second_precision() {
        let ts = Utc.with_ymd_and_hms(2017, 7, 14, 2, 40, 0).unwrap();
        assert_eq!(format_timestamp(&ts), "2017-07-14 02:40:00");
    }

    #[test]
    fn test_mime_from_extension() {
        assert_eq!(infer_mime_type("photo.jpg"), "image/jpeg");
        assert_eq!(infer_mime_type("photo.JPEG"), "image/jpeg");
        assert_eq!(infer_mime_type("diagram.png"), "image/png");
        assert_eq!(infer_mime_type("clip.mp4"), "video/mp4");
        assert_eq!(infer_mime_type("clip.webm"), "video/webm");
    }

    #[test]
    fn test_mime_unknown_extension_is_octet_stream() {
        assert_eq!(infer_mime_type("archive.xyz"), "application/octet-stream");
        assert_eq!(infer_mime_type("no-extension"), "application/octet-stream");
        assert_eq!(infer_mime_type(""), "application/octet-stream");
    }
}
