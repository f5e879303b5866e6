//! Media importer
//!
//! Downloads a media item's bytes through the shared fetcher, stages them
//! to a temp file named from the URL's last path segment, and imports them
//! into the content store's media library. The staged file is removed once
//! the store has accepted the upload; cleanup on failure is best-effort.

use crate::extract::MediaItem;
use crate::fetch::{DocumentFetcher, FetchError};
use crate::store::{ContentStore, StoreError, StoredMediaRef};
use std::path::PathBuf;
use thiserror::Error;
use url::Url;

/// Errors a media import can fail with
///
/// All of them are recovered by the caller: the one figure is dropped and
/// the article proceeds without it.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The media bytes could not be downloaded
    #[error("download failed: {0}")]
    Download(#[from] FetchError),

    /// The content store refused the upload
    #[error("store rejected media: {0}")]
    Store(#[from] StoreError),

    /// The staging file could not be written or created
    #[error("staging failed: {0}")]
    Staging(#[from] std::io::Error),
}

/// Imports media items into the content store via a staging directory
pub struct MediaImporter {
    temp_dir: PathBuf,
}

impl MediaImporter {
    pub fn new(temp_dir: impl Into<PathBuf>) -> Self {
        Self {
            temp_dir: temp_dir.into(),
        }
    }

    /// Downloads one media item and imports it into the store's library.
    ///
    /// The returned reference carries the store-assigned id and the mime
    /// type inferred from the file name; the media row stays unattached
    /// until the caller associates it with its article.
    pub async fn import<S: ContentStore>(
        &self,
        fetcher: &DocumentFetcher,
        store: &mut S,
        item: &MediaItem,
    ) -> Result<StoredMediaRef, ImportError> {
        let file_name = file_name_from_url(&item.source_url);
        let bytes = fetcher.fetch_bytes(&item.source_url).await?;

        std::fs::create_dir_all(&self.temp_dir)?;
        let staging_path = self.temp_dir.join(&file_name);
        std::fs::write(&staging_path, &bytes)?;

        let result = store.import_media(&bytes, &file_name);

        if let Err(e) = std::fs::remove_file(&staging_path) {
            tracing::debug!(
                path = %staging_path.display(),
                error = %e,
                "could not remove staging file"
            );
        }

        Ok(result?)
    }
}

/// Derives a staging file name from the URL's final path segment.
fn file_name_from_url(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|parsed| {
            parsed
                .path_segments()
                .and_then(|segments| segments.last().map(str::to_string))
        })
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "media.bin".to_string())
}
