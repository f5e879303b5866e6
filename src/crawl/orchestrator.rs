//! Crawl orchestrator
//!
//! Drives the whole run as an explicit loop over listing pages. At every
//! listing boundary three conditions are checked, in contract order:
//! pagination exhausted, duplicate latched, article limit reached. The
//! duplicate latch deliberately takes effect only at the boundary — the
//! page that produced the duplicate still gets its remaining articles
//! attempted, up to the limit.
//!
//! Failure handling is asymmetric by design: a listing page that cannot be
//! fetched ends the run (there is no list of articles to recover), while a
//! single article or media item that fails is logged and skipped.

use crate::config::Config;
use crate::crawl::gate::article_exists;
use crate::crawl::importer::MediaImporter;
use crate::extract::{parse_article, parse_listing, render_body, MediaKind};
use crate::fetch::DocumentFetcher;
use crate::store::{ContentStore, NewArticle, StoredMediaRef};
use crate::PressError;
use chrono::Utc;
use url::Url;

/// Why a run stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The listing chain ran out of next-page links
    PaginationExhausted,

    /// The configured article limit was reached
    LimitReached,

    /// An already-stored article was seen; the current page was finished
    /// but no further listing page was requested
    DuplicateFound,

    /// A listing page could not be fetched or returned an error status
    ListingFetchFailed,
}

impl StopReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PaginationExhausted => "pagination-exhausted",
            Self::LimitReached => "limit-reached",
            Self::DuplicateFound => "duplicate-found",
            Self::ListingFetchFailed => "listing-fetch-failed",
        }
    }
}

/// Result of one scrape run
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// Articles actually written this run
    pub articles_scraped: u32,

    /// Listing pages fetched
    pub pages_visited: u32,

    pub stop: StopReason,
}

/// What processing one article amounted to
enum ArticleOutcome {
    /// Written to the store
    Written,

    /// Already stored; latches the duplicate flag
    Duplicate,

    /// Fetch or parse failed; the article is lost, the run continues
    Skipped,
}

/// Drives one scrape run against a content store
pub struct Crawler<S: ContentStore> {
    config: Config,
    fetcher: DocumentFetcher,
    importer: MediaImporter,
    store: S,
}

impl<S: ContentStore> Crawler<S> {
    pub fn new(config: Config, store: S) -> Result<Self, PressError> {
        let fetcher = DocumentFetcher::new(&config.http)?;
        let importer = MediaImporter::new(&config.store.temp_dir);

        Ok(Self {
            config,
            fetcher,
            importer,
            store,
        })
    }

    /// Runs the crawl to completion and records the run in the store.
    pub async fn run(&mut self, config_hash: &str) -> Result<CrawlReport, PressError> {
        let run_id = self.store.create_run(config_hash)?;
        tracing::info!(
            run_id,
            url = %self.config.source.listing_url,
            limit = self.config.source.article_limit,
            "starting scrape run"
        );

        let report = self.crawl_loop(run_id).await?;

        self.store
            .complete_run(run_id, report.stop.as_str(), report.articles_scraped)?;
        tracing::info!(
            articles = report.articles_scraped,
            pages = report.pages_visited,
            stop = report.stop.as_str(),
            "scrape run finished"
        );

        Ok(report)
    }

    async fn crawl_loop(&mut self, run_id: i64) -> Result<CrawlReport, PressError> {
        let limit = self.config.source.article_limit;
        let mut next_url = Some(self.config.source.listing_url.clone());
        let mut scraped: u32 = 0;
        let mut pages_visited: u32 = 0;
        let mut duplicate_found = false;

        let stop = loop {
            let url = match next_url.take() {
                Some(url) => url,
                None => break StopReason::PaginationExhausted,
            };
            if duplicate_found {
                break StopReason::DuplicateFound;
            }
            if scraped >= limit {
                break StopReason::LimitReached;
            }

            let listing_doc = match self.fetcher.fetch(&url).await {
                Ok(doc) => doc,
                Err(e) => {
                    tracing::error!(url = %url, error = %e, "listing fetch failed, ending run");
                    break StopReason::ListingFetchFailed;
                }
            };
            pages_visited += 1;

            let listing = parse_listing(&listing_doc.body);
            tracing::debug!(
                url = %url,
                articles = listing.article_urls.len(),
                has_next = listing.next_url.is_some(),
                "parsed listing page"
            );

            for href in &listing.article_urls {
                if scraped >= limit {
                    break;
                }

                let article_url = resolve_href(&listing_doc.final_url, href);
                match self.process_article(&article_url, run_id).await? {
                    ArticleOutcome::Written => scraped += 1,
                    ArticleOutcome::Duplicate => duplicate_found = true,
                    ArticleOutcome::Skipped => {}
                }
            }

            next_url = listing
                .next_url
                .map(|href| resolve_href(&listing_doc.final_url, &href));
        };

        Ok(CrawlReport {
            articles_scraped: scraped,
            pages_visited,
            stop,
        })
    }

    /// Fetches, parses, gates, and writes one article.
    ///
    /// Fetch and parse failures resolve to `Skipped`; store failures
    /// propagate and end the run.
    async fn process_article(
        &mut self,
        url: &str,
        run_id: i64,
    ) -> Result<ArticleOutcome, PressError> {
        let doc = match self.fetcher.fetch(url).await {
            Ok(doc) => doc,
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "article fetch failed, skipping");
                return Ok(ArticleOutcome::Skipped);
            }
        };

        let draft = match parse_article(&doc.body, Utc::now()) {
            Ok(draft) => draft,
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "article parse failed, skipping");
                return Ok(ArticleOutcome::Skipped);
            }
        };

        if article_exists(&self.store, &draft.title, &draft.published_at)? {
            tracing::info!(title = %draft.title, "article already stored");
            return Ok(ArticleOutcome::Duplicate);
        }

        // in-body media first, so the body can be rendered before the write
        let mut imported: Vec<Option<StoredMediaRef>> =
            Vec::with_capacity(draft.media_items.len());
        for item in &draft.media_items {
            match self
                .importer
                .import(&self.fetcher, &mut self.store, item)
                .await
            {
                Ok(stored) => imported.push(Some(stored)),
                Err(e) => {
                    tracing::warn!(
                        url = %item.source_url,
                        error = %e,
                        "media import failed, dropping figure"
                    );
                    imported.push(None);
                }
            }
        }

        let body = render_body(&draft.body_markup, &draft.media_items, &imported);
        let article_id = self.store.create_article(&NewArticle {
            title: draft.title.clone(),
            published_at: draft.published_at,
            body,
            run_id: Some(run_id),
        })?;

        for stored in imported.iter().flatten() {
            self.store.attach_media(stored.id, article_id)?;
        }

        if let Some(featured) = &draft.featured_media {
            match self
                .importer
                .import(&self.fetcher, &mut self.store, featured)
                .await
            {
                Ok(stored) => {
                    self.store.attach_media(stored.id, article_id)?;
                    if featured.kind == MediaKind::Image {
                        self.store.set_cover_image(article_id, stored.id)?;
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        url = %featured.source_url,
                        error = %e,
                        "featured media import failed"
                    );
                }
            }
        }

        tracing::info!(article_id, title = %draft.title, "article written");
        Ok(ArticleOutcome::Written)
    }
}

/// Resolves a possibly-relative href against the page it was found on.
/// An unresolvable href is passed through as-is and left to fail at fetch
/// time, where the failure is already handled per-article.
fn resolve_href(base: &str, href: &str) -> String {
    match Url::parse(base).and_then(|base_url| base_url.join(href)) {
        Ok(resolved) => resolved.to_string(),
        Err(_) => href.to_string(),
    }
}
