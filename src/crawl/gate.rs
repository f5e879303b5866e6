//! Duplicate detection against the content store
//!
//! The (title, published_at) pair is the article's natural key. It is a
//! weak key: two distinct articles with the same title text and the same
//! second-rounded timestamp are indistinguishable, and a page whose date
//! node is missing gets a parse-time timestamp that will never collide.
//! Both edges are accepted; the gate is still the single point of truth
//! for "have we already stored this article".

use crate::store::{ContentStore, StoreResult};
use chrono::{DateTime, Utc};

/// Asks the store whether an article with this natural key already exists.
///
/// Pure query, no mutation. A `true` answer is the sole trigger for the
/// orchestrator's duplicate latch; a query failure propagates and ends the
/// run, since crawl correctness depends on the answer.
pub fn article_exists<S: ContentStore>(
    store: &S,
    title: &str,
    published_at: &DateTime<Utc>,
) -> StoreResult<bool> {
    Ok(store.find_article(title, published_at)?.is_some())
}
