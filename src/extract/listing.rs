//! Listing page parser
//!
//! Extracts the ordered article links and the next-page link from one page
//! of the paginated index. Parsing never fails: any missing structure
//! degrades to fewer (or zero) results.

use once_cell::sync::Lazy;
use scraper::{Html, Selector};

static INDEX_CONTAINER: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.index-page").unwrap());

static ITEM_LINKS: Lazy<Selector> =
    Lazy::new(|| Selector::parse("section .fc-item__container .fc-item__content a").unwrap());

static NEXT_LINK: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(".fc-container__pagination .pagination__list [rel=next]").unwrap()
});

/// One parsed listing page
#[derive(Debug, Clone, Default)]
pub struct ListingPage {
    /// Article link hrefs in document order, exactly as written in the
    /// page (no normalization; resolution against the page URL is the
    /// caller's job)
    pub article_urls: Vec<String>,

    /// Href of the next index page; `None` is the pagination stop signal
    pub next_url: Option<String>,
}

/// Parses one listing page's HTML.
///
/// A page without the index container (or without anything recognizable at
/// all) yields an empty `ListingPage`, never an error.
pub fn parse_listing(html: &str) -> ListingPage {
    let document = Html::parse_document(html);

    let container = match document.select(&INDEX_CONTAINER).next() {
        Some(container) => container,
        None => return ListingPage::default(),
    };

    let article_urls = container
        .select(&ITEM_LINKS)
        .filter_map(|anchor| anchor.value().attr("href"))
        .map(str::to_string)
        .collect();

    let next_url = container
        .select(&NEXT_LINK)
        .next()
        .and_then(|anchor| anchor.value().attr("href"))
        .map(str::to_string);

    ListingPage {
        article_urls,
        next_url,
    }
}
