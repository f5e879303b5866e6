//! Article page parser
//!
//! Turns one article page's HTML into an [`ArticleDraft`]: title, publish
//! timestamp, body markup with media placeholders, the ordered media items,
//! and the featured media element. The two containers the template
//! guarantees (the article root and the body column) are mandatory; every
//! other miss degrades to an empty or defaulted field.

use crate::extract::media::{classify_figure, media_placeholder, MediaItem};
use chrono::{DateTime, TimeZone, Utc};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Node, Selector};
use thiserror::Error;

static ARTICLE_CONTAINER: Lazy<Selector> = Lazy::new(|| Selector::parse("#article").unwrap());

static TITLE: Lazy<Selector> = Lazy::new(|| Selector::parse("header h1").unwrap());

static PUBLISH_TIME: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#".js-content-meta time[itemprop="datePublished"]"#).unwrap()
});

static BODY_CONTAINER: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(".content__main-column--article .content__article-body").unwrap()
});

static FEATURED_FIGURE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".content__main-column--article > figure").unwrap());

/// Elements serialized without a closing tag
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Errors an article parse can fail with
#[derive(Debug, Error)]
pub enum ParseError {
    /// A container the article template guarantees was missing; the page
    /// is not an article and the caller should skip it
    #[error("article structure missing: {0}")]
    Structure(&'static str),
}

/// One parsed article, before media import
#[derive(Debug, Clone)]
pub struct ArticleDraft {
    /// Article headline; empty when the page carries no heading
    pub title: String,

    /// Publish timestamp; falls back to the parse time when the page
    /// carries no usable date node
    pub published_at: DateTime<Utc>,

    /// Body HTML fragment with each classified figure replaced by an
    /// indexed placeholder comment
    pub body_markup: String,

    /// Classified in-body media in document order, deduplicated by source
    /// URL (a repeated URL reuses the first item's placeholder index)
    pub media_items: Vec<MediaItem>,

    /// The figure sitting directly under the article column, outside the
    /// body; becomes the cover image when it is an image
    pub featured_media: Option<MediaItem>,
}

/// Parses one article page's HTML.
///
/// `now` is the timestamp used when the page carries no publish date;
/// injecting it keeps parsing deterministic under test.
pub fn parse_article(html: &str, now: DateTime<Utc>) -> Result<ArticleDraft, ParseError> {
    let document = Html::parse_document(html);

    let container = document
        .select(&ARTICLE_CONTAINER)
        .next()
        .ok_or(ParseError::Structure("article container"))?;

    let title = container
        .select(&TITLE)
        .next()
        .map(|heading| heading.text().collect::<String>().trim().to_string())
        .unwrap_or_default();

    let published_at = extract_publish_time(container).unwrap_or(now);

    let body = container
        .select(&BODY_CONTAINER)
        .next()
        .ok_or(ParseError::Structure("article body container"))?;

    let mut media_items = Vec::new();
    let mut body_markup = String::new();
    serialize_children(body, &mut media_items, &mut body_markup);

    let featured_media = container
        .select(&FEATURED_FIGURE)
        .next()
        .and_then(classify_figure);

    Ok(ArticleDraft {
        title,
        published_at,
        body_markup,
        media_items,
        featured_media,
    })
}

/// Reads the millisecond-epoch publish timestamp off the date node.
///
/// `None` for a missing node, a missing attribute, or a value that does not
/// parse; the caller substitutes the processing time.
fn extract_publish_time(container: ElementRef<'_>) -> Option<DateTime<Utc>> {
    let millis: i64 = container
        .select(&PUBLISH_TIME)
        .next()?
        .value()
        .attr("data-timestamp")?
        .trim()
        .parse()
        .ok()?;

    Utc.timestamp_opt(millis / 1000, 0).single()
}

/// Serializes an element's children, stripping asides and swapping
/// classified figures for placeholder comments.
fn serialize_children(element: ElementRef<'_>, media: &mut Vec<MediaItem>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                let raw: &str = &text.text;
                out.push_str(&html_escape::encode_text(raw));
            }
            Node::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    serialize_element(child_element, media, out);
                }
            }
            // comments, doctypes, processing instructions are not content
            _ => {}
        }
    }
}

fn serialize_element(element: ElementRef<'_>, media: &mut Vec<MediaItem>, out: &mut String) {
    let name = element.value().name();

    // side notes are stripped from article bodies entirely
    if name == "aside" {
        return;
    }

    if name == "figure" {
        match classify_figure(element) {
            Some(item) => {
                let index = match media.iter().position(|m| m.source_url == item.source_url) {
                    Some(existing) => existing,
                    None => {
                        media.push(item);
                        media.len() - 1
                    }
                };
                out.push_str(&media_placeholder(index));
            }
            // figures matching neither media marker stay as-is
            None => out.push_str(&element.html()),
        }
        return;
    }

    out.push('<');
    out.push_str(name);
    for (attr, value) in element.value().attrs() {
        out.push(' ');
        out.push_str(attr);
        out.push_str("=\"");
        out.push_str(&html_escape::encode_double_quoted_attribute(value));
        out.push('"');
    }
    out.push('>');

    if VOID_ELEMENTS.contains(&name) {
        return;
    }

    serialize_children(element, media, out);

    out.push_str("</");
    out.push_str(name);
    out.push('>');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::media::MediaKind;
    use chrono::Duration;

    fn article_html(title: &str, date_node: &str, body: &str, featured: &str) -> String {
        format!(
            r#"<html><body><div id="article">
                <header><h1>{}</h1></header>
                <div class="js-content-meta">{}</div>
                <div class="content__main-column--article">
                    {}
                    <div class="content__article-body">{}</div>
                </div>
            </div></body></html>"#,
            title, date_node, featured, body
        )
    }

    fn date_node(millis: i64) -> String {
        format!(
            r#"<time itemprop="datePublished" data-timestamp="{}"></time>"#,
            millis
        )
    }

    fn now() -> DateTime<Utc> {
        Utc::now()
    }

    #[test]
    fn test_title_and_timestamp_extracted() {
        let html = article_html(
            "Flood waters rise",
            &date_node(1_500_000_000_000),
            "<p>text</p>",
            "",
        );
        let draft = parse_article(&html, now()).unwrap();

        assert_eq!(draft.title, "Flood waters rise");
        assert_eq!(draft.published_at.timestamp(), 1_500_000_000);
    }

    #[test]
    fn test_missing_title_is_empty_string() {
        let html = r#"<html><body><div id="article">
            <div class="content__main-column--article">
                <div class="content__article-body"><p>text</p></div>
            </div>
        </div></body></html>"#;
        let draft = parse_article(html, now()).unwrap();
        assert_eq!(draft.title, "");
    }

    #[test]
    fn test_missing_date_defaults_to_parse_time() {
        let parse_time = now();
        let html = article_html("T", "", "<p>text</p>", "");
        let draft = parse_article(&html, parse_time).unwrap();
        assert_eq!(draft.published_at, parse_time);
    }

    #[test]
    fn test_malformed_timestamp_defaults_to_parse_time() {
        let parse_time = now() - Duration::hours(1);
        let html = article_html(
            "T",
            r#"<time itemprop="datePublished" data-timestamp="not-a-number"></time>"#,
            "<p>text</p>",
            "",
        );
        let draft = parse_article(&html, parse_time).unwrap();
        assert_eq!(draft.published_at, parse_time);
    }

    #[test]
    fn test_missing_article_container_is_structure_error() {
        let html = r#"<html><body><div class="not-an-article"></div></body></html>"#;
        let result = parse_article(html, now());
        assert!(matches!(result, Err(ParseError::Structure(_))));
    }

    #[test]
    fn test_missing_body_container_is_structure_error() {
        let html = r#"<html><body><div id="article"><header><h1>T</h1></header></div></body></html>"#;
        let result = parse_article(html, now());
        assert!(matches!(result, Err(ParseError::Structure(_))));
    }

    #[test]
    fn test_asides_removed_from_body() {
        let html = article_html(
            "T",
            &date_node(1_500_000_000_000),
            r#"<p>keep</p><aside class="element-rich-link"><a href="/x">related</a></aside><p>also keep</p>"#,
            "",
        );
        let draft = parse_article(&html, now()).unwrap();
        assert!(draft.body_markup.contains("<p>keep</p>"));
        assert!(draft.body_markup.contains("<p>also keep</p>"));
        assert!(!draft.body_markup.contains("aside"));
        assert!(!draft.body_markup.contains("related"));
    }

    #[test]
    fn test_classified_figures_become_placeholders() {
        let html = article_html(
            "T",
            &date_node(1_500_000_000_000),
            r#"<p>intro</p>
               <figure class="element element-image">
                   <picture><source srcset="https://m.example.com/a.jpg 300w, https://m.example.com/a-big.jpg 1200w"></picture>
                   <figcaption>cap</figcaption>
               </figure>"#,
            "",
        );
        let draft = parse_article(&html, now()).unwrap();

        assert_eq!(draft.media_items.len(), 1);
        assert_eq!(draft.media_items[0].kind, MediaKind::Image);
        assert_eq!(draft.media_items[0].source_url, "https://m.example.com/a-big.jpg");
        assert!(draft.body_markup.contains("<!--media:0-->"));
        assert!(!draft.body_markup.contains("srcset"));
    }

    #[test]
    fn test_unclassified_figure_left_verbatim() {
        let html = article_html(
            "T",
            &date_node(1_500_000_000_000),
            r#"<figure class="element-pullquote"><blockquote>q</blockquote></figure>"#,
            "",
        );
        let draft = parse_article(&html, now()).unwrap();
        assert!(draft.media_items.is_empty());
        assert!(draft.body_markup.contains("element-pullquote"));
        assert!(draft.body_markup.contains("<blockquote>q</blockquote>"));
    }

    #[test]
    fn test_repeated_source_url_reuses_placeholder_index() {
        let figure = r#"<figure class="element-image"><picture><source srcset="https://m.example.com/same.jpg 100w"></picture></figure>"#;
        let html = article_html(
            "T",
            &date_node(1_500_000_000_000),
            &format!("{}<p>mid</p>{}", figure, figure),
            "",
        );
        let draft = parse_article(&html, now()).unwrap();

        assert_eq!(draft.media_items.len(), 1);
        assert_eq!(draft.body_markup.matches("<!--media:0-->").count(), 2);
    }

    #[test]
    fn test_media_items_in_document_order() {
        let html = article_html(
            "T",
            &date_node(1_500_000_000_000),
            r#"<figure class="element-image"><picture><source srcset="first.jpg 100w"></picture></figure>
               <figure class="element element-video"><picture><source srcset="second.mp4"></picture></figure>"#,
            "",
        );
        let draft = parse_article(&html, now()).unwrap();

        assert_eq!(draft.media_items.len(), 2);
        assert_eq!(draft.media_items[0].source_url, "first.jpg");
        assert_eq!(draft.media_items[1].source_url, "second.mp4");
        assert_eq!(draft.media_items[1].kind, MediaKind::Video);
    }

    #[test]
    fn test_featured_media_from_column_child() {
        let html = article_html(
            "T",
            &date_node(1_500_000_000_000),
            "<p>body</p>",
            r#"<figure class="element element-image">
                <picture><source srcset="https://m.example.com/cover.jpg 500w"></picture>
            </figure>"#,
        );
        let draft = parse_article(&html, now()).unwrap();

        let featured = draft.featured_media.unwrap();
        assert_eq!(featured.kind, MediaKind::Image);
        assert_eq!(featured.source_url, "https://m.example.com/cover.jpg");
        // the featured figure lives outside the body and is not an in-body item
        assert!(draft.media_items.is_empty());
    }

    #[test]
    fn test_no_featured_media() {
        let html = article_html("T", &date_node(1_500_000_000_000), "<p>body</p>", "");
        let draft = parse_article(&html, now()).unwrap();
        assert!(draft.featured_media.is_none());
    }

    #[test]
    fn test_nested_markup_survives_serialization() {
        let html = article_html(
            "T",
            &date_node(1_500_000_000_000),
            r#"<p>a <strong>bold <em>claim</em></strong> here</p><ul><li>one</li><li>two</li></ul>"#,
            "",
        );
        let draft = parse_article(&html, now()).unwrap();
        assert!(draft
            .body_markup
            .contains("<strong>bold <em>claim</em></strong>"));
        assert!(draft.body_markup.contains("<li>two</li>"));
    }

    #[test]
    fn test_attributes_preserved_in_serialization() {
        let html = article_html(
            "T",
            &date_node(1_500_000_000_000),
            r#"<p><a href="https://example.com/more" class="u-underline">more</a></p>"#,
            "",
        );
        let draft = parse_article(&html, now()).unwrap();
        assert!(draft.body_markup.contains(r#"href="https://example.com/more""#));
        assert!(draft.body_markup.contains(r#"class="u-underline""#));
    }

    #[test]
    fn test_void_elements_not_closed() {
        let html = article_html(
            "T",
            &date_node(1_500_000_000_000),
            r#"<p>line<br>break</p>"#,
            "",
        );
        let draft = parse_article(&html, now()).unwrap();
        assert!(draft.body_markup.contains("<br>"));
        assert!(!draft.body_markup.contains("</br>"));
    }
}
