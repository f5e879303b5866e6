//! Embedded media extraction and body rendering
//!
//! Article bodies embed media as figure elements carrying a class marker,
//! a `<picture><source srcset>` block, and an optional caption. This module
//! classifies those figures into [`MediaItem`]s and, after import, rewrites
//! the body's placeholder comments into markup referencing the stored media.

use crate::store::StoredMediaRef;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Selector};

static PICTURE_SOURCE: Lazy<Selector> = Lazy::new(|| Selector::parse("picture source").unwrap());

static FIGCAPTION: Lazy<Selector> = Lazy::new(|| Selector::parse("figcaption").unwrap());

/// Kind of embedded media a figure represents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

/// One embedded media unit extracted from an article page
#[derive(Debug, Clone, PartialEq)]
pub struct MediaItem {
    pub kind: MediaKind,

    /// URL of the media asset, the best candidate from the figure's srcset
    pub source_url: String,

    pub caption: Option<String>,
}

/// Classifies a figure element and extracts its source URL and caption.
///
/// Returns `None` when the figure matches neither class marker or carries
/// no usable source; such figures are not media and stay in the body
/// untouched.
pub fn classify_figure(figure: ElementRef<'_>) -> Option<MediaItem> {
    let class = figure.value().attr("class").unwrap_or("");

    // element-video is tested first: the image marker is a bare substring
    // and must not swallow video figures.
    let kind = if class.contains("element-video") {
        MediaKind::Video
    } else if class.contains("image") {
        MediaKind::Image
    } else {
        return None;
    };

    let srcset = figure
        .select(&PICTURE_SOURCE)
        .next()
        .and_then(|source| source.value().attr("srcset"))?;
    let source_url = best_srcset_candidate(srcset)?;

    let caption = figure
        .select(&FIGCAPTION)
        .next()
        .map(|caption| caption.text().collect::<String>().trim().to_string())
        .filter(|caption| !caption.is_empty());

    Some(MediaItem {
        kind,
        source_url,
        caption,
    })
}

/// Picks the candidate with the largest width descriptor from a srcset
/// value, falling back to the first candidate when no widths are given.
fn best_srcset_candidate(srcset: &str) -> Option<String> {
    let mut best: Option<&str> = None;
    let mut best_width = -1i64;

    for chunk in srcset.split(',') {
        let mut parts = chunk.split_whitespace();
        let url = match parts.next() {
            Some(url) => url,
            None => continue,
        };
        let width = parts
            .next()
            .and_then(|descriptor| descriptor.strip_suffix('w'))
            .and_then(|digits| digits.parse::<i64>().ok())
            .unwrap_or(0);

        if width > best_width {
            best = Some(url);
            best_width = width;
        }
    }

    best.map(str::to_string)
}

/// The placeholder comment the article parser leaves where a classified
/// figure stood.
pub fn media_placeholder(index: usize) -> String {
    format!("<!--media:{}-->", index)
}

/// Rewrites placeholder comments into markup referencing imported media.
///
/// `imported` is positionally aligned with `items`; a `None` entry means
/// the import failed and the whole figure is dropped from the body.
pub fn render_body(
    body_markup: &str,
    items: &[MediaItem],
    imported: &[Option<StoredMediaRef>],
) -> String {
    let mut rendered = body_markup.to_string();
    for (index, item) in items.iter().enumerate() {
        let placeholder = media_placeholder(index);
        let replacement = match imported.get(index).and_then(Option::as_ref) {
            Some(stored) => render_figure(item, stored),
            None => String::new(),
        };
        rendered = rendered.replace(&placeholder, &replacement);
    }
    rendered
}

/// Renders one imported media item back into figure markup, referencing the
/// stored media row by id.
fn render_figure(item: &MediaItem, stored: &StoredMediaRef) -> String {
    let caption = match &item.caption {
        Some(text) => format!("<figcaption>{}</figcaption>", html_escape::encode_text(text)),
        None => String::new(),
    };

    match item.kind {
        MediaKind::Image => format!(
            r#"<figure><picture><img src="media/{}"></picture>{}</figure>"#,
            stored.id, caption
        ),
        MediaKind::Video => format!(
            r#"<figure><video src="media/{}" controls></video>{}</figure>"#,
            stored.id, caption
        ),
    }
}
