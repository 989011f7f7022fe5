//! Metadata extraction from one listing entry.
//!
//! Each function reads a single field from an entry subtree and never fails:
//! a missing element yields `None` (or an empty list). Only the title link is
//! mandatory; without it [`extract_entry`] produces no record.

use scraper::ElementRef;
use tracing::{debug, warn};

use super::{element_text, select_all_text, select_first};
use crate::models::ArticleRecord;
use crate::utils::{absolutize_url, parse_local_date};

const TITLE_LINK_SELECTORS: &[&str] = &[".post-title a", "h2 a", ".article-title a", ".entry-title a"];
const HEADING_SELECTOR: &str = "h2, h3, h4";
const THUMBNAIL_SELECTORS: &[&str] = &[".entry-image img", ".post-thumbnail img"];
const CATEGORY_SELECTORS: &[&str] = &["span.favtag.color-b"];
const TAG_LINK_SELECTOR: &str = "a.post-tags";
const EXCERPT_SELECTORS: &[&str] = &["div.entry-excerpt"];
const DATE_SELECTORS: &[&str] = &["time.entry-date", ".posted-on time"];
const AUTHOR_SELECTORS: &[&str] = &[".author a", ".posted-by a"];

/// One way of locating the title link inside an entry.
type LinkStrategy = for<'a> fn(ElementRef<'a>) -> Option<ElementRef<'a>>;

/// Tried in order; the first strategy that finds a link wins.
const TITLE_LINK_STRATEGIES: &[LinkStrategy] = &[title_link_by_selector, title_link_by_heading];

fn title_link_by_selector(entry: ElementRef<'_>) -> Option<ElementRef<'_>> {
    select_first(entry, TITLE_LINK_SELECTORS)
}

/// First heading of the entry, then a link inside it or the link wrapping it.
fn title_link_by_heading(entry: ElementRef<'_>) -> Option<ElementRef<'_>> {
    let heading = select_first(entry, &[HEADING_SELECTOR])?;
    debug!(heading = ?element_text(heading), "Falling back to heading lookup");

    let link = select_first(heading, &["a"]).or_else(|| {
        heading
            .ancestors()
            .filter_map(ElementRef::wrap)
            .find(|el| el.value().name() == "a")
    });
    if link.is_none() {
        warn!("Heading found but no link around or inside it");
    }
    link
}

/// Locate the title link of an entry.
///
/// Tries `.post-title a`, `h2 a`, `.article-title a` and `.entry-title a`
/// first, then the first `h2`/`h3`/`h4` heading with a link inside or around it.
pub fn extract_title_link(entry: ElementRef<'_>) -> Option<ElementRef<'_>> {
    TITLE_LINK_STRATEGIES.iter().find_map(|strategy| strategy(entry))
}

/// `src` of the thumbnail image.
///
/// # Arguments
///
/// * `entry` - The listing entry subtree.
///
/// # Returns
///
/// The `src` of the first `.entry-image img`, else of `.post-thumbnail img`.
/// `None` when neither exists or the image has no `src`.
pub fn extract_thumbnail(entry: ElementRef<'_>) -> Option<String> {
    select_first(entry, THUMBNAIL_SELECTORS)
        .and_then(|img| img.value().attr("src"))
        .map(str::to_string)
}

/// Primary category label, read from `span.favtag.color-b`.
pub fn extract_category(entry: ElementRef<'_>) -> Option<String> {
    select_first(entry, CATEGORY_SELECTORS).and_then(element_text)
}

/// Every tag label of the entry, in document order.
pub fn extract_subcategories(entry: ElementRef<'_>) -> Vec<String> {
    select_all_text(entry, TAG_LINK_SELECTOR)
}

/// Normalized summary text from `div.entry-excerpt`.
pub fn extract_excerpt(entry: ElementRef<'_>) -> Option<String> {
    select_first(entry, EXCERPT_SELECTORS).and_then(element_text)
}

/// Publication date as `YYYY-MM-DD`.
///
/// # Arguments
///
/// * `entry` - The listing entry subtree.
///
/// # Returns
///
/// The text of `time.entry-date` (or `.posted-on time` when absent) run through
/// [`parse_local_date`]. `None` when no time element exists or its text has
/// fewer than three words.
pub fn extract_date(entry: ElementRef<'_>) -> Option<String> {
    let time = select_first(entry, DATE_SELECTORS)?;
    parse_local_date(Some(time.text().collect::<String>().as_str()))
}

/// Author name from `.author a`, else `.posted-by a`.
pub fn extract_author(entry: ElementRef<'_>) -> Option<String> {
    select_first(entry, AUTHOR_SELECTORS).and_then(element_text)
}

/// Build a record from one listing entry.
///
/// Returns `None` when no title link is found, or when the link has no text
/// or no `href`. Relative hrefs are resolved against `base_url`.
pub fn extract_entry(entry: ElementRef<'_>, base_url: &str) -> Option<ArticleRecord> {
    let Some(link) = extract_title_link(entry) else {
        warn!("No title link found in entry");
        return None;
    };

    let Some(title) = element_text(link).filter(|t| !t.is_empty()) else {
        warn!("Title link has no text");
        return None;
    };
    let Some(href) = link.value().attr("href").map(str::trim).filter(|h| !h.is_empty()) else {
        warn!(%title, "Title link has no href");
        return None;
    };
    let url = absolutize_url(base_url, href);
    debug!(%title, %url, "Found title link");

    Some(ArticleRecord {
        title,
        url,
        thumbnail: extract_thumbnail(entry),
        category: extract_category(entry),
        subcategory: extract_subcategories(entry),
        resume: extract_excerpt(entry),
        publication_date: extract_date(entry),
        author: extract_author(entry),
        content: None,
        images: Vec::new(),
    })
}
