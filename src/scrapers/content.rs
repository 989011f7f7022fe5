//! Article detail pages.
//!
//! A detail page contributes the article body, the images inside it, the
//! byline and the tag links. [`fetch_content`] downloads the page and hands
//! the body to [`parse_detail`], which is pure and never fails.

use scraper::Html;
use tracing::{debug, error, info, instrument, warn};

use super::{element_text, parse_selector, select_all_text, select_first};
use crate::http::HttpClient;
use crate::models::DetailContent;
use crate::utils::{normalize_text, truncate_for_log};

const AUTHOR_SELECTORS: &[&str] = &[".author a", ".meta-author a", ".byline a", ".entry-meta a"];
const TAG_LINK_SELECTOR: &str = "a.post-tags";
const CONTENT_SELECTOR: &str = "div.entry-content";
const BLOCK_SELECTOR: &str = "p, h2, h3";
const IMAGE_SELECTOR: &str = "img";

/// Download and parse one detail page.
///
/// `None` means the page could not be fetched (transport error or non-2xx
/// status); the error is logged here and the caller keeps what it already
/// had. A fetched page always yields `Some`, even when nothing was found in it.
#[instrument(level = "info", skip(client))]
pub async fn fetch_content(client: &HttpClient, url: &str) -> Option<DetailContent> {
    match client.get_text(url).await {
        Ok(body) => Some(parse_detail(&body)),
        Err(e) => {
            error!(error = %e, "Failed to fetch article detail page");
            None
        }
    }
}

/// Extract body text, images, byline and tags from a detail page.
///
/// Without a content container, `content` is `None` and `images` is empty,
/// but the byline and tags found elsewhere on the page are still returned.
pub fn parse_detail(html: &str) -> DetailContent {
    let document = Html::parse_document(html);
    let root = document.root_element();

    let author = select_first(root, AUTHOR_SELECTORS).and_then(element_text);
    match &author {
        Some(author) => debug!(%author, "Found author"),
        None => warn!("No author on detail page"),
    }

    let subcategories = select_all_text(root, TAG_LINK_SELECTOR);
    debug!(tags = ?subcategories, "Found tags");

    let Some(container) = select_first(root, &[CONTENT_SELECTOR]) else {
        warn!("No content container on detail page");
        return DetailContent {
            content: None,
            images: Vec::new(),
            author,
            subcategories,
        };
    };

    let content = parse_selector(BLOCK_SELECTOR).and_then(|blocks| {
        let joined = container
            .select(&blocks)
            .map(|block| block.text().collect::<String>().trim().to_string())
            .collect::<Vec<_>>()
            .join(" ");
        normalize_text(Some(joined.as_str()))
    });

    let images: Vec<String> = parse_selector(IMAGE_SELECTOR)
        .map(|img| {
            container
                .select(&img)
                .filter_map(|el| el.value().attr("src"))
                .filter(|src| !src.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    info!(
        bytes = content.as_ref().map_or(0, String::len),
        images = images.len(),
        "Parsed article detail page"
    );
    if let Some(text) = &content {
        debug!(preview = %truncate_for_log(text, 120), "Article content");
    }

    DetailContent {
        content,
        images,
        author,
        subcategories,
    }
}
