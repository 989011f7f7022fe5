//! Listing and detail page scraping.
//!
//! The pipeline for one listing page:
//!
//! 1. **Listing**: fetch the page, drop the promotional block, locate entries ([`listing`])
//! 2. **Fields**: pull metadata out of each entry ([`fields`])
//! 3. **Content**: follow the entry's link and read the article body ([`content`])
//! 4. **Store**: insert the merged record and collect it
//!
//! Every field is looked up through an ordered list of CSS selectors where the
//! first match wins. A missing element is a normal outcome and becomes `None`
//! or an empty list. A selector that fails to parse is logged and counts as a
//! miss, so one bad selector never takes the whole record down.

use scraper::{ElementRef, Selector};
use tracing::warn;

use crate::utils::normalize_text;

pub mod content;
pub mod fields;
pub mod listing;

pub(crate) fn parse_selector(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(selector) => Some(selector),
        Err(e) => {
            warn!(selector = css, error = ?e, "Invalid selector; treating as not found");
            None
        }
    }
}

/// First element matched by the first selector in `selectors` that matches anything.
pub(crate) fn select_first<'a>(scope: ElementRef<'a>, selectors: &[&str]) -> Option<ElementRef<'a>> {
    selectors
        .iter()
        .filter_map(|css| parse_selector(css))
        .find_map(|selector| scope.select(&selector).next())
}

/// Normalized text of every element matching `css`, skipping empty ones.
pub(crate) fn select_all_text(scope: ElementRef<'_>, css: &str) -> Vec<String> {
    let Some(selector) = parse_selector(css) else {
        return Vec::new();
    };
    scope
        .select(&selector)
        .filter_map(element_text)
        .filter(|text| !text.is_empty())
        .collect()
}

pub(crate) fn element_text(element: ElementRef<'_>) -> Option<String> {
    normalize_text(Some(element.text().collect::<String>().as_str()))
}
