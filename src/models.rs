//! Data models for harvested articles.
//!
//! - [`ArticleRecord`]: one article as stored in the document collection
//! - [`DetailContent`]: what a successful detail-page parse contributes to a record
//!
//! Field names are the stored document keys, so `resume` keeps the site's
//! own word for the listing excerpt.

use serde::{Deserialize, Serialize};

/// One harvested article.
///
/// Built from a listing entry, enriched once by the detail page, then
/// inserted into the store. `title` and `url` are always present; `url` is
/// absolute.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ArticleRecord {
    /// Normalized headline text.
    pub title: String,
    /// Absolute link to the detail page.
    pub url: String,
    /// Listing thumbnail image URL.
    pub thumbnail: Option<String>,
    /// Short badge label shown on the listing entry.
    pub category: Option<String>,
    /// Tag labels, in document order.
    #[serde(default)]
    pub subcategory: Vec<String>,
    /// Listing excerpt.
    pub resume: Option<String>,
    /// `YYYY-MM-DD`, or `None` when the listing date could not be read.
    pub publication_date: Option<String>,
    pub author: Option<String>,
    /// Normalized article body.
    pub content: Option<String>,
    /// Image sources found inside the article body.
    #[serde(default)]
    pub images: Vec<String>,
}

impl ArticleRecord {
    /// A record carrying only the two required fields.
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            thumbnail: None,
            category: None,
            subcategory: Vec::new(),
            resume: None,
            publication_date: None,
            author: None,
            content: None,
            images: Vec::new(),
        }
    }

    /// Overwrite the detail-sourced fields with what the detail page produced.
    ///
    /// Detail values always win, including `None` authors and empty tag lists.
    pub fn apply_detail(&mut self, detail: DetailContent) {
        self.content = detail.content;
        self.images = detail.images;
        self.author = detail.author;
        self.subcategory = detail.subcategories;
    }
}

/// Fields extracted from an article's detail page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailContent {
    pub content: Option<String>,
    pub images: Vec<String>,
    pub author: Option<String>,
    pub subcategories: Vec<String>,
}
