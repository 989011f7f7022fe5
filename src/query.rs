//! Search criteria over stored articles.
//!
//! [`build_filter`] turns optional criteria into an [`ArticleFilter`] without
//! touching the store; [`find_articles`] builds one and runs it. Text criteria
//! are case-insensitive patterns. The date bounds form an inclusive range
//! compared as strings, which orders correctly for `YYYY-MM-DD`.

use regex::{Regex, RegexBuilder};
use serde_json::{json, Map, Value};
use tracing::{debug, info, instrument, warn};

use crate::error::Result;
use crate::models::ArticleRecord;
use crate::storage::ArticleStore;

/// Optional lookup criteria. Empty strings are treated as absent.
#[derive(Debug, Clone, Default)]
pub struct QueryCriteria {
    pub category: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub author: Option<String>,
    pub title_keywords: Option<String>,
}

/// Inclusive bounds on `publication_date`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<String>,
    pub end: Option<String>,
}

impl DateRange {
    fn contains(&self, date: &str) -> bool {
        self.start.as_deref().is_none_or(|start| date >= start)
            && self.end.as_deref().is_none_or(|end| date <= end)
    }
}

/// A composed, not yet executed, article filter.
///
/// A record matches when every present constraint holds. A record missing
/// the constrained field never matches.
#[derive(Debug, Clone, Default)]
pub struct ArticleFilter {
    pub category: Option<Regex>,
    pub author: Option<Regex>,
    pub title: Option<Regex>,
    pub publication_date: Option<DateRange>,
}

impl ArticleFilter {
    pub fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.author.is_none()
            && self.title.is_none()
            && self.publication_date.is_none()
    }

    pub fn matches(&self, record: &ArticleRecord) -> bool {
        pattern_matches(self.category.as_ref(), record.category.as_deref())
            && pattern_matches(self.author.as_ref(), record.author.as_deref())
            && pattern_matches(self.title.as_ref(), Some(record.title.as_str()))
            && match &self.publication_date {
                None => true,
                Some(range) => record
                    .publication_date
                    .as_deref()
                    .is_some_and(|date| range.contains(date)),
            }
    }

    /// MongoDB filter form, e.g.
    /// `{"category": {"$regex": "web", "$options": "i"}}`.
    ///
    /// [`MongoStore`](crate::storage::MongoStore) sends this to the server;
    /// the other backends evaluate [`ArticleFilter::matches`] instead.
    pub fn to_document(&self) -> Value {
        let mut doc = Map::new();
        let patterns = [
            ("category", &self.category),
            ("author", &self.author),
            ("title", &self.title),
        ];
        for (field, pattern) in patterns {
            if let Some(re) = pattern {
                doc.insert(field.to_string(), json!({ "$regex": re.as_str(), "$options": "i" }));
            }
        }
        if let Some(range) = &self.publication_date {
            let mut bounds = Map::new();
            if let Some(start) = &range.start {
                bounds.insert("$gte".to_string(), json!(start));
            }
            if let Some(end) = &range.end {
                bounds.insert("$lte".to_string(), json!(end));
            }
            doc.insert("publication_date".to_string(), Value::Object(bounds));
        }
        Value::Object(doc)
    }
}

fn pattern_matches(pattern: Option<&Regex>, value: Option<&str>) -> bool {
    match pattern {
        None => true,
        Some(re) => value.is_some_and(|v| re.is_match(v)),
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Case-insensitive pattern; input that is not a valid regex is matched literally.
fn case_insensitive(field: &str, pattern: &str) -> Regex {
    match RegexBuilder::new(pattern).case_insensitive(true).build() {
        Ok(re) => re,
        Err(e) => {
            warn!(field, pattern, error = %e, "Invalid pattern; matching it literally");
            RegexBuilder::new(&regex::escape(pattern))
                .case_insensitive(true)
                .build()
                .expect("escaped pattern is a valid regex")
        }
    }
}

/// Compose a filter from optional criteria.
pub fn build_filter(criteria: &QueryCriteria) -> ArticleFilter {
    let start = present(&criteria.start_date).map(str::to_string);
    let end = present(&criteria.end_date).map(str::to_string);
    let publication_date = (start.is_some() || end.is_some()).then_some(DateRange { start, end });

    let filter = ArticleFilter {
        category: present(&criteria.category).map(|p| case_insensitive("category", p)),
        author: present(&criteria.author).map(|p| case_insensitive("author", p)),
        title: present(&criteria.title_keywords).map(|p| case_insensitive("title", p)),
        publication_date,
    };
    debug!(filter = %filter.to_document(), "Built article filter");
    filter
}

/// Build a filter from `criteria` and run it against `store`.
#[instrument(level = "info", skip(store))]
pub async fn find_articles<S: ArticleStore>(
    store: &S,
    criteria: &QueryCriteria,
) -> Result<Vec<ArticleRecord>> {
    let filter = build_filter(criteria);
    let articles = store.find(&filter).await?;
    info!(count = articles.len(), "Query complete");
    Ok(articles)
}
