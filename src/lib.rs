//! # Article Harvester
//!
//! Crawls a paginated news listing, extracts structured metadata from each
//! entry, follows every entry to its detail page for the article body, and
//! stores one document per article. Stored articles can then be looked up by
//! category, date range, author or title keywords.
//!
//! ## Architecture
//!
//! The crawl is strictly sequential:
//! 1. **Listing**: fetch one listing page and locate its entries
//! 2. **Fields**: extract title, link, thumbnail, category, tags, excerpt, date, author
//! 3. **Detail**: fetch the article page for body text, images, byline and tags
//! 4. **Store**: insert the merged record into the document collection
//!
//! Failures degrade instead of propagating: an unreachable page yields no
//! record, a bad entry is skipped, and the crawl moves on.

pub mod cli;
pub mod config;
pub mod error;
pub mod http;
pub mod models;
pub mod query;
pub mod scrapers;
pub mod storage;
pub mod utils;
