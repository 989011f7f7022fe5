//! Document store for harvested articles.
//!
//! The harvester and the query path only see the [`ArticleStore`] trait. The
//! handle is built once in `main` and passed down by reference.
//!
//! # Backends
//!
//! | Backend | Module | Notes |
//! |---------|--------|-------|
//! | MongoDB | [`mongo`] | `{database}.{collection}` on the server at `uri`; filters run server-side |
//! | JSON Lines file | [`jsonl`] | `{data_dir}/{database}/{collection}.jsonl`, one document per line |
//! | In memory | [`memory`] | Used by `harvest --dry-run` and tests |
//!
//! Inserts are append-only: no update, no dedup key.

use crate::error::Result;
use crate::models::ArticleRecord;
use crate::query::ArticleFilter;

pub mod jsonl;
pub mod memory;
pub mod mongo;

pub use jsonl::JsonLinesStore;
pub use memory::MemoryStore;
pub use mongo::MongoStore;

/// Insert-and-find access to one collection of article documents.
#[allow(async_fn_in_trait)]
pub trait ArticleStore {
    /// Append one record to the collection.
    async fn insert_one(&self, record: &ArticleRecord) -> Result<()>;

    /// Every stored record matching `filter`, in insertion order.
    async fn find(&self, filter: &ArticleFilter) -> Result<Vec<ArticleRecord>>;
}
