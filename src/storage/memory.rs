//! In-process collection.

use std::sync::{Mutex, MutexGuard, PoisonError};

use super::ArticleStore;
use crate::error::Result;
use crate::models::ArticleRecord;
use crate::query::ArticleFilter;

#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<Vec<ArticleRecord>>,
}

impl MemoryStore {
    fn lock(&self) -> MutexGuard<'_, Vec<ArticleRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Snapshot of every stored record.
    pub fn records(&self) -> Vec<ArticleRecord> {
        self.lock().clone()
    }
}

impl ArticleStore for MemoryStore {
    async fn insert_one(&self, record: &ArticleRecord) -> Result<()> {
        self.lock().push(record.clone());
        Ok(())
    }

    async fn find(&self, filter: &ArticleFilter) -> Result<Vec<ArticleRecord>> {
        Ok(self
            .lock()
            .iter()
            .filter(|record| filter.matches(record))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_keeps_duplicates_in_order() {
        let store = MemoryStore::default();
        let first = ArticleRecord::new("Un", "https://x.test/1");
        store.insert_one(&first).await.unwrap();
        store.insert_one(&ArticleRecord::new("Deux", "https://x.test/2")).await.unwrap();
        store.insert_one(&first).await.unwrap();

        let titles: Vec<String> = store.records().into_iter().map(|r| r.title).collect();
        assert_eq!(titles, vec!["Un", "Deux", "Un"]);
        assert_eq!(store.len(), 3);
    }

    #[tokio::test]
    async fn test_find_with_empty_filter_returns_all() {
        let store = MemoryStore::default();
        assert!(store.is_empty());
        store.insert_one(&ArticleRecord::new("Un", "https://x.test/1")).await.unwrap();

        let found = store.find(&ArticleFilter::default()).await.unwrap();
        assert_eq!(found.len(), 1);
    }
}
