//! MongoDB collection backend.
//!
//! Queries are not evaluated locally: the [`ArticleFilter`] is rendered with
//! [`ArticleFilter::to_document`] and sent as a BSON filter, so `$regex`,
//! `$options` and `$gte`/`$lte` are applied by the server.

use futures::TryStreamExt;
use mongodb::bson::{self, Document};
use mongodb::{Client, Collection};
use tracing::{debug, info, instrument};

use super::ArticleStore;
use crate::config::StoreConfig;
use crate::error::Result;
use crate::models::ArticleRecord;
use crate::query::ArticleFilter;

#[derive(Debug, Clone)]
pub struct MongoStore {
    collection: Collection<ArticleRecord>,
}

impl MongoStore {
    /// Build a handle on `{database}.{collection}` at `config.uri`.
    ///
    /// The driver connects lazily, so an unreachable server surfaces on the
    /// first insert or find, not here. A malformed URI fails immediately.
    #[instrument(level = "info", skip_all, fields(database = %config.database, collection = %config.collection))]
    pub async fn connect(config: &StoreConfig) -> Result<Self> {
        let client = Client::with_uri_str(&config.uri).await?;
        let collection = client
            .database(&config.database)
            .collection::<ArticleRecord>(&config.collection);
        info!(namespace = %collection.namespace(), "Using MongoDB collection");
        Ok(Self { collection })
    }

    /// `database.collection`.
    pub fn namespace(&self) -> String {
        self.collection.namespace().to_string()
    }
}

/// BSON form of `filter`, as passed to the server.
pub fn filter_document(filter: &ArticleFilter) -> Result<Document> {
    Ok(bson::to_document(&filter.to_document())?)
}

impl ArticleStore for MongoStore {
    async fn insert_one(&self, record: &ArticleRecord) -> Result<()> {
        let result = self.collection.insert_one(record).await?;
        debug!(id = %result.inserted_id, url = %record.url, "Inserted article document");
        Ok(())
    }

    async fn find(&self, filter: &ArticleFilter) -> Result<Vec<ArticleRecord>> {
        let filter = filter_document(filter)?;
        debug!(%filter, "Running MongoDB find");
        let cursor = self.collection.find(filter).await?;
        let records: Vec<ArticleRecord> = cursor.try_collect().await?;
        debug!(count = records.len(), "MongoDB find complete");
        Ok(records)
    }
}
