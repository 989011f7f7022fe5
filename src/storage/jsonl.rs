//! File-backed collection: one JSON document per line.
//!
//! Records are appended as they are harvested, so a crash mid-run keeps
//! everything inserted before it. Reading parses the whole file; a line that
//! does not parse is logged and skipped rather than failing the query.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, instrument, warn};

use super::ArticleStore;
use crate::config::StoreConfig;
use crate::error::Result;
use crate::models::ArticleRecord;
use crate::query::ArticleFilter;
use crate::utils::ensure_writable_dir;

#[derive(Debug, Clone)]
pub struct JsonLinesStore {
    path: PathBuf,
}

impl JsonLinesStore {
    /// Open the collection described by `config`, creating its database
    /// directory when missing.
    #[instrument(level = "info", skip_all, fields(database = %config.database, collection = %config.collection))]
    pub async fn open(config: &StoreConfig) -> Result<Self> {
        ensure_writable_dir(&config.database_dir()).await?;
        let path = config.collection_path();
        info!(path = %path.display(), "Opened article collection");
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ArticleStore for JsonLinesStore {
    async fn insert_one(&self, record: &ArticleRecord) -> Result<()> {
        let mut line = serde_json::to_string(record)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        debug!(url = %record.url, "Inserted article document");
        Ok(())
    }

    async fn find(&self, filter: &ArticleFilter) -> Result<Vec<ArticleRecord>> {
        let raw = match fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut records = Vec::new();
        for (index, line) in raw.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<ArticleRecord>(line) {
                Ok(record) if filter.matches(&record) => records.push(record),
                Ok(_) => {}
                Err(e) => warn!(line = index + 1, error = %e, "Skipping malformed document"),
            }
        }
        Ok(records)
    }
}
