//! Run configuration: which site to crawl and where the document collection lives.
//!
//! Values come from three layers, later ones winning:
//! 1. built-in defaults ([`HarvestConfig::default`])
//! 2. an optional YAML file (`--config`)
//! 3. command-line flags and environment variables
//!
//! ```yaml
//! site:
//!   base_url: https://www.blogdumoderateur.com
//!   listing_url: https://www.blogdumoderateur.com/web
//!   pages: 5
//!   timeout_secs: 30
//! store:
//!   backend: mongo            # or `jsonl` for a local file collection
//!   uri: mongodb://localhost:27017
//!   data_dir: ./data          # jsonl only
//!   database: scraping
//!   collection: articles
//! ```

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::fs;
use tracing::{info, instrument};
use url::Url;

use crate::cli::{Cli, HarvestArgs};
use crate::error::Result;

/// Identity header sent with every request. Some sites refuse obvious bots.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct HarvestConfig {
    pub site: SiteConfig,
    pub store: StoreConfig,
}

/// The crawled site.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Root that relative article links are resolved against.
    pub base_url: String,
    /// First listing page, without trailing slash or page suffix.
    pub listing_url: String,
    /// Highest page number to visit.
    pub pages: u32,
    pub user_agent: String,
    /// Per-request timeout.
    pub timeout_secs: u64,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.blogdumoderateur.com".to_string(),
            listing_url: "https://www.blogdumoderateur.com/web".to_string(),
            pages: 5,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 30,
        }
    }
}

/// Which [`ArticleStore`](crate::storage::ArticleStore) implementation backs the collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// MongoDB server at `uri`.
    #[default]
    Mongo,
    /// Local JSON Lines file under `data_dir`.
    Jsonl,
}

/// Location of the document collection.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// MongoDB connection string.
    pub uri: String,
    pub data_dir: PathBuf,
    pub database: String,
    pub collection: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            uri: "mongodb://localhost:27017".to_string(),
            data_dir: PathBuf::from("./data"),
            database: "scraping".to_string(),
            collection: "articles".to_string(),
        }
    }
}

impl StoreConfig {
    pub fn database_dir(&self) -> PathBuf {
        self.data_dir.join(&self.database)
    }

    pub fn collection_path(&self) -> PathBuf {
        self.database_dir().join(format!("{}.jsonl", self.collection))
    }
}

impl HarvestConfig {
    /// Apply the global store flags.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(backend) = cli.store {
            self.store.backend = backend;
        }
        if let Some(uri) = &cli.mongo_uri {
            self.store.uri = uri.clone();
        }
        if let Some(dir) = &cli.data_dir {
            self.store.data_dir = PathBuf::from(dir);
        }
        if let Some(database) = &cli.database {
            self.store.database = database.clone();
        }
        if let Some(collection) = &cli.collection {
            self.store.collection = collection.clone();
        }
    }

    /// Apply the `harvest` subcommand flags.
    pub fn apply_harvest_args(&mut self, args: &HarvestArgs) {
        if let Some(url) = &args.listing_url {
            self.site.listing_url = url.clone();
        }
        if let Some(url) = &args.base_url {
            self.site.base_url = url.clone();
        }
        if let Some(pages) = args.pages {
            self.site.pages = pages;
        }
        if let Some(secs) = args.timeout_secs {
            self.site.timeout_secs = secs;
        }
    }

    /// Reject site URLs that are not absolute before any request is made.
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.site.base_url)?;
        Url::parse(&self.site.listing_url)?;
        Ok(())
    }
}

/// Load the configuration file, or the defaults when no path is given.
#[instrument(level = "info")]
pub async fn load_config(path: Option<&str>) -> Result<HarvestConfig> {
    let Some(path) = path else {
        return Ok(HarvestConfig::default());
    };
    let raw = fs::read_to_string(path).await?;
    let config: HarvestConfig = serde_yaml::from_str(&raw)?;
    info!(path, "Loaded configuration");
    Ok(config)
}
