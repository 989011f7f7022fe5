//! Command-line interface definitions.
//!
//! Global options select the configuration file and the document collection;
//! the subcommand picks between crawling (`harvest`) and lookup (`query`).
//! Global options can also be provided through environment variables.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::config::StoreBackend;
use crate::query::QueryCriteria;

/// Command-line arguments for the article harvester.
///
/// # Examples
///
/// ```sh
/// # Crawl the default listing (5 pages) into the `scraping.articles` MongoDB collection
/// article_harvester harvest
///
/// # Same, into ./data/scraping/articles.jsonl
/// article_harvester --store jsonl harvest
///
/// # Crawl two pages without writing anything
/// article_harvester harvest --pages 2 --dry-run
///
/// # Articles in a category published during January 2024
/// article_harvester query --category web --start-date 2024-01-01 --end-date 2024-01-31
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML configuration file
    #[arg(short, long, global = true, env = "HARVEST_CONFIG")]
    pub config: Option<String>,

    /// Document store backend
    #[arg(long, global = true, value_enum, env = "HARVEST_STORE")]
    pub store: Option<StoreBackend>,

    /// MongoDB connection string (mongo backend)
    #[arg(long, global = true, env = "HARVEST_MONGO_URI")]
    pub mongo_uri: Option<String>,

    /// Directory holding the document databases (jsonl backend)
    #[arg(long, global = true, env = "HARVEST_DATA_DIR")]
    pub data_dir: Option<String>,

    /// Database name
    #[arg(long, global = true, env = "HARVEST_DATABASE")]
    pub database: Option<String>,

    /// Collection name
    #[arg(long, global = true, env = "HARVEST_COLLECTION")]
    pub collection: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Crawl listing pages and store every article found
    Harvest(HarvestArgs),
    /// Look up stored articles
    Query(QueryArgs),
}

#[derive(Args, Debug)]
pub struct HarvestArgs {
    /// First listing page URL (page 2 onwards appends `/page/{n}/`)
    #[arg(short, long)]
    pub listing_url: Option<String>,

    /// Site root used to resolve relative article links
    #[arg(short, long)]
    pub base_url: Option<String>,

    /// Number of listing pages to visit
    #[arg(short, long)]
    pub pages: Option<u32>,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Keep records in memory instead of writing them to the collection
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args, Debug)]
pub struct QueryArgs {
    /// Category pattern (case-insensitive)
    #[arg(long)]
    pub category: Option<String>,

    /// Earliest publication date, inclusive (YYYY-MM-DD)
    #[arg(long, value_parser = parse_iso_date)]
    pub start_date: Option<String>,

    /// Latest publication date, inclusive (YYYY-MM-DD)
    #[arg(long, value_parser = parse_iso_date)]
    pub end_date: Option<String>,

    /// Author pattern (case-insensitive)
    #[arg(long)]
    pub author: Option<String>,

    /// Title keywords pattern (case-insensitive)
    #[arg(long)]
    pub title: Option<String>,
}

impl QueryArgs {
    pub fn criteria(&self) -> QueryCriteria {
        QueryCriteria {
            category: self.category.clone(),
            start_date: self.start_date.clone(),
            end_date: self.end_date.clone(),
            author: self.author.clone(),
            title_keywords: self.title.clone(),
        }
    }
}

/// Date bounds are compared as strings, so they must already be canonical.
fn parse_iso_date(value: &str) -> Result<String, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(|date| date.format("%Y-%m-%d").to_string())
        .map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}
