//! Command-line driver for the article harvester.
//!
//! ## Usage
//!
//! ```sh
//! article_harvester harvest --pages 5
//! article_harvester query --category web --start-date 2024-01-01
//! ```

use article_harvester::cli::{Cli, Command, HarvestArgs, QueryArgs};
use article_harvester::config::{self, HarvestConfig, StoreBackend};
use article_harvester::http::HttpClient;
use article_harvester::query::find_articles;
use article_harvester::scrapers::listing::{harvest_pages, ListingHarvester};
use article_harvester::storage::{ArticleStore, JsonLinesStore, MemoryStore, MongoStore};
use clap::Parser;
use std::error::Error;
use tracing::{debug, info, instrument};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init (logs on stderr) ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("article_harvester starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let mut config = config::load_config(args.config.as_deref()).await?;
    config.apply_cli(&args);

    match &args.command {
        Command::Harvest(harvest_args) => run_harvest(&mut config, harvest_args).await?,
        Command::Query(query_args) => run_query(&config, query_args).await?,
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );
    Ok(())
}

#[instrument(level = "info", skip_all)]
async fn run_harvest(config: &mut HarvestConfig, args: &HarvestArgs) -> Result<(), Box<dyn Error>> {
    config.apply_harvest_args(args);
    config.validate()?;
    let site = &config.site;
    info!(
        listing_url = %site.listing_url,
        pages = site.pages,
        timeout_secs = site.timeout_secs,
        dry_run = args.dry_run,
        backend = ?config.store.backend,
        "Starting harvest"
    );

    let client = HttpClient::new(site)?;
    if args.dry_run {
        let store = MemoryStore::default();
        crawl(&client, config, &store).await;
        info!(kept_in_memory = store.len(), "Dry run: nothing written");
    } else {
        match config.store.backend {
            StoreBackend::Mongo => {
                let store = MongoStore::connect(&config.store).await?;
                crawl(&client, config, &store).await;
                info!(namespace = %store.namespace(), "Articles written");
            }
            StoreBackend::Jsonl => {
                let store = JsonLinesStore::open(&config.store).await?;
                crawl(&client, config, &store).await;
                info!(path = %store.path().display(), "Articles written");
            }
        }
    }
    Ok(())
}

async fn crawl<S: ArticleStore>(client: &HttpClient, config: &HarvestConfig, store: &S) {
    let harvester = ListingHarvester::new(client, &config.site.base_url, store);
    let articles = harvest_pages(&harvester, &config.site.listing_url, config.site.pages).await;
    info!(count = articles.len(), "Total articles harvested");
}

#[instrument(level = "info", skip_all)]
async fn run_query(config: &HarvestConfig, args: &QueryArgs) -> Result<(), Box<dyn Error>> {
    let articles = match config.store.backend {
        StoreBackend::Mongo => {
            let store = MongoStore::connect(&config.store).await?;
            find_articles(&store, &args.criteria()).await?
        }
        StoreBackend::Jsonl => {
            let store = JsonLinesStore::open(&config.store).await?;
            find_articles(&store, &args.criteria()).await?
        }
    };
    println!("{}", serde_json::to_string_pretty(&articles)?);
    Ok(())
}
