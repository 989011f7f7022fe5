//! Error type shared by the harvester's I/O layers.
//!
//! Most failures never reach the caller: transport errors are logged and
//! degraded to empty results where they happen. What remains here is what
//! the store, the config loader and `main` still need to propagate.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarvestError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("BSON encoding error: {0}")]
    Bson(#[from] mongodb::bson::ser::Error),

    #[error("Config error: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Data directory is not writable: {0}")]
    NotWritable(String),
}

pub type Result<T> = std::result::Result<T, HarvestError>;
