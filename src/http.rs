//! HTTP access for listing and detail pages.
//!
//! One [`HttpClient`] is built per run and reused for every request. It sends
//! the configured browser-like `User-Agent` and enforces a request timeout so
//! a stalled server cannot hang the crawl. There are no retries.

use reqwest::Client;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::config::SiteConfig;
use crate::error::Result;

#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: Client,
}

impl HttpClient {
    pub fn new(site: &SiteConfig) -> Result<Self> {
        let inner = Client::builder()
            .user_agent(site.user_agent.as_str())
            .timeout(Duration::from_secs(site.timeout_secs))
            .build()?;
        Ok(Self { inner })
    }

    /// GET `url` and return the decoded body.
    ///
    /// Transport failures and non-2xx statuses are both errors.
    #[instrument(level = "debug", skip(self))]
    pub async fn get_text(&self, url: &str) -> Result<String> {
        let response = self.inner.get(url).send().await?.error_for_status()?;
        let body = response.text().await?;
        debug!(bytes = body.len(), "Fetched page");
        Ok(body)
    }
}
