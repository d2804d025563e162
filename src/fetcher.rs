use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use std::time::Duration;

use crate::config::ImportConfig;
use crate::error::ImportError;

/// Source of raw page HTML.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, ImportError>;
}

/// Plain HTTP fetcher with a browser-like User-Agent, since some recipe
/// sites refuse unknown clients.
pub struct RequestFetcher {
    client: Client,
}

impl RequestFetcher {
    /// `timeout` overrides the configured one when given.
    pub fn with_config(timeout: Option<Duration>, config: &ImportConfig) -> Result<Self, ImportError> {
        let timeout = timeout.unwrap_or(Duration::from_secs(config.timeout));
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for RequestFetcher {
    async fn fetch(&self, url: &str) -> Result<String, ImportError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        debug!("Fetched {} with status {}", url, status);

        if !status.is_success() {
            return Err(ImportError::HttpStatus(status.as_u16()));
        }

        Ok(response.text().await?)
    }
}
