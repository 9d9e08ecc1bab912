use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;
use tracing::log;

use crate::config_handler::Config;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,
    #[error("unexpected status {0}")]
    Status(StatusCode),
    #[error("network error: {0}")]
    Network(String),
    #[error("failed to read body: {0}")]
    Body(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else if let Some(status) = e.status() {
            FetchError::Status(status)
        } else if e.is_body() || e.is_decode() {
            FetchError::Body(e.to_string())
        } else {
            FetchError::Network(e.to_string())
        }
    }
}

/// Something that can hand over the raw schedule page.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    async fn fetch(&self) -> Result<String, FetchError>;

    /// Origin used to absolutize root-relative links found in the document.
    fn base_url(&self) -> &str;
}

pub struct RestClient {
    client: reqwest::Client,
    url: String,
    base_url: String,
}

impl RestClient {
    pub fn new(config: &Config) -> Result<RestClient, anyhow::Error> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_s))
            .build()?;
        Ok(RestClient {
            client,
            url: config.source_url.clone(),
            base_url: config.get_base_url()?,
        })
    }
}

#[async_trait]
impl DocumentSource for RestClient {
    async fn fetch(&self) -> Result<String, FetchError> {
        let before = Instant::now();
        let result = get_call(&self.client, &self.url).await;
        match &result {
            Ok(body) => log::info!("[REST] Call {} {} bytes {:.2?}", self.url, body.len(), before.elapsed()),
            Err(e) => log::warn!("[REST] Call {} failed: {e} {:.2?}", self.url, before.elapsed()),
        }
        result
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}

async fn get_call(client: &reqwest::Client, url: &str) -> Result<String, FetchError> {
    let rsp = client.get(url).send().await?;
    let status = rsp.status();
    if !status.is_success() {
        return Err(FetchError::Status(status));
    }
    Ok(rsp.text().await?)
}
