use anyhow::{Context, Result};
use reqwest::Client;
use url::Url;

use crate::config::Config;
use crate::models::{TrackingQuery, UpstreamReply};

#[async_trait::async_trait]
pub trait TrackingApi: Send + Sync {
    async fn fetch(&self, query: &TrackingQuery) -> Result<UpstreamReply>;
}

pub struct NarvarClient {
    base_url: Url,
    http_client: Client,
}

impl NarvarClient {
    pub fn new(config: &Config) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(config.upstream_timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            base_url: config.base_url.clone(),
            http_client,
        })
    }
}

#[async_trait::async_trait]
impl TrackingApi for NarvarClient {
    async fn fetch(&self, query: &TrackingQuery) -> Result<UpstreamReply> {
        let url = query.url(&self.base_url)?;

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .context("Failed to send request to tracking API")?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .context("Failed to read tracking API response")?;

        Ok(UpstreamReply { status, body })
    }
}
