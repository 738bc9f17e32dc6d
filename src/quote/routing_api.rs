use crate::models::{QuoteMethod, QuoteRequest, Trade};
use crate::quote::wire::{QuoteRequestBody, QuoteResponse};
use crate::quote::QuoteProvider;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

const RETRIES: u32 = 3;
const RETRY_BASE_DELAY_MS: u64 = 500;

/// HTTP client for the routing API's `/quote` endpoint.
pub struct RoutingApi {
    api_url: String,
    client: reqwest::Client,
}

impl RoutingApi {
    pub fn new(api_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self::with_client(api_url, client))
    }

    pub fn with_client(api_url: &str, client: reqwest::Client) -> Self {
        Self {
            api_url: crate::utils::remove_trailing_slash(api_url),
            client,
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn build_quote_url(&self) -> String {
        format!("{}/quote", self.api_url)
    }

    async fn fetch_quote(&self, body: &QuoteRequestBody) -> Result<Option<QuoteResponse>> {
        let url = self.build_quote_url();
        let response = self.client.post(&url).json(body).send().await?;
        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(anyhow!("rate_limited"));
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let text = response.text().await?;
        if !status.is_success() {
            return Err(anyhow!("quote request failed with {}: {}", status, text));
        }
        let parsed: QuoteResponse =
            serde_json::from_str(&text).with_context(|| format!("Failed to parse quote response from {}", url))?;
        Ok(Some(parsed))
    }

    /// Raw response for `request`; `None` when the API reports no route.
    pub async fn quote(&self, request: &QuoteRequest) -> Result<Option<QuoteResponse>> {
        let body = QuoteRequestBody::from_request(request);
        crate::utils::retry(RETRIES, RETRY_BASE_DELAY_MS, || self.fetch_quote(&body)).await
    }
}

#[async_trait]
impl QuoteProvider for RoutingApi {
    fn identifier(&self) -> &str {
        "routing-api"
    }

    async fn request_quote(&self, request: &QuoteRequest) -> Result<Option<Trade>, anyhow::Error> {
        debug!("Requesting quote {}", request.key());
        let response = self.quote(request).await?;
        Ok(response.and_then(|r| r.into_trade(request, QuoteMethod::RoutingApi)))
    }
}
