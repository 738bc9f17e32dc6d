//! Native-currency USD spot price: a GraphQL client and a background poller.

use crate::chains::ChainInfo;
use crate::quote::SpotPriceFeed;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(12);

const NATIVE_PRICE_QUERY: &str = "query NativePrice($chain: Chain!) {
  token(chain: $chain, address: null) {
    project {
      markets(currencies: [USD]) {
        price {
          value
        }
      }
    }
  }
}";

pub struct GraphqlSpotPriceFeed {
    api_url: String,
    client: reqwest::Client,
}

impl GraphqlSpotPriceFeed {
    pub fn new(api_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            api_url: crate::utils::remove_trailing_slash(api_url),
            client,
        })
    }

    async fn fetch(&self, chain: &str) -> Result<serde_json::Value> {
        let body = serde_json::json!({
            "operationName": "NativePrice",
            "query": NATIVE_PRICE_QUERY,
            "variables": { "chain": chain },
        });
        let response = self.client.post(&self.api_url).json(&body).send().await?;
        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(anyhow!("rate_limited"));
        }
        let text = response.text().await?;
        let parsed: serde_json::Value = serde_json::from_str(&text)?;
        Ok(parsed)
    }
}

/// Price out of a `NativePrice` response; `None` when the backend has none.
pub fn parse_spot_price(response: &serde_json::Value) -> Option<f64> {
    response
        .pointer("/data/token/project/markets/0/price/value")
        .and_then(|v| v.as_f64())
}

#[async_trait]
impl SpotPriceFeed for GraphqlSpotPriceFeed {
    async fn native_usd_price(&self, chain: &ChainInfo) -> Result<Option<f64>, anyhow::Error> {
        let response = crate::utils::retry(2, 500, || self.fetch(&chain.backend_chain)).await?;
        if let Some(errors) = response.get("errors") {
            return Err(anyhow!("spot price query failed: {}", errors));
        }
        Ok(parse_spot_price(&response))
    }
}

/// One-shot spot price. A failing feed is logged and reported as no price,
/// which sends USD valuation down the stablecoin path.
pub async fn native_usd_or_none(feed: &dyn SpotPriceFeed, chain: &ChainInfo) -> Option<f64> {
    match feed.native_usd_price(chain).await {
        Ok(price) => price,
        Err(e) => {
            warn!("Spot price for {} unavailable: {:#}", chain.name, e);
            None
        }
    }
}

/// Polls a [`SpotPriceFeed`] on a fixed interval and publishes the latest
/// price. Polling pauses while the consumer is not visible and stops when
/// the poller is dropped.
pub struct SpotPricePoller {
    latest: watch::Receiver<Option<f64>>,
    visible: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl SpotPricePoller {
    pub fn spawn(feed: Arc<dyn SpotPriceFeed>, chain: ChainInfo, interval: Duration) -> Self {
        let (price_tx, latest) = watch::channel(None);
        let (visible, mut visible_rx) = watch::channel(true);

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if !*visible_rx.borrow_and_update() {
                    if visible_rx.changed().await.is_err() {
                        break;
                    }
                    continue;
                }
                match feed.native_usd_price(&chain).await {
                    Ok(price) => {
                        debug!("{} spot price: {:?}", chain.name, price);
                        price_tx.send_replace(price);
                    }
                    // keep the last known price
                    Err(e) => warn!("Spot price for {} failed: {:#}", chain.name, e),
                }
            }
        });

        Self {
            latest,
            visible,
            handle,
        }
    }

    pub fn latest(&self) -> Option<f64> {
        *self.latest.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<f64>> {
        self.latest.clone()
    }

    pub fn set_visible(&self, visible: bool) {
        self.visible.send_replace(visible);
    }
}

impl Drop for SpotPricePoller {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
