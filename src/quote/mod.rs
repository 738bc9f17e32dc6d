use async_trait::async_trait;
use crate::chains::ChainInfo;
use crate::models::{QuoteRequest, Trade};

pub mod replay;
pub mod routing_api;
pub mod spot_feed;
pub mod wire;

/// A routed-quote service.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    fn identifier(&self) -> &str;

    /// `Ok(None)` means the service found no route; `Err` is an upstream
    /// failure. Both leave the requested asset unpriced.
    async fn request_quote(&self, request: &QuoteRequest) -> Result<Option<Trade>, anyhow::Error>;
}

/// External USD spot price of a chain's native currency.
#[async_trait]
pub trait SpotPriceFeed: Send + Sync {
    async fn native_usd_price(&self, chain: &ChainInfo) -> Result<Option<f64>, anyhow::Error>;
}
