//! # swap-pricing-rs
//!
//! USD pricing, route gas estimation and adaptive slippage for DEX swap
//! quotes on EVM chains. Prices come from routed quotes: an asset is priced
//! by asking the quote service how much of it buys a fixed amount of the
//! chain's stablecoin (or native currency).
//!
//! ## Components
//!
//! | Module | Provides |
//! |--------|----------|
//! | `models` | Exact rationals, assets, amounts, prices, pools, routes, trades |
//! | `pricing::stablecoin` | Price of an asset in the chain's stablecoin |
//! | `pricing::native` | Price of an asset in the native currency |
//! | `pricing::usd` | USD value of an amount, native path first |
//! | `pricing::gas` | Gas units of a classic route |
//! | `pricing::slippage` | Auto slippage tolerance from gas cost vs. trade size |
//! | `pricing::divergence` | Pool price vs. market rate warning |
//! | `quote` | Routing API client, replay provider, spot price feed |
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use swap_pricing_rs::chains::{ChainRegistry, MAINNET};
//! use swap_pricing_rs::models::{AssetAmount, Token};
//! use swap_pricing_rs::pricing::StablecoinPriceResolver;
//! use swap_pricing_rs::quote::routing_api::RoutingApi;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let chains = Arc::new(ChainRegistry::builtin());
//!     let api = Arc::new(RoutingApi::new("https://interface.gateway.uniswap.org/v2", Duration::from_secs(30))?);
//!     let mut resolver = StablecoinPriceResolver::new(chains, api);
//!
//!     let uni = Token::new(MAINNET, "0x1f9840a85d5aF5bf1D1762F925BDADdC4201F984", 18, Some("UNI"))?;
//!     let amount = AssetAmount::from_decimal_str(uni.into(), "250")?;
//!     if let Some(value) = resolver.stablecoin_value(&amount).await {
//!         println!("{} is worth {}", amount, value);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## CLI Usage
//!
//! ```bash
//! # USD value of 2.5 ETH on mainnet
//! cargo run --release -- price native 2.5
//!
//! # Auto slippage for 1000 USDC -> WETH, 20 gwei gas
//! cargo run --release -- slippage 0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48 \
//!     0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2 1000 --decimals-in 6 --gas-price-gwei 20
//!
//! # Offline, from recorded quotes
//! cargo run --release -- --replay quotes.json price native 1 --native-usd 3000
//!
//! # Follow the native spot price
//! cargo run --release -- spot --chain 8453 --watch
//! ```

pub mod cache;
pub mod chains;
pub mod config;
pub mod error;
pub mod models;
pub mod pricing;
pub mod quote;
pub mod utils;

#[cfg(test)]
mod fixtures;

pub use cache::{load_from_file, save_to_file};
pub use chains::{ChainInfo, ChainRegistry};
pub use config::Settings;
pub use error::PricingError;
pub use models::{Asset, AssetAmount, Fraction, Percent, Price, Token};
pub use quote::{QuoteProvider, SpotPriceFeed};
