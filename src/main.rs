use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use num_bigint::BigUint;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use swap_pricing_rs::chains::{ChainInfo, ChainRegistry};
use swap_pricing_rs::config::Settings;
use swap_pricing_rs::models::{decimal_scale, Asset, AssetAmount, Price, QuoteRequest, RouterPreference, Token, TradeType};
use swap_pricing_rs::pricing::{
    estimate_gas_units, AutoSlippage, PoolSyncMonitor, StablecoinPriceResolver, UsdPriceResolver,
};
use swap_pricing_rs::quote::replay::ReplayQuoteProvider;
use swap_pricing_rs::quote::routing_api::RoutingApi;
use swap_pricing_rs::quote::spot_feed::{native_usd_or_none, GraphqlSpotPriceFeed, SpotPricePoller};
use swap_pricing_rs::quote::{QuoteProvider, SpotPriceFeed};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "swap-pricing", about = "USD prices, route gas and auto slippage for swap quotes")]
struct Args {
    /// TOML settings file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Answer quotes from a recorded fixture file instead of the routing API
    #[arg(long)]
    replay: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// USD and stablecoin value of an amount
    Price {
        #[arg(long, default_value_t = 1)]
        chain: u64,
        /// Token address, or "native"
        asset: String,
        #[arg(long, default_value_t = 18)]
        decimals: u8,
        /// Human amount, e.g. "1.5"
        #[arg(default_value = "1")]
        amount: String,
        /// Skip the spot feed and use this native USD price
        #[arg(long)]
        native_usd: Option<f64>,
    },
    /// Quote an exact-input swap and compute its auto slippage
    Slippage {
        #[arg(long, default_value_t = 1)]
        chain: u64,
        token_in: String,
        token_out: String,
        amount: String,
        #[arg(long, default_value_t = 18)]
        decimals_in: u8,
        #[arg(long, default_value_t = 18)]
        decimals_out: u8,
        /// Gas price in gwei
        #[arg(long)]
        gas_price_gwei: Option<u64>,
    },
    /// Compare a pool price against the market rate
    PoolSync {
        #[arg(long, default_value_t = 1)]
        chain: u64,
        base: String,
        quote: String,
        /// Whole `quote` per whole `base`
        price: String,
        #[arg(long, default_value_t = 18)]
        base_decimals: u8,
        #[arg(long, default_value_t = 18)]
        quote_decimals: u8,
    },
    /// Native currency USD spot price
    Spot {
        #[arg(long, default_value_t = 1)]
        chain: u64,
        /// Keep polling and print every update
        #[arg(long)]
        watch: bool,
    },
}

#[derive(Serialize)]
struct PriceOutput {
    amount: String,
    stablecoin_value: Option<String>,
    usd: swap_pricing_rs::pricing::UsdValue,
}

#[derive(Serialize)]
struct SlippageOutput {
    input: String,
    output: String,
    gas_units: Option<u64>,
    gas_use_estimate_usd: Option<f64>,
    tolerance_percent: f64,
}

#[derive(Serialize)]
struct PoolSyncOutput {
    pool_price: String,
    out_of_sync: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let settings = match &args.config {
        Some(path) => Settings::from_file(path)?,
        None => Settings::default(),
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let chains = Arc::new(settings.chain_registry()?);
    let provider: Arc<dyn QuoteProvider> = match &args.replay {
        Some(path) => {
            let replay = ReplayQuoteProvider::from_file(path)?;
            info!("Replaying {} recorded quotes from {}", replay.len(), path.display());
            Arc::new(replay)
        }
        None => Arc::new(RoutingApi::new(&settings.quote_api_url, settings.request_timeout())?),
    };

    match args.command {
        Command::Price {
            chain,
            asset,
            decimals,
            amount,
            native_usd,
        } => {
            let info = chain_info(&chains, chain)?;
            let asset = parse_asset(info, &asset, decimals)?;
            let amount = AssetAmount::from_decimal_str(asset, &amount)?;
            let native_usd = match native_usd {
                Some(price) => Some(price),
                None => {
                    let feed = GraphqlSpotPriceFeed::new(&settings.spot_price_url, settings.request_timeout())?;
                    native_usd_or_none(&feed, info).await
                }
            };

            let mut stablecoin = StablecoinPriceResolver::new(chains.clone(), provider.clone());
            let mut usd = UsdPriceResolver::new(chains.clone(), provider);
            let (stablecoin_value, usd) =
                tokio::join!(stablecoin.stablecoin_value(&amount), usd.refresh(Some(&amount), native_usd));
            print_json(&PriceOutput {
                amount: amount.to_string(),
                stablecoin_value: stablecoin_value.map(|v| v.to_string()),
                usd,
            })?;
        }
        Command::Slippage {
            chain,
            token_in,
            token_out,
            amount,
            decimals_in,
            decimals_out,
            gas_price_gwei,
        } => {
            let info = chain_info(&chains, chain)?;
            let input = parse_asset(info, &token_in, decimals_in)?;
            let output = parse_asset(info, &token_out, decimals_out)?;
            let request = QuoteRequest {
                input: input.clone(),
                output,
                amount: AssetAmount::from_decimal_str(input, &amount)?,
                trade_type: TradeType::ExactInput,
                preference: RouterPreference::Api,
            };
            let trade = provider
                .request_quote(&request)
                .await?
                .ok_or_else(|| anyhow!("no route for {}", request.key()))?;
            let trade = trade
                .as_classic()
                .ok_or_else(|| anyhow!("quote returned a {} order, which has no slippage", trade.fill_type()))?;

            let gas_price = gas_price_gwei.map(|gwei| BigUint::from(gwei) * decimal_scale(9));
            let mut slippage = AutoSlippage::new(chains.clone(), provider);
            let tolerance = slippage.tolerance(Some(trade), gas_price.as_ref()).await;
            print_json(&SlippageOutput {
                input: display_amount(trade.input_amount()?),
                output: display_amount(trade.output_amount()?),
                gas_units: estimate_gas_units(Some(trade)),
                gas_use_estimate_usd: trade.gas_use_estimate_usd,
                tolerance_percent: tolerance.to_percent_f64(),
            })?;
        }
        Command::PoolSync {
            chain,
            base,
            quote,
            price,
            base_decimals,
            quote_decimals,
        } => {
            let info = chain_info(&chains, chain)?;
            let base = parse_asset(info, &base, base_decimals)?;
            let quote = parse_asset(info, &quote, quote_decimals)?;
            // raw quote units per whole base
            let per_whole = AssetAmount::from_decimal_str(quote.clone(), &price)?;
            let pool_price = Price::from_parts(base.clone(), quote, per_whole.raw, decimal_scale(base.decimals()))?;

            let mut monitor = PoolSyncMonitor::new(chains.clone(), provider);
            let out_of_sync = monitor.check(Some(&pool_price)).await;
            print_json(&PoolSyncOutput {
                pool_price: pool_price.to_string(),
                out_of_sync,
            })?;
        }
        Command::Spot { chain, watch } => {
            let info = chain_info(&chains, chain)?.clone();
            let feed = Arc::new(GraphqlSpotPriceFeed::new(&settings.spot_price_url, settings.request_timeout())?);
            if !watch {
                let price = feed.native_usd_price(&info).await?;
                print_json(&serde_json::json!({ "chain": info.name, "native_usd": price }))?;
                return Ok(());
            }
            let poller = SpotPricePoller::spawn(feed, info.clone(), settings.poll_interval());
            let mut updates = poller.subscribe();
            while updates.changed().await.is_ok() {
                let price = *updates.borrow_and_update();
                print_json(&serde_json::json!({ "chain": info.name, "native_usd": price }))?;
            }
        }
    }

    Ok(())
}

fn chain_info(chains: &ChainRegistry, chain_id: u64) -> Result<&ChainInfo> {
    chains
        .get(chain_id)
        .ok_or_else(|| anyhow!("unsupported chain {}", chain_id))
}

fn parse_asset(chain: &ChainInfo, asset: &str, decimals: u8) -> Result<Asset> {
    if asset.eq_ignore_ascii_case("native") || asset.eq_ignore_ascii_case(&chain.native.symbol) {
        return Ok(chain.native_asset());
    }
    let token = Token::new(chain.chain_id, asset, decimals, None)
        .with_context(|| format!("invalid asset {}", asset))?;
    Ok(token.into())
}

fn display_amount(amount: Option<AssetAmount>) -> String {
    amount.map(|a| a.to_string()).unwrap_or_default()
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
