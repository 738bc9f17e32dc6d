//! Shared builders for unit tests: mainnet tokens, pools along a path and
//! a scripted quote provider.

use crate::chains::{ChainRegistry, MAINNET};
use crate::models::{
    decimal_scale, Asset, AssetAmount, ClassicTrade, ConcentratedPool, NativeCurrency, Pool,
    PoolFamily, QuoteMethod, QuoteRequest, RequestKey, Route, Token, Trade, TradeType, V2Pair,
};
use crate::quote::QuoteProvider;
use async_trait::async_trait;
use num_bigint::BigUint;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

pub fn weth() -> Token {
    Token::new(MAINNET, "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2", 18, Some("WETH")).unwrap()
}

pub fn usdc() -> Token {
    Token::new(MAINNET, "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48", 6, Some("USDC")).unwrap()
}

pub fn dai() -> Token {
    Token::new(MAINNET, "0x6B175474E89094C44Da98b954EedeAC495271d0F", 18, Some("DAI")).unwrap()
}

pub fn uni() -> Token {
    Token::new(MAINNET, "0x1f9840a85d5aF5bf1D1762F925BDADdC4201F984", 18, Some("UNI")).unwrap()
}

pub fn eth() -> Asset {
    Asset::Native(NativeCurrency {
        chain_id: MAINNET,
        symbol: "ETH".to_string(),
        decimals: 18,
        wrapped: weth(),
    })
}

pub fn registry() -> ChainRegistry {
    ChainRegistry::builtin()
}

/// Filler token number `n` used for intermediate hops.
pub fn hop_token(n: u8) -> Token {
    let address = format!("0x{:040x}", 0x1000 + n as u32);
    Token::new(MAINNET, &address, 18, None).unwrap()
}

pub fn v2_pair(token0: &Token, token1: &Token, reserve0: impl Into<BigUint>, reserve1: impl Into<BigUint>) -> Pool {
    Pool::V2(V2Pair {
        token0: token0.clone(),
        token1: token1.clone(),
        reserve0: reserve0.into(),
        reserve1: reserve1.into(),
        address: None,
    })
}

fn concentrated(token0: &Token, token1: &Token, sqrt_ratio_x96: BigUint) -> ConcentratedPool {
    ConcentratedPool {
        token0: token0.clone(),
        token1: token1.clone(),
        fee: 3000,
        sqrt_ratio_x96,
        liquidity: BigUint::from(1_000_000u32),
        tick_current: 0,
        hooks: None,
        address: None,
    }
}

pub fn v3_pool(token0: &Token, token1: &Token, sqrt_ratio_x96: BigUint) -> Pool {
    Pool::V3(concentrated(token0, token1, sqrt_ratio_x96))
}

pub fn v4_pool(token0: &Token, token1: &Token, sqrt_ratio_x96: BigUint) -> Pool {
    Pool::V4(concentrated(token0, token1, sqrt_ratio_x96))
}

/// Unit-price pools of the given families chained from `input` to `output`.
pub fn route_of(families: &[PoolFamily], input: &Token, output: &Token) -> Route {
    route_with_amounts(families, input, output, 1, 1)
}

pub fn v3_route(input: &Token, output: &Token, hops: usize, input_raw: u64, output_raw: u64) -> Route {
    route_with_amounts(&vec![PoolFamily::V3; hops], input, output, input_raw, output_raw)
}

fn route_with_amounts(
    families: &[PoolFamily],
    input: &Token,
    output: &Token,
    input_raw: u64,
    output_raw: u64,
) -> Route {
    let q96 = BigUint::from(1u32) << 96usize;
    let mut pools = Vec::new();
    let mut current = input.clone();
    for (i, family) in families.iter().enumerate() {
        let next = if i + 1 == families.len() {
            output.clone()
        } else {
            hop_token(i as u8)
        };
        let pool = match family {
            PoolFamily::V2 => v2_pair(&current, &next, 1_000u32, 1_000u32),
            PoolFamily::V3 => v3_pool(&current, &next, q96.clone()),
            PoolFamily::V4 => v4_pool(&current, &next, q96.clone()),
        };
        pools.push(pool);
        current = next;
    }
    Route::new(
        pools,
        AssetAmount::from_raw(input.clone().into(), input_raw),
        AssetAmount::from_raw(output.clone().into(), output_raw),
    )
    .unwrap()
}

pub fn classic_trade(routes: Vec<Route>) -> ClassicTrade {
    ClassicTrade {
        routes,
        trade_type: TradeType::ExactOutput,
        gas_use_estimate: None,
        gas_use_estimate_usd: None,
        block_number: None,
        request_id: None,
        quote_method: QuoteMethod::RoutingApi,
    }
}

/// Single-pair classic trade whose route mid price is exactly
/// `numerator / denominator` raw `output` per raw `input`.
pub fn priced_trade(input: &Asset, output: &Asset, numerator: impl Into<BigUint>, denominator: impl Into<BigUint>) -> Trade {
    let pair = v2_pair(input.wrapped(), output.wrapped(), denominator, numerator);
    let route = Route::new(
        vec![pair],
        AssetAmount::from_raw(input.clone(), 1u32),
        AssetAmount::from_raw(output.clone(), 1u32),
    )
    .unwrap();
    Trade::Classic(classic_trade(vec![route]))
}

/// Trade pricing `input` at `usd` dollars against mainnet USDC.
pub fn usd_trade(input: &Asset, usd: u64) -> Trade {
    let usdc: Asset = usdc().into();
    priced_trade(input, &usdc, BigUint::from(usd) * decimal_scale(6), decimal_scale(input.decimals()))
}

pub enum Scripted {
    Route(Trade),
    NoRoute,
    Fail,
}

/// Quote provider answering from a fixed script keyed by request key.
/// Unknown requests get no route.
#[derive(Default)]
pub struct ScriptedQuoteProvider {
    script: Mutex<HashMap<RequestKey, Scripted>>,
    calls: AtomicUsize,
}

impl ScriptedQuoteProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(self, request: &QuoteRequest, outcome: Scripted) -> Self {
        self.script.lock().unwrap().insert(request.key(), outcome);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QuoteProvider for ScriptedQuoteProvider {
    fn identifier(&self) -> &str {
        "scripted"
    }

    async fn request_quote(&self, request: &QuoteRequest) -> Result<Option<Trade>, anyhow::Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.script.lock().unwrap().get(&request.key()) {
            Some(Scripted::Route(trade)) => Ok(Some(trade.clone())),
            Some(Scripted::NoRoute) | None => Ok(None),
            Some(Scripted::Fail) => Err(anyhow::anyhow!("scripted upstream failure")),
        }
    }
}

/// Exact-output probe the stablecoin resolver sends for `asset` on mainnet.
pub fn stablecoin_probe_request(asset: &Asset) -> QuoteRequest {
    let probe = registry().get(MAINNET).unwrap().stablecoin_probe().unwrap();
    QuoteRequest::exact_output(asset.clone(), probe)
}

/// Exact-output probe the native resolver sends for `asset` on mainnet.
pub fn native_probe_request(asset: &Asset) -> QuoteRequest {
    let probe = registry().get(MAINNET).unwrap().native_probe();
    QuoteRequest::exact_output(asset.clone(), probe)
}
