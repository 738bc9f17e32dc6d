//! JSON shapes of the routing API and their conversion into [`Trade`]s.

use crate::error::{PricingError, Result};
use crate::models::{
    Asset, AssetAmount, ClassicTrade, ConcentratedPool, OffchainOrder, OffchainOrderType, Pool, QuoteMethod,
    QuoteRequest, Route, RouterPreference, Token, Trade, TradeType, V2Pair,
};
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Address the routing API uses for a chain's native currency.
pub const NATIVE_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

/// A number the API sends either as a JSON number or as a decimal string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Numeric {
    Int(u64),
    Text(String),
}

impl Numeric {
    pub fn to_u64(&self) -> Result<u64> {
        match self {
            Numeric::Int(n) => Ok(*n),
            Numeric::Text(s) => s.trim().parse().map_err(|_| PricingError::InvalidAmount(s.clone())),
        }
    }
}

/// Body of `POST /quote`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequestBody {
    pub token_in_chain_id: u64,
    pub token_in: String,
    pub token_out_chain_id: u64,
    pub token_out: String,
    pub amount: String,
    #[serde(rename = "type")]
    pub trade_type: TradeType,
    pub intent: String,
    #[serde(default)]
    pub routing_types: Vec<RoutingType>,
}

impl QuoteRequestBody {
    pub fn from_request(request: &QuoteRequest) -> Self {
        let routing_types = match request.preference {
            RouterPreference::Price | RouterPreference::Api => vec![RoutingType::Classic],
            RouterPreference::X => vec![RoutingType::Classic, RoutingType::DutchV2],
        };
        let intent = match request.preference {
            RouterPreference::Price => "pricing",
            _ => "quote",
        };
        Self {
            token_in_chain_id: request.input.chain_id(),
            token_in: wire_address(&request.input),
            token_out_chain_id: request.output.chain_id(),
            token_out: wire_address(&request.output),
            amount: request.amount.raw.to_string(),
            trade_type: request.trade_type,
            intent: intent.to_string(),
            routing_types,
        }
    }

    /// Identity used to match recorded responses.
    pub fn cache_key(&self) -> String {
        format!(
            "{}:{}>{}:{}:{:?}:{}",
            self.token_in_chain_id,
            self.token_in.to_ascii_lowercase(),
            self.token_out_chain_id,
            self.token_out.to_ascii_lowercase(),
            self.trade_type,
            self.amount
        )
    }
}

fn wire_address(asset: &Asset) -> String {
    match asset {
        Asset::Native(_) => NATIVE_ADDRESS.to_string(),
        Asset::Token(token) => token.address.clone(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoutingType {
    #[serde(rename = "CLASSIC")]
    Classic,
    #[serde(rename = "DUTCH_LIMIT")]
    DutchLimit,
    #[serde(rename = "DUTCH_V2")]
    DutchV2,
    #[serde(rename = "DUTCH_V3")]
    DutchV3,
    #[serde(rename = "PRIORITY")]
    Priority,
    #[serde(rename = "LIMIT_ORDER")]
    LimitOrder,
}

impl RoutingType {
    fn offchain_order_type(self) -> Option<OffchainOrderType> {
        match self {
            RoutingType::Classic => None,
            RoutingType::DutchLimit => Some(OffchainOrderType::DutchV1),
            RoutingType::DutchV2 => Some(OffchainOrderType::DutchV2),
            RoutingType::DutchV3 => Some(OffchainOrderType::DutchV3),
            RoutingType::Priority => Some(OffchainOrderType::Priority),
            RoutingType::LimitOrder => Some(OffchainOrderType::Limit),
        }
    }
}

/// Response of `POST /quote`. The quote body depends on `routing`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteResponse {
    pub routing: RoutingType,
    pub quote: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassicQuoteData {
    pub request_id: Option<String>,
    pub quote_id: Option<String>,
    pub block_number: Option<String>,
    pub amount: Option<String>,
    pub quote: Option<String>,
    pub gas_price_wei: Option<String>,
    pub gas_use_estimate: Option<String>,
    #[serde(rename = "gasUseEstimateUSD")]
    pub gas_use_estimate_usd: Option<String>,
    #[serde(default)]
    pub route: Vec<Vec<PoolInRoute>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderQuoteData {
    pub quote_id: Option<String>,
    pub request_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenInRoute {
    pub address: String,
    pub chain_id: u64,
    pub symbol: Option<String>,
    pub decimals: Numeric,
}

impl TokenInRoute {
    fn to_token(&self) -> Result<Token> {
        let decimals = self.decimals.to_u64()?;
        let decimals = u8::try_from(decimals).map_err(|_| PricingError::InvalidAmount(decimals.to_string()))?;
        Token::new(self.chain_id, &self.address, decimals, self.symbol.as_deref())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct V2Reserve {
    pub token: TokenInRoute,
    pub quotient: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct V2PoolInRoute {
    pub token_in: TokenInRoute,
    pub token_out: TokenInRoute,
    pub reserve0: V2Reserve,
    pub reserve1: V2Reserve,
    pub amount_in: Option<String>,
    pub amount_out: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConcentratedPoolInRoute {
    pub token_in: TokenInRoute,
    pub token_out: TokenInRoute,
    pub sqrt_ratio_x96: String,
    pub liquidity: String,
    pub tick_current: String,
    pub fee: Numeric,
    pub hooks: Option<String>,
    pub amount_in: Option<String>,
    pub amount_out: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PoolInRoute {
    #[serde(rename = "v2-pool")]
    V2(V2PoolInRoute),
    #[serde(rename = "v3-pool")]
    V3(ConcentratedPoolInRoute),
    #[serde(rename = "v4-pool")]
    V4(ConcentratedPoolInRoute),
}

impl PoolInRoute {
    fn amount_in(&self) -> Option<&str> {
        match self {
            PoolInRoute::V2(p) => p.amount_in.as_deref(),
            PoolInRoute::V3(p) | PoolInRoute::V4(p) => p.amount_in.as_deref(),
        }
    }

    fn amount_out(&self) -> Option<&str> {
        match self {
            PoolInRoute::V2(p) => p.amount_out.as_deref(),
            PoolInRoute::V3(p) | PoolInRoute::V4(p) => p.amount_out.as_deref(),
        }
    }

    pub fn to_pool(&self) -> Result<Pool> {
        match self {
            PoolInRoute::V2(p) => Ok(Pool::V2(V2Pair {
                token0: p.reserve0.token.to_token()?,
                token1: p.reserve1.token.to_token()?,
                reserve0: parse_raw(&p.reserve0.quotient)?,
                reserve1: parse_raw(&p.reserve1.quotient)?,
                address: p.address.clone(),
            })),
            PoolInRoute::V3(p) => Ok(Pool::V3(p.to_concentrated()?)),
            PoolInRoute::V4(p) => Ok(Pool::V4(p.to_concentrated()?)),
        }
    }
}

impl ConcentratedPoolInRoute {
    /// Tokens are ordered by address, as on chain.
    fn to_concentrated(&self) -> Result<ConcentratedPool> {
        let token_in = self.token_in.to_token()?;
        let token_out = self.token_out.to_token()?;
        let (token0, token1) = if token_in.address <= token_out.address {
            (token_in, token_out)
        } else {
            (token_out, token_in)
        };
        let fee = self.fee.to_u64()?;
        Ok(ConcentratedPool {
            token0,
            token1,
            fee: u32::try_from(fee).map_err(|_| PricingError::InvalidAmount(fee.to_string()))?,
            sqrt_ratio_x96: parse_raw(&self.sqrt_ratio_x96)?,
            liquidity: parse_raw(&self.liquidity)?,
            tick_current: self
                .tick_current
                .trim()
                .parse()
                .map_err(|_| PricingError::InvalidAmount(self.tick_current.clone()))?,
            hooks: self.hooks.clone(),
            address: self.address.clone(),
        })
    }
}

fn parse_raw(value: &str) -> Result<BigUint> {
    BigUint::parse_bytes(value.trim().as_bytes(), 10).ok_or_else(|| PricingError::InvalidAmount(value.to_string()))
}

impl ClassicQuoteData {
    /// Build routes between the request's assets. Any malformed route makes
    /// the whole quote unusable.
    pub fn to_routes(&self, request: &QuoteRequest) -> Result<Vec<Route>> {
        self.route
            .iter()
            .map(|hops| {
                let (Some(first), Some(last)) = (hops.first(), hops.last()) else {
                    return Err(PricingError::EmptyRoute);
                };
                let (Some(amount_in), Some(amount_out)) = (first.amount_in(), last.amount_out()) else {
                    return Err(PricingError::InvalidAmount("route without amountIn/amountOut".to_string()));
                };
                let pools = hops.iter().map(PoolInRoute::to_pool).collect::<Result<Vec<_>>>()?;
                Route::new(
                    pools,
                    AssetAmount::from_raw(request.input.clone(), parse_raw(amount_in)?),
                    AssetAmount::from_raw(request.output.clone(), parse_raw(amount_out)?),
                )
            })
            .collect()
    }
}

impl QuoteResponse {
    /// Convert into a trade for `request`. Malformed quotes are logged and
    /// dropped.
    pub fn into_trade(self, request: &QuoteRequest, method: QuoteMethod) -> Option<Trade> {
        if let Some(order_type) = self.routing.offchain_order_type() {
            let data: OrderQuoteData = serde_json::from_value(self.quote).unwrap_or_default();
            return Some(Trade::Offchain(OffchainOrder {
                order_type,
                quote_id: data.quote_id,
                request_id: data.request_id,
            }));
        }

        let data: ClassicQuoteData = match serde_json::from_value(self.quote) {
            Ok(data) => data,
            Err(e) => {
                warn!("Unreadable classic quote for {}: {}", request.key(), e);
                return None;
            }
        };
        let routes = match data.to_routes(request) {
            Ok(routes) => routes,
            Err(e) => {
                warn!("Failed to compute routes for {}: {}", request.key(), e);
                return None;
            }
        };
        Some(Trade::Classic(ClassicTrade {
            routes,
            trade_type: request.trade_type,
            gas_use_estimate: data.gas_use_estimate.as_deref().and_then(|g| g.parse().ok()),
            gas_use_estimate_usd: data.gas_use_estimate_usd.as_deref().and_then(|g| g.parse().ok()),
            block_number: data.block_number,
            request_id: data.request_id,
            quote_method: method,
        }))
    }
}
