use crate::error::Result;
use crate::models::{AssetAmount, Route};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeType {
    ExactInput,
    ExactOutput,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuoteMethod {
    RoutingApi,
    Replay,
}

/// Off-chain order flavours returned instead of an on-chain route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OffchainOrderType {
    DutchV1,
    DutchV2,
    DutchV3,
    Priority,
    Limit,
}

impl fmt::Display for OffchainOrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OffchainOrderType::DutchV1 => "DUTCH_LIMIT",
            OffchainOrderType::DutchV2 => "DUTCH_V2",
            OffchainOrderType::DutchV3 => "DUTCH_V3",
            OffchainOrderType::Priority => "PRIORITY",
            OffchainOrderType::Limit => "LIMIT_ORDER",
        };
        f.write_str(name)
    }
}

/// A trade filled through on-chain routes.
#[derive(Debug, Clone)]
pub struct ClassicTrade {
    pub routes: Vec<Route>,
    pub trade_type: TradeType,
    pub gas_use_estimate: Option<u64>,
    pub gas_use_estimate_usd: Option<f64>,
    pub block_number: Option<String>,
    pub request_id: Option<String>,
    pub quote_method: QuoteMethod,
}

impl ClassicTrade {
    pub fn input_amount(&self) -> Result<Option<AssetAmount>> {
        sum_amounts(self.routes.iter().map(|r| &r.input_amount))
    }

    pub fn output_amount(&self) -> Result<Option<AssetAmount>> {
        sum_amounts(self.routes.iter().map(|r| &r.output_amount))
    }
}

/// An order filled off-chain by a filler. Carries no routes, so it cannot
/// be priced.
#[derive(Debug, Clone)]
pub struct OffchainOrder {
    pub order_type: OffchainOrderType,
    pub quote_id: Option<String>,
    pub request_id: Option<String>,
}

#[derive(Debug, Clone)]
pub enum Trade {
    Classic(ClassicTrade),
    Offchain(OffchainOrder),
}

impl Trade {
    pub fn as_classic(&self) -> Option<&ClassicTrade> {
        match self {
            Trade::Classic(trade) => Some(trade),
            Trade::Offchain(_) => None,
        }
    }

    pub fn fill_type(&self) -> &'static str {
        match self {
            Trade::Classic(_) => "classic",
            Trade::Offchain(_) => "uniswap_x",
        }
    }
}

fn sum_amounts<'a>(mut amounts: impl Iterator<Item = &'a AssetAmount>) -> Result<Option<AssetAmount>> {
    let Some(first) = amounts.next() else {
        return Ok(None);
    };
    let mut total = first.clone();
    for amount in amounts {
        total = total.add(amount)?;
    }
    Ok(Some(total))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{classic_trade, usdc, v3_route, weth};
    use num_bigint::BigUint;

    #[test]
    fn test_amounts_sum_across_routes() {
        let trade = classic_trade(vec![
            v3_route(&weth(), &usdc(), 1, 100, 200),
            v3_route(&weth(), &usdc(), 2, 300, 400),
        ]);
        assert_eq!(trade.input_amount().unwrap().unwrap().raw, BigUint::from(400u32));
        assert_eq!(trade.output_amount().unwrap().unwrap().raw, BigUint::from(600u32));
    }

    #[test]
    fn test_only_classic_exposes_routes() {
        let classic = Trade::Classic(classic_trade(vec![v3_route(&weth(), &usdc(), 1, 1, 1)]));
        let dutch = Trade::Offchain(OffchainOrder {
            order_type: OffchainOrderType::DutchV2,
            quote_id: None,
            request_id: None,
        });
        assert!(classic.as_classic().is_some());
        assert!(dutch.as_classic().is_none());
        assert_eq!(dutch.fill_type(), "uniswap_x");
        assert!(classic_trade(vec![]).output_amount().unwrap().is_none());
    }
}
