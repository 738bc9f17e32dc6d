use crate::models::{Asset, AssetAmount, AssetId, TradeType};
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of a tracked quote request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteState {
    Idle,
    Loading,
    /// Inputs changed or a refresh is running; the last valid trade is kept.
    Syncing,
    Valid,
    NoRoute,
    Invalid,
}

impl QuoteState {
    pub fn is_pending(&self) -> bool {
        matches!(self, QuoteState::Loading | QuoteState::Syncing)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouterPreference {
    /// Internal preference for price probes: classic routes only.
    Price,
    Api,
    #[serde(rename = "uniswapx")]
    X,
}

/// A request to the quote service. For `ExactOutput`, `amount` is in the
/// output asset; for `ExactInput`, in the input asset.
#[derive(Debug, Clone)]
pub struct QuoteRequest {
    pub input: Asset,
    pub output: Asset,
    pub amount: AssetAmount,
    pub trade_type: TradeType,
    pub preference: RouterPreference,
}

impl QuoteRequest {
    /// Probe request used by the price resolvers: `amount` of the output is
    /// fixed, the input side varies.
    pub fn exact_output(input: Asset, amount: AssetAmount) -> Self {
        Self {
            input,
            output: amount.asset.clone(),
            amount,
            trade_type: TradeType::ExactOutput,
            preference: RouterPreference::Price,
        }
    }

    pub fn key(&self) -> RequestKey {
        RequestKey {
            chain_id: self.input.chain_id(),
            input: self.input.id(),
            output: self.output.id(),
            amount: self.amount.raw.clone(),
            trade_type: self.trade_type,
        }
    }
}

/// Identity of a request, compared to reject stale results.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestKey {
    pub chain_id: u64,
    pub input: AssetId,
    pub output: AssetId,
    pub amount: BigUint,
    pub trade_type: TradeType,
}

impl fmt::Display for RequestKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let side = match self.trade_type {
            TradeType::ExactInput => "in",
            TradeType::ExactOutput => "out",
        };
        write!(f, "{}>{}:{}:{}", self.input, self.output, side, self.amount)
    }
}
