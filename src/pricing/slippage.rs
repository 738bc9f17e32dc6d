//! Automatic slippage tolerance.
//!
//! The tolerance is sized so that the value a trade can lose to slippage is
//! about what it would cost to front-run it: the gas cost of the trade
//! relative to its output value, clamped to a fixed band.

use crate::chains::ChainRegistry;
use crate::models::{Asset, AssetAmount, ClassicTrade, Percent, Price};
use crate::pricing::gas::estimate_gas_units;
use crate::pricing::stablecoin::{stablecoin_amount_from_fiat, StablecoinPriceResolver};
use crate::quote::QuoteProvider;
use num_bigint::BigUint;
use std::sync::Arc;
use tracing::debug;

pub const DEFAULT_AUTO_SLIPPAGE_BPS: u64 = 50;
pub const MIN_AUTO_SLIPPAGE_BPS: u64 = DEFAULT_AUTO_SLIPPAGE_BPS;
pub const MAX_AUTO_SLIPPAGE_BPS: u64 = 500;

/// A default tolerance and the band computed tolerances are clamped to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToleranceBound {
    pub default: Percent,
    pub min: Percent,
    pub max: Percent,
}

impl Default for ToleranceBound {
    fn default() -> Self {
        Self {
            default: Percent::from_bps(DEFAULT_AUTO_SLIPPAGE_BPS),
            min: Percent::from_bps(MIN_AUTO_SLIPPAGE_BPS),
            max: Percent::from_bps(MAX_AUTO_SLIPPAGE_BPS),
        }
    }
}

impl ToleranceBound {
    pub fn clamp(&self, value: Percent) -> Percent {
        value.clamp(self.min.clone(), self.max.clone())
    }
}

/// Everything the calculation looks at. USD figures are stablecoin amounts.
#[derive(Debug, Clone, Default)]
pub struct ToleranceInputs<'a> {
    pub trade: Option<&'a ClassicTrade>,
    pub is_l2: bool,
    pub trusted_gas_estimate: bool,
    pub output_value_usd: Option<&'a AssetAmount>,
    /// The quote service's own gas estimate.
    pub gas_estimate_usd: Option<&'a AssetAmount>,
    /// Gas units from the route cost model priced at the current gas price.
    pub fallback_gas_cost_usd: Option<&'a AssetAmount>,
}

pub fn compute_tolerance(inputs: &ToleranceInputs<'_>) -> Percent {
    compute_tolerance_within(inputs, &ToleranceBound::default())
}

pub fn compute_tolerance_within(inputs: &ToleranceInputs<'_>, bound: &ToleranceBound) -> Percent {
    if inputs.trade.is_none() || inputs.is_l2 {
        return bound.default.clone();
    }

    let cost = match (inputs.trusted_gas_estimate, inputs.gas_estimate_usd) {
        (true, Some(estimate)) => Some(estimate),
        _ => inputs.fallback_gas_cost_usd,
    };
    let (Some(output), Some(cost)) = (inputs.output_value_usd, cost) else {
        return bound.default.clone();
    };

    match cost.as_fraction().divide(&output.as_fraction()) {
        Ok(ratio) => bound.clamp(Percent::from_fraction(ratio)),
        Err(_) => bound.default.clone(),
    }
}

/// USD cost of spending `gas_units` at `gas_price_wei`, given the native
/// currency's price in stablecoin.
pub fn fallback_gas_cost_usd(
    gas_units: Option<u64>,
    gas_price_wei: Option<&BigUint>,
    native_usd_price: Option<&Price>,
) -> Option<AssetAmount> {
    let (units, gas_price, price) = (gas_units?, gas_price_wei?, native_usd_price?);
    let spent = AssetAmount::from_raw(price.base.clone(), gas_price * BigUint::from(units));
    price.quote(&spent).ok()
}

/// Composes the whole calculation for one trade: values the trade output
/// and the native currency in stablecoin, then applies [`compute_tolerance`].
pub struct AutoSlippage {
    chains: Arc<ChainRegistry>,
    output_usd: StablecoinPriceResolver,
    native_usd: StablecoinPriceResolver,
}

impl AutoSlippage {
    pub fn new(chains: Arc<ChainRegistry>, provider: Arc<dyn QuoteProvider>) -> Self {
        Self {
            output_usd: StablecoinPriceResolver::new(chains.clone(), provider.clone()),
            native_usd: StablecoinPriceResolver::new(chains.clone(), provider),
            chains,
        }
    }

    pub async fn tolerance(&mut self, trade: Option<&ClassicTrade>, gas_price_wei: Option<&BigUint>) -> Percent {
        let Some(trade) = trade else {
            return ToleranceBound::default().default;
        };
        let output = match trade.output_amount() {
            Ok(Some(output)) => output,
            Ok(None) => return ToleranceBound::default().default,
            Err(e) => {
                debug!("Trade output cannot be summed: {}", e);
                return ToleranceBound::default().default;
            }
        };
        let Some(chain) = self.chains.for_asset(&output.asset).cloned() else {
            return ToleranceBound::default().default;
        };
        let native: Asset = chain.native_asset();

        let (output_value, native_price) = tokio::join!(
            self.output_usd.stablecoin_value(&output),
            self.native_usd.refresh(&native),
        );

        let gas_estimate = trade
            .gas_use_estimate_usd
            .and_then(|usd| stablecoin_amount_from_fiat(&chain, usd));
        let fallback = fallback_gas_cost_usd(
            estimate_gas_units(Some(trade)),
            gas_price_wei,
            native_price.price.as_deref(),
        );

        let tolerance = compute_tolerance(&ToleranceInputs {
            trade: Some(trade),
            is_l2: chain.is_l2,
            trusted_gas_estimate: chain.trusted_gas_estimate,
            output_value_usd: output_value.as_ref(),
            gas_estimate_usd: gas_estimate.as_ref(),
            fallback_gas_cost_usd: fallback.as_ref(),
        });
        debug!("Auto slippage for {} on {}: {}", output, chain.name, tolerance);
        tolerance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chains::MAINNET;
    use crate::fixtures::{
        classic_trade, eth, registry, stablecoin_probe_request, usd_trade, usdc, v3_route, weth, Scripted,
        ScriptedQuoteProvider,
    };
    use crate::models::Fraction;

    fn usd(value: &str) -> AssetAmount {
        AssetAmount::from_decimal_str(usdc().into(), value).unwrap()
    }

    fn trade() -> ClassicTrade {
        classic_trade(vec![v3_route(&weth(), &usdc(), 1, 1, 1)])
    }

    fn tolerance(output: &str, cost: &str) -> Percent {
        let trade = trade();
        let (output, cost) = (usd(output), usd(cost));
        compute_tolerance(&ToleranceInputs {
            trade: Some(&trade),
            output_value_usd: Some(&output),
            fallback_gas_cost_usd: Some(&cost),
            ..Default::default()
        })
    }

    #[test]
    fn test_cheap_gas_clamps_to_min() {
        assert_eq!(tolerance("1000", "5"), Percent::from_bps(50));
    }

    #[test]
    fn test_expensive_gas_clamps_to_max() {
        assert_eq!(tolerance("10", "5"), Percent::from_bps(500));
    }

    #[test]
    fn test_ratio_inside_band() {
        assert_eq!(tolerance("500", "5"), Percent::from_bps(100));
        assert_eq!(tolerance("400", "5").to_string(), "1.25%");
    }

    #[test]
    fn test_result_always_within_band() {
        let bound = ToleranceBound::default();
        for (output, cost) in [("1", "1000"), ("1000000", "0.01"), ("250", "3.3"), ("0.5", "0")] {
            let result = tolerance(output, cost);
            assert!(result >= bound.min && result <= bound.max, "{} / {}", cost, output);
        }
    }

    #[test]
    fn test_cost_is_monotonic() {
        let mut previous = tolerance("1000", "1");
        for cost in ["5", "7.5", "10", "20", "49.99", "50", "80"] {
            let next = tolerance("1000", cost);
            assert!(next >= previous);
            previous = next;
        }
    }

    #[test]
    fn test_defaults() {
        let default = Percent::from_bps(DEFAULT_AUTO_SLIPPAGE_BPS);
        let (output, cost) = (usd("10"), usd("5"));
        // no trade
        let inputs = ToleranceInputs {
            output_value_usd: Some(&output),
            fallback_gas_cost_usd: Some(&cost),
            ..Default::default()
        };
        assert_eq!(compute_tolerance(&inputs), default);

        let trade = trade();
        let l2 = ToleranceInputs {
            trade: Some(&trade),
            is_l2: true,
            ..inputs.clone()
        };
        assert_eq!(compute_tolerance(&l2), default);

        let no_cost = ToleranceInputs {
            trade: Some(&trade),
            fallback_gas_cost_usd: None,
            ..inputs.clone()
        };
        assert_eq!(compute_tolerance(&no_cost), default);

        let zero = usd("0");
        let zero_output = ToleranceInputs {
            trade: Some(&trade),
            output_value_usd: Some(&zero),
            ..inputs
        };
        assert_eq!(compute_tolerance(&zero_output), default);
    }

    #[test]
    fn test_trusted_estimate_preferred() {
        let trade = trade();
        let (output, estimate, fallback) = (usd("1000"), usd("20"), usd("5"));
        let mut inputs = ToleranceInputs {
            trade: Some(&trade),
            trusted_gas_estimate: true,
            output_value_usd: Some(&output),
            gas_estimate_usd: Some(&estimate),
            fallback_gas_cost_usd: Some(&fallback),
            ..Default::default()
        };
        assert_eq!(compute_tolerance(&inputs), Percent::from_bps(200));
        inputs.trusted_gas_estimate = false;
        assert_eq!(compute_tolerance(&inputs), Percent::from_bps(50));
        inputs.trusted_gas_estimate = true;
        inputs.gas_estimate_usd = None;
        assert_eq!(compute_tolerance(&inputs), Percent::from_bps(50));
    }

    #[test]
    fn test_fallback_gas_cost() {
        let eth_usd = Price::from_parts(eth(), usdc().into(), 2000u64 * 1_000_000, 10u64.pow(18)).unwrap();
        let gwei = BigUint::from(20_000_000_000u64);
        let cost = fallback_gas_cost_usd(Some(200_000), Some(&gwei), Some(&eth_usd)).unwrap();
        // 0.004 ETH at $2000
        assert_eq!(cost, usd("8"));
        assert!(fallback_gas_cost_usd(None, Some(&gwei), Some(&eth_usd)).is_none());
        assert!(fallback_gas_cost_usd(Some(200_000), None, Some(&eth_usd)).is_none());
        assert!(fallback_gas_cost_usd(Some(200_000), Some(&gwei), None).is_none());
    }

    #[tokio::test]
    async fn test_auto_slippage_end_to_end() {
        let eth = eth();
        let provider = ScriptedQuoteProvider::new()
            .on(&stablecoin_probe_request(&eth), Scripted::Route(usd_trade(&eth, 2000)));
        let mut auto = AutoSlippage::new(Arc::new(registry()), Arc::new(provider));

        // output of 400 USDC; one v3 hop is 170k gas
        let route = v3_route(&weth(), &usdc(), 1, 1, 400_000_000);
        let mut trade = classic_trade(vec![route]);
        trade.gas_use_estimate_usd = None;
        let gwei = BigUint::from(25_000_000_000u64);
        // 170_000 * 25 gwei = 0.00425 ETH = $8.50 -> 2.125%
        let result = auto.tolerance(Some(&trade), Some(&gwei)).await;
        assert_eq!(result.ratio(), &Fraction::new(2125u32, 100_000u32).unwrap());

        trade.gas_use_estimate_usd = Some(4.0);
        assert_eq!(auto.tolerance(Some(&trade), Some(&gwei)).await, Percent::from_bps(100));

        assert_eq!(auto.tolerance(None, Some(&gwei)).await, Percent::from_bps(50));
        assert!(registry().get(MAINNET).unwrap().trusted_gas_estimate);
    }
}
