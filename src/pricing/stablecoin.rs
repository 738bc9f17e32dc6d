//! Price of an asset in the chain's reference stablecoin.

use crate::chains::{ChainInfo, ChainRegistry};
use crate::models::{Asset, AssetAmount, Fraction, Price, QuoteRequest, QuoteState, RequestKey, Trade};
use crate::pricing::request::{PricePlan, ProbeQuote};
use crate::quote::QuoteProvider;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct StablecoinPrice {
    pub price: Option<Arc<Price>>,
    pub state: QuoteState,
}

/// Decide how `asset` gets priced in the chain's stablecoin.
pub fn stablecoin_price_plan(chains: &ChainRegistry, asset: &Asset) -> PricePlan {
    let Some(chain) = chains.for_asset(asset) else {
        return PricePlan::Unsupported;
    };
    let (Some(stablecoin), Some(probe)) = (chain.stablecoin_asset(), chain.stablecoin_probe()) else {
        return PricePlan::Unsupported;
    };
    if asset.wrapped() == stablecoin.wrapped() {
        return PricePlan::Identity(Price::new(asset.clone(), stablecoin, Fraction::from_integer(1u32)));
    }
    PricePlan::Quote(QuoteRequest::exact_output(asset.clone(), probe))
}

/// Parse a fiat figure into an amount of the chain's stablecoin, dropping
/// digits past the stablecoin's precision.
pub fn stablecoin_amount_from_fiat(chain: &ChainInfo, fiat: f64) -> Option<AssetAmount> {
    let stablecoin = chain.stablecoin_asset()?;
    if !fiat.is_finite() || fiat < 0.0 {
        return None;
    }
    // shortest exact decimal form, never exponent notation
    AssetAmount::from_decimal_str(stablecoin, &fiat.to_string()).ok()
}

pub struct StablecoinPriceResolver {
    chains: Arc<ChainRegistry>,
    provider: Arc<dyn QuoteProvider>,
    probe: ProbeQuote,
}

impl StablecoinPriceResolver {
    pub fn new(chains: Arc<ChainRegistry>, provider: Arc<dyn QuoteProvider>) -> Self {
        Self {
            chains,
            provider,
            probe: ProbeQuote::default(),
        }
    }

    pub fn prepare(&mut self, asset: &Asset) -> Option<QuoteRequest> {
        let plan = stablecoin_price_plan(&self.chains, asset);
        self.probe.prepare(plan)
    }

    pub fn apply(&mut self, key: &RequestKey, outcome: Result<Option<Trade>, anyhow::Error>) -> bool {
        self.probe.apply(key, outcome)
    }

    /// An identity price is valid without a quote.
    pub fn output(&mut self) -> StablecoinPrice {
        let state = if self.probe.is_identity() {
            QuoteState::Valid
        } else {
            self.probe.state()
        };
        StablecoinPrice {
            price: self.probe.price(),
            state,
        }
    }

    pub async fn refresh(&mut self, asset: &Asset) -> StablecoinPrice {
        if let Some(request) = self.prepare(asset) {
            let outcome = self.provider.request_quote(&request).await;
            self.apply(&request.key(), outcome);
        }
        self.output()
    }

    /// Value of `amount` in stablecoin, if its asset can be priced.
    pub async fn stablecoin_value(&mut self, amount: &AssetAmount) -> Option<AssetAmount> {
        let price = self.refresh(&amount.asset).await.price?;
        match price.quote(amount) {
            Ok(value) => Some(value),
            Err(e) => {
                debug!("Cannot value {}: {}", amount, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chains::{BASE, MAINNET, OPTIMISM};
    use crate::fixtures::{
        dai, eth, registry, stablecoin_probe_request, uni, usd_trade, usdc, weth, Scripted, ScriptedQuoteProvider,
    };
    use crate::models::{decimal_scale, OffchainOrder, OffchainOrderType, Token};
    use num_bigint::BigUint;

    fn setup(provider: ScriptedQuoteProvider) -> (StablecoinPriceResolver, Arc<ScriptedQuoteProvider>) {
        let provider = Arc::new(provider);
        let resolver = StablecoinPriceResolver::new(Arc::new(registry()), provider.clone());
        (resolver, provider)
    }

    #[tokio::test]
    async fn test_stablecoin_is_identity_without_quote_service() {
        let usdc: Asset = usdc().into();
        let failing = ScriptedQuoteProvider::new().on(&stablecoin_probe_request(&usdc), Scripted::Fail);
        let (mut resolver, provider) = setup(failing);
        let out = resolver.refresh(&usdc).await;
        assert_eq!(out.state, QuoteState::Valid);
        assert_eq!(out.price.unwrap().raw(), &Fraction::from_integer(1u32));
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_token_priced_from_probe_quote() {
        let weth: Asset = weth().into();
        let request = stablecoin_probe_request(&weth);
        // mainnet override: exact output of 100k USDC
        assert_eq!(request.amount.raw, BigUint::from(100_000u32) * decimal_scale(6));
        let (mut resolver, _) =
            setup(ScriptedQuoteProvider::new().on(&request, Scripted::Route(usd_trade(&weth, 2000))));
        let out = resolver.refresh(&weth).await;
        assert_eq!(out.state, QuoteState::Valid);
        let price = out.price.unwrap();
        assert_eq!(price.quote, usdc().into());
        assert_eq!(price.adjusted(), Fraction::from_integer(2000u32));
    }

    #[tokio::test]
    async fn test_native_asset_is_quoted_not_identity() {
        let eth = eth();
        let (mut resolver, provider) = setup(
            ScriptedQuoteProvider::new().on(&stablecoin_probe_request(&eth), Scripted::Route(usd_trade(&eth, 1800))),
        );
        let out = resolver.refresh(&eth).await;
        assert_eq!(out.price.unwrap().base, eth);
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_states_are_reported_verbatim() {
        let uni: Asset = uni().into();
        let request = stablecoin_probe_request(&uni);

        let (mut resolver, _) = setup(ScriptedQuoteProvider::new().on(&request, Scripted::NoRoute));
        let out = resolver.refresh(&uni).await;
        assert_eq!(out.state, QuoteState::NoRoute);
        assert!(out.price.is_none());

        let (mut resolver, _) = setup(ScriptedQuoteProvider::new().on(&request, Scripted::Fail));
        assert_eq!(resolver.refresh(&uni).await.state, QuoteState::Invalid);

        let (mut resolver, _) = setup(ScriptedQuoteProvider::new());
        resolver.prepare(&uni);
        assert_eq!(resolver.output().state, QuoteState::Loading);
    }

    #[tokio::test]
    async fn test_offchain_order_is_valid_but_unpriced() {
        let uni: Asset = uni().into();
        let order = Trade::Offchain(OffchainOrder {
            order_type: OffchainOrderType::Priority,
            quote_id: None,
            request_id: None,
        });
        let (mut resolver, _) =
            setup(ScriptedQuoteProvider::new().on(&stablecoin_probe_request(&uni), Scripted::Route(order)));
        let out = resolver.refresh(&uni).await;
        assert_eq!(out.state, QuoteState::Valid);
        assert!(out.price.is_none());
    }

    #[test]
    fn test_stale_result_after_input_change() {
        let weth: Asset = weth().into();
        let dai: Asset = dai().into();
        let (mut resolver, _) = setup(ScriptedQuoteProvider::new());
        let old = resolver.prepare(&weth).unwrap();
        resolver.prepare(&dai).unwrap();
        assert!(!resolver.apply(&old.key(), Ok(Some(usd_trade(&weth, 2000)))));
        let out = resolver.output();
        assert_eq!(out.state, QuoteState::Loading);
        assert!(out.price.is_none());
    }

    #[test]
    fn test_unsupported_chain_is_idle() {
        let token = Token::new(56, "0x55d398326f99059fF775485246999027B3197955", 18, Some("USDT")).unwrap();
        let (mut resolver, _) = setup(ScriptedQuoteProvider::new());
        assert!(resolver.prepare(&token.into()).is_none());
        let out = resolver.output();
        assert_eq!(out.state, QuoteState::Idle);
        assert!(out.price.is_none());
    }

    #[tokio::test]
    async fn test_stablecoin_value() {
        let weth: Asset = weth().into();
        let (mut resolver, _) = setup(
            ScriptedQuoteProvider::new().on(&stablecoin_probe_request(&weth), Scripted::Route(usd_trade(&weth, 2000))),
        );
        let half = AssetAmount::from_decimal_str(weth, "0.5").unwrap();
        let value = resolver.stablecoin_value(&half).await.unwrap();
        assert_eq!(value.to_exact(), "1000.000000");
    }

    #[test]
    fn test_amount_from_fiat() {
        let chains = registry();
        let mainnet = chains.get(MAINNET).unwrap();
        let amount = stablecoin_amount_from_fiat(mainnet, 12.3456789).unwrap();
        assert_eq!(amount.raw, BigUint::from(12_345_678u32));
        let almost_two = stablecoin_amount_from_fiat(mainnet, 1.9999999).unwrap();
        assert_eq!(almost_two.raw, BigUint::from(1_999_999u32));
        let tiny = stablecoin_amount_from_fiat(mainnet, 0.0000001).unwrap();
        assert!(tiny.is_zero());
        let op = stablecoin_amount_from_fiat(chains.get(OPTIMISM).unwrap(), 1.5).unwrap();
        assert_eq!(op.raw, BigUint::from(15u32) * decimal_scale(17));
        assert!(stablecoin_amount_from_fiat(chains.get(BASE).unwrap(), f64::NAN).is_none());
        assert!(stablecoin_amount_from_fiat(mainnet, -1.0).is_none());
    }
}
