//! USD value of an amount: through the native currency and the spot feed
//! when possible, through the stablecoin otherwise.

use crate::chains::ChainRegistry;
use crate::models::AssetAmount;
use crate::pricing::native::NativePriceResolver;
use crate::pricing::stablecoin::StablecoinPriceResolver;
use crate::quote::QuoteProvider;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsdValue {
    pub data: Option<f64>,
    pub is_loading: bool,
}

impl UsdValue {
    fn absent(is_loading: bool) -> Self {
        Self { data: None, is_loading }
    }
}

pub struct UsdPriceResolver {
    native: NativePriceResolver,
    stablecoin: StablecoinPriceResolver,
}

impl UsdPriceResolver {
    pub fn new(chains: Arc<ChainRegistry>, provider: Arc<dyn QuoteProvider>) -> Self {
        Self {
            native: NativePriceResolver::new(chains.clone(), provider.clone()),
            stablecoin: StablecoinPriceResolver::new(chains, provider),
        }
    }

    /// `native_usd` is the latest spot price of the chain's native currency.
    pub async fn refresh(&mut self, amount: Option<&AssetAmount>, native_usd: Option<f64>) -> UsdValue {
        let Some(amount) = amount else {
            return UsdValue::absent(false);
        };

        let native = self.native.refresh(&amount.asset).await;
        let native_priced = native.price.is_some() || native.loading;
        if let (true, Some(native_usd)) = (native_priced, native_usd) {
            let Some(price) = native.price else {
                return UsdValue::absent(true);
            };
            return match price.quote(amount) {
                Ok(native_amount) => UsdValue {
                    data: Some(native_amount.to_f64() * native_usd),
                    is_loading: false,
                },
                Err(e) => {
                    debug!("Native valuation of {} failed: {}", amount, e);
                    UsdValue::absent(false)
                }
            };
        }

        let stable = self.stablecoin.refresh(&amount.asset).await;
        let data = stable
            .price
            .and_then(|price| price.quote(amount).ok())
            .map(|value| value.to_f64());
        UsdValue {
            data,
            is_loading: data.is_none() && stable.state.is_pending(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{
        eth, native_probe_request, priced_trade, registry, stablecoin_probe_request, uni, usd_trade, usdc, Scripted,
        ScriptedQuoteProvider,
    };
    use crate::models::Asset;

    fn setup(provider: ScriptedQuoteProvider) -> UsdPriceResolver {
        UsdPriceResolver::new(Arc::new(registry()), Arc::new(provider))
    }

    fn amount(asset: &Asset, value: &str) -> AssetAmount {
        AssetAmount::from_decimal_str(asset.clone(), value).unwrap()
    }

    #[tokio::test]
    async fn test_native_currency_uses_spot_price() {
        let mut resolver = setup(ScriptedQuoteProvider::new());
        let eth = eth();
        let value = resolver.refresh(Some(&amount(&eth, "2")), Some(1850.0)).await;
        assert_eq!(value, UsdValue { data: Some(3700.0), is_loading: false });
    }

    #[tokio::test]
    async fn test_token_through_native_route() {
        let uni: Asset = uni().into();
        // 1 UNI = 0.004 ETH
        let trade = priced_trade(&uni, &eth(), 4u32, 1_000u32);
        let mut resolver = setup(ScriptedQuoteProvider::new().on(&native_probe_request(&uni), Scripted::Route(trade)));
        let value = resolver.refresh(Some(&amount(&uni, "10")), Some(2000.0)).await;
        let data = value.data.unwrap();
        assert!((data - 80.0).abs() < 1e-9);
        assert!(!value.is_loading);
    }

    #[tokio::test]
    async fn test_falls_back_to_stablecoin_without_spot_price() {
        let eth = eth();
        let mut resolver = setup(
            ScriptedQuoteProvider::new().on(&stablecoin_probe_request(&eth), Scripted::Route(usd_trade(&eth, 1800))),
        );
        let value = resolver.refresh(Some(&amount(&eth, "0.5")), None).await;
        assert_eq!(value.data, Some(900.0));
    }

    #[tokio::test]
    async fn test_falls_back_to_stablecoin_without_native_route() {
        let uni: Asset = uni().into();
        let mut resolver = setup(
            ScriptedQuoteProvider::new()
                .on(&native_probe_request(&uni), Scripted::NoRoute)
                .on(&stablecoin_probe_request(&uni), Scripted::Route(usd_trade(&uni, 7))),
        );
        let value = resolver.refresh(Some(&amount(&uni, "3")), Some(2000.0)).await;
        assert_eq!(value.data, Some(21.0));
    }

    #[tokio::test]
    async fn test_stablecoin_amount_is_its_own_value() {
        let usdc: Asset = usdc().into();
        let mut resolver = setup(ScriptedQuoteProvider::new().on(&native_probe_request(&usdc), Scripted::Fail));
        let value = resolver.refresh(Some(&amount(&usdc, "12.5")), Some(2000.0)).await;
        assert_eq!(value.data, Some(12.5));
    }

    #[tokio::test]
    async fn test_unpriceable_and_absent() {
        let uni: Asset = uni().into();
        let mut resolver = setup(ScriptedQuoteProvider::new());
        let value = resolver.refresh(Some(&amount(&uni, "1")), Some(2000.0)).await;
        assert_eq!(value, UsdValue { data: None, is_loading: false });
        assert_eq!(resolver.refresh(None, Some(2000.0)).await, UsdValue { data: None, is_loading: false });
    }
}
