//! Price of an asset in the chain's native currency.

use crate::chains::ChainRegistry;
use crate::models::{Asset, Fraction, Price, QuoteRequest, RequestKey, Trade};
use crate::pricing::request::{PricePlan, ProbeQuote};
use crate::quote::QuoteProvider;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, Serialize)]
pub struct NativePrice {
    /// One raw unit of the asset in raw native units.
    #[serde(serialize_with = "serialize_price")]
    pub price: Option<Arc<Price>>,
    /// A request is in flight and there is no price to show yet. A retained
    /// price being re-synced is not loading.
    pub loading: bool,
}

fn serialize_price<S: serde::Serializer>(price: &Option<Arc<Price>>, serializer: S) -> Result<S::Ok, S::Error> {
    match price {
        Some(price) => serializer.serialize_some(&price.to_f64()),
        None => serializer.serialize_none(),
    }
}

/// Decide how `asset` gets priced in native currency.
pub fn native_price_plan(chains: &ChainRegistry, asset: &Asset) -> PricePlan {
    let Some(chain) = chains.for_asset(asset) else {
        return PricePlan::Unsupported;
    };
    if asset.wrapped() == &chain.native.wrapped {
        return PricePlan::Identity(Price::new(
            asset.clone(),
            chain.native_asset(),
            Fraction::from_integer(1u32),
        ));
    }
    PricePlan::Quote(QuoteRequest::exact_output(asset.clone(), chain.native_probe()))
}

pub struct NativePriceResolver {
    chains: Arc<ChainRegistry>,
    provider: Arc<dyn QuoteProvider>,
    probe: ProbeQuote,
}

impl NativePriceResolver {
    pub fn new(chains: Arc<ChainRegistry>, provider: Arc<dyn QuoteProvider>) -> Self {
        Self {
            chains,
            provider,
            probe: ProbeQuote::default(),
        }
    }

    /// Point the resolver at `asset`. Returns the quote request the caller
    /// must send, or `None` when nothing needs to be sent.
    pub fn prepare(&mut self, asset: &Asset) -> Option<QuoteRequest> {
        let plan = native_price_plan(&self.chains, asset);
        self.probe.prepare(plan)
    }

    /// Deliver the outcome of a request. Stale outcomes are ignored.
    pub fn apply(&mut self, key: &RequestKey, outcome: Result<Option<Trade>, anyhow::Error>) -> bool {
        self.probe.apply(key, outcome)
    }

    pub fn output(&mut self) -> NativePrice {
        let price = self.probe.price();
        let loading = price.is_none() && !self.probe.is_identity() && self.probe.state().is_pending();
        NativePrice { price, loading }
    }

    /// Prepare, send through the provider and report in one step.
    pub async fn refresh(&mut self, asset: &Asset) -> NativePrice {
        if let Some(request) = self.prepare(asset) {
            let outcome = self.provider.request_quote(&request).await;
            self.apply(&request.key(), outcome);
        }
        self.output()
    }
}
