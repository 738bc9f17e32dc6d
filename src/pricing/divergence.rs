//! Warns when a pool's price has drifted away from the market.

use crate::chains::ChainRegistry;
use crate::models::{Fraction, Percent, Pool, Price};
use crate::pricing::stablecoin::StablecoinPriceResolver;
use crate::quote::QuoteProvider;
use num_bigint::BigUint;
use num_traits::Zero;
use std::sync::Arc;
use tracing::debug;

pub const WARNING_THRESHOLD_BPS: u64 = 500;

/// Fixed-point scale for the price comparison.
fn scale() -> BigUint {
    BigUint::from(10u32).pow(18)
}

/// `true` when `pool_price` differs from the market rate implied by the two
/// USD prices by more than the warning threshold. Missing inputs never warn.
pub fn is_pool_out_of_sync(pool_price: Option<&Price>, base_usd: Option<&Price>, quote_usd: Option<&Price>) -> bool {
    let (Some(pool_price), Some(base_usd), Some(quote_usd)) = (pool_price, base_usd, quote_usd) else {
        return false;
    };
    let Ok(market) = base_usd.adjusted().divide(&quote_usd.adjusted()) else {
        return false;
    };

    let scale = scale();
    let market_scaled = market.scaled(&scale);
    if market_scaled.is_zero() {
        return false;
    }
    let pool_scaled = pool_price.adjusted().scaled(&scale);
    let difference = if pool_scaled >= market_scaled {
        &pool_scaled - &market_scaled
    } else {
        &market_scaled - &pool_scaled
    };

    match Fraction::new(difference, market_scaled) {
        Ok(divergence) => {
            let divergence = Percent::from_fraction(divergence);
            debug!("Pool {} diverges {} from market", pool_price, divergence);
            divergence > Percent::from_bps(WARNING_THRESHOLD_BPS)
        }
        Err(_) => false,
    }
}

/// Resolves USD prices for both sides of a pool and applies
/// [`is_pool_out_of_sync`].
pub struct PoolSyncMonitor {
    base_usd: StablecoinPriceResolver,
    quote_usd: StablecoinPriceResolver,
}

impl PoolSyncMonitor {
    pub fn new(chains: Arc<ChainRegistry>, provider: Arc<dyn QuoteProvider>) -> Self {
        Self {
            base_usd: StablecoinPriceResolver::new(chains.clone(), provider.clone()),
            quote_usd: StablecoinPriceResolver::new(chains, provider),
        }
    }

    pub async fn check(&mut self, pool_price: Option<&Price>) -> bool {
        let Some(pool_price) = pool_price else {
            return false;
        };
        let (base, quote) = tokio::join!(
            self.base_usd.refresh(&pool_price.base),
            self.quote_usd.refresh(&pool_price.quote),
        );
        is_pool_out_of_sync(Some(pool_price), base.price.as_deref(), quote.price.as_deref())
    }

    /// Check the price of `pool`'s token0 in token1.
    pub async fn check_pool(&mut self, pool: &Pool) -> bool {
        match pool.price_of(pool.token0()) {
            Ok(price) => self.check(Some(&price)).await,
            Err(e) => {
                debug!("Pool has no usable price: {}", e);
                false
            }
        }
    }
}
