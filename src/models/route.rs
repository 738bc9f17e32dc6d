use crate::error::{PricingError, Result};
use crate::models::{Asset, AssetAmount, Fraction, Pool, PoolFamily, Price};
use std::fmt;

/// Protocol tag of a route, derived from the families of its pools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Protocol {
    V2,
    V3,
    /// Routes made only of v4 pools. Treated as a not-yet-modelled kind.
    V4,
    Mixed,
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Protocol::V2 => "V2",
            Protocol::V3 => "V3",
            Protocol::V4 => "V4",
            Protocol::Mixed => "MIXED",
        };
        f.write_str(name)
    }
}

/// An ordered path of pools from `input` to `output`.
#[derive(Debug, Clone)]
pub struct Route {
    pub protocol: Protocol,
    pub pools: Vec<Pool>,
    pub input: Asset,
    pub output: Asset,
    pub input_amount: AssetAmount,
    pub output_amount: AssetAmount,
    /// Product of the pool mid prices along the path, output per input.
    pub mid_price: Price,
}

impl Route {
    pub fn new(
        pools: Vec<Pool>,
        input_amount: AssetAmount,
        output_amount: AssetAmount,
    ) -> Result<Self> {
        if pools.is_empty() {
            return Err(PricingError::EmptyRoute);
        }
        let input = input_amount.asset.clone();
        let output = output_amount.asset.clone();

        let mut current = input.wrapped().clone();
        let mut raw = Fraction::from_integer(1u32);
        for pool in &pools {
            let hop = pool.price_of(&current)?;
            raw = raw.multiply(hop.raw());
            current = pool
                .other(&current)
                .cloned()
                .ok_or_else(|| PricingError::DisconnectedRoute(current.address.clone()))?;
        }
        if &current != output.wrapped() {
            return Err(PricingError::DisconnectedRoute(format!(
                "path ends at {} instead of {}",
                current.address,
                output.wrapped().address
            )));
        }

        Ok(Self {
            protocol: protocol_of(&pools),
            mid_price: Price::new(input.clone(), output.clone(), raw),
            pools,
            input,
            output,
            input_amount,
            output_amount,
        })
    }

    pub fn pool_count(&self) -> usize {
        self.pools.len()
    }
}

fn protocol_of(pools: &[Pool]) -> Protocol {
    let first = pools.first().map(Pool::family);
    if pools.iter().any(|p| Some(p.family()) != first) {
        return Protocol::Mixed;
    }
    match first {
        Some(PoolFamily::V2) => Protocol::V2,
        Some(PoolFamily::V3) => Protocol::V3,
        Some(PoolFamily::V4) => Protocol::V4,
        None => Protocol::Mixed,
    }
}

/// Split a mixed route into maximal contiguous runs of the same pool family.
pub fn partition_by_family(pools: &[Pool]) -> Vec<&[Pool]> {
    pools.chunk_by(|a, b| a.family() == b.family()).collect()
}
