//! Gas-unit estimate for a routed trade, without simulating it.

use crate::models::{partition_by_family, ClassicTrade, PoolFamily, Protocol, Route};
use tracing::warn;

/// Base cost of a v3 swap regardless of hop count.
pub const V3_SWAP_BASE_GAS_ESTIMATE: u64 = 100_000;
/// Extra cost per v3 hop.
pub const V3_SWAP_HOP_GAS_ESTIMATE: u64 = 70_000;
/// Base cost of a v2 swap regardless of hop count.
pub const V2_SWAP_BASE_GAS_ESTIMATE: u64 = 135_000;
/// Extra cost per v2 hop.
pub const V2_SWAP_HOP_GAS_ESTIMATE: u64 = 50_000;

/// Sum of the per-route estimates, or `None` when there is no trade.
pub fn estimate_gas_units(trade: Option<&ClassicTrade>) -> Option<u64> {
    let trade = trade?;
    Some(trade.routes.iter().map(route_gas_units).sum())
}

pub fn route_gas_units(route: &Route) -> u64 {
    let hops = route.pool_count() as u64;
    match route.protocol {
        Protocol::V2 => V2_SWAP_BASE_GAS_ESTIMATE + hops * V2_SWAP_HOP_GAS_ESTIMATE,
        Protocol::V3 => V3_SWAP_BASE_GAS_ESTIMATE + hops * V3_SWAP_HOP_GAS_ESTIMATE,
        Protocol::Mixed => mixed_route_gas_units(route),
        // no model yet, fall back to the v3 profile
        Protocol::V4 => V3_SWAP_BASE_GAS_ESTIMATE + hops * V3_SWAP_HOP_GAS_ESTIMATE,
    }
}

/// A v2 section is charged one hop less than a standalone v2 route.
fn mixed_route_gas_units(route: &Route) -> u64 {
    partition_by_family(&route.pools)
        .into_iter()
        .map(|section| {
            let len = section.len() as u64;
            match section[0].family() {
                PoolFamily::V3 => V3_SWAP_BASE_GAS_ESTIMATE + len * V3_SWAP_HOP_GAS_ESTIMATE,
                PoolFamily::V2 => V2_SWAP_BASE_GAS_ESTIMATE + (len - 1) * V2_SWAP_HOP_GAS_ESTIMATE,
                family => {
                    warn!(
                        "Invalid section in mixed route {} -> {}: {} run of {} pool(s), skipping",
                        route.input, route.output, family, len
                    );
                    0
                }
            }
        })
        .sum()
}
