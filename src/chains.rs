//! Per-chain constants consumed by the resolvers: native currency, reference
//! stablecoin, probe sizes and the gas-heuristic allow-lists.

use crate::models::{decimal_scale, Asset, AssetAmount, NativeCurrency, Token};
use num_bigint::BigUint;
use std::collections::HashMap;

pub const MAINNET: u64 = 1;
pub const OPTIMISM: u64 = 10;
pub const POLYGON: u64 = 137;
pub const BASE: u64 = 8453;
pub const ARBITRUM_ONE: u64 = 42161;

/// Stablecoin probe size, in whole stablecoin units, for chains without an
/// override. Large enough to skip thin pools.
pub const DEFAULT_STABLECOIN_PROBE_USD: u64 = 10_000;

#[derive(Debug, Clone)]
pub struct ChainInfo {
    pub chain_id: u64,
    pub name: String,
    /// Chain name understood by the spot-price backend.
    pub backend_chain: String,
    pub native: NativeCurrency,
    pub stablecoin: Option<Token>,
    /// Raw stablecoin probe amount; `None` uses the default.
    pub stablecoin_probe_amount: Option<BigUint>,
    /// Raw native probe amount for native-denominated pricing.
    pub native_probe_amount: BigUint,
    /// Gas heuristics are not trusted on second-layer networks yet.
    pub is_l2: bool,
    /// The quote service's own USD gas estimate may be used.
    pub trusted_gas_estimate: bool,
}

impl ChainInfo {
    pub fn native_asset(&self) -> Asset {
        Asset::Native(self.native.clone())
    }

    pub fn stablecoin_asset(&self) -> Option<Asset> {
        self.stablecoin.clone().map(Asset::Token)
    }

    pub fn stablecoin_probe(&self) -> Option<AssetAmount> {
        let stablecoin = self.stablecoin.as_ref()?;
        let raw = match &self.stablecoin_probe_amount {
            Some(raw) => raw.clone(),
            None => BigUint::from(DEFAULT_STABLECOIN_PROBE_USD) * decimal_scale(stablecoin.decimals),
        };
        Some(AssetAmount::from_raw(Asset::Token(stablecoin.clone()), raw))
    }

    pub fn native_probe(&self) -> AssetAmount {
        AssetAmount::from_raw(self.native_asset(), self.native_probe_amount.clone())
    }
}

#[derive(Debug, Clone, Default)]
pub struct ChainRegistry {
    chains: HashMap<u64, ChainInfo>,
}

impl ChainRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Ethereum, Optimism, Polygon, Base and Arbitrum One.
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        for chain in builtin_chains() {
            registry.insert(chain);
        }
        registry
    }

    pub fn insert(&mut self, chain: ChainInfo) {
        self.chains.insert(chain.chain_id, chain);
    }

    pub fn get(&self, chain_id: u64) -> Option<&ChainInfo> {
        self.chains.get(&chain_id)
    }

    pub fn get_mut(&mut self, chain_id: u64) -> Option<&mut ChainInfo> {
        self.chains.get_mut(&chain_id)
    }

    pub fn for_asset(&self, asset: &Asset) -> Option<&ChainInfo> {
        self.get(asset.chain_id())
    }

    pub fn chain_ids(&self) -> Vec<u64> {
        let mut ids: Vec<u64> = self.chains.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}

fn token(chain_id: u64, address: &str, decimals: u8, symbol: &str) -> Token {
    Token {
        chain_id,
        address: address.to_ascii_lowercase(),
        decimals,
        symbol: Some(symbol.to_string()),
    }
}

fn native(chain_id: u64, symbol: &str, wrapped: Token) -> NativeCurrency {
    NativeCurrency {
        chain_id,
        symbol: symbol.to_string(),
        decimals: 18,
        wrapped,
    }
}

fn whole(units: u64, decimals: u8) -> BigUint {
    BigUint::from(units) * decimal_scale(decimals)
}

fn builtin_chains() -> Vec<ChainInfo> {
    let op_weth = "0x4200000000000000000000000000000000000006";
    vec![
        ChainInfo {
            chain_id: MAINNET,
            name: "Ethereum".to_string(),
            backend_chain: "ETHEREUM".to_string(),
            native: native(MAINNET, "ETH", token(MAINNET, "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2", 18, "WETH")),
            stablecoin: Some(token(MAINNET, "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48", 6, "USDC")),
            stablecoin_probe_amount: Some(whole(100_000, 6)),
            native_probe_amount: whole(50, 18),
            is_l2: false,
            trusted_gas_estimate: true,
        },
        ChainInfo {
            chain_id: OPTIMISM,
            name: "Optimism".to_string(),
            backend_chain: "OPTIMISM".to_string(),
            native: native(OPTIMISM, "ETH", token(OPTIMISM, op_weth, 18, "WETH")),
            stablecoin: Some(token(OPTIMISM, "0xDA10009cBd5D07dd0CeCc66161FC93D7c9000da1", 18, "DAI")),
            stablecoin_probe_amount: Some(whole(10_000, 18)),
            native_probe_amount: whole(10, 18),
            is_l2: true,
            trusted_gas_estimate: true,
        },
        ChainInfo {
            chain_id: POLYGON,
            name: "Polygon".to_string(),
            backend_chain: "POLYGON".to_string(),
            native: native(POLYGON, "MATIC", token(POLYGON, "0x0d500B1d8E8eF31E21C99d1Db9A6444d3ADf1270", 18, "WMATIC")),
            stablecoin: Some(token(POLYGON, "0x3c499c542cEF5E3811e1192ce70d8cC03d5c3359", 6, "USDC")),
            stablecoin_probe_amount: Some(whole(10_000, 6)),
            native_probe_amount: whole(10_000, 18),
            is_l2: false,
            trusted_gas_estimate: true,
        },
        ChainInfo {
            chain_id: BASE,
            name: "Base".to_string(),
            backend_chain: "BASE".to_string(),
            native: native(BASE, "ETH", token(BASE, op_weth, 18, "WETH")),
            stablecoin: Some(token(BASE, "0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913", 6, "USDC")),
            stablecoin_probe_amount: None,
            native_probe_amount: whole(10, 18),
            is_l2: true,
            trusted_gas_estimate: true,
        },
        ChainInfo {
            chain_id: ARBITRUM_ONE,
            name: "Arbitrum One".to_string(),
            backend_chain: "ARBITRUM".to_string(),
            native: native(ARBITRUM_ONE, "ETH", token(ARBITRUM_ONE, "0x82aF49447D8a07e3bd95BD0d56f35241523fBab1", 18, "WETH")),
            stablecoin: Some(token(ARBITRUM_ONE, "0xaf88d065e77c8cC2239327C5EDb3A432268e5831", 6, "USDC")),
            stablecoin_probe_amount: Some(whole(10_000, 6)),
            native_probe_amount: whole(10, 18),
            is_l2: true,
            trusted_gas_estimate: true,
        },
    ]
}
