use crate::chains::ChainRegistry;
use crate::quote::spot_feed::DEFAULT_POLL_INTERVAL;
use anyhow::{anyhow, Context, Result};
use num_bigint::BigUint;
use serde::Deserialize;
use std::time::Duration;
use std::{fs, path::Path};
use tracing::warn;

pub const DEFAULT_QUOTE_API_URL: &str = "https://interface.gateway.uniswap.org/v2";
pub const DEFAULT_SPOT_PRICE_URL: &str = "https://interface.gateway.uniswap.org/v1/graphql";

/// Per-chain overrides on top of the built-in chain table.
#[derive(Debug, Clone, Deserialize)]
pub struct ChainOverride {
    pub chain_id: u64,
    /// Raw stablecoin amount, as a decimal string.
    pub stablecoin_probe_amount: Option<String>,
    pub is_l2: Option<bool>,
    pub trusted_gas_estimate: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub quote_api_url: String,
    pub spot_price_url: String,
    pub poll_interval_secs: u64,
    pub request_timeout_secs: u64,
    pub log_filter: String,
    pub chains: Vec<ChainOverride>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quote_api_url: DEFAULT_QUOTE_API_URL.to_string(),
            spot_price_url: DEFAULT_SPOT_PRICE_URL.to_string(),
            poll_interval_secs: DEFAULT_POLL_INTERVAL.as_secs(),
            request_timeout_secs: 30,
            log_filter: "info".to_string(),
            chains: Vec::new(),
        }
    }
}

impl Settings {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        Self::from_toml(&s)
    }

    pub fn from_toml(s: &str) -> Result<Self> {
        let settings: Self = toml::from_str(s).context("parse settings TOML")?;
        Ok(settings)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Built-in chains with the configured overrides applied.
    pub fn chain_registry(&self) -> Result<ChainRegistry> {
        let mut registry = ChainRegistry::builtin();
        for o in &self.chains {
            let Some(chain) = registry.get_mut(o.chain_id) else {
                warn!("Ignoring overrides for unknown chain {}", o.chain_id);
                continue;
            };
            if let Some(amount) = &o.stablecoin_probe_amount {
                let raw = BigUint::parse_bytes(amount.trim().as_bytes(), 10)
                    .ok_or_else(|| anyhow!("invalid stablecoin_probe_amount for chain {}: {}", o.chain_id, amount))?;
                chain.stablecoin_probe_amount = Some(raw);
            }
            if let Some(is_l2) = o.is_l2 {
                chain.is_l2 = is_l2;
            }
            if let Some(trusted) = o.trusted_gas_estimate {
                chain.trusted_gas_estimate = trusted;
            }
        }
        Ok(registry)
    }
}
