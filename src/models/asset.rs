use crate::error::{PricingError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// An ERC-20 style token: chain id plus a 20-byte contract address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub chain_id: u64,
    pub address: String,
    pub decimals: u8,
    #[serde(default)]
    pub symbol: Option<String>,
}

impl Token {
    pub fn new(chain_id: u64, address: &str, decimals: u8, symbol: Option<&str>) -> Result<Self> {
        Ok(Self {
            chain_id,
            address: normalize_address(address)?,
            decimals,
            symbol: symbol.map(str::to_string),
        })
    }

    pub fn symbol_or_address(&self) -> &str {
        self.symbol.as_deref().unwrap_or(&self.address)
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.chain_id == other.chain_id && self.address.eq_ignore_ascii_case(&other.address)
    }
}

impl Eq for Token {}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.chain_id.hash(state);
        self.address.to_ascii_lowercase().hash(state);
    }
}

/// The gas currency of a chain together with its wrapped ERC-20 form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NativeCurrency {
    pub chain_id: u64,
    pub symbol: String,
    pub decimals: u8,
    pub wrapped: Token,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Asset {
    Native(NativeCurrency),
    Token(Token),
}

impl Asset {
    pub fn chain_id(&self) -> u64 {
        match self {
            Asset::Native(n) => n.chain_id,
            Asset::Token(t) => t.chain_id,
        }
    }

    pub fn decimals(&self) -> u8 {
        match self {
            Asset::Native(n) => n.decimals,
            Asset::Token(t) => t.decimals,
        }
    }

    pub fn symbol(&self) -> &str {
        match self {
            Asset::Native(n) => &n.symbol,
            Asset::Token(t) => t.symbol_or_address(),
        }
    }

    pub fn is_native(&self) -> bool {
        matches!(self, Asset::Native(_))
    }

    /// The token form used inside routes: natives unwrap to their wrapped
    /// token, tokens are returned as is.
    pub fn wrapped(&self) -> &Token {
        match self {
            Asset::Native(n) => &n.wrapped,
            Asset::Token(t) => t,
        }
    }

    pub fn id(&self) -> AssetId {
        match self {
            Asset::Native(n) => AssetId {
                chain_id: n.chain_id,
                address: None,
            },
            Asset::Token(t) => AssetId {
                chain_id: t.chain_id,
                address: Some(t.address.to_ascii_lowercase()),
            },
        }
    }
}

impl PartialEq for Asset {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Asset::Native(a), Asset::Native(b)) => a.chain_id == b.chain_id,
            (Asset::Token(a), Asset::Token(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Asset {}

impl From<Token> for Asset {
    fn from(token: Token) -> Self {
        Asset::Token(token)
    }
}

impl From<NativeCurrency> for Asset {
    fn from(native: NativeCurrency) -> Self {
        Asset::Native(native)
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.symbol(), self.chain_id())
    }
}

/// Hashable identity of an asset; `address` is `None` for natives.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetId {
    pub chain_id: u64,
    pub address: Option<String>,
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.address {
            Some(address) => write!(f, "{}:{}", self.chain_id, address),
            None => write!(f, "{}:native", self.chain_id),
        }
    }
}

/// Validate a `0x`-prefixed 20-byte hex address and lowercase it.
pub fn normalize_address(address: &str) -> Result<String> {
    let stripped = address
        .strip_prefix("0x")
        .or_else(|| address.strip_prefix("0X"))
        .unwrap_or(address);
    let bytes = hex::decode(stripped).map_err(|_| PricingError::InvalidAddress(address.to_string()))?;
    if bytes.len() != 20 {
        return Err(PricingError::InvalidAddress(address.to_string()));
    }
    Ok(format!("0x{}", hex::encode(bytes)))
}
