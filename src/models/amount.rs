use crate::error::{PricingError, Result};
use crate::models::{Asset, Fraction};
use num_bigint::BigUint;
use num_traits::Zero;
use std::cmp::Ordering;
use std::fmt;

/// A quantity of an asset in its smallest unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetAmount {
    pub asset: Asset,
    pub raw: BigUint,
}

impl AssetAmount {
    pub fn from_raw(asset: Asset, raw: impl Into<BigUint>) -> Self {
        Self {
            asset,
            raw: raw.into(),
        }
    }

    /// Parse a human decimal string ("1234.5") into raw units. Digits past
    /// the asset's precision are truncated.
    pub fn from_decimal_str(asset: Asset, value: &str) -> Result<Self> {
        let value = value.trim();
        let (whole, frac) = match value.split_once('.') {
            Some((w, f)) => (w, f),
            None => (value, ""),
        };
        let decimals = asset.decimals() as usize;
        if whole.is_empty() && frac.is_empty() {
            return Err(PricingError::InvalidAmount(value.to_string()));
        }
        if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit()) {
            return Err(PricingError::InvalidAmount(value.to_string()));
        }
        let mut digits = String::with_capacity(whole.len() + decimals);
        digits.push_str(whole);
        let kept: String = frac.chars().take(decimals).collect();
        digits.push_str(&format!("{:0<width$}", kept, width = decimals));
        let digits = if digits.is_empty() { "0".to_string() } else { digits };
        let raw = BigUint::parse_bytes(digits.as_bytes(), 10)
            .ok_or_else(|| PricingError::InvalidAmount(value.to_string()))?;
        Ok(Self { asset, raw })
    }

    pub fn is_zero(&self) -> bool {
        self.raw.is_zero()
    }

    pub fn add(&self, other: &AssetAmount) -> Result<AssetAmount> {
        self.ensure_same_asset(other)?;
        Ok(AssetAmount::from_raw(self.asset.clone(), &self.raw + &other.raw))
    }

    pub fn multiply(&self, factor: &BigUint) -> AssetAmount {
        AssetAmount::from_raw(self.asset.clone(), &self.raw * factor)
    }

    /// Ordering between two amounts of the same asset.
    pub fn compare(&self, other: &AssetAmount) -> Result<Ordering> {
        self.ensure_same_asset(other)?;
        Ok(self.raw.cmp(&other.raw))
    }

    /// Value in whole units as an exact fraction.
    pub fn as_fraction(&self) -> Fraction {
        Fraction::from_scaled(self.raw.clone(), self.asset.decimals() as u32)
    }

    pub fn to_exact(&self) -> String {
        self.as_fraction().to_fixed(self.asset.decimals() as u32)
    }

    pub fn to_f64(&self) -> f64 {
        self.as_fraction().to_f64()
    }

    fn ensure_same_asset(&self, other: &AssetAmount) -> Result<()> {
        if self.asset != other.asset {
            return Err(PricingError::AssetMismatch {
                expected: self.asset.to_string(),
                found: other.asset.to_string(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for AssetAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.to_exact(), self.asset.symbol())
    }
}

/// `10^decimals` as a big integer.
pub fn decimal_scale(decimals: u8) -> BigUint {
    BigUint::from(10u32).pow(decimals as u32)
}
