use crate::error::{PricingError, Result};
use crate::models::{Asset, AssetAmount, Fraction};
use std::fmt;

/// Exchange rate between two assets in raw units: one smallest unit of
/// `base` is worth `numerator / denominator` smallest units of `quote`.
#[derive(Debug, Clone)]
pub struct Price {
    pub base: Asset,
    pub quote: Asset,
    raw: Fraction,
}

impl Price {
    pub fn new(base: Asset, quote: Asset, raw: Fraction) -> Self {
        Self { base, quote, raw }
    }

    pub fn from_parts(
        base: Asset,
        quote: Asset,
        numerator: impl Into<num_bigint::BigUint>,
        denominator: impl Into<num_bigint::BigUint>,
    ) -> Result<Self> {
        Ok(Self::new(base, quote, Fraction::new(numerator, denominator)?))
    }

    /// `1:1` price of an asset against itself.
    pub fn identity(asset: Asset) -> Self {
        Self::new(asset.clone(), asset, Fraction::from_integer(1u32))
    }

    pub fn raw(&self) -> &Fraction {
        &self.raw
    }

    /// Human-unit rate: whole `quote` per whole `base`.
    pub fn adjusted(&self) -> Fraction {
        let shift = Fraction::from_scaled(1u32, self.quote.decimals() as u32)
            .multiply(&Fraction::from_integer(crate::models::decimal_scale(self.base.decimals())));
        self.raw.multiply(&shift)
    }

    /// Convert an amount of `base` into `quote`, rounding down.
    pub fn quote(&self, amount: &AssetAmount) -> Result<AssetAmount> {
        if amount.asset != self.base {
            return Err(PricingError::AssetMismatch {
                expected: self.base.to_string(),
                found: amount.asset.to_string(),
            });
        }
        let raw = self.raw.multiply(&Fraction::from_integer(amount.raw.clone())).quotient();
        Ok(AssetAmount::from_raw(self.quote.clone(), raw))
    }

    pub fn invert(&self) -> Result<Price> {
        Ok(Price::new(self.quote.clone(), self.base.clone(), self.raw.invert()?))
    }

    /// Chain `self` (base→quote) with `other` (quote→other.quote).
    pub fn multiply(&self, other: &Price) -> Result<Price> {
        if self.quote != other.base {
            return Err(PricingError::AssetMismatch {
                expected: self.quote.to_string(),
                found: other.base.to_string(),
            });
        }
        Ok(Price::new(
            self.base.clone(),
            other.quote.clone(),
            self.raw.multiply(&other.raw),
        ))
    }

    /// Value equality of the raw rate, ignoring which assets are involved.
    pub fn equal_to(&self, other: &Price) -> bool {
        self.raw == other.raw
    }

    pub fn to_f64(&self) -> f64 {
        self.adjusted().to_f64()
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "1 {} = {} {}",
            self.base.symbol(),
            self.adjusted().to_fixed(6),
            self.quote.symbol()
        )
    }
}
