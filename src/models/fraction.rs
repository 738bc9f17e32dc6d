use crate::error::{PricingError, Result};
use num_bigint::BigUint;
use num_traits::{One, ToPrimitive, Zero};
use std::cmp::Ordering;
use std::fmt;

/// Exact non-negative rational number.
///
/// The denominator is never zero; equality and ordering are decided by
/// cross-multiplication, so `1/2 == 2/4` without reducing.
#[derive(Debug, Clone)]
pub struct Fraction {
    numerator: BigUint,
    denominator: BigUint,
}

impl Fraction {
    pub fn new(numerator: impl Into<BigUint>, denominator: impl Into<BigUint>) -> Result<Self> {
        let denominator = denominator.into();
        if denominator.is_zero() {
            return Err(PricingError::ZeroDenominator);
        }
        Ok(Self {
            numerator: numerator.into(),
            denominator,
        })
    }

    pub fn from_integer(value: impl Into<BigUint>) -> Self {
        Self {
            numerator: value.into(),
            denominator: BigUint::one(),
        }
    }

    /// `numerator / 10^decimals`.
    pub fn from_scaled(numerator: impl Into<BigUint>, decimals: u32) -> Self {
        Self {
            numerator: numerator.into(),
            denominator: BigUint::from(10u32).pow(decimals),
        }
    }

    pub fn zero() -> Self {
        Self::from_integer(0u32)
    }

    pub fn numerator(&self) -> &BigUint {
        &self.numerator
    }

    pub fn denominator(&self) -> &BigUint {
        &self.denominator
    }

    pub fn is_zero(&self) -> bool {
        self.numerator.is_zero()
    }

    /// Floor of the value.
    pub fn quotient(&self) -> BigUint {
        &self.numerator / &self.denominator
    }

    pub fn invert(&self) -> Result<Fraction> {
        Fraction::new(self.denominator.clone(), self.numerator.clone())
    }

    pub fn multiply(&self, other: &Fraction) -> Fraction {
        Fraction {
            numerator: &self.numerator * &other.numerator,
            denominator: &self.denominator * &other.denominator,
        }
    }

    pub fn divide(&self, other: &Fraction) -> Result<Fraction> {
        Fraction::new(
            &self.numerator * &other.denominator,
            &self.denominator * &other.numerator,
        )
    }

    pub fn add(&self, other: &Fraction) -> Fraction {
        Fraction {
            numerator: &self.numerator * &other.denominator + &other.numerator * &self.denominator,
            denominator: &self.denominator * &other.denominator,
        }
    }

    /// Absolute difference `|self - other|`.
    pub fn abs_diff(&self, other: &Fraction) -> Fraction {
        let left = &self.numerator * &other.denominator;
        let right = &other.numerator * &self.denominator;
        let numerator = if left >= right { left - right } else { right - left };
        Fraction {
            numerator,
            denominator: &self.denominator * &other.denominator,
        }
    }

    /// `floor(self * factor)`, used to move ratios into the integer domain.
    pub fn scaled(&self, factor: &BigUint) -> BigUint {
        (&self.numerator * factor) / &self.denominator
    }

    /// Lossy conversion for display. Precision is kept by dividing in the
    /// integer domain first so very large raw values do not overflow to
    /// `inf / inf`.
    pub fn to_f64(&self) -> f64 {
        let scale = BigUint::from(10u32).pow(18);
        let whole = self.quotient();
        let rest = self.scaled(&scale) - &whole * &scale;
        let whole = whole.to_f64().unwrap_or(f64::INFINITY);
        let rest = rest.to_f64().unwrap_or(0.0) / 1e18;
        whole + rest
    }

    /// Decimal representation truncated to `places` digits.
    pub fn to_fixed(&self, places: u32) -> String {
        let scale = BigUint::from(10u32).pow(places);
        let scaled = self.scaled(&scale);
        if places == 0 {
            return scaled.to_string();
        }
        let whole = &scaled / &scale;
        let rest = &scaled % &scale;
        format!("{}.{:0>width$}", whole, rest.to_string(), width = places as usize)
    }
}

impl PartialEq for Fraction {
    fn eq(&self, other: &Self) -> bool {
        &self.numerator * &other.denominator == &other.numerator * &self.denominator
    }
}

impl Eq for Fraction {}

impl PartialOrd for Fraction {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Fraction {
    fn cmp(&self, other: &Self) -> Ordering {
        (&self.numerator * &other.denominator).cmp(&(&other.numerator * &self.denominator))
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frac(n: u64, d: u64) -> Fraction {
        Fraction::new(n, d).unwrap()
    }

    #[test]
    fn test_zero_denominator_rejected() {
        assert_eq!(Fraction::new(1u32, 0u32).unwrap_err(), PricingError::ZeroDenominator);
        assert!(frac(0, 5).invert().is_err());
        assert!(frac(3, 5).divide(&Fraction::zero()).is_err());
    }

    #[test]
    fn test_equality_without_reduction() {
        assert_eq!(frac(1, 2), frac(2, 4));
        assert_ne!(frac(1, 2), frac(2, 3));
        assert!(frac(1, 3) < frac(1, 2));
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(frac(1, 2).add(&frac(1, 3)), frac(5, 6));
        assert_eq!(frac(2, 3).multiply(&frac(3, 4)), frac(1, 2));
        assert_eq!(frac(1, 2).divide(&frac(1, 4)).unwrap(), frac(2, 1));
        assert_eq!(frac(1, 3).abs_diff(&frac(1, 2)), frac(1, 6));
        assert_eq!(frac(1, 2).abs_diff(&frac(1, 3)), frac(1, 6));
    }

    #[test]
    fn test_display_conversions() {
        assert_eq!(frac(1, 8).to_fixed(2), "0.12");
        assert_eq!(frac(25, 2).to_fixed(0), "12");
        assert_eq!(frac(1005, 1000).to_fixed(3), "1.005");
        assert!((frac(1, 4).to_f64() - 0.25).abs() < 1e-12);
        let huge = Fraction::new(BigUint::from(10u32).pow(40), 3u32).unwrap();
        assert!(huge.to_f64().is_finite());
    }
}
