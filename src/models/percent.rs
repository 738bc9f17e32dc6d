use crate::models::Fraction;
use std::fmt;

/// A percentage held as an exact ratio, where `1` is 100%.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Percent(Fraction);

impl Percent {
    pub fn from_fraction(ratio: Fraction) -> Self {
        Self(ratio)
    }

    /// Parts per ten thousand: `from_bps(50)` is 0.5%.
    pub fn from_bps(bps: u64) -> Self {
        Self(Fraction::from_scaled(bps, 4))
    }

    pub fn ratio(&self) -> &Fraction {
        &self.0
    }

    pub fn to_percent_f64(&self) -> f64 {
        self.0.to_f64() * 100.0
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hundred = Fraction::from_integer(100u32);
        write!(f, "{}%", self.0.multiply(&hundred).to_fixed(2))
    }
}
