use crate::error::{PricingError, Result};
use crate::models::{Asset, Fraction, Price, Token};
use num_bigint::BigUint;
use num_traits::One;
use std::fmt;

/// Pool family, which decides the gas profile of a hop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PoolFamily {
    V2,
    V3,
    V4,
}

impl fmt::Display for PoolFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PoolFamily::V2 => "v2-pool",
            PoolFamily::V3 => "v3-pool",
            PoolFamily::V4 => "v4-pool",
        };
        f.write_str(name)
    }
}

/// Constant-product pair.
#[derive(Debug, Clone)]
pub struct V2Pair {
    pub token0: Token,
    pub token1: Token,
    pub reserve0: BigUint,
    pub reserve1: BigUint,
    pub address: Option<String>,
}

/// Concentrated-liquidity pool state. Shared by v3 and v4 pools, which
/// price identically from `sqrtRatioX96`.
#[derive(Debug, Clone)]
pub struct ConcentratedPool {
    pub token0: Token,
    pub token1: Token,
    /// Fee in hundredths of a bip.
    pub fee: u32,
    pub sqrt_ratio_x96: BigUint,
    pub liquidity: BigUint,
    pub tick_current: i32,
    pub hooks: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone)]
pub enum Pool {
    V2(V2Pair),
    V3(ConcentratedPool),
    V4(ConcentratedPool),
}

impl Pool {
    pub fn family(&self) -> PoolFamily {
        match self {
            Pool::V2(_) => PoolFamily::V2,
            Pool::V3(_) => PoolFamily::V3,
            Pool::V4(_) => PoolFamily::V4,
        }
    }

    pub fn token0(&self) -> &Token {
        match self {
            Pool::V2(p) => &p.token0,
            Pool::V3(p) | Pool::V4(p) => &p.token0,
        }
    }

    pub fn token1(&self) -> &Token {
        match self {
            Pool::V2(p) => &p.token1,
            Pool::V3(p) | Pool::V4(p) => &p.token1,
        }
    }

    /// The token on the other side of `token`, if `token` is in the pool.
    pub fn other(&self, token: &Token) -> Option<&Token> {
        if self.token0() == token {
            Some(self.token1())
        } else if self.token1() == token {
            Some(self.token0())
        } else {
            None
        }
    }

    /// Raw price of token0 in units of token1.
    pub fn token0_price(&self) -> Result<Fraction> {
        match self {
            Pool::V2(p) => Fraction::new(p.reserve1.clone(), p.reserve0.clone()),
            Pool::V3(p) | Pool::V4(p) => {
                let q192 = BigUint::one() << 192usize;
                Fraction::new(&p.sqrt_ratio_x96 * &p.sqrt_ratio_x96, q192)
            }
        }
    }

    /// Mid price of `token` expressed in the other token of the pool.
    pub fn price_of(&self, token: &Token) -> Result<Price> {
        let other = self
            .other(token)
            .ok_or_else(|| PricingError::DisconnectedRoute(format!("{} not in pool", token.address)))?;
        let token0_price = self.token0_price()?;
        let raw = if self.token0() == token {
            token0_price
        } else {
            token0_price.invert()?
        };
        Ok(Price::new(
            Asset::Token(token.clone()),
            Asset::Token(other.clone()),
            raw,
        ))
    }
}
