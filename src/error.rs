use thiserror::Error;

/// Failures of the exact-arithmetic model layer.
///
/// None of these escape the resolvers or calculators: they are turned into
/// an absent price or a default tolerance at the public boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PricingError {
    #[error("fraction denominator is zero")]
    ZeroDenominator,

    #[error("asset mismatch: expected {expected}, found {found}")]
    AssetMismatch { expected: String, found: String },

    #[error("invalid token address: {0}")]
    InvalidAddress(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("route has no pools")]
    EmptyRoute,

    #[error("route is not connected: {0}")]
    DisconnectedRoute(String),
}

pub type Result<T> = std::result::Result<T, PricingError>;
