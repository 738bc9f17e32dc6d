pub mod amount;
pub mod asset;
pub mod fraction;
pub mod percent;
pub mod pool;
pub mod price;
pub mod quote;
pub mod route;
pub mod trade;

pub use amount::{decimal_scale, AssetAmount};
pub use asset::{normalize_address, Asset, AssetId, NativeCurrency, Token};
pub use fraction::Fraction;
pub use percent::Percent;
pub use pool::{ConcentratedPool, Pool, PoolFamily, V2Pair};
pub use price::Price;
pub use quote::{QuoteRequest, QuoteState, RequestKey, RouterPreference};
pub use route::{partition_by_family, Protocol, Route};
pub use trade::{ClassicTrade, OffchainOrder, OffchainOrderType, QuoteMethod, Trade, TradeType};
