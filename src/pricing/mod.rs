pub mod divergence;
pub mod gas;
pub mod native;
pub mod request;
pub mod slippage;
pub mod stability;
pub mod stablecoin;
pub mod usd;

pub use divergence::{is_pool_out_of_sync, PoolSyncMonitor};
pub use gas::estimate_gas_units;
pub use native::{NativePrice, NativePriceResolver};
pub use request::{PricePlan, QuoteTracker};
pub use slippage::{compute_tolerance, fallback_gas_cost_usd, AutoSlippage, ToleranceBound, ToleranceInputs};
pub use stability::{stabilize, StablePrice};
pub use stablecoin::{stablecoin_amount_from_fiat, StablecoinPrice, StablecoinPriceResolver};
pub use usd::{UsdPriceResolver, UsdValue};
