//! # Domain Models
//!
//! Canonical domain types for driftcast.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Symbol`] | Validated ticker symbol |
//! | [`PriceSeries`] | Ascending daily closes for one symbol |
//! | [`Horizon`] | Requested forecast distance (count + unit) |
//! | [`TimeUnit`] | days / weeks / months / years |
//! | [`SearchHit`] | Company-search candidate |
//! | [`UtcDateTime`] | UTC timestamp |
//!
//! Types validate their invariants at construction time:
//!
//! ```rust
//! use driftcast_core::{Horizon, Symbol, TimeUnit};
//!
//! let symbol = Symbol::parse("$msft").unwrap();
//! assert_eq!(symbol.as_str(), "MSFT");
//! assert_eq!(Horizon::new(2, TimeUnit::Weeks).trading_days(), 10);
//! ```

mod horizon;
mod instrument;
mod series;
mod symbol;
mod timestamp;

pub use horizon::{
    horizon_to_trading_days, Horizon, TimeUnit, TRADING_DAYS_PER_MONTH, TRADING_DAYS_PER_WEEK,
    TRADING_DAYS_PER_YEAR,
};
pub use instrument::{AssetClass, SearchHit};
pub use series::{PricePoint, PriceSeries};
pub use symbol::Symbol;
pub use timestamp::UtcDateTime;
