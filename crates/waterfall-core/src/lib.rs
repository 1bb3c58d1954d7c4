pub mod cap_table;
pub mod error;
pub mod types;

#[cfg(feature = "waterfall")]
pub mod waterfall;

#[cfg(feature = "scenarios")]
pub mod scenarios;

pub use cap_table::{ExitScenario, FundHolding, LiquidationPreference, ShareClass, ShareHolding};
pub use error::CapTableError;
pub use types::*;

/// Standard result type for all cap-waterfall operations
pub type CapTableResult<T> = Result<T, CapTableError>;
