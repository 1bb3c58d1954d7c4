pub mod holdings;
pub mod share_class;
pub mod validation;

pub use holdings::{ExitScenario, FundHolding, ShareHolding};
pub use share_class::{LiquidationPreference, ShareClass};
