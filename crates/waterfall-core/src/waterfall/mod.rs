pub mod allocation;
pub mod engine;
pub mod funds;

pub use allocation::{
    allocate, allocate_scenario, Allocation, ClassOutcome, ShareClassProceeds, Treatment,
};
pub use engine::{compute_waterfall, run_waterfall, WaterfallInput, WaterfallResult};
pub use funds::{aggregate_funds, FundProceeds, FundShareClassProceeds};
