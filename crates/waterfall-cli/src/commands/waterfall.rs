use clap::Args;
use serde_json::Value;

use cap_waterfall_core::waterfall::{self, WaterfallInput};

use super::load_input;

/// Arguments for the exit waterfall calculation
#[derive(Args)]
pub struct WaterfallArgs {
    /// Path to JSON or YAML input (shareClasses, fundHoldings, exitScenarios)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_waterfall(args: WaterfallArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let wf_input: WaterfallInput = load_input(args.input.as_deref(), "waterfall")?;
    let result = waterfall::run_waterfall(&wf_input)?;
    Ok(serde_json::to_value(result)?)
}
