use clap::Args;
use serde_json::{json, Value};

use cap_waterfall_core::cap_table::validation::validate_cap_table;
use cap_waterfall_core::waterfall::WaterfallInput;

use super::load_input;

/// Arguments for cap table validation
#[derive(Args)]
pub struct ValidateArgs {
    /// Path to JSON or YAML input (shareClasses, fundHoldings, exitScenarios)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_validate(args: ValidateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let wf_input: WaterfallInput = load_input(args.input.as_deref(), "validate")?;
    let warnings = validate_cap_table(
        &wf_input.share_classes,
        &wf_input.fund_holdings,
        &wf_input.exit_scenarios,
    )?;
    Ok(json!({
        "result": {
            "valid": true,
            "shareClasses": wf_input.share_classes.len(),
            "funds": wf_input.fund_holdings.len(),
            "scenarios": wf_input.exit_scenarios.len(),
        },
        "warnings": warnings,
    }))
}
