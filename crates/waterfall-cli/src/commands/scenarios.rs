use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use cap_waterfall_core::scenarios::{self, ScenarioInput};

use super::load_input;

/// Arguments for exit scenario generation
#[derive(Args)]
pub struct ScenarioArgs {
    /// Path to JSON or YAML input holding at least `shareClasses`
    #[arg(long)]
    pub input: Option<String>,

    /// Multiples of invested capital (comma-separated, e.g. "1,2,3,5,10")
    #[arg(long, value_delimiter = ',')]
    pub multiples: Option<Vec<Decimal>>,
}

pub fn run_scenarios(args: ScenarioArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut sc_input: ScenarioInput = load_input(args.input.as_deref(), "scenarios")?;
    if args.multiples.is_some() {
        sc_input.multiples = args.multiples;
    }
    let result = scenarios::generate_scenarios(&sc_input)?;
    Ok(serde_json::to_value(result)?)
}
