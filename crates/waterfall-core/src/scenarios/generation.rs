use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::cap_table::{ExitScenario, ShareClass};
use crate::error::CapTableError;
use crate::types::*;
use crate::CapTableResult;

/// Exit values seeded as multiples of total invested capital.
pub const DEFAULT_EXIT_MULTIPLES: [Multiple; 5] = [dec!(1), dec!(2), dec!(3), dec!(5), dec!(10)];

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// Input for seeding exit scenarios from a capital structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioInput {
    pub share_classes: Vec<ShareClass>,
    /// Multiples of invested capital; defaults to 1x/2x/3x/5x/10x
    #[serde(default)]
    pub multiples: Option<Vec<Multiple>>,
}

// ---------------------------------------------------------------------------
// Calculation
// ---------------------------------------------------------------------------

/// Capital put in by preferred investors: shares times issue price over
/// every class carrying a liquidation preference.
pub fn total_invested_capital(share_classes: &[ShareClass]) -> Money {
    share_classes
        .iter()
        .filter(|sc| sc.has_preference())
        .map(|sc| sc.invested_capital())
        .sum()
}

/// One scenario per multiple, ids numbered from 1, exit values rounded to a
/// whole currency unit.
pub fn exit_scenarios_for(
    share_classes: &[ShareClass],
    multiples: &[Multiple],
) -> Vec<ExitScenario> {
    let invested = total_invested_capital(share_classes);
    multiples
        .iter()
        .enumerate()
        .map(|(i, multiple)| ExitScenario {
            id: (i + 1).to_string(),
            exit_value: (invested * *multiple)
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero),
        })
        .collect()
}

/// Seed exit scenarios for the waterfall from the capital structure.
pub fn generate_scenarios(
    input: &ScenarioInput,
) -> CapTableResult<ComputationOutput<Vec<ExitScenario>>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let multiples: &[Multiple] = match &input.multiples {
        Some(m) if m.is_empty() => {
            return Err(CapTableError::InvalidInput {
                field: "multiples".into(),
                reason: "At least one multiple is required".into(),
            });
        }
        Some(m) => m.as_slice(),
        None => &DEFAULT_EXIT_MULTIPLES[..],
    };
    if let Some(m) = multiples.iter().find(|m| **m < Decimal::ZERO) {
        return Err(CapTableError::InvalidInput {
            field: "multiples".into(),
            reason: format!("Exit multiple {m} cannot be negative"),
        });
    }

    let invested = total_invested_capital(&input.share_classes);
    if invested.is_zero() {
        warnings.push(
            "No invested capital in preferred classes; every generated exit value is zero".into(),
        );
    }

    let scenarios = exit_scenarios_for(&input.share_classes, multiples);

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Exit scenarios as multiples of invested capital",
        &serde_json::json!({
            "total_invested": invested.to_string(),
            "multiples": multiples.iter().map(|m| m.to_string()).collect::<Vec<_>>(),
        }),
        warnings,
        elapsed,
        scenarios,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
