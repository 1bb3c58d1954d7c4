use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use super::allocation::{allocate, ShareClassProceeds};
use super::funds::{aggregate_funds, FundProceeds};
use crate::cap_table::validation::validate_cap_table;
use crate::cap_table::{ExitScenario, FundHolding, ShareClass};
use crate::error::CapTableError;
use crate::types::*;
use crate::CapTableResult;

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// Capital structure, fund positions and the exits to evaluate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaterfallInput {
    /// Share classes in input order (ties in seniority keep this order)
    pub share_classes: Vec<ShareClass>,
    #[serde(default)]
    pub fund_holdings: Vec<FundHolding>,
    pub exit_scenarios: Vec<ExitScenario>,
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// Distribution of one exit scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaterfallResult {
    pub scenario_id: String,
    pub exit_value: Money,
    pub share_class_proceeds: Vec<ShareClassProceeds>,
    pub fund_proceeds: Vec<FundProceeds>,
    /// Exit value not assigned to any class (participation cap excess)
    pub undistributed: Money,
}

// ---------------------------------------------------------------------------
// Calculation
// ---------------------------------------------------------------------------

/// Distribute each exit scenario across the share classes and the funds
/// holding them. One result per scenario, in input order.
///
/// Pure and infallible: degenerate inputs surface as `None` per-share or
/// percentage values, or as omitted entries, never as errors.
pub fn compute_waterfall(
    share_classes: &[ShareClass],
    fund_holdings: &[FundHolding],
    exit_scenarios: &[ExitScenario],
) -> Vec<WaterfallResult> {
    exit_scenarios
        .iter()
        .map(|scenario| compute_scenario(share_classes, fund_holdings, scenario))
        .collect()
}

fn compute_scenario(
    share_classes: &[ShareClass],
    fund_holdings: &[FundHolding],
    scenario: &ExitScenario,
) -> WaterfallResult {
    let exit_value = scenario.exit_value;
    debug!(scenario = %scenario.id, %exit_value, "computing waterfall");

    let share_class_proceeds =
        allocate(share_classes, exit_value).to_proceeds(share_classes, exit_value);
    let fund_proceeds = aggregate_funds(fund_holdings, &share_class_proceeds, exit_value);

    let distributed: Money = share_class_proceeds.iter().map(|p| p.proceeds).sum();

    WaterfallResult {
        scenario_id: scenario.id.clone(),
        exit_value,
        share_class_proceeds,
        fund_proceeds,
        undistributed: exit_value - distributed,
    }
}

/// Validate the cap table, run every scenario and wrap the results.
pub fn run_waterfall(
    input: &WaterfallInput,
) -> CapTableResult<ComputationOutput<Vec<WaterfallResult>>> {
    let start = Instant::now();

    // --- Validation ---
    if input.share_classes.is_empty() {
        return Err(CapTableError::InvalidInput {
            field: "shareClasses".into(),
            reason: "At least one share class is required".into(),
        });
    }
    if input.exit_scenarios.is_empty() {
        return Err(CapTableError::InvalidInput {
            field: "exitScenarios".into(),
            reason: "At least one exit scenario is required".into(),
        });
    }
    let mut warnings = validate_cap_table(
        &input.share_classes,
        &input.fund_holdings,
        &input.exit_scenarios,
    )?;

    let results = compute_waterfall(
        &input.share_classes,
        &input.fund_holdings,
        &input.exit_scenarios,
    );

    for result in &results {
        let omitted = input.share_classes.len() - result.share_class_proceeds.len();
        if omitted > 0 {
            warnings.push(format!(
                "Scenario '{}': preferences exhausted the exit value; {} class(es) get nothing",
                result.scenario_id, omitted
            ));
        }
        let undistributed = result.undistributed.round_dp(2);
        if undistributed > Decimal::ZERO {
            warnings.push(format!(
                "Scenario '{}': participation caps leave {} undistributed",
                result.scenario_id, undistributed
            ));
        }
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Cap-Table Exit Waterfall (seniority preference stack, as-converted optimisation)",
        &serde_json::json!({
            "share_classes": input.share_classes.len(),
            "funds": input.fund_holdings.len(),
            "scenarios": input.exit_scenarios.len(),
            "conversion_test": "against fully converted share count",
            "participation_cap_excess": "discarded",
        }),
        warnings,
        elapsed,
        results,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cap_table::{LiquidationPreference, ShareHolding};
    use rust_decimal_macros::dec;

    fn input(exits: &[Decimal]) -> WaterfallInput {
        WaterfallInput {
            share_classes: vec![
                ShareClass {
                    id: "1".into(),
                    name: "Common".into(),
                    liquidation_preference: LiquidationPreference::None,
                    shares_outstanding: 1_000_000,
                    round_price_per_share: Decimal::ZERO,
                    seniority: 1,
                    conversion_ratio: dec!(1),
                    liquidation_multiple: dec!(1),
                    participation_cap_multiple: None,
                },
                ShareClass {
                    id: "2".into(),
                    name: "Series A Preferred".into(),
                    liquidation_preference: LiquidationPreference::Participating,
                    shares_outstanding: 500_000,
                    round_price_per_share: dec!(1.50),
                    seniority: 2,
                    conversion_ratio: dec!(1),
                    liquidation_multiple: dec!(1),
                    participation_cap_multiple: Some(dec!(2)),
                },
            ],
            fund_holdings: vec![FundHolding {
                id: "f1".into(),
                fund_name: "HERMES Fund I".into(),
                holdings: vec![
                    ShareHolding {
                        share_class_id: "1".into(),
                        shares: 200_000,
                    },
                    ShareHolding {
                        share_class_id: "2".into(),
                        shares: 100_000,
                    },
                ],
            }],
            exit_scenarios: exits
                .iter()
                .enumerate()
                .map(|(i, exit)| ExitScenario {
                    id: (i + 1).to_string(),
                    exit_value: *exit,
                })
                .collect(),
        }
    }

    #[test]
    fn test_results_follow_scenario_order() {
        let inp = input(&[dec!(10000000), dec!(0), dec!(2000000)]);
        let results =
            compute_waterfall(&inp.share_classes, &inp.fund_holdings, &inp.exit_scenarios);
        let ids: Vec<&str> = results.iter().map(|r| r.scenario_id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
        assert_eq!(results[2].exit_value, dec!(2000000));
    }

    #[test]
    fn test_capped_scenario_reports_undistributed() {
        // Preference 750k, residual 9.25M split 2:1 -> Series A would get
        // 750k + 3.083M but is capped at 1.5M
        let inp = input(&[dec!(10000000)]);
        let out = run_waterfall(&inp).unwrap();
        let res = &out.result[0];
        let series_a = res
            .share_class_proceeds
            .iter()
            .find(|p| p.share_class_id == "2")
            .unwrap();
        assert_eq!(series_a.proceeds, dec!(1500000));
        assert!(res.undistributed > dec!(2000000));
        assert!(out.warnings.iter().any(|w| w.contains("undistributed")));
    }

    #[test]
    fn test_exhausted_scenario_warns() {
        let inp = input(&[dec!(500000)]);
        let out = run_waterfall(&inp).unwrap();
        assert_eq!(out.result[0].share_class_proceeds.len(), 1);
        assert_eq!(out.result[0].undistributed, Decimal::ZERO);
        assert!(out.warnings.iter().any(|w| w.contains("get nothing")));
    }

    #[test]
    fn test_run_rejects_empty_scenarios() {
        let inp = input(&[]);
        match run_waterfall(&inp).unwrap_err() {
            CapTableError::InvalidInput { field, .. } => assert_eq!(field, "exitScenarios"),
            other => panic!("Expected InvalidInput, got: {other:?}"),
        }
    }

    #[test]
    fn test_run_propagates_validation_errors() {
        let mut inp = input(&[dec!(100)]);
        inp.fund_holdings[0].holdings[0].share_class_id = "missing".into();
        assert!(matches!(
            run_waterfall(&inp),
            Err(CapTableError::UnknownShareClass { .. })
        ));
    }

    #[test]
    fn test_input_deserializes_from_ui_shape() {
        let json = r#"{
            "shareClasses": [
                {"id": "1", "name": "Common", "liquidationPreference": "None",
                 "sharesOutstanding": 1000000, "roundPricePerShare": 0, "seniority": 1,
                 "conversionRatio": 1, "liquidationMultiple": 1}
            ],
            "exitScenarios": [{"id": "1", "exitValue": 2000000}]
        }"#;
        let inp: WaterfallInput = serde_json::from_str(json).unwrap();
        assert!(inp.fund_holdings.is_empty());
        let out = run_waterfall(&inp).unwrap();
        assert_eq!(out.result[0].share_class_proceeds[0].proceeds, dec!(2000000));
        assert!(out.warnings.is_empty());
    }
}
