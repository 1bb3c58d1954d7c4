use std::collections::{HashMap, HashSet};

use rust_decimal::Decimal;

use super::{ExitScenario, FundHolding, LiquidationPreference, ShareClass};
use crate::error::CapTableError;
use crate::CapTableResult;

/// Check a cap table before it is handed to the engine.
///
/// The engine itself trusts its inputs; this is the caller-side gate. Hard
/// inconsistencies are returned as errors, soft ones as warnings.
pub fn validate_cap_table(
    share_classes: &[ShareClass],
    fund_holdings: &[FundHolding],
    exit_scenarios: &[ExitScenario],
) -> CapTableResult<Vec<String>> {
    let mut warnings: Vec<String> = Vec::new();

    ensure_unique("share class", share_classes.iter().map(|sc| sc.id.as_str()))?;
    ensure_unique("fund", fund_holdings.iter().map(|f| f.id.as_str()))?;
    ensure_unique("exit scenario", exit_scenarios.iter().map(|s| s.id.as_str()))?;

    for sc in share_classes {
        check_non_negative(&sc.id, "roundPricePerShare", sc.round_price_per_share)?;
        check_non_negative(&sc.id, "conversionRatio", sc.conversion_ratio)?;
        check_non_negative(&sc.id, "liquidationMultiple", sc.liquidation_multiple)?;
        if let Some(cap) = sc.participation_cap_multiple {
            check_non_negative(&sc.id, "participationCapMultiple", cap)?;
        }

        if sc.shares_outstanding == 0 {
            warnings.push(format!(
                "Share class '{}' has no shares outstanding; per-share proceeds are undefined",
                sc.name
            ));
        }

        match (sc.liquidation_preference, sc.participation_cap_multiple) {
            (LiquidationPreference::Participating, Some(cap)) if cap < sc.liquidation_multiple => {
                warnings.push(format!(
                    "Share class '{}' cap ({cap}x) is below its liquidation multiple ({}x)",
                    sc.name, sc.liquidation_multiple
                ));
            }
            (LiquidationPreference::Participating, _) | (_, None) => {}
            (_, Some(_)) => {
                warnings.push(format!(
                    "Participation cap on non-participating share class '{}' is ignored",
                    sc.name
                ));
            }
        }
    }

    for scenario in exit_scenarios {
        if scenario.exit_value < Decimal::ZERO {
            return Err(CapTableError::InvalidInput {
                field: format!("exitScenarios[{}].exitValue", scenario.id),
                reason: "Exit value cannot be negative".into(),
            });
        }
    }

    let by_id: HashMap<&str, &ShareClass> =
        share_classes.iter().map(|sc| (sc.id.as_str(), sc)).collect();
    let mut held_by_class: HashMap<&str, u64> = HashMap::new();

    for fund in fund_holdings {
        let mut seen: HashSet<&str> = HashSet::new();
        for holding in &fund.holdings {
            let class_id = holding.share_class_id.as_str();
            let sc = by_id
                .get(class_id)
                .ok_or_else(|| CapTableError::UnknownShareClass {
                    fund: fund.fund_name.clone(),
                    share_class_id: holding.share_class_id.clone(),
                })?;
            if !seen.insert(class_id) {
                return Err(CapTableError::DuplicateHolding {
                    fund: fund.fund_name.clone(),
                    share_class_id: holding.share_class_id.clone(),
                });
            }
            if holding.shares == 0 {
                return Err(CapTableError::InvalidInput {
                    field: format!("fundHoldings[{}].holdings[{}].shares", fund.id, class_id),
                    reason: "Number of shares must be a positive integer".into(),
                });
            }
            if holding.shares > sc.shares_outstanding {
                warnings.push(format!(
                    "Fund '{}' holds {} shares of '{}' but only {} are outstanding",
                    fund.fund_name, holding.shares, sc.name, sc.shares_outstanding
                ));
            }
            let held = held_by_class.entry(class_id).or_insert(0);
            *held = held.saturating_add(holding.shares);
        }
    }

    for sc in share_classes {
        let held = held_by_class.get(sc.id.as_str()).copied().unwrap_or(0);
        if held > sc.shares_outstanding {
            warnings.push(format!(
                "Funds hold {} shares of '{}' in total, more than the {} outstanding",
                held, sc.name, sc.shares_outstanding
            ));
        }
    }

    Ok(warnings)
}

/// Drop holdings whose share class is no longer part of the cap table.
///
/// Returns the cleaned funds and whether anything was removed.
pub fn retain_known_holdings(
    share_classes: &[ShareClass],
    fund_holdings: &[FundHolding],
) -> (Vec<FundHolding>, bool) {
    let known: HashSet<&str> = share_classes.iter().map(|sc| sc.id.as_str()).collect();
    let mut removed = false;

    let funds: Vec<FundHolding> = fund_holdings
        .iter()
        .map(|fund| {
            let holdings: Vec<_> = fund
                .holdings
                .iter()
                .filter(|h| known.contains(h.share_class_id.as_str()))
                .cloned()
                .collect();
            removed |= holdings.len() != fund.holdings.len();
            FundHolding {
                holdings,
                ..fund.clone()
            }
        })
        .collect();

    (funds, removed)
}

fn ensure_unique<'a>(kind: &str, ids: impl Iterator<Item = &'a str>) -> CapTableResult<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(CapTableError::DuplicateId {
                kind: kind.into(),
                id: id.into(),
            });
        }
    }
    Ok(())
}

fn check_non_negative(class_id: &str, field: &str, value: Decimal) -> CapTableResult<()> {
    if value < Decimal::ZERO {
        return Err(CapTableError::InvalidInput {
            field: format!("shareClasses[{class_id}].{field}"),
            reason: format!("{field} cannot be negative"),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cap_table::ShareHolding;
    use rust_decimal_macros::dec;

    fn class(id: &str, pref: LiquidationPreference, shares: u64) -> ShareClass {
        ShareClass {
            id: id.into(),
            name: format!("Class {id}"),
            liquidation_preference: pref,
            shares_outstanding: shares,
            round_price_per_share: dec!(1),
            seniority: 1,
            conversion_ratio: dec!(1),
            liquidation_multiple: dec!(1),
            participation_cap_multiple: None,
        }
    }

    fn fund(id: &str, holdings: &[(&str, u64)]) -> FundHolding {
        FundHolding {
            id: id.into(),
            fund_name: format!("Fund {id}"),
            holdings: holdings
                .iter()
                .map(|(c, s)| ShareHolding {
                    share_class_id: (*c).into(),
                    shares: *s,
                })
                .collect(),
        }
    }

    fn scenario(id: &str, exit: Decimal) -> ExitScenario {
        ExitScenario {
            id: id.into(),
            exit_value: exit,
        }
    }

    #[test]
    fn test_clean_cap_table_has_no_warnings() {
        let classes = vec![
            class("1", LiquidationPreference::None, 1_000_000),
            class("2", LiquidationPreference::NonParticipating, 500_000),
        ];
        let funds = vec![fund("f1", &[("1", 200_000), ("2", 100_000)])];
        let scenarios = vec![scenario("s1", dec!(2000000))];
        let warnings = validate_cap_table(&classes, &funds, &scenarios).unwrap();
        assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
    }

    #[test]
    fn test_duplicate_share_class_id_rejected() {
        let classes = vec![
            class("1", LiquidationPreference::None, 10),
            class("1", LiquidationPreference::Participating, 10),
        ];
        match validate_cap_table(&classes, &[], &[]).unwrap_err() {
            CapTableError::DuplicateId { kind, id } => {
                assert_eq!(kind, "share class");
                assert_eq!(id, "1");
            }
            other => panic!("Expected DuplicateId, got: {other:?}"),
        }
    }

    #[test]
    fn test_negative_exit_value_rejected() {
        let classes = vec![class("1", LiquidationPreference::None, 10)];
        let result = validate_cap_table(&classes, &[], &[scenario("s1", dec!(-1))]);
        assert!(matches!(
            result,
            Err(CapTableError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_negative_price_rejected() {
        let mut sc = class("1", LiquidationPreference::Participating, 10);
        sc.round_price_per_share = dec!(-0.5);
        match validate_cap_table(&[sc], &[], &[]).unwrap_err() {
            CapTableError::InvalidInput { field, .. } => {
                assert_eq!(field, "shareClasses[1].roundPricePerShare");
            }
            other => panic!("Expected InvalidInput, got: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_share_class_in_fund_rejected() {
        let classes = vec![class("1", LiquidationPreference::None, 10)];
        let funds = vec![fund("f1", &[("9", 5)])];
        assert!(matches!(
            validate_cap_table(&classes, &funds, &[]),
            Err(CapTableError::UnknownShareClass { .. })
        ));
    }

    #[test]
    fn test_duplicate_holding_rejected() {
        let classes = vec![class("1", LiquidationPreference::None, 10)];
        let funds = vec![fund("f1", &[("1", 5), ("1", 2)])];
        assert!(matches!(
            validate_cap_table(&classes, &funds, &[]),
            Err(CapTableError::DuplicateHolding { .. })
        ));
    }

    #[test]
    fn test_zero_share_holding_rejected() {
        let classes = vec![class("1", LiquidationPreference::None, 10)];
        let funds = vec![fund("f1", &[("1", 0)])];
        assert!(validate_cap_table(&classes, &funds, &[]).is_err());
    }

    #[test]
    fn test_over_allocation_warns() {
        let classes = vec![class("1", LiquidationPreference::None, 10)];
        let funds = vec![fund("f1", &[("1", 6)]), fund("f2", &[("1", 12)])];
        let warnings = validate_cap_table(&classes, &funds, &[]).unwrap();
        // f2 alone exceeds outstanding, and the two funds together do too
        assert_eq!(warnings.len(), 2);
        assert!(warnings[1].contains("18 shares"));
    }

    #[test]
    fn test_cap_warnings() {
        let mut np = class("1", LiquidationPreference::NonParticipating, 10);
        np.participation_cap_multiple = Some(dec!(3));
        let mut p = class("2", LiquidationPreference::Participating, 10);
        p.liquidation_multiple = dec!(2);
        p.participation_cap_multiple = Some(dec!(1.5));
        let warnings = validate_cap_table(&[np, p], &[], &[]).unwrap();
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("is ignored"));
        assert!(warnings[1].contains("below its liquidation multiple"));
    }

    #[test]
    fn test_zero_outstanding_warns() {
        let classes = vec![class("1", LiquidationPreference::None, 0)];
        let warnings = validate_cap_table(&classes, &[], &[]).unwrap();
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_retain_known_holdings() {
        let classes = vec![class("1", LiquidationPreference::None, 10)];
        let funds = vec![fund("f1", &[("1", 5), ("2", 3)]), fund("f2", &[("1", 1)])];
        let (cleaned, removed) = retain_known_holdings(&classes, &funds);
        assert!(removed);
        assert_eq!(cleaned[0].holdings.len(), 1);
        assert_eq!(cleaned[0].holdings[0].share_class_id, "1");
        assert_eq!(cleaned[1], funds[1]);

        let (_, removed_again) = retain_known_holdings(&classes, &cleaned);
        assert!(!removed_again);
    }

    #[test]
    fn test_fund_totals_saturate_instead_of_overflowing() {
        let classes = vec![class("1", LiquidationPreference::None, u64::MAX)];
        let funds = vec![fund("f1", &[("1", u64::MAX)]), fund("f2", &[("1", u64::MAX)])];
        let warnings = validate_cap_table(&classes, &funds, &[]).unwrap();
        assert!(warnings.is_empty());
    }
}
