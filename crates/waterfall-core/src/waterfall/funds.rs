use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::allocation::ShareClassProceeds;
use crate::cap_table::FundHolding;
use crate::types::{Money, Rate};

/// A fund's proceeds from one share class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundShareClassProceeds {
    pub share_class_id: String,
    pub share_class_name: String,
    pub proceeds: Money,
}

/// Proceeds flowing to one fund in one scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundProceeds {
    pub fund_id: String,
    pub fund_name: String,
    pub proceeds: Money,
    /// `None` when the exit value is zero
    pub percent_of_total: Option<Rate>,
    pub share_class_breakdown: Vec<FundShareClassProceeds>,
}

/// Fold per-share proceeds through each fund's holdings.
///
/// Holdings in a class that received nothing in this scenario are left out
/// of the breakdown. A class with no defined per-share value contributes
/// zero.
pub fn aggregate_funds(
    fund_holdings: &[FundHolding],
    class_proceeds: &[ShareClassProceeds],
    exit_value: Money,
) -> Vec<FundProceeds> {
    let mut by_class: HashMap<&str, &ShareClassProceeds> = HashMap::new();
    for scp in class_proceeds {
        by_class.entry(scp.share_class_id.as_str()).or_insert(scp);
    }

    fund_holdings
        .iter()
        .map(|fund| {
            let share_class_breakdown: Vec<FundShareClassProceeds> = fund
                .holdings
                .iter()
                .filter_map(|holding| {
                    let scp = by_class.get(holding.share_class_id.as_str())?;
                    let per_share = scp.proceeds_per_share.unwrap_or(Decimal::ZERO);
                    Some(FundShareClassProceeds {
                        share_class_id: holding.share_class_id.clone(),
                        share_class_name: scp.share_class_name.clone(),
                        proceeds: per_share * Decimal::from(holding.shares),
                    })
                })
                .collect();

            let proceeds: Money = share_class_breakdown.iter().map(|b| b.proceeds).sum();

            FundProceeds {
                fund_id: fund.id.clone(),
                fund_name: fund.fund_name.clone(),
                proceeds,
                percent_of_total: proceeds.checked_div(exit_value),
                share_class_breakdown,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cap_table::ShareHolding;
    use crate::waterfall::allocation::Treatment;
    use rust_decimal_macros::dec;

    fn class_proceeds(id: &str, proceeds: Money, per_share: Option<Money>) -> ShareClassProceeds {
        ShareClassProceeds {
            share_class_id: id.into(),
            share_class_name: format!("Class {id}"),
            treatment: Treatment::Common,
            proceeds,
            proceeds_per_share: per_share,
            percent_of_total: None,
        }
    }

    fn fund(holdings: &[(&str, u64)]) -> FundHolding {
        FundHolding {
            id: "f1".into(),
            fund_name: "HERMES Fund I".into(),
            holdings: holdings
                .iter()
                .map(|(id, shares)| ShareHolding {
                    share_class_id: (*id).into(),
                    shares: *shares,
                })
                .collect(),
        }
    }

    #[test]
    fn test_fund_proceeds_sum_holdings() {
        let classes = vec![
            class_proceeds("1", dec!(1250000), Some(dec!(1.25))),
            class_proceeds("2", dec!(750000), Some(dec!(1.50))),
        ];
        let funds = vec![fund(&[("1", 200_000), ("2", 100_000)])];
        let out = aggregate_funds(&funds, &classes, dec!(2000000));

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].proceeds, dec!(400000));
        assert_eq!(out[0].percent_of_total, Some(dec!(0.2)));
        assert_eq!(out[0].share_class_breakdown.len(), 2);
        assert_eq!(out[0].share_class_breakdown[0].proceeds, dec!(250000));
        assert_eq!(out[0].share_class_breakdown[1].proceeds, dec!(150000));
        assert_eq!(out[0].share_class_breakdown[1].share_class_name, "Class 2");
    }

    #[test]
    fn test_unpaid_class_omitted_from_breakdown() {
        let classes = vec![class_proceeds("2", dec!(100), Some(dec!(1)))];
        let funds = vec![fund(&[("1", 50), ("2", 10)])];
        let out = aggregate_funds(&funds, &classes, dec!(100));
        assert_eq!(out[0].proceeds, dec!(10));
        assert_eq!(out[0].share_class_breakdown.len(), 1);
        assert_eq!(out[0].share_class_breakdown[0].share_class_id, "2");
    }

    #[test]
    fn test_zero_exit_value_percent_undefined() {
        let classes = vec![class_proceeds("1", Decimal::ZERO, Some(Decimal::ZERO))];
        let out = aggregate_funds(&[fund(&[("1", 10)])], &classes, Decimal::ZERO);
        assert_eq!(out[0].proceeds, Decimal::ZERO);
        assert_eq!(out[0].percent_of_total, None);
    }

    #[test]
    fn test_undefined_per_share_contributes_zero() {
        let classes = vec![class_proceeds("1", Decimal::ZERO, None)];
        let out = aggregate_funds(&[fund(&[("1", 10)])], &classes, dec!(100));
        assert_eq!(out[0].proceeds, Decimal::ZERO);
        assert_eq!(out[0].share_class_breakdown.len(), 1);
    }

    #[test]
    fn test_fund_without_holdings() {
        let out = aggregate_funds(&[fund(&[])], &[], dec!(100));
        assert_eq!(out[0].proceeds, Decimal::ZERO);
        assert_eq!(out[0].percent_of_total, Some(Decimal::ZERO));
        assert!(out[0].share_class_breakdown.is_empty());
    }
}
