use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::cap_table::{LiquidationPreference, ShareClass};
use crate::types::{Money, Rate};

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// How a share class was paid in a scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Treatment {
    Preference,
    Participating,
    Converted,
    Common,
}

/// Proceeds assigned to one share class in one scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareClassProceeds {
    pub share_class_id: String,
    pub share_class_name: String,
    pub treatment: Treatment,
    /// Total assigned to the whole class
    pub proceeds: Money,
    /// `None` when the class has no shares outstanding
    pub proceeds_per_share: Option<Money>,
    /// `None` when the exit value is zero
    pub percent_of_total: Option<Rate>,
}

impl ShareClassProceeds {
    fn new(share_class: &ShareClass, outcome: ClassOutcome, exit_value: Money) -> Self {
        let proceeds = outcome.proceeds();
        Self {
            share_class_id: share_class.id.clone(),
            share_class_name: share_class.name.clone(),
            treatment: outcome.treatment(),
            proceeds,
            proceeds_per_share: proceeds.checked_div(share_class.shares()),
            percent_of_total: proceeds.checked_div(exit_value),
        }
    }
}

// ---------------------------------------------------------------------------
// Decision state
// ---------------------------------------------------------------------------

/// Final decision for one share class in one scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassOutcome {
    /// Liquidation preference taken. At the bottom of an exhausted stack
    /// this is whatever was left, not the full preference.
    Preference(Money),
    /// Preference plus pro-rata participation, after any cap.
    Participating {
        preference: Money,
        participation: Money,
        capped: bool,
    },
    /// Non-participating preferred that gave up its preference.
    Converted(Money),
    Common(Money),
}

impl ClassOutcome {
    pub fn proceeds(&self) -> Money {
        match *self {
            ClassOutcome::Preference(amount)
            | ClassOutcome::Converted(amount)
            | ClassOutcome::Common(amount) => amount,
            ClassOutcome::Participating {
                preference,
                participation,
                ..
            } => preference + participation,
        }
    }

    pub fn treatment(&self) -> Treatment {
        match self {
            ClassOutcome::Preference(_) => Treatment::Preference,
            ClassOutcome::Participating { .. } => Treatment::Participating,
            ClassOutcome::Converted(_) => Treatment::Converted,
            ClassOutcome::Common(_) => Treatment::Common,
        }
    }

    fn is_preference_bearing(&self) -> bool {
        matches!(
            self,
            ClassOutcome::Preference(_) | ClassOutcome::Participating { .. }
        )
    }
}

/// Outcome of distributing one exit value across the capital structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allocation {
    /// Indexed like the input share classes. `None` for classes never reached
    /// because a more senior preference exhausted the proceeds.
    pub outcomes: Vec<Option<ClassOutcome>>,
    /// Preference-bearing classes in payment order.
    pub seniority_order: Vec<usize>,
    /// Whether the preference stack ran out of proceeds.
    pub exhausted: bool,
}

impl Allocation {
    /// Preference-bearing outcomes first in payment order, then converted and
    /// common outcomes in input order.
    pub fn to_proceeds(
        &self,
        share_classes: &[ShareClass],
        exit_value: Money,
    ) -> Vec<ShareClassProceeds> {
        let senior = self
            .seniority_order
            .iter()
            .copied()
            .filter(|&i| self.outcomes[i].is_some_and(|o| o.is_preference_bearing()));
        let pool = (0..share_classes.len())
            .filter(|&i| self.outcomes[i].is_some_and(|o| !o.is_preference_bearing()));

        senior
            .chain(pool)
            .filter_map(|i| {
                self.outcomes[i]
                    .map(|outcome| ShareClassProceeds::new(&share_classes[i], outcome, exit_value))
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Calculation
// ---------------------------------------------------------------------------

/// Distribute `exit_value` across share classes and return one proceeds
/// entry per class that is paid.
pub fn allocate_scenario(
    share_classes: &[ShareClass],
    exit_value: Money,
) -> Vec<ShareClassProceeds> {
    allocate(share_classes, exit_value).to_proceeds(share_classes, exit_value)
}

/// Run the preference stack and the as-converted distribution for one exit
/// value.
///
/// Preferences are paid highest seniority first (ties keep input order).
/// Participating preferences leave the pool immediately; non-participating
/// preferences are only reserved until the conversion decision. If a
/// preference cannot be met in full, that class takes what is left and every
/// junior class is skipped.
///
/// Otherwise the residual is shared pro-rata by common stock, participating
/// preferred and any non-participating class whose as-converted value
/// beats its preference. The conversion test measures each class against
/// the fully converted share count, not a fixed point of the decisions.
pub fn allocate(share_classes: &[ShareClass], exit_value: Money) -> Allocation {
    let mut seniority_order: Vec<usize> = (0..share_classes.len())
        .filter(|&i| share_classes[i].has_preference())
        .collect();
    seniority_order.sort_by(|&a, &b| share_classes[b].seniority.cmp(&share_classes[a].seniority));

    let mut outcomes: Vec<Option<ClassOutcome>> = vec![None; share_classes.len()];

    // --- Stage A: preference stack ---
    let mut remaining = exit_value;
    let mut reserved = Decimal::ZERO;
    let mut exhausted = false;

    for &idx in &seniority_order {
        let sc = &share_classes[idx];
        let preference = sc.preference_amount();
        let available = remaining - reserved;

        if available >= preference {
            if sc.liquidation_preference == LiquidationPreference::Participating {
                remaining -= preference;
            } else {
                reserved += preference;
            }
            outcomes[idx] = Some(ClassOutcome::Preference(preference));
        } else {
            outcomes[idx] = Some(ClassOutcome::Preference(available));
            exhausted = true;
            break;
        }
    }

    debug!(
        %exit_value,
        %remaining,
        %reserved,
        exhausted,
        "preference stack settled"
    );

    // Only an exhausted stack skips the pool. A stack that lands exactly on
    // zero still gives every pool class a (zero) entry.
    if exhausted {
        return Allocation {
            outcomes,
            seniority_order,
            exhausted,
        };
    }

    // --- Stage B: conversion decision and residual ---
    let fully_converted: Decimal = share_classes.iter().map(|sc| sc.as_converted_shares()).sum();

    let converts: Vec<bool> = share_classes
        .iter()
        .map(|sc| {
            sc.liquidation_preference == LiquidationPreference::NonParticipating
                && converts_to_common(sc, fully_converted, exit_value)
        })
        .collect();

    let mut pool_shares = Decimal::ZERO;
    let mut kept_preferences = Decimal::ZERO;
    for (sc, &converting) in share_classes.iter().zip(&converts) {
        match sc.liquidation_preference {
            LiquidationPreference::NonParticipating if !converting => {
                kept_preferences += sc.preference_amount();
            }
            _ => pool_shares += sc.as_converted_shares(),
        }
    }
    let residual = remaining - kept_preferences;

    debug!(%pool_shares, %residual, "distributing residual as-converted");

    for (idx, sc) in share_classes.iter().enumerate() {
        let share = pro_rata(sc.as_converted_shares(), pool_shares, residual);
        let outcome = match sc.liquidation_preference {
            LiquidationPreference::None => ClassOutcome::Common(share),
            LiquidationPreference::NonParticipating if converts[idx] => {
                ClassOutcome::Converted(share)
            }
            LiquidationPreference::NonParticipating => continue,
            LiquidationPreference::Participating => participate(sc, share),
        };
        trace!(share_class = %sc.id, ?outcome, "class outcome");
        outcomes[idx] = Some(outcome);
    }

    Allocation {
        outcomes,
        seniority_order,
        exhausted,
    }
}

/// Non-participating preferred converts when its slice of the whole exit,
/// measured against the fully converted share count, beats its preference.
fn converts_to_common(sc: &ShareClass, fully_converted: Decimal, exit_value: Money) -> bool {
    let preference = sc.preference_amount();
    let as_converted = pro_rata(sc.as_converted_shares(), fully_converted, exit_value);
    trace!(
        share_class = %sc.id,
        %preference,
        %as_converted,
        "conversion test"
    );
    as_converted > preference
}

/// Preference plus participation, held to the cap when one is set. Anything
/// above the cap is dropped, not returned to the pool.
fn participate(sc: &ShareClass, participation: Money) -> ClassOutcome {
    let preference = sc.preference_amount();
    match sc.participation_cap() {
        Some(cap) if preference + participation > cap => {
            let preference = preference.min(cap);
            ClassOutcome::Participating {
                preference,
                participation: cap - preference,
                capped: true,
            }
        }
        _ => ClassOutcome::Participating {
            preference,
            participation,
            capped: false,
        },
    }
}

/// `amount * weight / total`, zero when the pool is empty. Divides first
/// when the product would overflow the decimal range.
fn pro_rata(weight: Decimal, total: Decimal, amount: Money) -> Money {
    if total.is_zero() {
        return Decimal::ZERO;
    }
    match weight.checked_mul(amount) {
        Some(product) => product / total,
        None => weight / total * amount,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
