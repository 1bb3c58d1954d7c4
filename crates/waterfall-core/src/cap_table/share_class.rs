use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Multiple};

// ---------------------------------------------------------------------------
// Liquidation preference
// ---------------------------------------------------------------------------

/// How a share class is treated when exit proceeds are distributed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LiquidationPreference {
    /// Takes the greater of its preference or its as-converted share.
    #[serde(rename = "Non-participating", alias = "NonParticipating")]
    NonParticipating,
    /// Takes its preference and then shares pro-rata in the remainder.
    Participating,
    /// Common stock.
    None,
}

// ---------------------------------------------------------------------------
// Share class
// ---------------------------------------------------------------------------

/// A class of equity in the capital structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareClass {
    pub id: String,
    pub name: String,
    pub liquidation_preference: LiquidationPreference,
    pub shares_outstanding: u64,
    /// Original issue price per share
    pub round_price_per_share: Money,
    /// Higher seniority is paid first among preferred classes
    pub seniority: i32,
    /// Common-equivalent shares per preferred share
    pub conversion_ratio: Multiple,
    /// Applied to invested capital to obtain the preference amount
    pub liquidation_multiple: Multiple,
    /// Ceiling on preference + participation as a multiple of invested
    /// capital. Only meaningful for participating classes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub participation_cap_multiple: Option<Multiple>,
}

impl ShareClass {
    /// True for participating and non-participating preferred.
    pub fn has_preference(&self) -> bool {
        self.liquidation_preference != LiquidationPreference::None
    }

    pub fn shares(&self) -> Decimal {
        Decimal::from(self.shares_outstanding)
    }

    /// Shares outstanding times the original issue price.
    pub fn invested_capital(&self) -> Money {
        self.shares() * self.round_price_per_share
    }

    /// Amount owed ahead of junior classes. Zero for common stock.
    pub fn preference_amount(&self) -> Money {
        if self.has_preference() {
            self.invested_capital() * self.liquidation_multiple
        } else {
            Decimal::ZERO
        }
    }

    /// Common-equivalent share count. Common stock converts one-for-one
    /// regardless of its stored ratio.
    pub fn as_converted_shares(&self) -> Decimal {
        match self.liquidation_preference {
            LiquidationPreference::None => self.shares(),
            _ => self.shares() * self.conversion_ratio,
        }
    }

    /// Maximum total proceeds for a capped participating class.
    pub fn participation_cap(&self) -> Option<Money> {
        match self.liquidation_preference {
            LiquidationPreference::Participating => self
                .participation_cap_multiple
                .map(|cap| self.invested_capital() * cap),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
