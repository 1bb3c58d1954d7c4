use serde::{Deserialize, Serialize};

use crate::types::Money;

/// Shares of one class owned by a fund.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareHolding {
    pub share_class_id: String,
    pub shares: u64,
}

/// A fund and the share classes it owns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundHolding {
    pub id: String,
    pub fund_name: String,
    #[serde(default)]
    pub holdings: Vec<ShareHolding>,
}

/// A hypothetical total exit value to distribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExitScenario {
    pub id: String,
    pub exit_value: Money,
}
