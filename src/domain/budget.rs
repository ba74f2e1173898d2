use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::common::{new_record_id, Identifiable, RecordId};

/// A monthly spending ceiling for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    #[serde(default)]
    pub id: RecordId,
    pub category: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub limit: Decimal,
}

impl Budget {
    pub fn new(category: impl Into<String>, limit: Decimal) -> Self {
        Self {
            id: new_record_id(),
            category: category.into(),
            limit,
        }
    }
}

impl Identifiable for Budget {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Where a budget stands for the current month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BudgetState {
    OnTrack,
    Nearing,
    Over,
}

impl fmt::Display for BudgetState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BudgetState::OnTrack => "on-track",
            BudgetState::Nearing => "nearing",
            BudgetState::Over => "over",
        };
        f.write_str(label)
    }
}

/// Current-month spend for one budget.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetStatus {
    pub budget: Budget,
    pub spent: Decimal,
    /// `spent / limit * 100`, uncapped.
    pub percent: Decimal,
    pub state: BudgetState,
}

impl BudgetStatus {
    pub fn remaining(&self) -> Decimal {
        self.budget.limit.saturating_sub(self.spent)
    }

    pub fn is_alert(&self) -> bool {
        self.state != BudgetState::OnTrack
    }
}

/// Budgets at or above the alert threshold, or an explicit all-clear.
#[derive(Debug, Clone, PartialEq)]
pub enum AlertFeed {
    NoAlerts,
    Alerts(Vec<BudgetStatus>),
}

impl AlertFeed {
    pub fn from_statuses(statuses: Vec<BudgetStatus>) -> Self {
        if statuses.is_empty() {
            AlertFeed::NoAlerts
        } else {
            AlertFeed::Alerts(statuses)
        }
    }

    pub fn is_clear(&self) -> bool {
        matches!(self, AlertFeed::NoAlerts)
    }

    pub fn alerts(&self) -> &[BudgetStatus] {
        match self {
            AlertFeed::NoAlerts => &[],
            AlertFeed::Alerts(statuses) => statuses,
        }
    }
}
