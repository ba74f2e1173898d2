use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::common::{empty_string_as_none, new_record_id, Identifiable, RecordId};

/// Display tag assigned to a goal at creation, rotating through [`PALETTE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalColor {
    #[default]
    #[serde(alias = "bg-indigo-500")]
    Indigo,
    #[serde(alias = "bg-rose-500")]
    Rose,
    #[serde(alias = "bg-emerald-500")]
    Emerald,
    #[serde(alias = "bg-amber-500")]
    Amber,
    #[serde(alias = "bg-purple-500")]
    Purple,
    #[serde(alias = "bg-cyan-500")]
    Cyan,
}

pub const PALETTE: [GoalColor; 6] = [
    GoalColor::Indigo,
    GoalColor::Rose,
    GoalColor::Emerald,
    GoalColor::Amber,
    GoalColor::Purple,
    GoalColor::Cyan,
];

impl GoalColor {
    /// Color for the goal created when `existing` goals already exist.
    pub fn for_position(existing: usize) -> Self {
        PALETTE[existing % PALETTE.len()]
    }

    pub fn name(&self) -> &'static str {
        match self {
            GoalColor::Indigo => "indigo",
            GoalColor::Rose => "rose",
            GoalColor::Emerald => "emerald",
            GoalColor::Amber => "amber",
            GoalColor::Purple => "purple",
            GoalColor::Cyan => "cyan",
        }
    }
}

impl fmt::Display for GoalColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Target amount the user is saving toward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsGoal {
    #[serde(default)]
    pub id: RecordId,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub target_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float", default)]
    pub current_amount: Decimal,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub deadline: Option<NaiveDate>,
    #[serde(default)]
    pub color: GoalColor,
}

impl SavingsGoal {
    pub fn new(
        name: impl Into<String>,
        target_amount: Decimal,
        deadline: Option<NaiveDate>,
        color: GoalColor,
    ) -> Self {
        Self {
            id: new_record_id(),
            name: name.into(),
            target_amount,
            current_amount: Decimal::ZERO,
            deadline,
            color,
        }
    }

    /// `current / target * 100`, capped at 100. Zero when the target is not positive.
    pub fn progress_percent(&self) -> Decimal {
        if self.target_amount <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        let raw = self
            .current_amount
            .checked_div(self.target_amount)
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED));
        match raw {
            Some(raw) => raw.min(Decimal::ONE_HUNDRED),
            None if self.current_amount.is_sign_negative() => Decimal::ZERO,
            None => Decimal::ONE_HUNDRED,
        }
    }

    /// Amount still needed; zero once the target is reached.
    pub fn remaining(&self) -> Decimal {
        self.target_amount
            .saturating_sub(self.current_amount)
            .max(Decimal::ZERO)
    }

    pub fn is_complete(&self) -> bool {
        self.current_amount >= self.target_amount
    }
}

impl Identifiable for SavingsGoal {
    fn id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_rotates_after_six() {
        assert_eq!(GoalColor::for_position(0), GoalColor::Indigo);
        assert_eq!(GoalColor::for_position(5), GoalColor::Cyan);
        assert_eq!(GoalColor::for_position(6), GoalColor::Indigo);
        assert_eq!(GoalColor::for_position(13), GoalColor::Rose);
    }

    #[test]
    fn loads_legacy_color_tags_and_empty_deadline() {
        let json = r#"{
            "id": "g1",
            "name": "Trip",
            "targetAmount": 1000,
            "currentAmount": 250.5,
            "deadline": "",
            "color": "bg-emerald-500"
        }"#;
        let goal: SavingsGoal = serde_json::from_str(json).unwrap();
        assert_eq!(goal.color, GoalColor::Emerald);
        assert_eq!(goal.deadline, None);
        assert_eq!(goal.current_amount, Decimal::new(2505, 1));
    }

    #[test]
    fn serializes_camel_case_fields() {
        let goal = SavingsGoal::new("Bike", Decimal::from(300), None, GoalColor::Amber);
        let json = serde_json::to_value(&goal).unwrap();
        assert_eq!(json["targetAmount"], 300.0);
        assert_eq!(json["currentAmount"], 0.0);
        assert_eq!(json["color"], "amber");
    }

    #[test]
    fn progress_caps_at_one_hundred() {
        let mut goal = SavingsGoal::new("Car", Decimal::from(100), None, GoalColor::Rose);
        goal.current_amount = Decimal::from(150);
        assert_eq!(goal.progress_percent(), Decimal::ONE_HUNDRED);
        assert!(goal.is_complete());
        assert_eq!(goal.remaining(), Decimal::ZERO);
    }

    #[test]
    fn progress_saturates_for_tiny_targets() {
        let mut goal = SavingsGoal::new("Dust", Decimal::new(1, 22), None, GoalColor::Cyan);
        goal.current_amount = Decimal::from(10_000_000);
        assert_eq!(goal.progress_percent(), Decimal::ONE_HUNDRED);

        goal.current_amount = Decimal::MIN;
        assert_eq!(goal.progress_percent(), Decimal::ZERO);
        assert_eq!(goal.remaining(), Decimal::MAX);
    }
}
