use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::core::errors::SpendError;
use crate::core::services::ServiceResult;
use crate::domain::{check_amount, overflow, parse_amount, GoalColor, RecordId, SavingsGoal};
use crate::ledger::Ledger;

pub struct GoalService;

impl GoalService {
    /// Appends a new goal with zero saved. Its color follows the number of goals already present.
    pub fn add(
        ledger: &mut Ledger,
        name: &str,
        target_amount: Decimal,
        deadline: Option<NaiveDate>,
    ) -> ServiceResult<RecordId> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SpendError::Validation("goal name is required".into()).into());
        }
        if target_amount <= Decimal::ZERO {
            return Err(SpendError::Validation(format!(
                "goal target must be greater than zero (got {})",
                target_amount
            ))
            .into());
        }
        let target_amount = check_amount(target_amount)?;
        let color = GoalColor::for_position(ledger.goals().len());
        let goal = SavingsGoal::new(name, target_amount, deadline, color);
        let id = goal.id.clone();
        tracing::debug!(%id, name, %color, "adding savings goal");
        ledger.push_goal(goal);
        Ok(id)
    }

    /// Removes the goal identified by `id`. Unknown ids are a no-op.
    pub fn remove(ledger: &mut Ledger, id: &str) -> Option<SavingsGoal> {
        ledger.remove_goal(id)
    }

    /// Sets the saved amount, clamped at zero. Returns the stored amount, or
    /// `None` when no goal has `id`. Amounts outside the accepted range are
    /// rejected without touching the goal.
    pub fn update_amount(
        ledger: &mut Ledger,
        id: &str,
        new_amount: Decimal,
    ) -> ServiceResult<Option<Decimal>> {
        let Some(goal) = ledger.goal_mut(id) else {
            return Ok(None);
        };
        let stored = check_amount(new_amount.max(Decimal::ZERO))?;
        goal.current_amount = stored;
        Ok(Some(stored))
    }

    /// Adds the parsed `input` to the saved amount.
    pub fn add_funds(ledger: &mut Ledger, id: &str, input: &str) -> ServiceResult<Option<Decimal>> {
        let amount = parse_amount(input)?;
        let Some(current) = ledger.goal(id).map(|goal| goal.current_amount) else {
            return Ok(None);
        };
        let total = current
            .checked_add(amount)
            .ok_or_else(|| overflow("goal savings"))?;
        Self::update_amount(ledger, id, total)
    }

    /// Subtracts the parsed `input` from the saved amount, never going below zero.
    pub fn withdraw_funds(
        ledger: &mut Ledger,
        id: &str,
        input: &str,
    ) -> ServiceResult<Option<Decimal>> {
        let amount = parse_amount(input)?;
        let Some(current) = ledger.goal(id).map(|goal| goal.current_amount) else {
            return Ok(None);
        };
        let total = current
            .checked_sub(amount)
            .ok_or_else(|| overflow("goal savings"))?;
        Self::update_amount(ledger, id, total)
    }
}
