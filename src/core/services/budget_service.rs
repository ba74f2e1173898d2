//! Monthly category budgets and the alert feed derived from them.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::core::errors::SpendError;
use crate::core::services::{ServiceError, ServiceResult};
use crate::domain::{
    category_matches, check_amount, checked_percent, checked_sum, same_month, AlertFeed, Budget,
    BudgetState, BudgetStatus, RecordId, Transaction,
};
use crate::ledger::Ledger;

/// Percent of the limit at which a budget starts raising alerts.
pub const ALERT_THRESHOLD: Decimal = Decimal::from_parts(80, 0, 0, false, 0);

/// Stateless budgeting utilities that operate over [`Ledger`] snapshots.
pub struct BudgetService;

impl BudgetService {
    pub fn add(ledger: &mut Ledger, category: &str, limit: Decimal) -> ServiceResult<RecordId> {
        let category = category.trim();
        if category.is_empty() {
            return Err(SpendError::Validation("budget category is required".into()).into());
        }
        if limit <= Decimal::ZERO {
            return Err(SpendError::Validation(format!(
                "budget limit must be greater than zero (got {})",
                limit
            ))
            .into());
        }
        let limit = check_amount(limit)?;
        let budget = Budget::new(category, limit);
        let id = budget.id.clone();
        tracing::debug!(%id, category, %limit, "adding budget");
        ledger.push_budget(budget);
        Ok(id)
    }

    /// Removes the budget identified by `id`. Unknown ids are a no-op.
    pub fn remove(ledger: &mut Ledger, id: &str) -> Option<Budget> {
        ledger.remove_budget(id)
    }

    /// Expenses in `category` (ignoring case) dated in the same month and year as `today`.
    pub fn spent_for_category(
        transactions: &[Transaction],
        category: &str,
        today: NaiveDate,
    ) -> ServiceResult<Decimal> {
        let spent = checked_sum(
            transactions
                .iter()
                .filter(|txn| txn.is_expense())
                .filter(|txn| category_matches(&txn.category, category))
                .filter(|txn| same_month(txn.date, today))
                .map(|txn| txn.amount),
            "budget spend",
        )?;
        Ok(spent)
    }

    pub fn status(
        budget: &Budget,
        transactions: &[Transaction],
        today: NaiveDate,
    ) -> ServiceResult<BudgetStatus> {
        if budget.limit <= Decimal::ZERO {
            return Err(ServiceError::Core(SpendError::Invariant(format!(
                "budget `{}` has non-positive limit {}",
                budget.category, budget.limit
            ))));
        }
        let spent = Self::spent_for_category(transactions, &budget.category, today)?;
        let percent = checked_percent(spent, budget.limit, "budget usage")?;
        let state = if spent > budget.limit {
            BudgetState::Over
        } else if percent >= ALERT_THRESHOLD {
            BudgetState::Nearing
        } else {
            BudgetState::OnTrack
        };
        Ok(BudgetStatus {
            budget: budget.clone(),
            spent,
            percent,
            state,
        })
    }

    /// Status of every budget, in budget order.
    pub fn statuses(
        budgets: &[Budget],
        transactions: &[Transaction],
        today: NaiveDate,
    ) -> ServiceResult<Vec<BudgetStatus>> {
        budgets
            .iter()
            .map(|budget| Self::status(budget, transactions, today))
            .collect()
    }

    /// Budgets at or above the alert threshold, in budget order.
    pub fn alert_feed(
        budgets: &[Budget],
        transactions: &[Transaction],
        today: NaiveDate,
    ) -> ServiceResult<AlertFeed> {
        let alerts = Self::statuses(budgets, transactions, today)?
            .into_iter()
            .filter(|status| status.percent >= ALERT_THRESHOLD)
            .collect();
        Ok(AlertFeed::from_statuses(alerts))
    }
}
