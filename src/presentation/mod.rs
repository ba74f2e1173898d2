//! Maps aggregation results to chart- and table-ready rows. No side effects.

pub mod format;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::core::services::{BudgetService, ServiceResult, SummaryService};
use crate::domain::{AlertFeed, BudgetState, BudgetStatus, DashboardStats, GoalColor, SavingsGoal};
use crate::ledger::Ledger;

pub use format::{format_percent, progress_bar, MoneyFormat};

/// Colors for category slices, applied by position.
pub const CHART_COLORS: [&str; 6] = [
    "#6366f1", "#ec4899", "#10b981", "#f59e0b", "#8b5cf6", "#06b6d4",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySlice {
    pub label: String,
    pub amount: Decimal,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub period: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetRow {
    pub id: String,
    pub category: String,
    pub spent: Decimal,
    pub limit: Decimal,
    pub percent: Decimal,
    /// `percent` capped at 100 for progress bars.
    pub bar_percent: Decimal,
    pub state: BudgetState,
}

impl From<BudgetStatus> for BudgetRow {
    fn from(status: BudgetStatus) -> Self {
        Self {
            bar_percent: status.percent.min(Decimal::ONE_HUNDRED),
            id: status.budget.id,
            category: status.budget.category,
            spent: status.spent,
            limit: status.budget.limit,
            percent: status.percent,
            state: status.state,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalRow {
    pub id: String,
    pub name: String,
    pub current: Decimal,
    pub target: Decimal,
    pub bar_percent: Decimal,
    pub color: GoalColor,
    pub deadline: Option<NaiveDate>,
    pub complete: bool,
}

impl From<&SavingsGoal> for GoalRow {
    fn from(goal: &SavingsGoal) -> Self {
        Self {
            id: goal.id.clone(),
            name: goal.name.clone(),
            current: goal.current_amount,
            target: goal.target_amount,
            bar_percent: goal.progress_percent(),
            color: goal.color,
            deadline: goal.deadline,
            complete: goal.is_complete(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub stats: DashboardStats,
    pub categories: Vec<CategorySlice>,
    pub trend: Vec<TrendPoint>,
    pub alerts: AlertFeed,
}

impl DashboardView {
    pub fn build(ledger: &Ledger, today: NaiveDate) -> ServiceResult<Self> {
        let transactions = ledger.transactions();
        let categories = SummaryService::category_breakdown(transactions)?
            .into_iter()
            .zip(CHART_COLORS)
            .map(|(total, color)| CategorySlice {
                label: total.category,
                amount: total.amount,
                color,
            })
            .collect();
        let trend = SummaryService::spending_trend(transactions)?
            .into_iter()
            .map(|point| TrendPoint {
                period: point.period,
                amount: point.amount,
            })
            .collect();
        Ok(Self {
            stats: SummaryService::dashboard_stats(transactions)?,
            categories,
            trend,
            alerts: BudgetService::alert_feed(ledger.budgets(), transactions, today)?,
        })
    }
}

pub fn budget_rows(ledger: &Ledger, today: NaiveDate) -> ServiceResult<Vec<BudgetRow>> {
    let statuses = BudgetService::statuses(ledger.budgets(), ledger.transactions(), today)?;
    Ok(statuses.into_iter().map(BudgetRow::from).collect())
}

pub fn goal_rows(ledger: &Ledger) -> Vec<GoalRow> {
    ledger.goals().iter().map(GoalRow::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Budget, Transaction};

    fn day(month: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, month, d).unwrap()
    }

    #[test]
    fn slices_take_chart_colors_by_position() {
        let ledger = Ledger::from_parts(
            vec![
                Transaction::expense(day(1, 2), "A", Decimal::from(10), "Fun"),
                Transaction::expense(day(1, 3), "B", Decimal::from(30), "Food"),
            ],
            Vec::new(),
            Vec::new(),
        );
        let view = DashboardView::build(&ledger, day(1, 20)).unwrap();
        assert_eq!(view.categories[0].label, "Food");
        assert_eq!(view.categories[0].color, CHART_COLORS[0]);
        assert_eq!(view.categories[1].color, CHART_COLORS[1]);
        assert_eq!(view.trend.len(), 1);
        assert!(view.alerts.is_clear());
    }

    #[test]
    fn budget_rows_cap_bar_but_not_percent() {
        let ledger = Ledger::from_parts(
            vec![Transaction::expense(day(1, 2), "A", Decimal::from(150), "Food")],
            vec![Budget::new("food", Decimal::from(100))],
            Vec::new(),
        );
        let rows = budget_rows(&ledger, day(1, 20)).unwrap();
        assert_eq!(rows[0].percent, Decimal::from(150));
        assert_eq!(rows[0].bar_percent, Decimal::ONE_HUNDRED);
        assert_eq!(rows[0].state, BudgetState::Over);
    }

    #[test]
    fn goal_rows_mirror_goals() {
        let mut goal = SavingsGoal::new("Trip", Decimal::from(200), None, GoalColor::Cyan);
        goal.current_amount = Decimal::from(50);
        let ledger = Ledger::from_parts(Vec::new(), Vec::new(), vec![goal]);
        let rows = goal_rows(&ledger);
        assert_eq!(rows[0].bar_percent, Decimal::from(25));
        assert_eq!(rows[0].color, GoalColor::Cyan);
        assert!(!rows[0].complete);
    }
}
