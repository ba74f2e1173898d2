use rust_decimal::Decimal;
use serde::Serialize;

/// Headline figures over the whole transaction log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct DashboardStats {
    pub total_balance: Decimal,
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    /// Percent of income kept; zero when there is no income.
    pub savings_rate: Decimal,
}

/// Summed expenses for one exact category label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub amount: Decimal,
}

/// Summed expenses for one `M/YYYY` period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlySpend {
    pub period: String,
    pub amount: Decimal,
}
