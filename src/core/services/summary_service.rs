//! Dashboard statistics and chart series computed from the transaction log.
//!
//! Sums and ratios are checked. Stored data large enough to overflow a
//! `Decimal` surfaces as [`SpendError::Invariant`] instead of a panic.

use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::core::errors::SpendError;
use crate::core::services::ServiceResult;
use crate::domain::{
    checked_percent, checked_sum, month_key, overflow, CategoryTotal, DashboardStats,
    MonthlySpend, Transaction,
};

/// Maximum number of category slices and trend periods reported.
pub const SERIES_LIMIT: usize = 6;

pub struct SummaryService;

impl SummaryService {
    pub fn dashboard_stats(transactions: &[Transaction]) -> ServiceResult<DashboardStats> {
        let total_income = checked_sum(
            transactions.iter().filter(|txn| txn.is_income()).map(|txn| txn.amount),
            "total income",
        )?;
        let total_expenses = checked_sum(
            transactions.iter().filter(|txn| txn.is_expense()).map(|txn| txn.amount),
            "total expenses",
        )?;
        let total_balance = total_income
            .checked_sub(total_expenses)
            .ok_or_else(|| overflow("total balance"))?;
        let savings_rate = if total_income > Decimal::ZERO {
            checked_percent(total_balance, total_income, "savings rate")?
        } else {
            Decimal::ZERO
        };
        Ok(DashboardStats {
            total_balance,
            total_income,
            total_expenses,
            savings_rate,
        })
    }

    /// Expenses summed per exact category label, largest first, at most six.
    /// Equal sums keep the order in which their category was first seen.
    pub fn category_breakdown(transactions: &[Transaction]) -> ServiceResult<Vec<CategoryTotal>> {
        let expenses = transactions.iter().filter(|txn| txn.is_expense());
        let mut totals = group_in_first_seen_order(expenses, |txn| txn.category.clone())?
            .into_iter()
            .map(|(category, amount)| CategoryTotal { category, amount })
            .collect::<Vec<_>>();
        totals.sort_by(|a, b| b.amount.cmp(&a.amount));
        totals.truncate(SERIES_LIMIT);
        Ok(totals)
    }

    /// Expenses summed per `M/YYYY` period in chronological order of first
    /// appearance, keeping the last six periods. Months without expenses are absent.
    pub fn spending_trend(transactions: &[Transaction]) -> ServiceResult<Vec<MonthlySpend>> {
        let mut chronological: Vec<&Transaction> = transactions.iter().collect();
        chronological.sort_by_key(|txn| txn.date);
        let expenses = chronological.into_iter().filter(|txn| txn.is_expense());
        let series = group_in_first_seen_order(expenses, |txn| month_key(txn.date))?;
        let skip = series.len().saturating_sub(SERIES_LIMIT);
        Ok(series
            .into_iter()
            .skip(skip)
            .map(|(period, amount)| MonthlySpend { period, amount })
            .collect())
    }
}

fn group_in_first_seen_order<'a, I, F>(
    transactions: I,
    key_of: F,
) -> Result<Vec<(String, Decimal)>, SpendError>
where
    I: Iterator<Item = &'a Transaction>,
    F: Fn(&Transaction) -> String,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(String, Decimal)> = Vec::new();
    for txn in transactions {
        let key = key_of(txn);
        match index.get(&key) {
            Some(&slot) => {
                let (label, total) = &mut groups[slot];
                *total = total
                    .checked_add(txn.amount)
                    .ok_or_else(|| overflow(&format!("spending for `{}`", label)))?;
            }
            None => {
                index.insert(key.clone(), groups.len());
                groups.push((key, txn.amount));
            }
        }
    }
    Ok(groups)
}
