//! Domain model for recorded cash movements.

use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::errors::SpendError;

use super::common::{empty_string_as_none, new_record_id, Identifiable, RecordId};

/// Direction of a transaction's cash flow.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    #[default]
    Expense,
    Income,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransactionKind::Expense => "expense",
            TransactionKind::Income => "income",
        };
        f.write_str(label)
    }
}

impl FromStr for TransactionKind {
    type Err = SpendError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "expense" | "out" => Ok(TransactionKind::Expense),
            "income" | "in" => Ok(TransactionKind::Income),
            other => Err(SpendError::Validation(format!(
                "unknown transaction type `{}` (use expense or income)",
                other
            ))),
        }
    }
}

/// A single income or expense entry. `amount` is never negative; the sign of
/// its effect on the balance comes from `kind` alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(default)]
    pub id: RecordId,
    pub date: NaiveDate,
    pub merchant: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(default)]
    pub category: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "empty_string_as_none"
    )]
    pub description: Option<String>,
}

impl Transaction {
    pub fn new(
        date: NaiveDate,
        merchant: impl Into<String>,
        amount: Decimal,
        category: impl Into<String>,
        kind: TransactionKind,
    ) -> Self {
        Self {
            id: new_record_id(),
            date,
            merchant: merchant.into(),
            amount,
            category: category.into(),
            kind,
            description: None,
        }
    }

    pub fn expense(
        date: NaiveDate,
        merchant: impl Into<String>,
        amount: Decimal,
        category: impl Into<String>,
    ) -> Self {
        Self::new(date, merchant, amount, category, TransactionKind::Expense)
    }

    pub fn income(
        date: NaiveDate,
        merchant: impl Into<String>,
        amount: Decimal,
        category: impl Into<String>,
    ) -> Self {
        Self::new(date, merchant, amount, category, TransactionKind::Income)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let text = description.into();
        self.description = if text.trim().is_empty() {
            None
        } else {
            Some(text)
        };
        self
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionKind::Income
    }

    /// Signed effect on the balance: positive for income, negative for expenses.
    pub fn signed_amount(&self) -> Decimal {
        match self.kind {
            TransactionKind::Income => self.amount,
            TransactionKind::Expense => -self.amount,
        }
    }
}

impl Identifiable for Transaction {
    fn id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_stored_layout() {
        let json = r#"{
            "id": "a1",
            "date": "2024-01-15",
            "merchant": "Corner Shop",
            "amount": 12.5,
            "category": "Food",
            "type": "expense",
            "description": ""
        }"#;
        let txn: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(txn.id, "a1");
        assert_eq!(txn.amount, Decimal::new(125, 1));
        assert_eq!(txn.kind, TransactionKind::Expense);
        assert_eq!(txn.description, None);
    }

    #[test]
    fn serializes_type_field_in_lowercase() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let txn = Transaction::income(date, "Employer", Decimal::from(1000), "Salary");
        let json = serde_json::to_value(&txn).unwrap();
        assert_eq!(json["type"], "income");
        assert_eq!(json["date"], "2024-02-01");
        assert!(json.get("description").is_none());
    }

    #[test]
    fn kind_parses_case_insensitively() {
        assert_eq!("Income".parse::<TransactionKind>().unwrap(), TransactionKind::Income);
        assert!("transfer".parse::<TransactionKind>().is_err());
    }

    #[test]
    fn signed_amount_follows_kind() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let spend = Transaction::expense(date, "Cafe", Decimal::from(4), "Food");
        assert_eq!(spend.signed_amount(), Decimal::from(-4));
    }
}
