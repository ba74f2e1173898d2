
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::domain::Transaction;

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub(super) fn dec(value: i64) -> Decimal {
    Decimal::from(value)
}

pub(super) fn expense(on: NaiveDate, category: &str, amount: i64) -> Transaction {
    Transaction::expense(on, "Merchant", dec(amount), category)
}

pub(super) fn income(on: NaiveDate, amount: i64) -> Transaction {
    Transaction::income(on, "Employer", dec(amount), "Salary")
}
