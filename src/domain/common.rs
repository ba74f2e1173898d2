//! Shared identifiers, amount parsing, and calendar helpers.

use std::{fmt::Display, str::FromStr};

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use uuid::Uuid;

use crate::core::errors::SpendError;

/// Opaque record identifier. Fresh ids are UUID v4 text, but any string loaded
/// from storage is accepted as-is.
pub type RecordId = String;

/// Category assigned when none is supplied.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Generates a fresh, unique record identifier.
pub fn new_record_id() -> RecordId {
    Uuid::new_v4().to_string()
}

/// Exposes a stable identifier for records held by the ledger.
pub trait Identifiable {
    fn id(&self) -> &str;
}

/// Largest amount accepted for a single transaction, budget limit, or goal.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// Decimal places accepted on an amount. Stored amounts are JSON numbers, and
/// values within these bounds read back unchanged.
pub const MAX_SCALE: u32 = 2;

/// Parses user-entered money text into a non-negative decimal.
///
/// Accepts surrounding whitespace, a leading `$`, and `,` thousands separators.
pub fn parse_amount(input: &str) -> Result<Decimal, SpendError> {
    let trimmed = input.trim();
    let digits = trimmed.strip_prefix('$').unwrap_or(trimmed).trim();
    if digits.is_empty() {
        return Err(SpendError::Validation("amount is required".into()));
    }
    let cleaned: String = digits.chars().filter(|c| *c != ',').collect();
    let value = Decimal::from_str(&cleaned)
        .map_err(|_| SpendError::Validation(format!("`{}` is not a valid amount", input.trim())))?;
    check_amount(value)
}

/// Rejects negative amounts, amounts above [`MAX_AMOUNT`], and amounts with
/// more than [`MAX_SCALE`] decimal places.
pub fn check_amount(value: Decimal) -> Result<Decimal, SpendError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(SpendError::Validation(format!(
            "amount must not be negative (got {})",
            value
        )));
    }
    if value > MAX_AMOUNT {
        return Err(SpendError::Validation(format!(
            "amount must not exceed {} (got {})",
            MAX_AMOUNT, value
        )));
    }
    let value = value.normalize();
    if value.scale() > MAX_SCALE {
        return Err(SpendError::Validation(format!(
            "amount may have at most {} decimal places (got {})",
            MAX_SCALE, value
        )));
    }
    Ok(value)
}

/// Sums amounts, failing instead of overflowing.
pub fn checked_sum<I>(amounts: I, what: &str) -> Result<Decimal, SpendError>
where
    I: IntoIterator<Item = Decimal>,
{
    amounts
        .into_iter()
        .try_fold(Decimal::ZERO, |total, amount| {
            total.checked_add(amount).ok_or_else(|| overflow(what))
        })
}

/// `part / whole * 100`, failing instead of overflowing. `whole` must be non-zero.
pub fn checked_percent(part: Decimal, whole: Decimal, what: &str) -> Result<Decimal, SpendError> {
    part.checked_div(whole)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .ok_or_else(|| overflow(what))
}

/// Invariant error for a computed figure that does not fit in a `Decimal`.
pub fn overflow(what: &str) -> SpendError {
    SpendError::Invariant(format!("{} is out of range", what))
}

/// Case-insensitive category comparison used for budgets.
pub fn category_matches(left: &str, right: &str) -> bool {
    left.to_lowercase() == right.to_lowercase()
}

/// Label for the calendar month containing `date`, e.g. `1/2024`.
pub fn month_key(date: NaiveDate) -> String {
    format!("{}/{}", date.month(), date.year())
}

/// True when both dates fall in the same calendar month of the same year.
pub fn same_month(left: NaiveDate, right: NaiveDate) -> bool {
    left.month() == right.month() && left.year() == right.year()
}

/// Deserializes an optional value where an empty string also means "absent".
pub(crate) fn empty_string_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw {
        Some(value) if !value.trim().is_empty() => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}
