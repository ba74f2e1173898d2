//! Text formatting for money, percentages, and progress bars.

use rust_decimal::{prelude::ToPrimitive, Decimal, RoundingStrategy};

use crate::config::Config;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoneyFormat {
    currency: String,
    decimal_separator: char,
    grouping_separator: char,
}

impl Default for MoneyFormat {
    fn default() -> Self {
        Self::new("USD", "en-US")
    }
}

impl MoneyFormat {
    pub fn new(currency: &str, locale: &str) -> Self {
        let (decimal_separator, grouping_separator) = separators_for(locale);
        Self {
            currency: currency.trim().to_uppercase(),
            decimal_separator,
            grouping_separator,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.currency, &config.locale)
    }

    /// Renders `amount` with the currency symbol, e.g. `$1,234.50` or `-$80.00`.
    pub fn format(&self, amount: Decimal) -> String {
        let precision = minor_units_for(&self.currency);
        let body = self.number(amount.abs(), precision);
        let sign = if amount.is_sign_negative() && !amount.is_zero() {
            "-"
        } else {
            ""
        };
        let symbol = symbol_for(&self.currency);
        if symbol.chars().all(|c| c.is_ascii_uppercase()) {
            format!("{}{} {}", sign, symbol, body)
        } else {
            format!("{}{}{}", sign, symbol, body)
        }
    }

    fn number(&self, value: Decimal, precision: u32) -> String {
        let rounded = value.round_dp_with_strategy(precision, RoundingStrategy::MidpointAwayFromZero);
        let text = format!("{:.*}", precision as usize, rounded);
        let (int_part, frac_part) = match text.split_once('.') {
            Some((int_part, frac)) => (int_part, Some(frac)),
            None => (text.as_str(), None),
        };
        let grouped = group_digits(int_part, self.grouping_separator);
        match frac_part {
            Some(frac) => format!("{}{}{}", grouped, self.decimal_separator, frac),
            None => grouped,
        }
    }
}

/// One decimal place followed by `%`.
pub fn format_percent(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.1}%", rounded)
}

/// Fixed-width bar such as `[######----]` for a 0-100 percentage.
pub fn progress_bar(percent: Decimal, width: usize) -> String {
    let clamped = percent.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED);
    let filled = (clamped * Decimal::from(width) / Decimal::ONE_HUNDRED)
        .round()
        .to_usize()
        .unwrap_or(0)
        .min(width);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

fn separators_for(locale: &str) -> (char, char) {
    let language = locale
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    match language.as_str() {
        "de" | "es" | "it" | "pt" | "nl" | "id" | "tr" => (',', '.'),
        "fr" | "pl" | "cs" | "sv" | "fi" | "nb" => (',', ' '),
        _ => ('.', ','),
    }
}

fn symbol_for(code: &str) -> String {
    match code {
        "USD" => "$".into(),
        "EUR" => "€".into(),
        "GBP" => "£".into(),
        "JPY" => "¥".into(),
        "INR" => "₹".into(),
        "AUD" => "A$".into(),
        _ => code.into(),
    }
}

fn minor_units_for(code: &str) -> u32 {
    match code {
        "JPY" | "KRW" => 0,
        "KWD" | "BHD" => 3,
        _ => 2,
    }
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::new();
    for (count, ch) in digits.chars().rev().enumerate() {
        if count != 0 && count % 3 == 0 {
            grouped.insert(0, separator);
        }
        grouped.insert(0, ch);
    }
    grouped
}
