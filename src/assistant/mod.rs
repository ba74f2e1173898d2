//! AI collaborator used to read receipts, suggest categories, and summarize spending.
//!
//! Every call may fail. The `*_or_default` helpers turn failures into the
//! fixed fallback values the rest of the app shows, so callers never need to
//! handle assistant errors themselves.

pub mod gemini;
pub mod offline;

use std::path::Path;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

use crate::config::AssistantConfig;
use crate::domain::{ReceiptExtraction, Transaction, TransactionKind, MAX_SCALE, UNCATEGORIZED};

pub use gemini::GeminiAssistant;
pub use offline::OfflineAssistant;

/// Number of transactions included in an insights prompt.
pub const INSIGHT_SAMPLE_SIZE: usize = 50;
pub const NO_INSIGHTS: &str = "No insights available yet.";
pub const INSIGHTS_UNAVAILABLE: &str = "Unable to generate insights at this moment.";

#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("assistant is disabled or has no API key configured")]
    Disabled,
    #[error("request failed: {0}")]
    Http(String),
    #[error("service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("service returned no text")]
    EmptyResponse,
    #[error("could not parse response: {0}")]
    Parse(String),
}

pub type AssistantResult<T> = Result<T, AssistantError>;

pub trait Assistant {
    /// Reads transaction fields off a receipt image.
    fn extract_transaction(&self, image: &[u8], mime_type: &str)
        -> AssistantResult<ReceiptExtraction>;

    /// Proposes a one-word category for a merchant.
    fn suggest_category(&self, merchant: &str, description: Option<&str>)
        -> AssistantResult<String>;

    /// Produces short free-text advice about the given transactions.
    fn generate_insights(&self, transactions: &[Transaction]) -> AssistantResult<String>;
}

/// Builds the assistant described by `config`, falling back to the offline one
/// when it is disabled, has no key, or the HTTP client cannot be built.
pub fn from_config(config: &AssistantConfig) -> Box<dyn Assistant> {
    if !config.enabled {
        tracing::debug!("assistant disabled in configuration");
        return Box::new(OfflineAssistant);
    }
    let Some(api_key) = config.effective_api_key() else {
        tracing::debug!("no assistant API key configured; running offline");
        return Box::new(OfflineAssistant);
    };
    match GeminiAssistant::new(api_key, &config.model, config.timeout_secs) {
        Ok(assistant) => Box::new(assistant),
        Err(err) => {
            tracing::warn!(error = %err, "could not build assistant client; running offline");
            Box::new(OfflineAssistant)
        }
    }
}

pub fn suggest_category_or_default(
    assistant: &dyn Assistant,
    merchant: &str,
    description: Option<&str>,
) -> String {
    match assistant.suggest_category(merchant, description) {
        Ok(category) if !category.trim().is_empty() => category.trim().to_string(),
        Ok(_) => UNCATEGORIZED.to_string(),
        Err(err) => {
            tracing::warn!(error = %err, merchant, "category suggestion failed");
            UNCATEGORIZED.to_string()
        }
    }
}

pub fn insights_or_default(assistant: &dyn Assistant, transactions: &[Transaction]) -> String {
    match assistant.generate_insights(transactions) {
        Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
        Ok(_) | Err(AssistantError::EmptyResponse) => NO_INSIGHTS.to_string(),
        Err(err) => {
            tracing::warn!(error = %err, "insight generation failed");
            INSIGHTS_UNAVAILABLE.to_string()
        }
    }
}

pub fn extract_or_empty(assistant: &dyn Assistant, image: &[u8], mime_type: &str) -> ReceiptExtraction {
    match assistant.extract_transaction(image, mime_type) {
        Ok(extraction) => extraction,
        Err(err) => {
            tracing::warn!(error = %err, "receipt extraction failed");
            ReceiptExtraction::default()
        }
    }
}

pub fn category_prompt(merchant: &str, description: Option<&str>) -> String {
    format!(
        "Categorize this transaction into a simple 1-word category \
         (e.g., Food, Transport, Shopping, Utilities, Entertainment, Health).\n\
         Merchant: {}\nDescription: {}\nOnly return the category name.",
        merchant,
        description.unwrap_or("")
    )
}

/// One line per transaction, from the first [`INSIGHT_SAMPLE_SIZE`] entries.
pub fn insights_prompt(transactions: &[Transaction]) -> String {
    let lines = transactions
        .iter()
        .take(INSIGHT_SAMPLE_SIZE)
        .map(|txn| {
            format!(
                "{}: {} ({}) - ${} [{}]",
                txn.date, txn.merchant, txn.category, txn.amount, txn.kind
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "Analyze these financial transactions and provide 3 brief, actionable insights or savings tips.\n\
         Focus on spending habits, recurring charges, or unusual expenses.\n\
         Keep it encouraging and concise.\n\n\
         Transactions:\n{}",
        lines
    )
}

#[derive(Debug, Deserialize)]
struct RawReceipt {
    #[serde(default)]
    merchant: Option<String>,
    #[serde(default)]
    date: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    amount: Option<Decimal>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    items: Option<Vec<String>>,
}

/// Decodes the JSON object returned for a receipt image. Missing fields stay
/// empty; the category defaults to `Uncategorized` and the kind is always expense.
pub fn parse_receipt_response(text: &str) -> AssistantResult<ReceiptExtraction> {
    let body = strip_code_fence(text);
    if body.is_empty() {
        return Err(AssistantError::EmptyResponse);
    }
    let raw: RawReceipt =
        serde_json::from_str(body).map_err(|err| AssistantError::Parse(err.to_string()))?;

    let date = raw.date.as_deref().and_then(|value| {
        NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
            .map_err(|err| tracing::debug!(value, error = %err, "ignoring unreadable receipt date"))
            .ok()
    });
    let category = raw
        .category
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| UNCATEGORIZED.to_string());
    let description = raw
        .items
        .filter(|items| !items.is_empty())
        .map(|items| items.join(", "));

    Ok(ReceiptExtraction {
        merchant: raw.merchant.filter(|value| !value.trim().is_empty()),
        date,
        amount: raw.amount.map(|amount| amount.abs().round_dp(MAX_SCALE)),
        category: Some(category),
        kind: TransactionKind::Expense,
        description,
    })
}

/// Guesses an image MIME type from the file extension, defaulting to JPEG.
pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        Some("heic") => "image/heic",
        _ => "image/jpeg",
    }
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
