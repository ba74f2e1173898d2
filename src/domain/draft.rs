//! Uncommitted transaction form that assistant results may fill in.
//!
//! Every user edit bumps the draft's revision. An assistant call captures the
//! revision in an [`EnrichmentTicket`] when it starts; a result arriving with a
//! ticket from an older revision is discarded instead of overwriting the edit.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::errors::SpendError;

use super::common::{parse_amount, UNCATEGORIZED};
use super::transaction::{Transaction, TransactionKind};

/// Fields read off a receipt image. Any field may be missing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ReceiptExtraction {
    pub merchant: Option<String>,
    pub date: Option<NaiveDate>,
    pub amount: Option<Decimal>,
    pub category: Option<String>,
    pub kind: TransactionKind,
    pub description: Option<String>,
}

impl ReceiptExtraction {
    pub fn is_empty(&self) -> bool {
        self.merchant.is_none()
            && self.date.is_none()
            && self.amount.is_none()
            && self.category.is_none()
            && self.description.is_none()
    }
}

/// Revision stamp handed out when an assistant call begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnrichmentTicket {
    revision: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrichmentOutcome {
    Applied,
    /// The draft changed after the ticket was issued; nothing was written.
    Discarded,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDraft {
    date: NaiveDate,
    merchant: String,
    amount: String,
    category: String,
    kind: TransactionKind,
    description: String,
    revision: u64,
}

impl TransactionDraft {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            date: today,
            merchant: String::new(),
            amount: String::new(),
            category: String::new(),
            kind: TransactionKind::Expense,
            description: String::new(),
            revision: 0,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn merchant(&self) -> &str {
        &self.merchant
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn set_date(&mut self, date: NaiveDate) {
        self.date = date;
        self.touch();
    }

    pub fn set_merchant(&mut self, merchant: impl Into<String>) {
        self.merchant = merchant.into();
        self.touch();
    }

    pub fn set_amount(&mut self, amount: impl Into<String>) {
        self.amount = amount.into();
        self.touch();
    }

    pub fn set_category(&mut self, category: impl Into<String>) {
        self.category = category.into();
        self.touch();
    }

    pub fn set_kind(&mut self, kind: TransactionKind) {
        self.kind = kind;
        self.touch();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
        self.touch();
    }

    /// Clears every field back to a blank expense dated `today`.
    pub fn reset(&mut self, today: NaiveDate) {
        let revision = self.revision;
        *self = Self::new(today);
        self.revision = revision;
        self.touch();
    }

    pub fn begin_enrichment(&self) -> EnrichmentTicket {
        EnrichmentTicket {
            revision: self.revision,
        }
    }

    pub fn is_current(&self, ticket: EnrichmentTicket) -> bool {
        ticket.revision == self.revision
    }

    /// Copies the extracted fields that are present onto the draft.
    pub fn apply_extraction(
        &mut self,
        ticket: EnrichmentTicket,
        extraction: &ReceiptExtraction,
    ) -> EnrichmentOutcome {
        if !self.is_current(ticket) {
            tracing::debug!(
                ticket = ticket.revision,
                current = self.revision,
                "discarding stale receipt extraction"
            );
            return EnrichmentOutcome::Discarded;
        }
        if let Some(merchant) = &extraction.merchant {
            self.merchant = merchant.clone();
        }
        if let Some(date) = extraction.date {
            self.date = date;
        }
        if let Some(amount) = extraction.amount {
            self.amount = amount.to_string();
        }
        if let Some(category) = &extraction.category {
            self.category = category.clone();
        }
        if let Some(description) = &extraction.description {
            self.description = description.clone();
        }
        self.kind = extraction.kind;
        self.touch();
        EnrichmentOutcome::Applied
    }

    pub fn apply_category_suggestion(
        &mut self,
        ticket: EnrichmentTicket,
        category: &str,
    ) -> EnrichmentOutcome {
        if !self.is_current(ticket) {
            tracing::debug!(
                ticket = ticket.revision,
                current = self.revision,
                "discarding stale category suggestion"
            );
            return EnrichmentOutcome::Discarded;
        }
        self.category = category.to_string();
        self.touch();
        EnrichmentOutcome::Applied
    }

    /// Validates the form and builds a transaction with a fresh id.
    pub fn to_transaction(&self) -> Result<Transaction, SpendError> {
        let merchant = self.merchant.trim();
        if merchant.is_empty() {
            return Err(SpendError::Validation("merchant is required".into()));
        }
        let amount = parse_amount(&self.amount)?;
        let category = match self.category.trim() {
            "" => UNCATEGORIZED,
            other => other,
        };
        Ok(
            Transaction::new(self.date, merchant, amount, category, self.kind)
                .with_description(self.description.clone()),
        )
    }

    fn touch(&mut self) {
        self.revision += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    #[test]
    fn fresh_ticket_applies_extraction() {
        let mut draft = TransactionDraft::new(day(1));
        let ticket = draft.begin_enrichment();
        let extraction = ReceiptExtraction {
            merchant: Some("Grocer".into()),
            date: Some(day(3)),
            amount: Some(Decimal::new(1999, 2)),
            category: Some("Food".into()),
            kind: TransactionKind::Expense,
            description: Some("milk, bread".into()),
        };
        assert_eq!(
            draft.apply_extraction(ticket, &extraction),
            EnrichmentOutcome::Applied
        );
        assert_eq!(draft.merchant(), "Grocer");
        assert_eq!(draft.amount(), "19.99");
        assert_eq!(draft.date(), day(3));
    }

    #[test]
    fn edit_after_ticket_discards_result() {
        let mut draft = TransactionDraft::new(day(1));
        draft.set_merchant("Cafe");
        let ticket = draft.begin_enrichment();
        draft.set_category("Dining");
        assert_eq!(
            draft.apply_category_suggestion(ticket, "Food"),
            EnrichmentOutcome::Discarded
        );
        assert_eq!(draft.category(), "Dining");
    }

    #[test]
    fn reset_invalidates_outstanding_tickets() {
        let mut draft = TransactionDraft::new(day(1));
        let ticket = draft.begin_enrichment();
        draft.reset(day(2));
        assert!(!draft.is_current(ticket));
        assert_eq!(draft.date(), day(2));
        assert_eq!(draft.merchant(), "");
    }

    #[test]
    fn to_transaction_validates_and_defaults_category() {
        let mut draft = TransactionDraft::new(day(1));
        draft.set_amount("12");
        assert!(matches!(
            draft.to_transaction(),
            Err(SpendError::Validation(_))
        ));
        draft.set_merchant("Bookshop");
        let txn = draft.to_transaction().unwrap();
        assert_eq!(txn.category, UNCATEGORIZED);
        assert_eq!(txn.amount, Decimal::from(12));
        assert_eq!(txn.description, None);
    }
}
