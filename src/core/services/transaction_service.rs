//! Business logic helpers for managing transactions.

use crate::core::errors::SpendError;
use crate::core::services::{ServiceError, ServiceResult};
use crate::domain::{
    check_amount, new_record_id, RecordId, Transaction, TransactionDraft, UNCATEGORIZED,
};
use crate::ledger::Ledger;

/// Provides validated add/remove/query helpers for ledger transactions.
pub struct TransactionService;

impl TransactionService {
    /// Validates and prepends `transaction`, returning its identifier.
    ///
    /// An empty id is replaced with a fresh one and an empty category becomes
    /// `Uncategorized`.
    pub fn add(ledger: &mut Ledger, mut transaction: Transaction) -> ServiceResult<RecordId> {
        let merchant = transaction.merchant.trim();
        if merchant.is_empty() {
            return Err(SpendError::Validation("merchant is required".into()).into());
        }
        transaction.merchant = merchant.to_string();
        transaction.amount = check_amount(transaction.amount)?;
        if transaction.id.trim().is_empty() {
            transaction.id = new_record_id();
        } else if ledger.transaction(&transaction.id).is_some() {
            return Err(ServiceError::Invalid(format!(
                "Transaction `{}` already exists",
                transaction.id
            )));
        }
        if transaction.category.trim().is_empty() {
            transaction.category = UNCATEGORIZED.to_string();
        }

        let id = transaction.id.clone();
        tracing::debug!(%id, merchant = %transaction.merchant, "adding transaction");
        ledger.prepend_transaction(transaction);
        Ok(id)
    }

    /// Builds a transaction from a filled-in draft and adds it.
    pub fn add_draft(ledger: &mut Ledger, draft: &TransactionDraft) -> ServiceResult<RecordId> {
        let transaction = draft.to_transaction()?;
        Self::add(ledger, transaction)
    }

    /// Removes the transaction identified by `id`. Unknown ids are a no-op.
    pub fn remove(ledger: &mut Ledger, id: &str) -> Option<Transaction> {
        ledger.remove_transaction(id)
    }

    /// Returns a snapshot of the ledger's transactions, newest first.
    pub fn list(ledger: &Ledger) -> &[Transaction] {
        ledger.transactions()
    }

    /// Case-insensitive substring match on merchant or category, newest date first.
    /// An empty filter matches everything.
    pub fn search<'a>(transactions: &'a [Transaction], filter: &str) -> Vec<&'a Transaction> {
        let needle = filter.trim().to_lowercase();
        let mut matches: Vec<&Transaction> = transactions
            .iter()
            .filter(|txn| {
                needle.is_empty()
                    || txn.merchant.to_lowercase().contains(&needle)
                    || txn.category.to_lowercase().contains(&needle)
            })
            .collect();
        matches.sort_by(|a, b| b.date.cmp(&a.date));
        matches
    }
}
