use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::core::services::{BudgetService, GoalService, ServiceResult, TransactionService};
use crate::domain::{RecordId, Transaction, TransactionDraft};
use crate::ledger::{Collection, Ledger};
use crate::storage::KeyValueStore;

/// Whether the touched collection reached storage after a mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistOutcome {
    Saved,
    /// Nothing changed, so nothing was written.
    Unchanged,
    /// The in-memory change stands; only the write failed.
    Failed(String),
}

impl PersistOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, PersistOutcome::Failed(_))
    }
}

/// Result of a mutation together with its persistence outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct Mutation<T> {
    pub value: T,
    pub persisted: PersistOutcome,
}

/// Facade that owns the ledger and writes each touched collection through to storage.
pub struct LedgerManager {
    ledger: Ledger,
    storage: Box<dyn KeyValueStore>,
    load_warnings: Vec<String>,
}

impl LedgerManager {
    /// Loads every collection. Missing keys start empty; unreadable or corrupt
    /// ones also start empty and are reported through [`Self::load_warnings`].
    pub fn open(storage: Box<dyn KeyValueStore>) -> Self {
        let mut ledger = Ledger::new();
        let mut load_warnings = Vec::new();
        for collection in Collection::ALL {
            let loaded = storage
                .load(collection.key())
                .and_then(|raw| match raw {
                    Some(json) => ledger.restore_collection(collection, &json),
                    None => Ok(()),
                });
            if let Err(err) = loaded {
                tracing::warn!(
                    collection = collection.key(),
                    error = %err,
                    "could not load stored collection; starting empty"
                );
                load_warnings.push(format!("{}: {}", collection.key(), err));
            }
        }
        tracing::info!(
            transactions = ledger.transactions().len(),
            budgets = ledger.budgets().len(),
            goals = ledger.goals().len(),
            "ledger loaded"
        );
        Self {
            ledger,
            storage,
            load_warnings,
        }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn storage(&self) -> &dyn KeyValueStore {
        self.storage.as_ref()
    }

    pub fn load_warnings(&self) -> &[String] {
        &self.load_warnings
    }

    pub fn add_transaction(&mut self, transaction: Transaction) -> ServiceResult<Mutation<RecordId>> {
        let id = TransactionService::add(&mut self.ledger, transaction)?;
        Ok(self.saved(Collection::Transactions, id))
    }

    pub fn add_draft(&mut self, draft: &TransactionDraft) -> ServiceResult<Mutation<RecordId>> {
        let id = TransactionService::add_draft(&mut self.ledger, draft)?;
        Ok(self.saved(Collection::Transactions, id))
    }

    /// Returns whether a transaction was removed.
    pub fn delete_transaction(&mut self, id: &str) -> Mutation<bool> {
        let removed = TransactionService::remove(&mut self.ledger, id).is_some();
        self.saved_if(Collection::Transactions, removed, removed)
    }

    pub fn add_budget(&mut self, category: &str, limit: Decimal) -> ServiceResult<Mutation<RecordId>> {
        let id = BudgetService::add(&mut self.ledger, category, limit)?;
        Ok(self.saved(Collection::Budgets, id))
    }

    pub fn remove_budget(&mut self, id: &str) -> Mutation<bool> {
        let removed = BudgetService::remove(&mut self.ledger, id).is_some();
        self.saved_if(Collection::Budgets, removed, removed)
    }

    pub fn add_goal(
        &mut self,
        name: &str,
        target_amount: Decimal,
        deadline: Option<NaiveDate>,
    ) -> ServiceResult<Mutation<RecordId>> {
        let id = GoalService::add(&mut self.ledger, name, target_amount, deadline)?;
        Ok(self.saved(Collection::Goals, id))
    }

    pub fn remove_goal(&mut self, id: &str) -> Mutation<bool> {
        let removed = GoalService::remove(&mut self.ledger, id).is_some();
        self.saved_if(Collection::Goals, removed, removed)
    }

    /// Sets a goal's saved amount (clamped at zero). `None` when the goal is unknown.
    pub fn update_goal_amount(
        &mut self,
        id: &str,
        new_amount: Decimal,
    ) -> ServiceResult<Mutation<Option<Decimal>>> {
        let stored = GoalService::update_amount(&mut self.ledger, id, new_amount)?;
        Ok(self.saved_if(Collection::Goals, stored.is_some(), stored))
    }

    pub fn add_funds(&mut self, id: &str, input: &str) -> ServiceResult<Mutation<Option<Decimal>>> {
        let stored = GoalService::add_funds(&mut self.ledger, id, input)?;
        Ok(self.saved_if(Collection::Goals, stored.is_some(), stored))
    }

    pub fn withdraw_funds(
        &mut self,
        id: &str,
        input: &str,
    ) -> ServiceResult<Mutation<Option<Decimal>>> {
        let stored = GoalService::withdraw_funds(&mut self.ledger, id, input)?;
        Ok(self.saved_if(Collection::Goals, stored.is_some(), stored))
    }

    /// Writes `collection` to storage. Failures are logged and returned, never raised.
    pub fn persist(&self, collection: Collection) -> PersistOutcome {
        let result = self
            .ledger
            .serialize_collection(collection)
            .and_then(|json| self.storage.save(collection.key(), &json));
        match result {
            Ok(()) => PersistOutcome::Saved,
            Err(err) => {
                tracing::warn!(
                    collection = collection.key(),
                    error = %err,
                    "failed to persist collection; in-memory state kept"
                );
                PersistOutcome::Failed(err.to_string())
            }
        }
    }

    fn saved<T>(&self, collection: Collection, value: T) -> Mutation<T> {
        Mutation {
            value,
            persisted: self.persist(collection),
        }
    }

    fn saved_if<T>(&self, collection: Collection, changed: bool, value: T) -> Mutation<T> {
        if changed {
            self.saved(collection, value)
        } else {
            Mutation {
                value,
                persisted: PersistOutcome::Unchanged,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use std::sync::Arc;

    fn manager_with(store: &Arc<MemoryStorage>) -> LedgerManager {
        LedgerManager::open(Box::new(Arc::clone(store)))
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    }

    #[test]
    fn mutations_write_through_touched_collection() {
        let store = Arc::new(MemoryStorage::new());
        let mut manager = manager_with(&store);
        let outcome = manager
            .add_budget("Food", Decimal::from(100))
            .expect("valid budget");
        assert_eq!(outcome.persisted, PersistOutcome::Saved);
        assert!(store.get("budgets").unwrap().contains("Food"));
        assert!(store.get("transactions").is_none());
    }

    #[test]
    fn failed_write_keeps_in_memory_change() {
        let store = Arc::new(MemoryStorage::new());
        let mut manager = manager_with(&store);
        store.set_fail_writes(true);
        let txn = Transaction::expense(day(), "Cafe", Decimal::from(4), "Food");
        let outcome = manager.add_transaction(txn).expect("valid transaction");
        assert!(outcome.persisted.is_failed());
        assert_eq!(manager.ledger().transactions().len(), 1);
    }

    #[test]
    fn no_op_removal_skips_storage() {
        let store = Arc::new(MemoryStorage::new());
        let mut manager = manager_with(&store);
        let outcome = manager.remove_goal("missing");
        assert!(!outcome.value);
        assert_eq!(outcome.persisted, PersistOutcome::Unchanged);
        assert!(store.get("goals").is_none());
    }

    #[test]
    fn reopen_restores_saved_state() {
        let store = Arc::new(MemoryStorage::new());
        let mut manager = manager_with(&store);
        let goal = manager
            .add_goal("Trip", Decimal::from(500), Some(day()))
            .unwrap()
            .value;
        manager.add_funds(&goal, "125").unwrap();

        let reopened = manager_with(&store);
        let restored = reopened.ledger().goal(&goal).unwrap();
        assert_eq!(restored.current_amount, Decimal::from(125));
        assert_eq!(restored.deadline, Some(day()));
    }

    #[test]
    fn corrupt_collection_loads_empty_with_warning() {
        let store = Arc::new(
            MemoryStorage::new()
                .with_entry("transactions", "{oops")
                .with_entry("budgets", r#"[{"id":"b1","category":"Food","limit":50}]"#),
        );
        let manager = manager_with(&store);
        assert!(manager.ledger().transactions().is_empty());
        assert_eq!(manager.ledger().budgets().len(), 1);
        assert_eq!(manager.load_warnings().len(), 1);
    }
}
