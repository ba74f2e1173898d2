use std::fmt;

use serde::de::DeserializeOwned;

use crate::core::errors::SpendError;
use crate::domain::{Budget, Identifiable, SavingsGoal, Transaction};

/// Names one of the persisted record collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Transactions,
    Budgets,
    Goals,
}

impl Collection {
    pub const ALL: [Collection; 3] = [
        Collection::Transactions,
        Collection::Budgets,
        Collection::Goals,
    ];

    /// Storage key the collection is persisted under.
    pub fn key(&self) -> &'static str {
        match self {
            Collection::Transactions => "transactions",
            Collection::Budgets => "budgets",
            Collection::Goals => "goals",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// In-memory owner of every transaction, budget, and goal.
///
/// Transactions are kept newest-first; budgets and goals keep insertion order.
/// Mutators are crate-private so all writes go through the services.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ledger {
    transactions: Vec<Transaction>,
    budgets: Vec<Budget>,
    goals: Vec<SavingsGoal>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(
        transactions: Vec<Transaction>,
        budgets: Vec<Budget>,
        goals: Vec<SavingsGoal>,
    ) -> Self {
        Self {
            transactions,
            budgets,
            goals,
        }
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn budgets(&self) -> &[Budget] {
        &self.budgets
    }

    pub fn goals(&self) -> &[SavingsGoal] {
        &self.goals
    }

    pub fn transaction(&self, id: &str) -> Option<&Transaction> {
        find(&self.transactions, id)
    }

    pub fn budget(&self, id: &str) -> Option<&Budget> {
        find(&self.budgets, id)
    }

    pub fn goal(&self, id: &str) -> Option<&SavingsGoal> {
        find(&self.goals, id)
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty() && self.budgets.is_empty() && self.goals.is_empty()
    }

    pub(crate) fn prepend_transaction(&mut self, transaction: Transaction) {
        self.transactions.insert(0, transaction);
    }

    pub(crate) fn remove_transaction(&mut self, id: &str) -> Option<Transaction> {
        remove(&mut self.transactions, id)
    }

    pub(crate) fn push_budget(&mut self, budget: Budget) {
        self.budgets.push(budget);
    }

    pub(crate) fn remove_budget(&mut self, id: &str) -> Option<Budget> {
        remove(&mut self.budgets, id)
    }

    pub(crate) fn push_goal(&mut self, goal: SavingsGoal) {
        self.goals.push(goal);
    }

    pub(crate) fn remove_goal(&mut self, id: &str) -> Option<SavingsGoal> {
        remove(&mut self.goals, id)
    }

    pub(crate) fn goal_mut(&mut self, id: &str) -> Option<&mut SavingsGoal> {
        self.goals.iter_mut().find(|goal| goal.id == id)
    }

    /// Serializes one collection as the JSON array stored under its key.
    pub fn serialize_collection(&self, collection: Collection) -> Result<String, SpendError> {
        let json = match collection {
            Collection::Transactions => serde_json::to_string_pretty(&self.transactions)?,
            Collection::Budgets => serde_json::to_string_pretty(&self.budgets)?,
            Collection::Goals => serde_json::to_string_pretty(&self.goals)?,
        };
        Ok(json)
    }

    /// Replaces one collection with the records decoded from `json`.
    pub fn restore_collection(
        &mut self,
        collection: Collection,
        json: &str,
    ) -> Result<(), SpendError> {
        match collection {
            Collection::Transactions => self.transactions = decode(json)?,
            Collection::Budgets => self.budgets = decode(json)?,
            Collection::Goals => self.goals = decode(json)?,
        }
        Ok(())
    }
}

fn find<'a, T: Identifiable>(items: &'a [T], id: &str) -> Option<&'a T> {
    items.iter().find(|item| item.id() == id)
}

fn remove<T: Identifiable>(items: &mut Vec<T>, id: &str) -> Option<T> {
    let index = items.iter().position(|item| item.id() == id)?;
    Some(items.remove(index))
}

fn decode<T: DeserializeOwned>(json: &str) -> Result<Vec<T>, SpendError> {
    Ok(serde_json::from_str(json)?)
}
