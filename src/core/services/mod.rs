pub mod budget_service;
pub mod goal_service;
pub mod summary_service;
pub mod transaction_service;

pub use budget_service::BudgetService;
pub use goal_service::GoalService;
pub use summary_service::SummaryService;
pub use transaction_service::TransactionService;

use crate::core::errors::SpendError;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ServiceError {
    #[error(transparent)]
    Core(#[from] SpendError),
    #[error("{0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests;
