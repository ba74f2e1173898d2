//! Business logic: validated mutations, aggregation, and the ledger facade.

pub mod errors;
pub mod ledger_manager;
pub mod services;
pub mod time;
pub mod utils;
