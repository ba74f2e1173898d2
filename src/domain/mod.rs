//! Pure domain models (Transaction, Budget, SavingsGoal, drafts, summaries).
//! No I/O, no CLI, no storage. Only data types, enums, and small helpers.

pub mod budget;
pub mod common;
pub mod draft;
pub mod goal;
pub mod summary;
pub mod transaction;

pub use budget::*;
pub use common::*;
pub use draft::*;
pub use goal::*;
pub use summary::*;
pub use transaction::*;
