//! Record store holding the three ordered collections and their storage keys.

#[allow(clippy::module_inception)]
pub mod ledger;

pub use ledger::{Collection, Ledger};
