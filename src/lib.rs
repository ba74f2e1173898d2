#![doc(test(attr(deny(warnings))))]

//! SmartSpend Core records income and expense transactions, monthly category
//! budgets, and savings goals, and derives dashboard statistics, category
//! breakdowns, spending trends, and budget alerts from them.

pub mod assistant;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod ledger;
pub mod presentation;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("SmartSpend Core tracing initialized.");
    });
}
