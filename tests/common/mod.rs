#![allow(dead_code)]

use std::{
    path::PathBuf,
    sync::{Arc, Mutex},
};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use smartspend_core::{
    core::ledger_manager::LedgerManager,
    storage::{JsonStorage, MemoryStorage},
};
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Mutex<Vec<TempDir>> = Mutex::new(Vec::new());

/// Creates a manager backed by a fresh JSON store and returns the store root.
pub fn json_manager() -> (LedgerManager, PathBuf) {
    let root = temp_root();
    let storage = JsonStorage::at(root.clone()).expect("create json storage");
    (LedgerManager::open(Box::new(storage)), root)
}

/// Reopens a manager over an existing store root, as a restart would.
pub fn reopen(root: &PathBuf) -> LedgerManager {
    let storage = JsonStorage::at(root.clone()).expect("reopen json storage");
    LedgerManager::open(Box::new(storage))
}

pub fn temp_root() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let root = temp.path().join("data");
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    root
}

pub fn memory_manager() -> (LedgerManager, Arc<MemoryStorage>) {
    let storage = Arc::new(MemoryStorage::new());
    (LedgerManager::open(Box::new(storage.clone())), storage)
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn dec(value: i64) -> Decimal {
    Decimal::from(value)
}
