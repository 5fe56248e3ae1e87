#![allow(dead_code)]

use std::sync::Arc;

use chrono::NaiveDate;
use finance_tracker::{
    ledger::Transaction,
    storage::{JsonFileStore, MemoryStore},
    FinanceStore,
};
use tempfile::TempDir;

pub fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid calendar date")
}

/// Store over a shared in-memory backend so tests can inspect what was written.
pub fn memory_store() -> (FinanceStore, Arc<MemoryStore>) {
    let backend = Arc::new(MemoryStore::new());
    (FinanceStore::new(Box::new(backend.clone())), backend)
}

/// Store backed by JSON files in a fresh temporary directory. Keep the guard
/// alive for the duration of the test.
pub fn file_store() -> (FinanceStore, TempDir) {
    let temp = TempDir::new().expect("create temp dir");
    let store = FinanceStore::new(Box::new(
        JsonFileStore::new(temp.path().join("data")).expect("create json store"),
    ));
    (store, temp)
}

pub fn reopen(temp: &TempDir) -> FinanceStore {
    let mut store = FinanceStore::new(Box::new(
        JsonFileStore::new(temp.path().join("data")).expect("reopen json store"),
    ));
    store.load_from_storage();
    store
}

pub fn sample_transactions() -> Vec<Transaction> {
    vec![
        Transaction::income(3000.0, day(2025, 1, 5), "Salary"),
        Transaction::expense(1200.0, day(2025, 1, 1), "Rent"),
        Transaction::expense(85.4, day(2025, 1, 17), "Groceries"),
        Transaction::income(150.0, day(2025, 2, 3), "Freelance"),
        Transaction::expense(42.0, day(2024, 12, 24), "Gift"),
    ]
}

pub fn populated_memory_store() -> (FinanceStore, Arc<MemoryStore>) {
    let (mut store, backend) = memory_store();
    for txn in sample_transactions() {
        store.add_transaction(txn);
    }
    (store, backend)
}
