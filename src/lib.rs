#![doc(test(attr(deny(warnings))))]

//! Finance Tracker keeps a ledger of income and expense transactions,
//! persists it to a durable key-value slot, and derives totals, balances,
//! and period summaries from it.

pub mod config;
pub mod errors;
pub mod ledger;
pub mod report;
pub mod storage;
pub mod store;
pub mod utils;

pub use store::{FinanceStore, PeriodTotals, DEFAULT_STORAGE_KEY};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Finance tracker tracing initialized.");
    });
}
