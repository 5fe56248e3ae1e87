//! The transaction ledger store: in-memory records, derived totals, and the
//! bridge to a durable key-value slot.

use serde::Serialize;

use crate::{
    ledger::{DateWindow, Transaction},
    storage::KeyValueStore,
};

/// Key the ledger is persisted under unless configured otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "transactions";

/// Income, expense, and net figures for a date range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PeriodTotals {
    pub total_income: f64,
    pub total_expenses: f64,
    pub net_savings: f64,
}

impl PeriodTotals {
    fn from_records<'a>(records: impl IntoIterator<Item = &'a Transaction>) -> Self {
        let (total_income, total_expenses) =
            records
                .into_iter()
                .fold((0.0, 0.0), |(income, expenses), txn| {
                    if txn.is_income() {
                        (income + txn.amount, expenses)
                    } else {
                        (income, expenses + txn.amount)
                    }
                });
        Self {
            total_income,
            total_expenses,
            net_savings: total_income - total_expenses,
        }
    }
}

/// Owns the ledger for one session and keeps its durable copy current.
///
/// Built empty; call [`FinanceStore::load_from_storage`] to hydrate it. Every
/// successful add/delete rewrites the whole ledger to storage. None of the
/// operations report failure to the caller: malformed stored data and
/// backend errors are logged and recovered from locally.
pub struct FinanceStore {
    transactions: Vec<Transaction>,
    storage: Box<dyn KeyValueStore>,
    key: String,
}

impl std::fmt::Debug for FinanceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinanceStore")
            .field("transactions", &self.transactions.len())
            .field("key", &self.key)
            .finish()
    }
}

impl FinanceStore {
    pub fn new(storage: Box<dyn KeyValueStore>) -> Self {
        Self::with_key(storage, DEFAULT_STORAGE_KEY)
    }

    pub fn with_key(storage: Box<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            transactions: Vec::new(),
            storage,
            key: key.into(),
        }
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn storage_key(&self) -> &str {
        &self.key
    }

    pub fn storage(&self) -> &dyn KeyValueStore {
        self.storage.as_ref()
    }

    // ── Mutations ───────────────────────────────────────────────────

    /// Appends the record as given and persists the ledger.
    pub fn add_transaction(&mut self, transaction: Transaction) {
        tracing::debug!(
            kind = %transaction.kind,
            amount = transaction.amount,
            date = %transaction.date,
            "adding transaction"
        );
        self.transactions.push(transaction);
        self.save_to_storage();
    }

    /// Removes the record at `index` and persists the ledger. Out-of-range
    /// indices are ignored and nothing is written.
    pub fn delete_transaction(&mut self, index: usize) -> Option<Transaction> {
        if index >= self.transactions.len() {
            return None;
        }
        let removed = self.transactions.remove(index);
        tracing::debug!(index, date = %removed.date, "deleted transaction");
        self.save_to_storage();
        Some(removed)
    }

    // ── Derived figures ─────────────────────────────────────────────

    pub fn total_income(&self) -> f64 {
        self.transactions
            .iter()
            .filter(|txn| txn.is_income())
            .map(|txn| txn.amount)
            .fold(0.0, |sum, amount| sum + amount)
    }

    pub fn total_expenses(&self) -> f64 {
        self.transactions
            .iter()
            .filter(|txn| txn.is_expense())
            .map(|txn| txn.amount)
            .fold(0.0, |sum, amount| sum + amount)
    }

    /// Net of income minus expenses, accumulated in a single signed pass.
    pub fn balance(&self) -> f64 {
        self.transactions
            .iter()
            .fold(0.0, |sum, txn| sum + txn.signed_amount())
    }

    /// Records dated within `[start, end]`, both bounds whole UTC days, in
    /// ledger order. Bounds that cannot be parsed match nothing.
    pub fn filter_transactions_by_date(&self, start: &str, end: &str) -> Vec<&Transaction> {
        match DateWindow::parse(start, end) {
            Ok(window) => self.transactions_in(&window),
            Err(err) => {
                tracing::warn!(start, end, error = %err, "ignoring unparseable date filter");
                Vec::new()
            }
        }
    }

    pub fn transactions_in(&self, window: &DateWindow) -> Vec<&Transaction> {
        self.transactions
            .iter()
            .filter(|txn| window.contains(txn.date))
            .collect()
    }

    pub fn calculate_totals_for_period(&self, start: &str, end: &str) -> PeriodTotals {
        PeriodTotals::from_records(self.filter_transactions_by_date(start, end))
    }

    pub fn totals_in(&self, window: &DateWindow) -> PeriodTotals {
        PeriodTotals::from_records(self.transactions_in(window))
    }

    // ── Persistence ─────────────────────────────────────────────────

    /// Replaces the ledger with the stored copy, sorted by date.
    ///
    /// A missing or empty value leaves the ledger untouched. A value that
    /// does not parse as a list of transactions empties the ledger.
    pub fn load_from_storage(&mut self) {
        let data = match self.storage.get(&self.key) {
            Ok(Some(data)) if !data.is_empty() => data,
            Ok(_) => {
                tracing::debug!(key = %self.key, "no stored ledger");
                return;
            }
            Err(err) => {
                tracing::error!(key = %self.key, error = %err, "failed to read stored ledger");
                return;
            }
        };

        match serde_json::from_str::<Vec<Transaction>>(&data) {
            Ok(mut parsed) => {
                parsed.sort_by_key(|txn| txn.date);
                tracing::debug!(key = %self.key, count = parsed.len(), "loaded ledger");
                self.transactions = parsed;
            }
            Err(err) => {
                tracing::error!(
                    key = %self.key,
                    error = %err,
                    "Error parsing transactions from storage"
                );
                self.transactions = Vec::new();
            }
        }
    }

    /// Writes the whole ledger under the storage key, replacing any previous
    /// value. Failures are logged only.
    pub fn save_to_storage(&self) {
        let json = match serde_json::to_string(&self.transactions) {
            Ok(json) => json,
            Err(err) => {
                tracing::error!(key = %self.key, error = %err, "failed to serialize ledger");
                return;
            }
        };
        if let Err(err) = self.storage.set(&self.key, &json) {
            tracing::error!(key = %self.key, error = %err, "failed to store ledger");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::NaiveDate;

    use super::*;
    use crate::{
        errors::{LedgerError, Result},
        storage::MemoryStore,
    };

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn shared_store() -> (FinanceStore, Arc<MemoryStore>) {
        let backend = Arc::new(MemoryStore::new());
        (FinanceStore::new(Box::new(backend.clone())), backend)
    }

    struct FailingStore;

    impl KeyValueStore for FailingStore {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Err(LedgerError::Io(std::io::Error::new(std::io::ErrorKind::Other, "read refused")))
        }

        fn set(&self, _key: &str, _value: &str) -> Result<()> {
            Err(LedgerError::Io(std::io::Error::new(std::io::ErrorKind::Other, "quota exceeded")))
        }
    }

    #[test]
    fn add_appends_and_persists() {
        let (mut store, backend) = shared_store();
        store.add_transaction(Transaction::income(100.0, day(2025, 1, 2), "Salary"));
        store.add_transaction(Transaction::expense(30.0, day(2025, 1, 1), "Food"));

        assert_eq!(store.len(), 2);
        assert_eq!(store.transactions()[1].description, "Food");
        let stored = backend.get(DEFAULT_STORAGE_KEY).unwrap().unwrap();
        let parsed: Vec<Transaction> = serde_json::from_str(&stored).unwrap();
        assert_eq!(parsed, store.transactions());
    }

    #[test]
    fn out_of_range_delete_does_not_write() {
        let (mut store, backend) = shared_store();
        assert_eq!(store.delete_transaction(0), None);
        assert!(backend.is_empty(), "no-op delete must not persist");
    }

    #[test]
    fn delete_shifts_later_records_down() {
        let (mut store, _backend) = shared_store();
        for (i, name) in ["a", "b", "c"].iter().enumerate() {
            store.add_transaction(Transaction::income(i as f64, day(2025, 1, 1), *name));
        }
        let removed = store.delete_transaction(1).unwrap();
        assert_eq!(removed.description, "b");
        let names: Vec<_> = store
            .transactions()
            .iter()
            .map(|t| t.description.as_str())
            .collect();
        assert_eq!(names, ["a", "c"]);
    }

    #[test]
    fn load_sorts_by_date_stably() {
        let raw = r#"[
            {"type":"income","amount":1,"date":"2025-03-01","description":"late"},
            {"type":"expense","amount":2,"date":"2025-01-01","description":"first"},
            {"type":"income","amount":3,"date":"2025-01-01","description":"second"}
        ]"#;
        let backend = MemoryStore::with_entry(DEFAULT_STORAGE_KEY, raw);
        let mut store = FinanceStore::new(Box::new(backend));
        store.load_from_storage();
        let names: Vec<_> = store
            .transactions()
            .iter()
            .map(|t| t.description.as_str())
            .collect();
        assert_eq!(names, ["first", "second", "late"]);
    }

    #[test]
    fn load_with_invalid_type_resets_ledger() {
        let raw = r#"[{"type":"gift","amount":1,"date":"2025-03-01","description":"?"}]"#;
        let backend = MemoryStore::with_entry(DEFAULT_STORAGE_KEY, raw);
        let mut store = FinanceStore::new(Box::new(backend));
        store
            .transactions
            .push(Transaction::income(5.0, day(2025, 1, 1), "kept?"));
        store.load_from_storage();
        assert!(store.is_empty());
    }

    #[test]
    fn load_with_empty_value_keeps_ledger() {
        let backend = MemoryStore::with_entry(DEFAULT_STORAGE_KEY, "");
        let mut store = FinanceStore::new(Box::new(backend));
        store
            .transactions
            .push(Transaction::income(5.0, day(2025, 1, 1), "kept"));
        store.load_from_storage();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn backend_failures_are_swallowed() {
        let mut store = FinanceStore::new(Box::new(FailingStore));
        store.add_transaction(Transaction::income(5.0, day(2025, 1, 1), "Gift"));
        store.load_from_storage();
        assert_eq!(store.len(), 1, "read failure leaves the ledger unchanged");
    }

    #[test]
    fn custom_key_is_used_for_persistence() {
        let backend = Arc::new(MemoryStore::new());
        let mut store = FinanceStore::with_key(Box::new(backend.clone()), "household");
        store.add_transaction(Transaction::expense(9.5, day(2025, 2, 2), "Bus"));
        assert!(backend.get("household").unwrap().is_some());
        assert!(backend.get(DEFAULT_STORAGE_KEY).unwrap().is_none());
    }

    #[test]
    fn unparseable_filter_bounds_match_nothing() {
        let (mut store, _backend) = shared_store();
        store.add_transaction(Transaction::income(1.0, day(2025, 1, 1), "x"));
        assert!(store
            .filter_transactions_by_date("yesterday", "2025-12-31")
            .is_empty());
        assert_eq!(
            store.calculate_totals_for_period("2025-01-01", "soon"),
            PeriodTotals::default()
        );
    }
}
