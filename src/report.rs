//! Views over the ledger used by the summary and list screens: monthly
//! totals, description search, and amount formatting.

use std::{fmt, str::FromStr};

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::{
    errors::LedgerError,
    ledger::{DateWindow, Transaction},
    store::{FinanceStore, PeriodTotals},
};

/// A calendar month, parsed from `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Month {
    year: i32,
    month: u32,
    window: DateWindow,
}

impl Month {
    pub fn new(year: i32, month: u32) -> Result<Self, LedgerError> {
        let window = DateWindow::month(year, month)?;
        Ok(Self {
            year,
            month,
            window,
        })
    }

    pub fn containing(date: NaiveDate) -> Result<Self, LedgerError> {
        Self::new(date.year(), date.month())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn window(&self) -> &DateWindow {
        &self.window
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for Month {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl FromStr for Month {
    type Err = LedgerError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || LedgerError::InvalidDate(format!("`{value}` is not a YYYY-MM month"));
        let (year, month) = value.trim().split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year = year.parse::<i32>().map_err(|_| invalid())?;
        let month = month.parse::<u32>().map_err(|_| invalid())?;
        Self::new(year, month).map_err(|_| invalid())
    }
}

/// Totals for one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonthlySummary {
    pub month: Month,
    pub transaction_count: usize,
    #[serde(flatten)]
    pub totals: PeriodTotals,
}

pub fn monthly_summary(store: &FinanceStore, month: Month) -> MonthlySummary {
    let window = month.window();
    MonthlySummary {
        month,
        transaction_count: store.transactions_in(window).len(),
        totals: store.totals_in(window),
    }
}

/// Records whose description contains `query`, ignoring case. A blank query
/// matches everything.
pub fn search_description<'a>(
    records: impl IntoIterator<Item = &'a Transaction>,
    query: &str,
) -> Vec<&'a Transaction> {
    records
        .into_iter()
        .filter(|txn| matches_description(txn, query))
        .collect()
}

pub fn matches_description(transaction: &Transaction, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    needle.is_empty() || transaction.description.to_lowercase().contains(&needle)
}

/// `R$ 1234.50`, with the sign in front of the symbol for negatives.
pub fn format_amount(amount: f64, symbol: &str) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    if symbol.is_empty() {
        format!("{sign}{:.2}", amount.abs())
    } else {
        format!("{sign}{symbol} {:.2}", amount.abs())
    }
}
