//! Transaction records and the date ranges used to slice them.

pub mod date_window;
pub mod transaction;

pub use date_window::{parse_day, DateWindow, DAY_FORMAT};
pub use transaction::{Transaction, TransactionType};
