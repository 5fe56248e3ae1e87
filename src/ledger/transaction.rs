use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::LedgerError;

use super::date_window;

/// A single income or expense event.
///
/// Serialized as `{"type", "amount", "date", "description"}` with the date in
/// `YYYY-MM-DD` form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    #[serde(rename = "type")]
    pub kind: TransactionType,
    #[serde(deserialize_with = "amount_or_nan")]
    pub amount: f64,
    #[serde(with = "date_window::day_format")]
    pub date: NaiveDate,
    pub description: String,
}

impl Transaction {
    pub fn new(
        kind: TransactionType,
        amount: f64,
        date: NaiveDate,
        description: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            amount,
            date,
            description: description.into(),
        }
    }

    pub fn income(amount: f64, date: NaiveDate, description: impl Into<String>) -> Self {
        Self::new(TransactionType::Income, amount, date, description)
    }

    pub fn expense(amount: f64, date: NaiveDate, description: impl Into<String>) -> Self {
        Self::new(TransactionType::Expense, amount, date, description)
    }

    /// Amount with the sign it contributes to the balance.
    pub fn signed_amount(&self) -> f64 {
        match self.kind {
            TransactionType::Income => self.amount,
            TransactionType::Expense => -self.amount,
        }
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionType::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionType::Expense
    }
}

/// Non-finite amounts are written as `null`; read them back as NaN.
fn amount_or_nan<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

/// Direction of money flow for a [`Transaction`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = LedgerError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            other => Err(LedgerError::InvalidInput(format!(
                "unknown transaction type `{other}` (expected income or expense)"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn serializes_with_type_field_and_plain_date() {
        let txn = Transaction::income(123.0, day(2025, 1, 1), "Salary");
        let json = serde_json::to_value(&txn).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "income",
                "amount": 123.0,
                "date": "2025-01-01",
                "description": "Salary",
            })
        );
    }

    #[test]
    fn rejects_unknown_type_on_deserialize() {
        let raw = r#"{"type":"transfer","amount":1,"date":"2025-01-01","description":"x"}"#;
        assert!(serde_json::from_str::<Transaction>(raw).is_err());
    }

    #[test]
    fn rejects_missing_fields() {
        let raw = r#"{"type":"income","amount":1,"date":"2025-01-01"}"#;
        assert!(serde_json::from_str::<Transaction>(raw).is_err());
    }

    #[test]
    fn accepts_integer_amounts() {
        let raw = r#"{"type":"expense","amount":42,"date":"2025-03-04","description":"Lunch"}"#;
        let txn: Transaction = serde_json::from_str(raw).unwrap();
        assert_eq!(txn.amount, 42.0);
        assert_eq!(txn.signed_amount(), -42.0);
        assert!(txn.is_expense());
    }

    #[test]
    fn null_amount_reads_back_as_nan() {
        let txn = Transaction::expense(f64::INFINITY, day(2025, 3, 4), "Overflow");
        let json = serde_json::to_string(&txn).unwrap();
        assert!(json.contains(r#""amount":null"#));

        let back: Transaction = serde_json::from_str(&json).unwrap();
        assert!(back.amount.is_nan());
        assert_eq!(back.description, "Overflow");

        let raw = r#"{"type":"income","amount":"12","date":"2025-01-01","description":"x"}"#;
        assert!(serde_json::from_str::<Transaction>(raw).is_err());
    }

    #[test]
    fn parses_type_case_insensitively() {
        assert_eq!(
            "Income".parse::<TransactionType>().unwrap(),
            TransactionType::Income
        );
        assert_eq!(
            " EXPENSE ".parse::<TransactionType>().unwrap(),
            TransactionType::Expense
        );
        assert!("refund".parse::<TransactionType>().is_err());
    }
}
