//! Wire types shared by the finance API client and the binary driving it.
//!
//! The remote API speaks JSON with camelCase keys; every type here mirrors one
//! request or response body.

use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Date of an entry, kept exactly as the API sent it.
///
/// The server stores whatever ISO string the user submitted (`2024-01-01`,
/// `2024-01-02T10:30:00`, `2024-01-01T00:00:00.000Z`, ...). The raw text is
/// written back untouched; [`EntryDate::day`] parses it on demand.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryDate(String);

impl EntryDate {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Calendar day in the date's own offset, or `None` when the text does
    /// not start with `YYYY-MM-DD`.
    pub fn day(&self) -> Option<NaiveDate> {
        let prefix = self.0.get(..10)?;
        NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()
    }
}

impl From<NaiveDate> for EntryDate {
    fn from(value: NaiveDate) -> Self {
        Self(value.format("%Y-%m-%d").to_string())
    }
}

impl From<DateTime<FixedOffset>> for EntryDate {
    fn from(value: DateTime<FixedOffset>) -> Self {
        Self(value.to_rfc3339())
    }
}

impl fmt::Display for EntryDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Body returned by the API alongside a non-2xx status.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: Option<String>,
}

pub mod income {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct IncomeEntry {
        pub income_id: String,
        pub amount: f64,
        pub source: String,
        pub date: EntryDate,
    }

    impl IncomeEntry {
        /// New entry with a freshly generated id.
        pub fn new(amount: f64, source: impl Into<String>, date: impl Into<EntryDate>) -> Self {
            Self {
                income_id: Uuid::new_v4().to_string(),
                amount,
                source: source.into(),
                date: date.into(),
            }
        }
    }

    /// All income entries of one user, as owned by the server.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct IncomeCollection {
        pub user_id: String,
        pub user_email: String,
        pub income_entries: Vec<IncomeEntry>,
    }

    impl IncomeCollection {
        pub fn total(&self) -> f64 {
            self.income_entries.iter().map(|entry| entry.amount).sum()
        }

        pub fn entry(&self, income_id: &str) -> Option<&IncomeEntry> {
            self.income_entries
                .iter()
                .find(|entry| entry.income_id == income_id)
        }
    }

    /// Request body for `POST /income/add-income-entry`.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct AddIncomeEntry {
        pub user_id: String,
        pub user_email: String,
        pub entry: IncomeEntry,
    }
}

pub mod expense {
    use serde::{Deserializer, de::Error as _};

    use super::*;

    /// Half a cent: totals are compared at cent precision.
    const TOTAL_TOLERANCE: f64 = 0.005;

    /// Ways a line item can break the `total == quantity * unit_price` rule.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
    pub enum ExpenseViolation {
        #[error("Expense quantity must be positive")]
        ZeroQuantity,
        #[error("Expense total does not match quantity times unit price")]
        TotalMismatch,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ExpenseEntry {
        pub expense_id: String,
        pub item: String,
        #[serde(deserialize_with = "whole_quantity")]
        pub quantity: u32,
        pub unit_price: f64,
        pub total: f64,
    }

    /// JSON numbers carry no integer type, so `2.0` is as good as `2`.
    fn whole_quantity<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Quantity {
            Whole(u32),
            Float(f64),
        }

        match Quantity::deserialize(deserializer)? {
            Quantity::Whole(quantity) => Ok(quantity),
            Quantity::Float(quantity)
                if quantity.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(&quantity) =>
            {
                Ok(quantity as u32)
            }
            Quantity::Float(quantity) => Err(D::Error::custom(format!(
                "quantity {quantity} is not a whole number"
            ))),
        }
    }

    impl ExpenseEntry {
        /// New line item with a fresh id and `total = quantity * unit_price`.
        pub fn new(item: impl Into<String>, quantity: u32, unit_price: f64) -> Self {
            Self {
                expense_id: Uuid::new_v4().to_string(),
                item: item.into(),
                quantity,
                unit_price,
                total: f64::from(quantity) * unit_price,
            }
        }

        pub fn validate(&self) -> Result<(), ExpenseViolation> {
            if self.quantity == 0 {
                return Err(ExpenseViolation::ZeroQuantity);
            }
            let expected = f64::from(self.quantity) * self.unit_price;
            if (expected - self.total).abs() >= TOTAL_TOLERANCE {
                return Err(ExpenseViolation::TotalMismatch);
            }
            Ok(())
        }

        pub fn is_consistent(&self) -> bool {
            self.validate().is_ok()
        }
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ExpenseCollection {
        pub user_id: String,
        pub user_email: String,
        pub expense_entries: Vec<ExpenseEntry>,
    }

    impl ExpenseCollection {
        pub fn total(&self) -> f64 {
            self.expense_entries.iter().map(|entry| entry.total).sum()
        }
    }

    /// Request body for `POST /expenses/add-expense-entries`.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct AddExpenseEntries {
        pub user_id: String,
        pub user_email: String,
        pub expense_entries: Vec<ExpenseEntry>,
    }
}
