//! Expense model
//!
//! An expense is an amount spent in a category at a point in time. The
//! category is a soft reference: nothing checks that the pk still exists.

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{BookkeeperError, BookkeeperResult};
use crate::storage::Record;

use super::field::{Column, ColumnType, FieldValue, Pk};
use super::money::Money;

/// A single expense
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    /// Amount spent
    pub amount: Money,

    /// Category pk
    pub category: Pk,

    /// When the money was spent
    pub expense_date: NaiveDateTime,

    /// When the expense was recorded
    pub added_date: NaiveDateTime,

    /// Free-form note
    #[serde(default)]
    pub comment: String,

    /// Store-assigned id, 0 until stored
    #[serde(default)]
    pub pk: Pk,
}

impl Expense {
    /// Create an expense dated now
    pub fn new(amount: Money, category: Pk) -> Self {
        let now = Local::now().naive_local();
        Self {
            amount,
            category,
            expense_date: now,
            added_date: now,
            comment: String::new(),
            pk: 0,
        }
    }

    /// Create an expense at a given time
    pub fn on(amount: Money, category: Pk, expense_date: NaiveDateTime) -> Self {
        Self {
            expense_date,
            ..Self::new(amount, category)
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }
}

const COLUMNS: &[Column] = &[
    Column::required("amount", ColumnType::Money),
    Column::required("category", ColumnType::Integer),
    Column::required("expense_date", ColumnType::Timestamp),
    Column::required("added_date", ColumnType::Timestamp),
    Column::required("comment", ColumnType::Text),
];

impl Record for Expense {
    const TABLE: &'static str = "expense";

    fn columns() -> &'static [Column] {
        COLUMNS
    }

    fn pk(&self) -> Pk {
        self.pk
    }

    fn set_pk(&mut self, pk: Pk) {
        self.pk = pk;
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        let value = match name {
            "amount" => self.amount.into(),
            "category" => self.category.into(),
            "expense_date" => self.expense_date.into(),
            "added_date" => self.added_date.into(),
            "comment" => self.comment.as_str().into(),
            "pk" => self.pk.into(),
            _ => return None,
        };
        Some(value)
    }

    fn from_values(pk: Pk, values: &[FieldValue]) -> BookkeeperResult<Self> {
        let [amount, category, expense_date, added_date, comment] = values else {
            return Err(BookkeeperError::Storage(format!(
                "expense row has {} columns, expected 5",
                values.len()
            )));
        };
        Ok(Self {
            amount: amount.as_money("amount")?,
            category: category.as_integer("category")?,
            expense_date: expense_date.as_timestamp("expense_date")?,
            added_date: added_date.as_timestamp("added_date")?,
            comment: comment.as_text("comment")?,
            pk,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn april(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 4, day)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_new_expense() {
        let expense = Expense::new(Money::from_units(500), 2);
        assert_eq!(expense.amount, Money::from_units(500));
        assert_eq!(expense.category, 2);
        assert_eq!(expense.expense_date, expense.added_date);
        assert!(expense.comment.is_empty());
    }

    #[test]
    fn test_dated_expense_with_comment() {
        let expense = Expense::on(Money::from_units(45), 1, april(5)).with_comment("Groceries");
        assert_eq!(expense.expense_date, april(5));
        assert_eq!(expense.comment, "Groceries");
    }

    #[test]
    fn test_record_values() {
        let mut expense = Expense::on(Money::from_minor(1999), 3, april(1));
        expense.pk = 7;

        let values = expense.values();
        assert_eq!(values[0], FieldValue::Integer(1999));
        assert_eq!(values[2], FieldValue::Timestamp(april(1)));

        let rebuilt = Expense::from_values(7, &values).unwrap();
        assert_eq!(rebuilt, expense);
    }

    #[test]
    fn test_from_values_rejects_short_row() {
        let err = Expense::from_values(1, &[FieldValue::Integer(1)]).unwrap_err();
        assert!(matches!(err, BookkeeperError::Storage(_)));
    }
}
