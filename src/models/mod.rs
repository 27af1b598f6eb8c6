//! Core data models for bookkeeper
//!
//! Categories, expenses and budgets, plus the money, period and field types
//! they are built from.

pub mod budget;
pub mod category;
pub mod expense;
pub mod field;
pub mod money;
pub mod period;

pub use budget::{Budget, BudgetReport};
pub use category::{Category, CategoryValidationError};
pub use expense::Expense;
pub use field::{Column, ColumnType, FieldValue, Pk, TIMESTAMP_FORMAT};
pub use money::Money;
pub use period::{DateRange, PeriodType};
