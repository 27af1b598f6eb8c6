//! Service layer for bookkeeper
//!
//! Services add validation and derived views on top of the record stores.
//! Each borrows the repositories it works on, so the same services run over
//! SQLite or in-memory storage.

pub mod budget;
pub mod category;
pub mod expense;

pub use budget::BudgetService;
pub use category::{Ancestors, CategoryService, Subtree};
pub use expense::ExpenseService;
