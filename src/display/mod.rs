//! Display formatting for terminal output
//!
//! Plain-text tables and trees for categories, expenses and budgets.

pub mod budget;
pub mod category;
pub mod expense;

pub use budget::format_budget_reports;
pub use category::{format_category_details, format_category_list, format_category_tree};
pub use expense::{format_expense_register, format_period_total};
