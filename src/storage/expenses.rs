//! Expense-specific storage queries

use crate::error::{BookkeeperError, BookkeeperResult};
use crate::models::{DateRange, Expense, FieldValue, Money};

use super::memory::MemoryRepository;
use super::record::Repository;
use super::sqlite::SqliteRepository;

/// Expense store with period totals
pub trait ExpenseRepository: Repository<Expense> {
    /// Sum of amounts whose `expense_date` lies within `range`, inclusive
    ///
    /// The default scans every stored expense.
    fn total_between(&self, range: &DateRange) -> BookkeeperResult<Money> {
        self.list(None)?
            .iter()
            .filter(|expense| range.contains(expense.expense_date))
            .try_fold(Money::zero(), |total, expense| total.checked_add(expense.amount))
            .ok_or_else(|| {
                BookkeeperError::Storage(format!("expense total overflows for {}", range))
            })
    }
}

impl ExpenseRepository for MemoryRepository<Expense> {}

impl ExpenseRepository for SqliteRepository<Expense> {
    fn total_between(&self, range: &DateRange) -> BookkeeperResult<Money> {
        let start = FieldValue::from(range.start);
        let end = FieldValue::from(range.end);
        let total: i64 = self.connect()?.query_row(
            "SELECT COALESCE(SUM(amount), 0) FROM expense WHERE expense_date BETWEEN ?1 AND ?2",
            [&start, &end],
            |row| row.get(0),
        )?;
        Ok(Money::from_minor(total))
    }
}
