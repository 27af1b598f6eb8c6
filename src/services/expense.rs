//! Expense service
//!
//! Expense CRUD and spending totals over date ranges.

use chrono::NaiveDateTime;

use crate::error::{BookkeeperError, BookkeeperResult};
use crate::models::{DateRange, Expense, Money, PeriodType, Pk};
use crate::storage::record::ensure_assigned;
use crate::storage::{ExpenseRepository, Filter};

/// Service for expense management
pub struct ExpenseService<'a> {
    repo: &'a dyn ExpenseRepository,
}

impl<'a> ExpenseService<'a> {
    pub fn new(repo: &'a dyn ExpenseRepository) -> Self {
        Self { repo }
    }

    /// Record an expense, assigning its pk
    pub fn add(&self, expense: &mut Expense) -> BookkeeperResult<Pk> {
        if expense.amount.is_negative() {
            return Err(BookkeeperError::Validation(
                "Expense amount cannot be negative".into(),
            ));
        }
        expense.comment = expense.comment.trim().to_string();

        let pk = self.repo.add(expense)?;
        tracing::debug!(pk, amount = %expense.amount, category = expense.category, "expense added");
        Ok(pk)
    }

    pub fn get(&self, pk: Pk) -> BookkeeperResult<Option<Expense>> {
        self.repo.get(pk)
    }

    /// Get an expense that must exist
    pub fn require(&self, pk: Pk) -> BookkeeperResult<Expense> {
        self.repo
            .get(pk)?
            .ok_or_else(|| BookkeeperError::expense_not_found(format!("pk={}", pk)))
    }

    pub fn list(&self, filter: Option<&Filter>) -> BookkeeperResult<Vec<Expense>> {
        self.repo.list(filter)
    }

    pub fn update(&self, expense: &Expense) -> BookkeeperResult<()> {
        ensure_assigned(expense)?;
        if expense.amount.is_negative() {
            return Err(BookkeeperError::Validation(
                "Expense amount cannot be negative".into(),
            ));
        }
        self.repo.update(expense)
    }

    pub fn delete(&self, pk: Pk) -> BookkeeperResult<()> {
        self.repo.delete(pk)?;
        tracing::debug!(pk, "expense deleted");
        Ok(())
    }

    /// Expenses booked to one category
    pub fn list_for_category(&self, category: Pk) -> BookkeeperResult<Vec<Expense>> {
        self.repo
            .list(Some(&Filter::new().eq("category", category)))
    }

    /// Expenses dated within `range`, oldest first
    pub fn list_between(&self, range: &DateRange) -> BookkeeperResult<Vec<Expense>> {
        let mut expenses: Vec<_> = self
            .repo
            .list(None)?
            .into_iter()
            .filter(|expense| range.contains(expense.expense_date))
            .collect();
        expenses.sort_by_key(|expense| (expense.expense_date, expense.pk));
        Ok(expenses)
    }

    /// Total spent within `range`, inclusive; zero when nothing matches
    pub fn total_for_period(&self, range: &DateRange) -> BookkeeperResult<Money> {
        self.repo.total_between(range)
    }

    /// Total spent in the period of `period_type` containing `reference`
    pub fn total_for(
        &self,
        period_type: PeriodType,
        reference: NaiveDateTime,
    ) -> BookkeeperResult<Money> {
        self.total_for_period(&period_type.bounds(reference))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;
    use crate::storage::{MemoryRepository, SqliteRepository};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn at(month: u32, day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, month, day)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap()
    }

    fn three_of_500(service: &ExpenseService<'_>) {
        for day in [2, 3, 4] {
            service
                .add(&mut Expense::on(Money::from_units(500), 1, at(4, day)))
                .unwrap();
        }
    }

    fn april() -> DateRange {
        DateRange::days(
            NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 4, 30).unwrap(),
        )
    }

    fn june() -> DateRange {
        DateRange::days(
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
        )
    }

    #[test]
    fn test_total_for_period() {
        let repo = MemoryRepository::<Expense>::new();
        let service = ExpenseService::new(&repo);
        three_of_500(&service);

        assert_eq!(service.total_for_period(&april()).unwrap(), Money::from_units(1500));
        assert_eq!(service.total_for_period(&june()).unwrap(), Money::zero());
    }

    #[test]
    fn test_total_for_period_on_sqlite() {
        let temp_dir = TempDir::new().unwrap();
        let repo =
            SqliteRepository::<Expense>::new(StoreConfig::new(temp_dir.path().join("test.db")))
                .unwrap();
        let service = ExpenseService::new(&repo);
        three_of_500(&service);

        assert_eq!(service.total_for_period(&april()).unwrap(), Money::from_units(1500));
        assert_eq!(service.total_for_period(&june()).unwrap(), Money::zero());
    }

    #[test]
    fn test_total_for_week() {
        let repo = MemoryRepository::<Expense>::new();
        let service = ExpenseService::new(&repo);
        three_of_500(&service);
        service
            .add(&mut Expense::on(Money::from_units(70), 1, at(4, 8)))
            .unwrap();

        // week of Monday 2024-04-01
        assert_eq!(
            service.total_for(PeriodType::Week, at(4, 7)).unwrap(),
            Money::from_units(1500)
        );
        assert_eq!(
            service.total_for(PeriodType::Day, at(4, 8)).unwrap(),
            Money::from_units(70)
        );
    }

    #[test]
    fn test_crud() {
        let repo = MemoryRepository::<Expense>::new();
        let service = ExpenseService::new(&repo);

        let mut expense = Expense::on(Money::from_units(12), 3, at(4, 1)).with_comment(" bus ");
        let pk = service.add(&mut expense).unwrap();
        assert_eq!(service.require(pk).unwrap().comment, "bus");

        expense.amount = Money::from_units(15);
        service.update(&expense).unwrap();
        assert_eq!(service.require(pk).unwrap().amount, Money::from_units(15));

        service.delete(pk).unwrap();
        assert!(service.require(pk).unwrap_err().is_not_found());
        assert!(service.delete(pk).unwrap_err().is_not_found());
    }

    #[test]
    fn test_negative_amount_rejected() {
        let repo = MemoryRepository::<Expense>::new();
        let service = ExpenseService::new(&repo);
        let mut expense = Expense::on(Money::from_units(-5), 1, at(4, 1));
        assert!(service.add(&mut expense).unwrap_err().is_validation());
        assert!(repo.is_empty().unwrap());
    }

    #[test]
    fn test_update_unstored_expense_is_invalid_state() {
        let repo = MemoryRepository::<Expense>::new();
        let service = ExpenseService::new(&repo);
        let expense = Expense::on(Money::from_units(-5), 1, at(4, 1));
        assert!(service.update(&expense).unwrap_err().is_invalid_state());
    }

    #[test]
    fn test_list_for_category_and_between() {
        let repo = MemoryRepository::<Expense>::new();
        let service = ExpenseService::new(&repo);
        service
            .add(&mut Expense::on(Money::from_units(1), 1, at(4, 20)))
            .unwrap();
        service
            .add(&mut Expense::on(Money::from_units(2), 2, at(4, 10)))
            .unwrap();
        service
            .add(&mut Expense::on(Money::from_units(3), 1, at(5, 1)))
            .unwrap();

        assert_eq!(service.list_for_category(1).unwrap().len(), 2);

        let in_april = service.list_between(&april()).unwrap();
        let amounts: Vec<_> = in_april.iter().map(|e| e.amount).collect();
        assert_eq!(amounts, vec![Money::from_units(2), Money::from_units(1)]);
    }
}
