//! Budget service
//!
//! Budget CRUD plus reports that pair each budget with what was spent
//! during its current period. At most one budget exists per period type.

use chrono::NaiveDateTime;

use crate::error::{BookkeeperError, BookkeeperResult};
use crate::models::{Budget, BudgetReport, Expense, Money, PeriodType, Pk};
use crate::storage::record::ensure_assigned;
use crate::storage::{ExpenseRepository, Filter, Repository};

use super::ExpenseService;

/// Service for budget management
pub struct BudgetService<'a> {
    budgets: &'a dyn Repository<Budget>,
    expenses: &'a dyn ExpenseRepository,
}

impl<'a> BudgetService<'a> {
    pub fn new(budgets: &'a dyn Repository<Budget>, expenses: &'a dyn ExpenseRepository) -> Self {
        Self { budgets, expenses }
    }

    /// Add a budget for a period type that has none yet
    pub fn add(&self, budget: &mut Budget) -> BookkeeperResult<Pk> {
        budget.validate()?;
        if self.find_by_period(budget.period_type)?.is_some() {
            return Err(BookkeeperError::Duplicate {
                entity_type: "Budget",
                identifier: budget.period_type.to_string(),
            });
        }

        let pk = self.budgets.add(budget)?;
        tracing::debug!(pk, period = %budget.period_type, "budget added");
        Ok(pk)
    }

    pub fn get(&self, pk: Pk) -> BookkeeperResult<Option<Budget>> {
        self.budgets.get(pk)
    }

    /// Get a budget that must exist
    pub fn require(&self, pk: Pk) -> BookkeeperResult<Budget> {
        self.budgets
            .get(pk)?
            .ok_or_else(|| BookkeeperError::budget_not_found(format!("pk={}", pk)))
    }

    pub fn list(&self, filter: Option<&Filter>) -> BookkeeperResult<Vec<Budget>> {
        self.budgets.list(filter)
    }

    pub fn update(&self, budget: &Budget) -> BookkeeperResult<()> {
        ensure_assigned(budget)?;
        budget.validate()?;
        if let Some(existing) = self.find_by_period(budget.period_type)? {
            if existing.pk != budget.pk {
                return Err(BookkeeperError::Duplicate {
                    entity_type: "Budget",
                    identifier: budget.period_type.to_string(),
                });
            }
        }
        self.budgets.update(budget)
    }

    pub fn delete(&self, pk: Pk) -> BookkeeperResult<()> {
        self.budgets.delete(pk)?;
        tracing::debug!(pk, "budget deleted");
        Ok(())
    }

    /// The budget for a period type, if one is set
    pub fn find_by_period(&self, period_type: PeriodType) -> BookkeeperResult<Option<Budget>> {
        let filter = Filter::new().eq("period_type", period_type.as_str());
        Ok(self.budgets.list(Some(&filter))?.into_iter().next())
    }

    /// Set the limit for a period type, creating the budget if needed
    pub fn set_limit(&self, period_type: PeriodType, limit: Money) -> BookkeeperResult<Budget> {
        match self.find_by_period(period_type)? {
            Some(mut budget) => {
                budget.limit_amount = limit;
                self.update(&budget)?;
                Ok(budget)
            }
            None => {
                let mut budget = Budget::new(limit, period_type);
                self.add(&mut budget)?;
                Ok(budget)
            }
        }
    }

    /// A stored budget with the spending of its period around `reference`
    pub fn get_with_expenses(
        &self,
        pk: Pk,
        reference: NaiveDateTime,
    ) -> BookkeeperResult<Option<BudgetReport>> {
        match self.budgets.get(pk)? {
            Some(budget) => self.report(budget, reference).map(Some),
            None => Ok(None),
        }
    }

    /// Every budget with the spending of its period around `reference`
    pub fn list_with_expenses(&self, reference: NaiveDateTime) -> BookkeeperResult<Vec<BudgetReport>> {
        self.budgets
            .list(None)?
            .into_iter()
            .map(|budget| self.report(budget, reference))
            .collect()
    }

    /// Pair a budget with the expense total for its period
    pub fn report(&self, budget: Budget, reference: NaiveDateTime) -> BookkeeperResult<BudgetReport> {
        let range = budget.period_type.bounds(reference);
        let expenses = self.expenses.total_between(&range)?;
        Ok(BudgetReport {
            budget,
            range,
            expenses,
        })
    }

    /// Expenses counted by a report, oldest first
    pub fn expenses_in(&self, report: &BudgetReport) -> BookkeeperResult<Vec<Expense>> {
        ExpenseService::new(self.expenses).list_between(&report.range)
    }
}
