//! Storage layer for bookkeeper
//!
//! Record stores keyed by integer pk, in memory or in a SQLite file, and the
//! [`Storage`] bundle that the services and CLI work against.

pub mod expenses;
pub mod init;
pub mod memory;
pub mod record;
pub mod sqlite;

pub use expenses::ExpenseRepository;
pub use init::{initialize_storage, seed_defaults, DEFAULT_CATEGORY_TREE};
pub use memory::MemoryRepository;
pub use record::{Filter, Record, Repository};
pub use sqlite::SqliteRepository;

use crate::config::StoreConfig;
use crate::error::BookkeeperResult;
use crate::models::{Budget, Category, Expense};
use crate::services::{BudgetService, CategoryService, ExpenseService};

/// One repository per record type
pub struct Storage {
    pub categories: Box<dyn Repository<Category>>,
    pub expenses: Box<dyn ExpenseRepository>,
    pub budgets: Box<dyn Repository<Budget>>,
}

impl Storage {
    /// Open SQLite-backed storage, creating tables as needed
    pub fn open(config: &StoreConfig) -> BookkeeperResult<Self> {
        if let Some(parent) = config.db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let storage = Self {
            categories: Box::new(SqliteRepository::<Category>::new(config.clone())?),
            expenses: Box::new(SqliteRepository::<Expense>::new(config.clone())?),
            budgets: Box::new(SqliteRepository::<Budget>::new(config.clone())?),
        };
        tracing::debug!(db = %config.db_path.display(), "storage opened");
        Ok(storage)
    }

    /// Storage that lives only as long as this value
    pub fn in_memory() -> Self {
        Self {
            categories: Box::new(MemoryRepository::<Category>::new()),
            expenses: Box::new(MemoryRepository::<Expense>::new()),
            budgets: Box::new(MemoryRepository::<Budget>::new()),
        }
    }

    pub fn category_service(&self) -> CategoryService<'_> {
        CategoryService::new(self.categories.as_ref())
    }

    pub fn expense_service(&self) -> ExpenseService<'_> {
        ExpenseService::new(self.expenses.as_ref())
    }

    pub fn budget_service(&self) -> BudgetService<'_> {
        BudgetService::new(self.budgets.as_ref(), self.expenses.as_ref())
    }
}
