//! Storage initialization
//!
//! Handles first-run setup and default data creation

use crate::config::{BookkeeperPaths, Settings};
use crate::error::BookkeeperResult;
use crate::models::{Money, PeriodType};

use super::Storage;

/// Categories created on first run
pub const DEFAULT_CATEGORY_TREE: &str = "\
food
    meat
        raw meat
        meat products
    sweets
books
clothes
";

/// Budget limits, in whole units, created on first run
const DEFAULT_BUDGETS: &[(PeriodType, i64)] = &[
    (PeriodType::Day, 1000),
    (PeriodType::Week, 7000),
    (PeriodType::Month, 30000),
];

/// Initialize storage for a fresh installation
///
/// Creates the directories, the settings file and the database, then seeds
/// default data into whatever is still empty. Safe to run repeatedly.
pub fn initialize_storage(paths: &BookkeeperPaths) -> BookkeeperResult<Storage> {
    paths.ensure_directories()?;

    let settings = Settings::load_or_create(paths)?;
    if !paths.settings_file().exists() {
        settings.save(paths)?;
    }

    let storage = Storage::open(&settings.store_config(paths))?;
    seed_defaults(&storage)?;
    Ok(storage)
}

/// Create the default categories and budgets where none exist
///
/// Returns how many records were created.
pub fn seed_defaults(storage: &Storage) -> BookkeeperResult<usize> {
    let mut created = 0;

    if storage.categories.list(None)?.is_empty() {
        created += storage
            .category_service()
            .import_tree(DEFAULT_CATEGORY_TREE)?
            .len();
    }

    if storage.budgets.list(None)?.is_empty() {
        let budgets = storage.budget_service();
        for (period_type, units) in DEFAULT_BUDGETS {
            budgets.set_limit(*period_type, Money::from_units(*units))?;
            created += 1;
        }
    }

    if created > 0 {
        tracing::info!(created, "seeded default data");
    }
    Ok(created)
}
