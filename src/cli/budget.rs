//! Budget CLI commands
//!
//! Implements CLI commands for setting period limits and checking spending
//! against them.

use clap::Subcommand;

use crate::config::Settings;
use crate::display::budget::format_budget_reports;
use crate::error::{BookkeeperError, BookkeeperResult};
use crate::models::{Money, PeriodType};
use crate::storage::Storage;

use super::expense::reference;

/// Budget subcommands
#[derive(Subcommand)]
pub enum BudgetCommands {
    /// Set the spending limit for a period
    Set {
        /// day, week or month
        period: PeriodType,
        /// Limit (e.g., "1000" or "1000.00")
        amount: String,
    },

    /// List budgets with spending for their current period
    List {
        /// Reference date; defaults to today
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Remove the budget for a period
    Delete {
        /// day, week or month
        period: PeriodType,
    },
}

/// Handle a budget command
pub fn handle_budget_command(
    storage: &Storage,
    settings: &Settings,
    cmd: BudgetCommands,
) -> BookkeeperResult<()> {
    let service = storage.budget_service();

    match cmd {
        BudgetCommands::Set { period, amount } => {
            let limit = Money::parse(&amount)?;
            let budget = service.set_limit(period, limit)?;
            println!(
                "{} budget set to {}",
                budget.period_type,
                budget.limit_amount.format_with_symbol(&settings.currency_symbol)
            );
        }

        BudgetCommands::List { date } => {
            let reports = service.list_with_expenses(reference(date)?)?;
            print!(
                "{}",
                format_budget_reports(&reports, &settings.currency_symbol)
            );
        }

        BudgetCommands::Delete { period } => {
            let budget = service
                .find_by_period(period)?
                .ok_or_else(|| BookkeeperError::budget_not_found(period.as_str()))?;
            service.delete(budget.pk)?;
            println!("Deleted {} budget", period);
        }
    }

    Ok(())
}
