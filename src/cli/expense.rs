//! Expense CLI commands
//!
//! Implements CLI commands for recording expenses and totalling them by
//! period.

use std::collections::HashMap;

use chrono::{Local, NaiveDateTime};
use clap::Subcommand;

use crate::config::Settings;
use crate::display::expense::{format_expense_register, format_period_total};
use crate::error::{BookkeeperError, BookkeeperResult};
use crate::models::period::parse_timestamp;
use crate::models::{Expense, Money, PeriodType, Pk};
use crate::storage::Storage;

/// Expense subcommands
#[derive(Subcommand)]
pub enum ExpenseCommands {
    /// Record an expense
    Add {
        /// Amount (e.g., "12" or "12.50")
        amount: String,
        /// Category name or pk
        category: String,
        /// When the money was spent (YYYY-MM-DD or "YYYY-MM-DD HH:MM"); defaults to now
        #[arg(short, long)]
        date: Option<String>,
        /// Comment
        #[arg(short, long)]
        comment: Option<String>,
    },

    /// List expenses
    List {
        /// Only this category (name or pk)
        #[arg(short, long)]
        category: Option<String>,
        /// Only the day, week or month containing --date
        #[arg(short, long)]
        period: Option<PeriodType>,
        /// Reference date for --period; defaults to today
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Delete an expense
    Delete {
        /// Expense pk
        pk: Pk,
    },

    /// Total spending for a period
    Total {
        /// day, week or month; defaults to the configured period
        #[arg(short, long)]
        period: Option<PeriodType>,
        /// Reference date; defaults to today
        #[arg(short, long)]
        date: Option<String>,
    },
}

/// Handle an expense command
pub fn handle_expense_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ExpenseCommands,
) -> BookkeeperResult<()> {
    let service = storage.expense_service();
    let categories = storage.category_service();

    match cmd {
        ExpenseCommands::Add {
            amount,
            category,
            date,
            comment,
        } => {
            let amount = Money::parse(&amount)?;
            let category = categories
                .find(&category)?
                .ok_or_else(|| BookkeeperError::category_not_found(category.as_str()))?;

            let mut expense = match date {
                Some(date) => Expense::on(amount, category.pk, parse_timestamp(&date)?),
                None => Expense::new(amount, category.pk),
            };
            if let Some(comment) = comment {
                expense = expense.with_comment(comment);
            }

            service.add(&mut expense)?;
            println!(
                "Recorded {} in '{}' on {} (pk {})",
                expense.amount.format_with_symbol(&settings.currency_symbol),
                category.name,
                expense.expense_date.format(&settings.date_format),
                expense.pk
            );
        }

        ExpenseCommands::List {
            category,
            period,
            date,
        } => {
            let mut expenses = match period {
                Some(period) => service.list_between(&period.bounds(reference(date)?))?,
                None => {
                    let mut all = service.list(None)?;
                    all.sort_by_key(|e| (e.expense_date, e.pk));
                    all
                }
            };

            if let Some(category) = category {
                let category = categories
                    .find(&category)?
                    .ok_or_else(|| BookkeeperError::category_not_found(category.as_str()))?;
                expenses.retain(|e| e.category == category.pk);
            }

            let names: HashMap<Pk, String> = categories
                .list(None)?
                .into_iter()
                .map(|c| (c.pk, c.name))
                .collect();
            print!(
                "{}",
                format_expense_register(&expenses, &names, &settings.currency_symbol)
            );
        }

        ExpenseCommands::Delete { pk } => {
            service.delete(pk)?;
            println!("Deleted expense {}", pk);
        }

        ExpenseCommands::Total { period, date } => {
            let period = period.unwrap_or(settings.default_period);
            let range = period.bounds(reference(date)?);
            let total = service.total_for_period(&range)?;
            print!(
                "{}",
                format_period_total(
                    &format!("Spent this {}", period),
                    &range,
                    total,
                    &settings.currency_symbol
                )
            );
        }
    }

    Ok(())
}

/// The given date, or now
pub(crate) fn reference(date: Option<String>) -> BookkeeperResult<NaiveDateTime> {
    match date {
        Some(date) => parse_timestamp(&date),
        None => Ok(Local::now().naive_local()),
    }
}
