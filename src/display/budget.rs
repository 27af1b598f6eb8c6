//! Budget display formatting

use crate::models::BudgetReport;

/// Format budgets with their current spending
pub fn format_budget_reports(reports: &[BudgetReport], currency_symbol: &str) -> String {
    if reports.is_empty() {
        return "No budgets set.\n\nUse 'bookkeeper budget set <period> <amount>' to add one."
            .to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:>5}  {:6}  {:24}  {:>12}  {:>12}  {:>12}\n",
        "PK", "Period", "Dates", "Limit", "Spent", "Remaining"
    ));
    output.push_str(&"-".repeat(80));
    output.push('\n');

    for report in reports {
        let marker = if report.is_over_limit() { "  OVER" } else { "" };
        output.push_str(&format!(
            "{:>5}  {:6}  {:24}  {:>12}  {:>12}  {:>12}{}\n",
            report.budget.pk,
            report.budget.period_type.as_str(),
            report.range.to_string(),
            report.budget.limit_amount.format_with_symbol(currency_symbol),
            report.expenses.format_with_symbol(currency_symbol),
            report.remaining().format_with_symbol(currency_symbol),
            marker
        ));
    }

    output
}
