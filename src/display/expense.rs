//! Expense display formatting

use std::collections::HashMap;

use crate::models::{DateRange, Expense, Money, Pk};

/// Format expenses as a register, oldest first as given
///
/// `category_names` maps category pks to names; unknown pks are shown as
/// `#pk`.
pub fn format_expense_register(
    expenses: &[Expense],
    category_names: &HashMap<Pk, String>,
    currency_symbol: &str,
) -> String {
    if expenses.is_empty() {
        return "No expenses found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:>5}  {:16}  {:20}  {:>12}  {}\n",
        "PK", "Date", "Category", "Amount", "Comment"
    ));
    output.push_str(&"-".repeat(70));
    output.push('\n');

    for expense in expenses {
        let category = category_names
            .get(&expense.category)
            .cloned()
            .unwrap_or_else(|| format!("#{}", expense.category));
        output.push_str(&format!(
            "{:>5}  {:16}  {:20}  {:>12}  {}\n",
            expense.pk,
            expense.expense_date.format("%Y-%m-%d %H:%M"),
            truncate(&category, 20),
            expense.amount.format_with_symbol(currency_symbol),
            expense.comment
        ));
    }

    let total: Money = expenses.iter().map(|e| e.amount).sum();
    output.push_str(&"-".repeat(70));
    output.push('\n');
    output.push_str(&format!(
        "{:>5}  {:16}  {:20}  {:>12}\n",
        "",
        "",
        "Total",
        total.format_with_symbol(currency_symbol)
    ));

    output
}

/// Format the spending total for a range
pub fn format_period_total(label: &str, range: &DateRange, total: Money, currency_symbol: &str) -> String {
    format!(
        "{} ({}): {}\n",
        label,
        range,
        total.format_with_symbol(currency_symbol)
    )
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
