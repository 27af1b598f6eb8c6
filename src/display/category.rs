//! Category display formatting
//!
//! Formats categories for terminal output in tree and table views.

use std::collections::{HashMap, HashSet};

use crate::models::{Category, Pk};

/// Format categories as an indented tree
///
/// Categories whose parent is not in `categories` are shown at the top level.
pub fn format_category_tree(categories: &[Category]) -> String {
    if categories.is_empty() {
        return "No categories found.\n\nRun 'bookkeeper init' to create default categories."
            .to_string();
    }

    let known: HashSet<Pk> = categories.iter().map(|c| c.pk).collect();
    let mut children: HashMap<Pk, Vec<&Category>> = HashMap::new();
    let mut roots = Vec::new();
    for category in categories {
        match category.parent {
            Some(parent) if known.contains(&parent) => {
                children.entry(parent).or_default().push(category)
            }
            _ => roots.push(category),
        }
    }

    let mut output = String::new();
    let mut visited = HashSet::new();
    for root in roots {
        output.push_str(&format!("{}\n", root.name));
        visited.insert(root.pk);
        push_children(&mut output, root.pk, &children, "", &mut visited);
    }
    output
}

fn push_children(
    output: &mut String,
    parent: Pk,
    children: &HashMap<Pk, Vec<&Category>>,
    indent: &str,
    visited: &mut HashSet<Pk>,
) {
    let Some(below) = children.get(&parent) else {
        return;
    };

    for (i, category) in below.iter().enumerate() {
        if !visited.insert(category.pk) {
            continue;
        }
        let is_last = i == below.len() - 1;
        let prefix = if is_last { "└── " } else { "├── " };
        output.push_str(&format!("{}{}{}\n", indent, prefix, category.name));

        let next_indent = format!("{}{}", indent, if is_last { "    " } else { "│   " });
        push_children(output, category.pk, children, &next_indent, visited);
    }
}

/// Format a simple list of categories
pub fn format_category_list(categories: &[Category]) -> String {
    if categories.is_empty() {
        return "No categories found.".to_string();
    }

    let name_width = categories
        .iter()
        .map(|c| c.name.chars().count())
        .max()
        .unwrap_or(4)
        .max(8);

    let mut output = String::new();
    output.push_str(&format!(
        "{:>5}  {:<width$}  {:>6}\n",
        "PK",
        "Category",
        "Parent",
        width = name_width
    ));
    output.push_str(&format!(
        "{:->5}  {:-<width$}  {:->6}\n",
        "",
        "",
        "",
        width = name_width
    ));

    for category in categories {
        let parent = category
            .parent
            .map(|p| p.to_string())
            .unwrap_or_else(|| "-".to_string());
        output.push_str(&format!(
            "{:>5}  {:<width$}  {:>6}\n",
            category.pk,
            category.name,
            parent,
            width = name_width
        ));
    }

    output
}

/// Format category details with its path and direct subcategories
///
/// `ancestors` is ordered nearest first. `missing_parent` is the pk where the
/// ancestor chain ended at a deleted category, if it did.
pub fn format_category_details(
    category: &Category,
    ancestors: &[Category],
    missing_parent: Option<Pk>,
    children: &[Category],
) -> String {
    let mut output = String::new();

    output.push_str(&format!("Category: {}\n", category.name));
    output.push_str(&format!("  PK:     {}\n", category.pk));

    // a path cut short by a deleted category starts with "?"
    let path: Vec<&str> = missing_parent
        .map(|_| "?")
        .into_iter()
        .chain(ancestors.iter().rev().map(|c| c.name.as_str()))
        .chain(std::iter::once(category.name.as_str()))
        .collect();
    output.push_str(&format!("  Path:   {}\n", path.join(" / ")));

    match (ancestors.first(), missing_parent) {
        (Some(parent), _) => output.push_str(&format!("  Parent: {}\n", parent.name)),
        (None, Some(pk)) => output.push_str(&format!("  Parent: (deleted, pk {})\n", pk)),
        (None, None) => output.push_str("  Parent: (top level)\n"),
    }

    if !children.is_empty() {
        output.push_str("\n  Subcategories:\n");
        for child in children {
            output.push_str(&format!("    - {}\n", child.name));
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(pk: Pk, name: &str, parent: Option<Pk>) -> Category {
        Category {
            name: name.to_string(),
            parent,
            pk,
        }
    }

    #[test]
    fn test_format_empty_tree() {
        let output = format_category_tree(&[]);
        assert!(output.contains("No categories found"));
    }

    #[test]
    fn test_format_category_tree() {
        let categories = vec![
            category(1, "food", None),
            category(2, "meat", Some(1)),
            category(3, "raw meat", Some(2)),
            category(4, "sweets", Some(1)),
            category(5, "books", None),
        ];

        let output = format_category_tree(&categories);
        assert_eq!(
            output,
            "food\n├── meat\n│   └── raw meat\n└── sweets\nbooks\n"
        );
    }

    #[test]
    fn test_orphans_shown_at_top_level() {
        let categories = vec![category(2, "meat", Some(1)), category(3, "beef", Some(2))];
        let output = format_category_tree(&categories);
        assert_eq!(output, "meat\n└── beef\n");
    }

    #[test]
    fn test_format_category_list() {
        let categories = vec![category(1, "food", None), category(2, "meat", Some(1))];
        let output = format_category_list(&categories);
        assert!(output.contains("Category"));
        assert!(output.contains("meat"));
        assert_eq!(output.lines().count(), 4);
    }

    #[test]
    fn test_format_category_details() {
        let food = category(1, "food", None);
        let meat = category(2, "meat", Some(1));
        let beef = category(3, "beef", Some(2));

        let output = format_category_details(&meat, &[food], None, &[beef]);
        assert!(output.contains("Path:   food / meat"));
        assert!(output.contains("Parent: food"));
        assert!(output.contains("- beef"));
    }

    #[test]
    fn test_format_details_with_deleted_ancestor() {
        let meat = category(2, "meat", Some(1));
        let beef = category(3, "beef", Some(2));

        let output = format_category_details(&meat, &[], Some(1), &[]);
        assert!(output.contains("Path:   ? / meat"));
        assert!(output.contains("Parent: (deleted, pk 1)"));

        let output = format_category_details(&beef, &[meat], Some(1), &[]);
        assert!(output.contains("Path:   ? / meat / beef"));
        assert!(output.contains("Parent: meat"));
    }
}
