//! Category CLI commands
//!
//! Implements CLI commands for browsing and editing the category tree.

use std::io::Read;
use std::path::{Path, PathBuf};

use clap::Subcommand;

use crate::display::category::{format_category_details, format_category_list, format_category_tree};
use crate::error::{BookkeeperError, BookkeeperResult};
use crate::models::Category;
use crate::services::CategoryService;
use crate::storage::Storage;

/// Category subcommands
#[derive(Subcommand)]
pub enum CategoryCommands {
    /// List all categories as a tree
    List {
        /// Show a flat table with pks instead of a tree
        #[arg(long)]
        flat: bool,
    },

    /// Add a category
    Add {
        /// Category name
        name: String,
        /// Parent category name or pk
        #[arg(short, long)]
        parent: Option<String>,
    },

    /// Show a category with its path and subcategories
    Show {
        /// Category name or pk
        category: String,
    },

    /// Rename a category
    Rename {
        /// Category name or pk
        category: String,
        /// New name
        name: String,
    },

    /// Move a category under another one, or to the top level
    Move {
        /// Category name or pk
        category: String,
        /// New parent name or pk; omit to make it top level
        #[arg(short, long)]
        to: Option<String>,
    },

    /// Delete a category
    Delete {
        /// Category name or pk
        category: String,
    },

    /// Create categories from an indented text file ('-' reads stdin)
    Import {
        /// Path to the tree file
        file: PathBuf,
    },
}

/// Handle a category command
pub fn handle_category_command(storage: &Storage, cmd: CategoryCommands) -> BookkeeperResult<()> {
    let service = storage.category_service();

    match cmd {
        CategoryCommands::List { flat } => {
            let categories = service.list(None)?;
            if flat {
                print!("{}", format_category_list(&categories));
            } else {
                print!("{}", format_category_tree(&categories));
            }
        }

        CategoryCommands::Add { name, parent } => {
            let parent = match parent {
                Some(parent) => Some(find_category(&service, &parent)?),
                None => None,
            };
            let category = service.create(&name, parent.as_ref().map(|p| p.pk))?;

            match parent {
                Some(parent) => println!(
                    "Created category '{}' under '{}' (pk {})",
                    category.name, parent.name, category.pk
                ),
                None => println!("Created category '{}' (pk {})", category.name, category.pk),
            }
        }

        CategoryCommands::Show { category } => {
            let category = find_category(&service, &category)?;
            let mut ancestors: Vec<Category> = Vec::new();
            let mut missing_parent = None;
            for step in service.ancestors(&category) {
                match step {
                    Ok(parent) => ancestors.push(parent),
                    Err(e) if e.is_not_found() => {
                        missing_parent = ancestors.last().unwrap_or(&category).parent;
                        break;
                    }
                    Err(e) => return Err(e),
                }
            }
            let children = service.children(category.pk)?;
            print!(
                "{}",
                format_category_details(&category, &ancestors, missing_parent, &children)
            );
        }

        CategoryCommands::Rename { category, name } => {
            let mut category = find_category(&service, &category)?;
            let old_name = std::mem::replace(&mut category.name, name.trim().to_string());
            service.update(&category)?;
            println!("Renamed category '{}' to '{}'", old_name, category.name);
        }

        CategoryCommands::Move { category, to } => {
            let mut category = find_category(&service, &category)?;
            let target = match to {
                Some(target) => Some(find_category(&service, &target)?),
                None => None,
            };
            category.parent = target.as_ref().map(|t| t.pk);
            service.update(&category)?;

            match target {
                Some(target) => println!("Moved '{}' under '{}'", category.name, target.name),
                None => println!("Moved '{}' to the top level", category.name),
            }
        }

        CategoryCommands::Delete { category } => {
            let category = find_category(&service, &category)?;
            let orphans = service.children(category.pk)?;
            service.delete(category.pk)?;
            println!("Deleted category '{}'", category.name);
            if !orphans.is_empty() {
                println!(
                    "Note: {} subcategories still refer to it and are now shown at the top level",
                    orphans.len()
                );
            }
        }

        CategoryCommands::Import { file } => {
            let text = read_input(&file)?;
            let created = service.import_tree(&text)?;
            println!("Created {} categories", created.len());
        }
    }

    Ok(())
}

fn find_category(service: &CategoryService<'_>, identifier: &str) -> BookkeeperResult<Category> {
    service
        .find(identifier)?
        .ok_or_else(|| BookkeeperError::category_not_found(identifier))
}

fn read_input(file: &Path) -> BookkeeperResult<String> {
    if file.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }

    std::fs::read_to_string(file).map_err(|e| {
        BookkeeperError::Io(format!("Failed to read {}: {}", file.display(), e))
    })
}
