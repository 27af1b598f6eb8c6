//! Expense category model
//!
//! Categories form a tree: each one optionally points at its parent by pk.
//! Tree traversal lives in `services::category`.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{BookkeeperError, BookkeeperResult};
use crate::storage::Record;

use super::field::{Column, ColumnType, FieldValue, Pk};

/// Maximum category name length, in characters
pub const MAX_NAME_LEN: usize = 50;

/// An expense category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Category name
    pub name: String,

    /// Parent category id; `None` for top-level categories
    #[serde(default)]
    pub parent: Option<Pk>,

    /// Store-assigned id, 0 until stored
    #[serde(default)]
    pub pk: Pk,
}

impl Category {
    /// Create a new top-level category
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            pk: 0,
        }
    }

    /// Create a new category under `parent`
    pub fn with_parent(name: impl Into<String>, parent: Pk) -> Self {
        Self {
            name: name.into(),
            parent: Some(parent),
            pk: 0,
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Validate the category
    pub fn validate(&self) -> Result<(), CategoryValidationError> {
        if self.name.trim().is_empty() {
            return Err(CategoryValidationError::EmptyName);
        }

        let len = self.name.chars().count();
        if len > MAX_NAME_LEN {
            return Err(CategoryValidationError::NameTooLong(len));
        }

        if self.pk != 0 && self.parent == Some(self.pk) {
            return Err(CategoryValidationError::OwnParent);
        }

        Ok(())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

const COLUMNS: &[Column] = &[
    Column::required("name", ColumnType::Text),
    Column::optional("parent", ColumnType::Integer),
];

impl Record for Category {
    const TABLE: &'static str = "category";

    fn columns() -> &'static [Column] {
        COLUMNS
    }

    fn pk(&self) -> Pk {
        self.pk
    }

    fn set_pk(&mut self, pk: Pk) {
        self.pk = pk;
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "name" => Some(self.name.as_str().into()),
            "parent" => Some(self.parent.into()),
            "pk" => Some(self.pk.into()),
            _ => None,
        }
    }

    fn from_values(pk: Pk, values: &[FieldValue]) -> BookkeeperResult<Self> {
        let [name, parent] = values else {
            return Err(BookkeeperError::Storage(format!(
                "category row has {} columns, expected 2",
                values.len()
            )));
        };
        Ok(Self {
            name: name.as_text("name")?,
            parent: parent.as_optional_integer("parent")?,
            pk,
        })
    }
}

/// Validation errors for categories
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryValidationError {
    EmptyName,
    NameTooLong(usize),
    OwnParent,
}

impl fmt::Display for CategoryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Category name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Category name too long ({} chars, max {})", len, MAX_NAME_LEN)
            }
            Self::OwnParent => write!(f, "Category cannot be its own parent"),
        }
    }
}

impl std::error::Error for CategoryValidationError {}
