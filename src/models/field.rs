//! Field-level vocabulary shared by every stored record
//!
//! Records declare their columns explicitly and expose each field as a
//! [`FieldValue`], which is what equality filters compare and what the
//! SQLite store binds and reads back.

use chrono::NaiveDateTime;
use std::fmt;

use crate::error::{BookkeeperError, BookkeeperResult};

use super::money::Money;

/// Record identifier assigned by a store; 0 means "not stored yet"
pub type Pk = i64;

/// Fixed-width text form of stored timestamps, so text order is time order
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.9f";

/// Storage type of a declared column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    Text,
    /// Decimal amount held as integer minor units
    Money,
    Timestamp,
}

impl ColumnType {
    /// SQL type used in the generated table definition
    pub fn sql_type(&self) -> &'static str {
        match self {
            Self::Integer => "INTEGER",
            Self::Text => "TEXT",
            Self::Money => "NUMERIC",
            Self::Timestamp => "TEXT",
        }
    }
}

/// A declared record field other than `pk`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub kind: ColumnType,
    pub nullable: bool,
}

impl Column {
    pub const fn required(name: &'static str, kind: ColumnType) -> Self {
        Self {
            name,
            kind,
            nullable: false,
        }
    }

    pub const fn optional(name: &'static str, kind: ColumnType) -> Self {
        Self {
            name,
            kind,
            nullable: true,
        }
    }

    /// Whether `value` has the variant this column stores
    ///
    /// `Null` is only accepted by nullable columns.
    pub fn accepts(&self, value: &FieldValue) -> bool {
        match (self.kind, value) {
            (_, FieldValue::Null) => self.nullable,
            (ColumnType::Integer | ColumnType::Money, FieldValue::Integer(_)) => true,
            (ColumnType::Text, FieldValue::Text(_)) => true,
            (ColumnType::Timestamp, FieldValue::Timestamp(_)) => true,
            _ => false,
        }
    }
}

/// The value of one record field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Null,
    Integer(i64),
    Text(String),
    Timestamp(NaiveDateTime),
}

impl FieldValue {
    pub fn as_integer(&self, column: &str) -> BookkeeperResult<i64> {
        match self {
            Self::Integer(value) => Ok(*value),
            other => Err(mismatch(column, "integer", other)),
        }
    }

    pub fn as_optional_integer(&self, column: &str) -> BookkeeperResult<Option<i64>> {
        match self {
            Self::Null => Ok(None),
            Self::Integer(value) => Ok(Some(*value)),
            other => Err(mismatch(column, "integer or null", other)),
        }
    }

    pub fn as_text(&self, column: &str) -> BookkeeperResult<String> {
        match self {
            Self::Text(value) => Ok(value.clone()),
            Self::Null => Ok(String::new()),
            other => Err(mismatch(column, "text", other)),
        }
    }

    pub fn as_money(&self, column: &str) -> BookkeeperResult<Money> {
        self.as_integer(column).map(Money::from_minor)
    }

    pub fn as_timestamp(&self, column: &str) -> BookkeeperResult<NaiveDateTime> {
        match self {
            Self::Timestamp(value) => Ok(*value),
            other => Err(mismatch(column, "timestamp", other)),
        }
    }
}

fn mismatch(column: &str, expected: &str, found: &FieldValue) -> BookkeeperError {
    BookkeeperError::Storage(format!(
        "column '{}': expected {}, found {}",
        column, expected, found
    ))
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Integer(value) => write!(f, "{}", value),
            Self::Text(value) => write!(f, "'{}'", value),
            Self::Timestamp(value) => write!(f, "{}", value.format(TIMESTAMP_FORMAT)),
        }
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<Option<i64>> for FieldValue {
    fn from(value: Option<i64>) -> Self {
        value.map_or(Self::Null, Self::Integer)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Money> for FieldValue {
    fn from(value: Money) -> Self {
        Self::Integer(value.minor_units())
    }
}

impl From<NaiveDateTime> for FieldValue {
    fn from(value: NaiveDateTime) -> Self {
        Self::Timestamp(value)
    }
}
