//! The record store contract
//!
//! A [`Repository`] assigns integer identifiers to records, looks them up,
//! lists them through an optional equality [`Filter`], replaces and deletes
//! them. Any type implementing [`Record`] can be stored.

use crate::error::{BookkeeperError, BookkeeperResult};
use crate::models::{Column, ColumnType, FieldValue, Pk};

/// A value that can live in a record store
///
/// Implementors declare their columns explicitly; `pk` is never part of
/// [`Record::columns`] but is always accepted by [`Record::field`].
pub trait Record: Clone + Send + Sync + 'static {
    /// Table (and entity) name
    const TABLE: &'static str;

    /// Declared fields in storage order, excluding `pk`
    fn columns() -> &'static [Column];

    fn pk(&self) -> Pk;

    fn set_pk(&mut self, pk: Pk);

    /// Value of the named field, or `None` if the record has no such field
    fn field(&self, name: &str) -> Option<FieldValue>;

    /// Rebuild a record from its pk and column values in declaration order
    fn from_values(pk: Pk, values: &[FieldValue]) -> BookkeeperResult<Self>;

    /// Column values in declaration order
    fn values(&self) -> Vec<FieldValue> {
        Self::columns()
            .iter()
            .map(|column| self.field(column.name).unwrap_or(FieldValue::Null))
            .collect()
    }

    /// Whether `name` is `pk` or one of the declared columns
    fn has_field(name: &str) -> bool {
        Self::column(name).is_some()
    }

    /// Declaration of the named field; `pk` is a required integer
    fn column(name: &str) -> Option<Column> {
        if name == "pk" {
            return Some(PK_COLUMN);
        }
        Self::columns().iter().find(|column| column.name == name).copied()
    }
}

const PK_COLUMN: Column = Column::required("pk", ColumnType::Integer);

/// Equality conditions over record fields, combined with AND
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    conditions: Vec<(String, FieldValue)>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `field` to equal `value`
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.conditions.push((field.into(), value.into()));
        self
    }

    pub fn conditions(&self) -> &[(String, FieldValue)] {
        &self.conditions
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Fail with `InvalidArgument` if any condition names a field `R` lacks
    /// or compares a field with a value of another type
    pub fn validate<R: Record>(&self) -> BookkeeperResult<()> {
        for (field, value) in &self.conditions {
            let column = R::column(field).ok_or_else(|| {
                BookkeeperError::InvalidArgument(format!("{} has no field '{}'", R::TABLE, field))
            })?;
            if !column.accepts(value) {
                return Err(BookkeeperError::InvalidArgument(format!(
                    "{}.{} cannot be compared with {}",
                    R::TABLE,
                    field,
                    value
                )));
            }
        }
        Ok(())
    }

    /// Whether every condition holds for `record`
    pub fn matches<R: Record>(&self, record: &R) -> bool {
        self.conditions
            .iter()
            .all(|(field, value)| record.field(field).as_ref() == Some(value))
    }
}

/// Generic record store
///
/// Methods take `&self`; implementations handle their own interior
/// mutability so one store can be shared by several services.
pub trait Repository<R: Record>: Send + Sync {
    /// Store a new record, writing the assigned id into `record.pk`
    ///
    /// Fails with `InvalidState` if `record.pk` is already set.
    fn add(&self, record: &mut R) -> BookkeeperResult<Pk>;

    /// Look up a record by id
    fn get(&self, pk: Pk) -> BookkeeperResult<Option<R>>;

    /// All records in insertion order, optionally narrowed by `filter`
    fn list(&self, filter: Option<&Filter>) -> BookkeeperResult<Vec<R>>;

    /// Replace the stored record with the same id
    ///
    /// Fails with `InvalidState` if `record.pk` is 0 and `NotFound` if the
    /// id is not stored.
    fn update(&self, record: &R) -> BookkeeperResult<()>;

    /// Remove a record; fails with `NotFound` if the id is not stored
    fn delete(&self, pk: Pk) -> BookkeeperResult<()>;
}

pub(crate) fn ensure_unassigned<R: Record>(record: &R) -> BookkeeperResult<()> {
    if record.pk() != 0 {
        return Err(BookkeeperError::InvalidState(format!(
            "trying to add {} record with pk already set to {}",
            R::TABLE,
            record.pk()
        )));
    }
    Ok(())
}

pub(crate) fn ensure_assigned<R: Record>(record: &R) -> BookkeeperResult<()> {
    if record.pk() == 0 {
        return Err(BookkeeperError::InvalidState(format!(
            "attempt to update {} record with unknown pk",
            R::TABLE
        )));
    }
    Ok(())
}
