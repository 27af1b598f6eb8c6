//! SQLite-backed record store
//!
//! One table per record type, named by [`Record::TABLE`], with one column per
//! declared field plus an autoincrementing `pk`. The table is created on
//! construction if it does not exist. Every operation opens its own
//! connection and drops it before returning.

use std::marker::PhantomData;

use chrono::NaiveDateTime;
use rusqlite::types::{ToSqlOutput, Value, ValueRef};
use rusqlite::{params_from_iter, Connection, OptionalExtension, Row, ToSql};

use crate::config::StoreConfig;
use crate::error::{BookkeeperError, BookkeeperResult};
use crate::models::{Column, ColumnType, FieldValue, Pk, TIMESTAMP_FORMAT};

use super::record::{ensure_assigned, ensure_unassigned, Filter, Record, Repository};

impl ToSql for FieldValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            FieldValue::Null => ToSqlOutput::Owned(Value::Null),
            FieldValue::Integer(value) => ToSqlOutput::Owned(Value::Integer(*value)),
            FieldValue::Text(value) => ToSqlOutput::Borrowed(ValueRef::Text(value.as_bytes())),
            FieldValue::Timestamp(value) => {
                ToSqlOutput::Owned(Value::Text(value.format(TIMESTAMP_FORMAT).to_string()))
            }
        })
    }
}

/// Raw row as read from SQLite: pk plus column values in declaration order
type RawRow = (Pk, Vec<Value>);

/// Repository backed by a table in a SQLite database file
pub struct SqliteRepository<R: Record> {
    config: StoreConfig,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record> SqliteRepository<R> {
    /// Open the store described by `config`, creating the table if needed
    pub fn new(config: StoreConfig) -> BookkeeperResult<Self> {
        let repo = Self {
            config,
            _record: PhantomData,
        };
        repo.create_table()?;
        Ok(repo)
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub(crate) fn connect(&self) -> BookkeeperResult<Connection> {
        let conn = Connection::open(&self.config.db_path).map_err(|e| {
            BookkeeperError::Storage(format!(
                "Failed to open database {}: {}",
                self.config.db_path.display(),
                e
            ))
        })?;
        conn.busy_timeout(self.config.busy_timeout)?;
        Ok(conn)
    }

    fn create_table(&self) -> BookkeeperResult<()> {
        let mut definitions = vec!["pk INTEGER PRIMARY KEY AUTOINCREMENT".to_string()];
        definitions.extend(R::columns().iter().map(|column| {
            let null = if column.nullable { "" } else { " NOT NULL" };
            format!("{} {}{}", column.name, column.kind.sql_type(), null)
        }));

        let sql = format!(
            "CREATE TABLE IF NOT EXISTS {} ({})",
            R::TABLE,
            definitions.join(", ")
        );
        self.connect()?.execute(&sql, [])?;
        tracing::debug!(table = R::TABLE, "table ready");
        Ok(())
    }

    fn select_sql() -> String {
        let mut names = vec!["pk"];
        names.extend(R::columns().iter().map(|column| column.name));
        format!("SELECT {} FROM {}", names.join(", "), R::TABLE)
    }

    fn read_row(row: &Row<'_>) -> rusqlite::Result<RawRow> {
        let pk: Pk = row.get(0)?;
        let values = (0..R::columns().len())
            .map(|i| row.get::<_, Value>(i + 1))
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok((pk, values))
    }

    fn decode((pk, raw): RawRow) -> BookkeeperResult<R> {
        let values = R::columns()
            .iter()
            .zip(raw)
            .map(|(column, value)| decode_value(column, value))
            .collect::<BookkeeperResult<Vec<_>>>()?;
        R::from_values(pk, &values)
    }
}

fn decode_value(column: &Column, value: Value) -> BookkeeperResult<FieldValue> {
    match (column.kind, value) {
        (_, Value::Null) => Ok(FieldValue::Null),
        (ColumnType::Integer | ColumnType::Money, Value::Integer(v)) => Ok(FieldValue::Integer(v)),
        (ColumnType::Money, Value::Real(v)) => Ok(FieldValue::Integer(v.round() as i64)),
        (ColumnType::Text, Value::Text(s)) => Ok(FieldValue::Text(s)),
        (ColumnType::Timestamp, Value::Text(s)) => {
            NaiveDateTime::parse_from_str(&s, "%Y-%m-%d %H:%M:%S%.f")
                .map(FieldValue::Timestamp)
                .map_err(|e| {
                    BookkeeperError::Storage(format!(
                        "column '{}': bad timestamp '{}': {}",
                        column.name, s, e
                    ))
                })
        }
        (kind, other) => Err(BookkeeperError::Storage(format!(
            "column '{}': cannot read {:?} as {:?}",
            column.name,
            other.data_type(),
            kind
        ))),
    }
}

impl<R: Record> Repository<R> for SqliteRepository<R> {
    fn add(&self, record: &mut R) -> BookkeeperResult<Pk> {
        ensure_unassigned(record)?;

        let columns = R::columns();
        let sql = if columns.is_empty() {
            format!("INSERT INTO {} DEFAULT VALUES", R::TABLE)
        } else {
            let names: Vec<_> = columns.iter().map(|column| column.name).collect();
            let placeholders = vec!["?"; columns.len()].join(", ");
            format!(
                "INSERT INTO {} ({}) VALUES ({})",
                R::TABLE,
                names.join(", "),
                placeholders
            )
        };

        let conn = self.connect()?;
        conn.execute(&sql, params_from_iter(record.values()))?;
        let pk = conn.last_insert_rowid();
        record.set_pk(pk);

        tracing::debug!(table = R::TABLE, pk, "record added");
        Ok(pk)
    }

    fn get(&self, pk: Pk) -> BookkeeperResult<Option<R>> {
        let sql = format!("{} WHERE pk = ?1", Self::select_sql());
        let raw = self
            .connect()?
            .query_row(&sql, [pk], Self::read_row)
            .optional()?;
        raw.map(Self::decode).transpose()
    }

    fn list(&self, filter: Option<&Filter>) -> BookkeeperResult<Vec<R>> {
        let mut sql = Self::select_sql();
        let mut params: Vec<FieldValue> = Vec::new();

        if let Some(filter) = filter.filter(|f| !f.is_empty()) {
            filter.validate::<R>()?;
            // IS rather than = so that a Null condition matches NULL columns
            let clauses: Vec<_> = filter
                .conditions()
                .iter()
                .map(|(field, _)| format!("{} IS ?", field))
                .collect();
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
            params.extend(filter.conditions().iter().map(|(_, value)| value.clone()));
        }
        sql.push_str(" ORDER BY pk");

        let conn = self.connect()?;
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(params.iter()), Self::read_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter().map(Self::decode).collect()
    }

    fn update(&self, record: &R) -> BookkeeperResult<()> {
        ensure_assigned(record)?;

        let columns = R::columns();
        if columns.is_empty() {
            return match self.get(record.pk())? {
                Some(_) => Ok(()),
                None => Err(BookkeeperError::record_not_found(R::TABLE, record.pk())),
            };
        }

        let assignments: Vec<_> = columns
            .iter()
            .map(|column| format!("{} = ?", column.name))
            .collect();
        let sql = format!(
            "UPDATE {} SET {} WHERE pk = ?",
            R::TABLE,
            assignments.join(", ")
        );

        let mut params = record.values();
        params.push(FieldValue::Integer(record.pk()));

        let changed = self.connect()?.execute(&sql, params_from_iter(params))?;
        if changed == 0 {
            return Err(BookkeeperError::record_not_found(R::TABLE, record.pk()));
        }

        tracing::debug!(table = R::TABLE, pk = record.pk(), "record updated");
        Ok(())
    }

    fn delete(&self, pk: Pk) -> BookkeeperResult<()> {
        let sql = format!("DELETE FROM {} WHERE pk = ?1", R::TABLE);
        let changed = self.connect()?.execute(&sql, [pk])?;
        if changed == 0 {
            return Err(BookkeeperError::record_not_found(R::TABLE, pk));
        }

        tracing::debug!(table = R::TABLE, pk, "record deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Budget, Category, Expense, Money, PeriodType};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn config(temp_dir: &TempDir) -> StoreConfig {
        StoreConfig::new(temp_dir.path().join("test.db"))
    }

    fn create_test_repo<R: Record>() -> (TempDir, SqliteRepository<R>) {
        let temp_dir = TempDir::new().unwrap();
        let repo = SqliteRepository::new(config(&temp_dir)).unwrap();
        (temp_dir, repo)
    }

    #[test]
    fn test_crud() {
        let (_temp_dir, repo) = create_test_repo::<Category>();

        let mut category = Category::new("alex");
        let pk = repo.add(&mut category).unwrap();
        assert_eq!(category.pk, pk);
        assert_eq!(repo.get(pk).unwrap(), Some(category.clone()));

        let mut replacement = Category::new("nick");
        replacement.pk = pk;
        repo.update(&replacement).unwrap();
        assert_eq!(repo.get(pk).unwrap(), Some(replacement));

        repo.delete(pk).unwrap();
        assert_eq!(repo.get(pk).unwrap(), None);
    }

    #[test]
    fn test_cannot_add_with_pk() {
        let (_temp_dir, repo) = create_test_repo::<Category>();
        let mut category = Category::new("alex");
        category.pk = 1;
        assert!(repo.add(&mut category).unwrap_err().is_invalid_state());
        assert!(repo.list(None).unwrap().is_empty());
    }

    #[test]
    fn test_cannot_delete_nonexistent() {
        let (_temp_dir, repo) = create_test_repo::<Category>();
        assert!(repo.delete(1).unwrap_err().is_not_found());
    }

    #[test]
    fn test_cannot_update_without_pk() {
        let (_temp_dir, repo) = create_test_repo::<Category>();
        assert!(repo
            .update(&Category::new("alex"))
            .unwrap_err()
            .is_invalid_state());
    }

    #[test]
    fn test_update_unknown_pk_is_not_found() {
        let (_temp_dir, repo) = create_test_repo::<Category>();
        let mut category = Category::new("ghost");
        category.pk = 12;
        assert!(repo.update(&category).unwrap_err().is_not_found());
    }

    #[test]
    fn test_pks_not_reused() {
        let (_temp_dir, repo) = create_test_repo::<Category>();
        repo.add(&mut Category::new("a")).unwrap();
        let last = repo.add(&mut Category::new("b")).unwrap();
        repo.delete(last).unwrap();

        let next = repo.add(&mut Category::new("c")).unwrap();
        assert!(next > last);
    }

    #[test]
    fn test_list_all_and_filtered() {
        let (_temp_dir, repo) = create_test_repo::<Category>();
        let root = repo.add(&mut Category::new("0")).unwrap();
        let mut children = Vec::new();
        for name in ["1", "2", "3"] {
            let mut child = Category::with_parent(name, root);
            repo.add(&mut child).unwrap();
            children.push(child);
        }

        assert_eq!(repo.list(None).unwrap().len(), 4);
        assert_eq!(
            repo.list(Some(&Filter::new().eq("parent", root))).unwrap(),
            children
        );
        assert_eq!(
            repo.list(Some(&Filter::new().eq("name", "2").eq("parent", root)))
                .unwrap(),
            vec![children[1].clone()]
        );

        let roots = repo
            .list(Some(&Filter::new().eq("parent", None::<i64>)))
            .unwrap();
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].pk, root);
    }

    #[test]
    fn test_filter_unknown_field() {
        let (_temp_dir, repo) = create_test_repo::<Category>();
        let err = repo
            .list(Some(&Filter::new().eq("name; DROP TABLE category", "x")))
            .unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_filter_value_of_wrong_type() {
        let (_temp_dir, repo) = create_test_repo::<Category>();
        let root = repo.add(&mut Category::new("root")).unwrap();
        repo.add(&mut Category::with_parent("child", root)).unwrap();

        let err = repo
            .list(Some(&Filter::new().eq("parent", root.to_string())))
            .unwrap_err();
        assert!(err.is_invalid_argument());
        assert!(repo
            .list(Some(&Filter::new().eq("name", None::<i64>)))
            .unwrap_err()
            .is_invalid_argument());
    }

    #[test]
    fn test_nanosecond_timestamp_survives_storage() {
        let (_temp_dir, repo) = create_test_repo::<Expense>();
        let when = NaiveDate::from_ymd_opt(2024, 4, 5)
            .unwrap()
            .and_hms_nano_opt(1, 2, 3, 123_456_789)
            .unwrap();
        let mut expense = Expense::on(Money::from_minor(100), 1, when);
        expense.added_date = when;

        let pk = repo.add(&mut expense).unwrap();
        assert_eq!(repo.get(pk).unwrap().unwrap(), expense);
        assert_eq!(
            repo.list(Some(&Filter::new().eq("expense_date", when)))
                .unwrap()
                .len(),
            1
        );
    }

    #[test]
    fn test_expense_fields_survive_storage() {
        let (_temp_dir, repo) = create_test_repo::<Expense>();
        let when = NaiveDate::from_ymd_opt(2024, 4, 5)
            .unwrap()
            .and_hms_micro_opt(1, 48, 50, 826_683)
            .unwrap();
        let mut expense =
            Expense::on(Money::from_minor(45_450), 1, when).with_comment("Groceries");

        let pk = repo.add(&mut expense).unwrap();
        let stored = repo.get(pk).unwrap().unwrap();
        assert_eq!(stored, expense);

        let by_date = repo
            .list(Some(&Filter::new().eq("expense_date", when)))
            .unwrap();
        assert_eq!(by_date.len(), 1);
    }

    #[test]
    fn test_budget_fields_survive_storage() {
        let (_temp_dir, repo) = create_test_repo::<Budget>();
        let mut budget = Budget::new(Money::from_units(7000), PeriodType::Week);
        repo.add(&mut budget).unwrap();

        let found = repo
            .list(Some(&Filter::new().eq("period_type", "week")))
            .unwrap();
        assert_eq!(found, vec![budget]);
    }

    #[test]
    fn test_data_persists_across_instances() {
        let temp_dir = TempDir::new().unwrap();
        let first = SqliteRepository::<Category>::new(config(&temp_dir)).unwrap();
        let pk = first.add(&mut Category::new("books")).unwrap();

        let second = SqliteRepository::<Category>::new(config(&temp_dir)).unwrap();
        assert_eq!(second.get(pk).unwrap().unwrap().name, "books");
    }
}
