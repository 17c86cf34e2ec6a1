use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use rusqlite::types::{Null, Value as SqlValue};
use rusqlite::{Connection, ToSql};
use serde_json::Value;
use tracing::{debug, info};

use crate::schema;
use crate::validation::InputValidator;

/// Destination database for normalized tables.
///
/// Wraps a single rusqlite connection; the pipeline is synchronous and a
/// run owns its connection, so there is no pool.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) the database at the given path.
    pub fn open(database_path: &Path) -> Result<Self> {
        if let Some(parent) = database_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(database_path)
            .with_context(|| format!("Failed to open database at {}", database_path.display()))?;
        Ok(Self { conn })
    }

    /// Open an in-memory database, mainly for tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        Ok(Self { conn })
    }

    /// Create the four destination tables if they do not exist.
    pub fn create_tables(&self) -> Result<()> {
        info!("create_tables: creating destination schema");
        self.conn
            .execute_batch(include_str!(
                "../migrations/2024-04-21-000000_create_tables/up.sql"
            ))
            .context("Failed to create destination tables")?;
        Ok(())
    }

    /// Insert field-keyed records into a table as a single atomic unit.
    ///
    /// The table's surrogate-key column is excluded; the destination assigns
    /// it. Commit happens only after every row inserted; any failure rolls
    /// the whole table back and the error propagates to the caller.
    pub fn save_table(&mut self, table_name: &str, rows: &[Value]) -> Result<usize> {
        InputValidator::validate_table_name(table_name)?;

        if rows.is_empty() {
            info!(table = table_name, "save_table: no rows to insert");
            return Ok(0);
        }

        let excluded = schema::surrogate_column(table_name);
        let columns = Self::column_names(&rows[0], excluded)?;
        let placeholders = vec!["?"; columns.len()].join(", ");
        let insert_sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            table_name,
            columns.join(", "),
            placeholders
        );

        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(&insert_sql)?;
            for row in rows {
                let object = row
                    .as_object()
                    .ok_or_else(|| anyhow!("Record for table {table_name} is not an object"))?;
                let mut params: Vec<Box<dyn ToSql>> = Vec::with_capacity(columns.len());
                for column in &columns {
                    params.push(bind_value(object.get(column.as_str())));
                }
                stmt.execute(rusqlite::params_from_iter(params.iter()))?;
            }
        }
        tx.commit()?;

        debug!(table = table_name, rows = rows.len(), "save_table: committed");
        Ok(rows.len())
    }

    /// Count the rows currently in a table.
    pub fn count_rows(&self, table_name: &str) -> Result<i64> {
        InputValidator::validate_table_name(table_name)?;
        let count = self
            .conn
            .query_row(&format!("SELECT COUNT(*) FROM {table_name}"), [], |row| {
                row.get(0)
            })?;
        Ok(count)
    }

    /// Direct access to the underlying connection, for queries in tests.
    #[must_use]
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Columns of a record, surrogate key excluded. serde_json maps iterate
    /// in sorted key order, so the insert statement is deterministic.
    fn column_names(first_row: &Value, excluded: Option<&str>) -> Result<Vec<String>> {
        let object = first_row
            .as_object()
            .ok_or_else(|| anyhow!("Record is not an object"))?;
        let columns: Vec<String> = object
            .keys()
            .filter(|key| Some(key.as_str()) != excluded)
            .cloned()
            .collect();
        if columns.is_empty() {
            return Err(anyhow!("Record has no insertable columns"));
        }
        for column in &columns {
            InputValidator::validate_column_name(column)?;
        }
        Ok(columns)
    }
}

/// Convert one JSON value to a SQLite parameter.
fn bind_value(value: Option<&Value>) -> Box<dyn ToSql> {
    match value {
        None | Some(Value::Null) => Box::new(Null),
        Some(Value::Bool(b)) => Box::new(*b),
        Some(Value::Number(n)) => {
            if let Some(i) = n.as_i64() {
                Box::new(i)
            } else {
                Box::new(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        Some(Value::String(s)) => Box::new(s.clone()),
        // Arrays and nested objects never occur in table records; store the
        // JSON text rather than fail mid-transaction.
        Some(other) => Box::new(SqlValue::Text(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_tables_is_idempotent() {
        let db = Database::open_in_memory().expect("open failed");
        db.create_tables().expect("first create failed");
        db.create_tables().expect("second create failed");
    }

    #[test]
    fn test_surrogate_key_is_assigned_by_destination() {
        let mut db = Database::open_in_memory().expect("open failed");
        db.create_tables().expect("create failed");

        let rows = vec![
            json!({"branch_id": 1, "name": "Edinburgh", "location": "Edinburgh"}),
            json!({"branch_id": 2, "name": "Glasgow", "location": "Glasgow"}),
        ];
        let inserted = db.save_table("branches", &rows).expect("insert failed");
        assert_eq!(inserted, 2);

        let ids: Vec<i64> = db
            .connection()
            .prepare("SELECT branch_id FROM branches ORDER BY branch_id")
            .expect("prepare failed")
            .query_map([], |row| row.get(0))
            .expect("query failed")
            .collect::<rusqlite::Result<_>>()
            .expect("collect failed");
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_failed_insert_rolls_back_whole_table() {
        let mut db = Database::open_in_memory().expect("open failed");
        db.create_tables().expect("create failed");

        let rows = vec![
            json!({"branch_id": 1, "name": "Edinburgh", "location": "Edinburgh"}),
            // NOT NULL constraint violation on name.
            json!({"branch_id": 2, "name": null, "location": "Glasgow"}),
        ];
        assert!(db.save_table("branches", &rows).is_err());
        assert_eq!(db.count_rows("branches").expect("count failed"), 0);
    }

    #[test]
    fn test_save_table_rejects_unknown_table_name() {
        let mut db = Database::open_in_memory().expect("open failed");
        let rows = vec![json!({"name": "x"})];
        assert!(db.save_table("branches; DROP TABLE branches", &rows).is_err());
    }
}
