//! Storage-loading collaborator boundary.
//!
//! The pipeline hands its table set to a [`TableLoader`]; anything that can
//! create the destination schema and atomically insert field-keyed records
//! can stand in for the real database, which keeps the core testable.

use std::time::Instant;

use anyhow::Result;
use serde_json::Value;
use tracing::info;

use crate::db::Database;
use crate::metrics::EtlMetrics;
use crate::models::NormalizedTables;

/// A destination that accepts named tables of field-keyed records.
pub trait TableLoader {
    /// Create the destination schema if it does not exist.
    fn prepare_schema(&mut self) -> Result<()>;

    /// Insert records into one table as a single atomic unit, returning the
    /// number of rows inserted. Surrogate-key fields are excluded because
    /// the destination assigns them.
    fn save_table(&mut self, table_name: &str, rows: &[Value]) -> Result<usize>;
}

impl TableLoader for Database {
    fn prepare_schema(&mut self) -> Result<()> {
        self.create_tables()
    }

    fn save_table(&mut self, table_name: &str, rows: &[Value]) -> Result<usize> {
        Database::save_table(self, table_name, rows)
    }
}

/// Persist all four tables in foreign-key-safe order.
///
/// Inserts are atomic per table; a failure propagates immediately and later
/// tables are not attempted.
pub fn load_tables(loader: &mut dyn TableLoader, tables: &NormalizedTables) -> Result<()> {
    let metrics = EtlMetrics::default();
    loader.prepare_schema()?;

    for (table_name, rows) in tables.as_records()? {
        let start = Instant::now();
        let inserted = loader.save_table(table_name, &rows)?;
        metrics.record_table_loaded(table_name, inserted, start.elapsed());
        info!(table = table_name, rows = inserted, "table loaded");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Default)]
    struct RecordingLoader {
        prepared: bool,
        saved: Vec<String>,
        rows_by_table: HashMap<String, usize>,
    }

    impl TableLoader for RecordingLoader {
        fn prepare_schema(&mut self) -> Result<()> {
            self.prepared = true;
            Ok(())
        }

        fn save_table(&mut self, table_name: &str, rows: &[Value]) -> Result<usize> {
            self.saved.push(table_name.to_string());
            self.rows_by_table.insert(table_name.to_string(), rows.len());
            Ok(rows.len())
        }
    }

    #[test]
    fn test_tables_load_in_fk_safe_order() {
        let text = "\
header
21/04/2024 09:00,Edinburgh,Alice,Regular Coffee - 2.5,2.5,CARD,1111
21/04/2024 09:02,Edinburgh,Bob,\"Large Latte - Vanilla - 3.5, Regular Coffee - 2.5\",6.0,CASH,2222
";
        let tables = crate::etl::run(text).expect("pipeline failed");

        let mut loader = RecordingLoader::default();
        load_tables(&mut loader, &tables).expect("load failed");

        assert!(loader.prepared);
        assert_eq!(
            loader.saved,
            vec!["branches", "transactions", "products", "product_transactions"]
        );
        assert_eq!(loader.rows_by_table["branches"], 1);
        assert_eq!(loader.rows_by_table["transactions"], 2);
        assert_eq!(loader.rows_by_table["products"], 2);
        assert_eq!(loader.rows_by_table["product_transactions"], 3);
    }
}
