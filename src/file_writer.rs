//! File writing utilities for table export.
//!
//! This module writes normalized tables and prepared (transformed) rows to
//! JSON and CSV files, mirroring the layout the destination tables use.
//! Unlike the database loader, file output keeps surrogate-key fields so the
//! files are self-contained.

use std::fs::{create_dir_all, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use csv::Writer;
use serde_json::Value;

use crate::error::{EtlError, Result};
use crate::models::{NormalizedTables, OutputFormat, TransformedRow};

/// Write all four tables into `output_dir`, one file per table.
///
/// Returns the paths of the created files in table order.
pub fn write_tables(
    tables: &NormalizedTables,
    format: OutputFormat,
    output_dir: &Path,
) -> Result<Vec<PathBuf>> {
    create_dir_all(output_dir)?;

    let mut output_files = Vec::new();
    for (table_name, rows) in tables.as_records()? {
        let file_path = output_dir.join(format!("{}.{}", table_name, format.extension()));
        match format {
            OutputFormat::Json => write_json_table(&rows, &file_path)?,
            OutputFormat::Csv => write_csv_table(&rows, &file_path)?,
        }
        output_files.push(file_path);
    }

    Ok(output_files)
}

/// Write prepared rows to a JSON file, the hand-off format between the
/// prepare and normalize steps.
pub fn write_prepared(rows: &[TransformedRow], file_path: &Path) -> Result<()> {
    if let Some(parent) = file_path.parent() {
        if !parent.as_os_str().is_empty() {
            create_dir_all(parent)?;
        }
    }
    let file = File::create(file_path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, rows)?;
    Ok(())
}

/// Read prepared rows back from a JSON file.
pub fn read_prepared(file_path: &Path) -> Result<Vec<TransformedRow>> {
    let file = File::open(file_path)?;
    let rows = serde_json::from_reader(std::io::BufReader::new(file))?;
    Ok(rows)
}

/// Write one table to a JSON file as an array of records.
fn write_json_table(rows: &[Value], file_path: &Path) -> Result<()> {
    let file = File::create(file_path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, rows)?;
    Ok(())
}

/// Write one table to a CSV file with a header row.
///
/// Column order follows the records' sorted key order, matching the insert
/// statements the database loader builds.
fn write_csv_table(rows: &[Value], file_path: &Path) -> Result<()> {
    let file = File::create(file_path)?;
    let mut writer = Writer::from_writer(BufWriter::new(file));

    let Some(first) = rows.first() else {
        writer.flush()?;
        return Ok(());
    };
    let columns: Vec<String> = first
        .as_object()
        .ok_or_else(|| EtlError::Other("Table record is not an object".to_string()))?
        .keys()
        .cloned()
        .collect();

    writer.write_record(&columns)?;
    for row in rows {
        let object = row
            .as_object()
            .ok_or_else(|| EtlError::Other("Table record is not an object".to_string()))?;
        let record: Vec<String> = columns
            .iter()
            .map(|column| cell_text(object.get(column.as_str())))
            .collect();
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}

fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
