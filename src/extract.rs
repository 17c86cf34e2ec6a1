//! Extraction of raw delimited text into field-keyed rows.
//!
//! The source is a fixed 7-column CSV export. The first record is always a
//! header and is discarded regardless of its content.

use tracing::info;

use crate::error::{EtlError, Result};
use crate::models::{RawRow, COLUMN_NAMES};

/// Parse raw delimited text into a sequence of [`RawRow`]s.
///
/// Quoted fields may contain embedded delimiters; every field is trimmed.
/// Input with only a header (or nothing at all) yields an empty sequence.
///
/// # Errors
///
/// Returns [`EtlError::MalformedInput`] if the text cannot be tokenized or a
/// record does not have exactly seven fields.
pub fn extract(body_text: &str) -> Result<Vec<RawRow>> {
    info!("extract: starting");

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(body_text.as_bytes());

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        // First record is the header, whatever it says.
        if index == 0 {
            continue;
        }
        rows.push(row_from_record(index + 1, &record)?);
    }

    info!(rows = rows.len(), "extract: done");
    Ok(rows)
}

fn row_from_record(line: usize, record: &csv::StringRecord) -> Result<RawRow> {
    if record.len() != COLUMN_NAMES.len() {
        return Err(EtlError::MalformedInput(format!(
            "record {} has {} fields, expected {}",
            line,
            record.len(),
            COLUMN_NAMES.len()
        )));
    }

    Ok(RawRow {
        timestamp: record[0].to_string(),
        location: record[1].to_string(),
        customer_name: record[2].to_string(),
        items: record[3].to_string(),
        total_cost: record[4].to_string(),
        payment_method: record[5].to_string(),
        credit_card: record[6].to_string(),
    })
}
