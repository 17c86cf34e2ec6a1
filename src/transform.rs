//! Per-row field coercions and the privacy boundary.
//!
//! Transformation replaces the free-text items field with parsed line items,
//! coerces total_cost to a number, rewrites the timestamp into ISO form and
//! drops the sensitive fields. Rows are independent and order is preserved.

use chrono::NaiveDateTime;
use tracing::info;

use crate::error::{EtlError, Result};
use crate::items::ItemParser;
use crate::models::{RawRow, TransformedRow};

/// Source timestamp format of the POS export
const SOURCE_TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M";
/// Destination timestamp format
const TARGET_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Apply per-row transformations to a batch of extracted rows.
///
/// # Errors
///
/// A timestamp that does not match `DD/MM/YYYY HH:MM` exactly, or a
/// non-empty total_cost that is not a numeral, aborts the whole batch.
/// No partial output is produced.
pub fn transform(rows: Vec<RawRow>, parser: &ItemParser) -> Result<Vec<TransformedRow>> {
    info!("transform: starting");

    let mut transformed = Vec::with_capacity(rows.len());
    for (index, row) in rows.into_iter().enumerate() {
        transformed.push(transform_row(index + 1, row, parser)?);
    }

    info!(rows = transformed.len(), "transform: done");
    Ok(transformed)
}

fn transform_row(row_number: usize, row: RawRow, parser: &ItemParser) -> Result<TransformedRow> {
    let items = parser.parse_items(&row.items);
    let total_cost = coerce_total_cost(row_number, &row.total_cost)?;
    let timestamp = reformat_timestamp(row_number, &row.timestamp)?;

    // RawRow is consumed here; customer_name and credit_card have no
    // counterpart field on TransformedRow.
    Ok(TransformedRow {
        timestamp,
        location: row.location,
        items,
        total_cost,
        payment_method: row.payment_method,
    })
}

/// Coerce a total_cost literal; an absent value defaults to 0.0.
fn coerce_total_cost(row_number: usize, value: &str) -> Result<f64> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(0.0);
    }
    value
        .parse::<f64>()
        .map_err(|_| EtlError::NumericCoercion {
            row: row_number,
            field: "total_cost".to_string(),
            value: value.to_string(),
        })
}

/// Reformat `DD/MM/YYYY HH:MM` into `YYYY-MM-DD HH:MM:SS`.
fn reformat_timestamp(row_number: usize, value: &str) -> Result<String> {
    let parsed = NaiveDateTime::parse_from_str(value, SOURCE_TIMESTAMP_FORMAT).map_err(|_| {
        EtlError::TimestampFormat {
            row: row_number,
            value: value.to_string(),
        }
    })?;
    Ok(parsed.format(TARGET_TIMESTAMP_FORMAT).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_row(timestamp: &str, total_cost: &str, items: &str) -> RawRow {
        RawRow {
            timestamp: timestamp.to_string(),
            location: "Edinburgh".to_string(),
            customer_name: "Alice Smith".to_string(),
            items: items.to_string(),
            total_cost: total_cost.to_string(),
            payment_method: "CARD".to_string(),
            credit_card: "1111222233334444".to_string(),
        }
    }

    fn parser() -> ItemParser {
        ItemParser::new().expect("Failed to create item parser")
    }

    #[test]
    fn test_timestamp_round_trip() {
        let rows = transform(
            vec![raw_row("21/04/2024 09:00", "2.5", "Regular Coffee - 2.5")],
            &parser(),
        )
        .expect("transform failed");
        assert_eq!(rows[0].timestamp, "2024-04-21 09:00:00");
    }

    #[test]
    fn test_invalid_timestamp_aborts_batch() {
        let rows = vec![
            raw_row("21/04/2024 09:00", "2.5", "Regular Coffee - 2.5"),
            raw_row("2024-04-21 09:00", "2.5", "Regular Coffee - 2.5"),
        ];
        let err = transform(rows, &parser()).expect_err("expected failure");
        assert!(matches!(err, EtlError::TimestampFormat { row: 2, .. }));
    }

    #[test]
    fn test_total_cost_coercion_and_default() {
        let rows = transform(
            vec![
                raw_row("21/04/2024 09:00", "6.0", "Regular Coffee - 2.5"),
                raw_row("21/04/2024 09:05", "", "Regular Coffee - 2.5"),
            ],
            &parser(),
        )
        .expect("transform failed");
        assert_eq!(rows[0].total_cost, 6.0);
        assert_eq!(rows[1].total_cost, 0.0);
    }

    #[test]
    fn test_invalid_total_cost_aborts_batch() {
        let rows = vec![raw_row("21/04/2024 09:00", "six quid", "Regular Coffee - 2.5")];
        let err = transform(rows, &parser()).expect_err("expected failure");
        assert!(matches!(
            err,
            EtlError::NumericCoercion { row: 1, .. }
        ));
    }

    #[test]
    fn test_items_field_becomes_structured() {
        let rows = transform(
            vec![raw_row(
                "21/04/2024 09:00",
                "6.0",
                "Large Latte - Vanilla - 3.5, Regular Coffee - 2.5",
            )],
            &parser(),
        )
        .expect("transform failed");
        assert_eq!(rows[0].items.len(), 2);
        assert_eq!(rows[0].items[0].variant.as_deref(), Some("Vanilla"));
    }

    #[test]
    fn test_sensitive_fields_do_not_survive() {
        let rows = transform(
            vec![raw_row("21/04/2024 09:00", "2.5", "Regular Coffee - 2.5")],
            &parser(),
        )
        .expect("transform failed");
        let json = serde_json::to_string(&rows[0]).expect("serialize failed");
        assert!(!json.contains("customer_name"));
        assert!(!json.contains("credit_card"));
        assert!(!json.contains("Alice"));
        assert!(!json.contains("1111222233334444"));
    }
}
