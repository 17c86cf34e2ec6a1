//! Metrics collection for pipeline runs.
//!
//! The library only records through the `metrics` facade; installing a
//! recorder (or not) is the embedding application's choice. Without one,
//! every call here is a no-op.

use std::time::Duration;

use metrics::{counter, gauge, histogram};

/// Metric names and recording helpers for the ETL pipeline.
#[derive(Debug, Clone, Copy)]
pub struct EtlMetrics {
    // Pipeline stage metrics
    pub rows_extracted_total: &'static str,
    pub rows_transformed_total: &'static str,
    pub stage_duration: &'static str,

    // Item parser metrics
    pub items_parsed_total: &'static str,
    pub items_skipped_total: &'static str,

    // Load metrics
    pub table_rows_loaded_total: &'static str,
    pub table_load_duration: &'static str,

    // Error metrics
    pub errors_total: &'static str,
}

impl Default for EtlMetrics {
    fn default() -> Self {
        Self {
            rows_extracted_total: "cafe_etl_rows_extracted_total",
            rows_transformed_total: "cafe_etl_rows_transformed_total",
            stage_duration: "cafe_etl_stage_duration_seconds",

            items_parsed_total: "cafe_etl_items_parsed_total",
            items_skipped_total: "cafe_etl_items_skipped_total",

            table_rows_loaded_total: "cafe_etl_table_rows_loaded_total",
            table_load_duration: "cafe_etl_table_load_duration_seconds",

            errors_total: "cafe_etl_errors_total",
        }
    }
}

impl EtlMetrics {
    /// Record the row count produced by the extract stage
    pub fn record_rows_extracted(&self, count: usize) {
        counter!(self.rows_extracted_total).increment(count as u64);
        gauge!("cafe_etl_last_batch_rows").set(count as f64);
    }

    /// Record the row count produced by the transform stage
    pub fn record_rows_transformed(&self, count: usize) {
        counter!(self.rows_transformed_total).increment(count as u64);
    }

    /// Record the duration of one pipeline stage
    pub fn record_stage_duration(&self, stage: &'static str, duration: Duration) {
        histogram!(self.stage_duration, "stage" => stage).record(duration.as_secs_f64());
    }

    /// Record successfully parsed item segments
    pub fn record_items_parsed(&self, count: usize) {
        counter!(self.items_parsed_total).increment(count as u64);
    }

    /// Record an item segment dropped by the parser
    pub fn record_item_skipped(&self) {
        counter!(self.items_skipped_total).increment(1);
    }

    /// Record rows persisted for one destination table
    pub fn record_table_loaded(&self, table: &'static str, rows: usize, duration: Duration) {
        counter!(self.table_rows_loaded_total, "table" => table).increment(rows as u64);
        histogram!(self.table_load_duration, "table" => table).record(duration.as_secs_f64());
    }

    /// Record a fatal pipeline error
    pub fn record_error(&self, kind: &'static str) {
        counter!(self.errors_total, "kind" => kind).increment(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_names_are_prefixed() {
        let metrics = EtlMetrics::default();
        assert!(metrics.rows_extracted_total.starts_with("cafe_etl_"));
        assert!(metrics.items_skipped_total.starts_with("cafe_etl_"));
    }

    #[test]
    fn test_recording_without_recorder_is_noop() {
        let metrics = EtlMetrics::default();
        metrics.record_rows_extracted(3);
        metrics.record_item_skipped();
        metrics.record_stage_duration("extract", Duration::from_millis(5));
    }
}
