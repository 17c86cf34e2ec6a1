//! The extract → transform → normalize pipeline.
//!
//! One call, one table set: a run either returns the complete, internally
//! consistent [`NormalizedTables`] or an error, never partial output. Runs
//! share no state, so concurrent invocations are independent.

use tracing::info;

use crate::error::Result;
use crate::items::ItemParser;
use crate::logging::StageTimer;
use crate::metrics::EtlMetrics;
use crate::models::NormalizedTables;
use crate::normalize::UNKNOWN_BRANCH;
use crate::{extract, normalize, transform};

/// Run the full pipeline over one blob of delimited source text.
pub fn run(body_text: &str) -> Result<NormalizedTables> {
    run_with(body_text, UNKNOWN_BRANCH)
}

/// Run the full pipeline with a configurable fallback branch name.
pub fn run_with(body_text: &str, default_location: &str) -> Result<NormalizedTables> {
    let metrics = EtlMetrics::default();

    let timer = StageTimer::new("extract");
    let raw_rows = extract::extract(body_text).inspect_err(|_| metrics.record_error("extract"))?;
    metrics.record_rows_extracted(raw_rows.len());
    metrics.record_stage_duration("extract", timer.finish());

    let timer = StageTimer::new("transform");
    let parser = ItemParser::new()?;
    let transformed = transform::transform(raw_rows, &parser)
        .inspect_err(|_| metrics.record_error("transform"))?;
    metrics.record_rows_transformed(transformed.len());
    metrics.record_stage_duration("transform", timer.finish());

    let timer = StageTimer::new("normalize");
    let tables = normalize::normalize_with(&transformed, default_location);
    metrics.record_stage_duration("normalize", timer.finish());

    info!(
        branches = tables.branches.len(),
        transactions = tables.transactions.len(),
        products = tables.products.len(),
        product_transactions = tables.product_transactions.len(),
        "pipeline run complete"
    );
    Ok(tables)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_produces_consistent_tables() {
        let text = "\
timestamp,location,customer_name,items,total_cost,payment_method,credit_card
21/04/2024 09:00,Edinburgh,Alice Smith,Regular Coffee - 2.5,2.5,CARD,1111222233334444
21/04/2024 09:02,Edinburgh,Bob Jones,\"Large Latte - Vanilla - 3.5, Regular Coffee - 2.5\",6.0,CASH,5555666677778888
";
        let tables = run(text).expect("pipeline failed");
        assert_eq!(tables.branches.len(), 1);
        assert_eq!(tables.transactions.len(), 2);
        assert_eq!(tables.products.len(), 2);
        assert_eq!(tables.product_transactions.len(), 3);
        assert_eq!(tables.transactions[0].timestamp, "2024-04-21 09:00:00");
    }

    #[test]
    fn test_run_fails_atomically_on_bad_timestamp() {
        let text = "\
header
21/04/2024 09:00,Edinburgh,Alice,Regular Coffee - 2.5,2.5,CARD,1111
bad-timestamp,Edinburgh,Bob,Regular Coffee - 2.5,2.5,CARD,2222
";
        assert!(run(text).is_err());
    }
}
