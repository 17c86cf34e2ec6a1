//! Normalization of transformed rows into four relational tables.
//!
//! A single forward pass assigns dense, 1-based surrogate keys in strict
//! first-occurrence order. Dedup keys are exact-match: no case folding, no
//! fuzzy matching, and product prices compare bit-for-bit.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::models::{
    Branch, NormalizedTables, ParsedItem, Product, ProductTransaction, Transaction, TransformedRow,
};

/// Branch name used when a row carries no location.
pub const UNKNOWN_BRANCH: &str = "Unknown";

/// Natural key of a product. `f64` is not `Eq`, so the price participates
/// through its raw bit pattern; equal literals dedup, anything else is a
/// distinct product.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ProductKey {
    name: String,
    variant: Option<String>,
    size: String,
    price_bits: u64,
}

impl ProductKey {
    fn from_item(item: &ParsedItem) -> Self {
        Self {
            name: item.item_name.clone(),
            variant: item.variant.clone(),
            size: item.size.clone(),
            price_bits: item.price.to_bits(),
        }
    }
}

/// Convert the transformed rows into deduplicated, cross-referenced tables.
///
/// Row order drives every surrogate key, so equal inputs always produce
/// identical table contents. Duplicate item segments within one row are
/// deliberately kept as separate product_transactions rows with quantity 1
/// rather than merged into a count.
#[must_use]
pub fn normalize(rows: &[TransformedRow]) -> NormalizedTables {
    normalize_with(rows, UNKNOWN_BRANCH)
}

/// Like [`normalize`], with a configurable fallback branch name for rows
/// whose location field is empty.
#[must_use]
pub fn normalize_with(rows: &[TransformedRow], default_location: &str) -> NormalizedTables {
    info!("normalize: starting");

    let mut tables = NormalizedTables::default();
    let mut branch_map: HashMap<String, i64> = HashMap::new();
    let mut product_map: HashMap<ProductKey, i64> = HashMap::new();

    for (index, row) in rows.iter().enumerate() {
        let payment_id = (index + 1) as i64;

        let branch_name = if row.location.is_empty() {
            default_location
        } else {
            row.location.as_str()
        };
        let branch_id = *branch_map
            .entry(branch_name.to_string())
            .or_insert_with(|| {
                let branch_id = (tables.branches.len() + 1) as i64;
                tables.branches.push(Branch {
                    branch_id,
                    name: branch_name.to_string(),
                    location: branch_name.to_string(),
                });
                branch_id
            });

        tables.transactions.push(Transaction {
            payment_id,
            branch_id,
            timestamp: row.timestamp.clone(),
            total_amount: row.total_cost,
            payment_method: row.payment_method.clone(),
        });

        for item in &row.items {
            let product_id = *product_map
                .entry(ProductKey::from_item(item))
                .or_insert_with(|| {
                    let product_id = (tables.products.len() + 1) as i64;
                    tables.products.push(Product {
                        product_id,
                        name: item.item_name.clone(),
                        variant: item.variant.clone(),
                        size: item.size.clone(),
                        price: item.price,
                    });
                    product_id
                });

            tables.product_transactions.push(ProductTransaction {
                product_transactions_id: (tables.product_transactions.len() + 1) as i64,
                payment_id,
                product_id,
                quantity: 1,
            });
        }
    }

    debug!(branches = tables.branches.len(), "normalize: branch table built");
    info!(
        transactions = tables.transactions.len(),
        products = tables.products.len(),
        product_transactions = tables.product_transactions.len(),
        "normalize: done"
    );
    tables
}
