//! Data models for the ETL pipeline
//!
//! This module contains all data structures used throughout the application:
//! the per-stage row types and the normalized relational entities.

use serde::{Deserialize, Serialize};

/// Field names of the fixed 7-column source schema, in positional order.
pub const COLUMN_NAMES: [&str; 7] = [
    "timestamp",
    "location",
    "customer_name",
    "items",
    "total_cost",
    "payment_method",
    "credit_card",
];

/// One record extracted from the delimited source text.
///
/// `customer_name` and `credit_card` are sensitive and never survive past
/// the transform stage.
#[derive(Debug, Clone)]
pub struct RawRow {
    /// Transaction timestamp in source format `DD/MM/YYYY HH:MM`
    pub timestamp: String,
    /// Branch location name
    pub location: String,
    /// Customer name (sensitive)
    pub customer_name: String,
    /// Free-text item list in the source mini-language
    pub items: String,
    /// Total cost as a numeric literal
    pub total_cost: String,
    /// Payment method (e.g. CASH, CARD)
    pub payment_method: String,
    /// Credit card number (sensitive)
    pub credit_card: String,
}

/// One line item decoded from the items field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedItem {
    /// Product name
    pub item_name: String,
    /// Flavour variant; `None` means the item has no variant
    pub variant: Option<String>,
    /// Size token (e.g. Regular, Large)
    pub size: String,
    /// Unit price
    pub price: f64,
}

/// A row that has passed the transform stage.
///
/// The sensitive fields of [`RawRow`] do not exist on this type, so no
/// transformed row can carry a direct personal identifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformedRow {
    /// Timestamp reformatted to `YYYY-MM-DD HH:MM:SS`
    pub timestamp: String,
    /// Branch location name
    pub location: String,
    /// Structured line items parsed from the items field
    pub items: Vec<ParsedItem>,
    /// Total cost coerced to a number
    pub total_cost: f64,
    /// Payment method
    pub payment_method: String,
}

/// A coffee-shop branch, unique by location name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    /// Surrogate key, 1-based, assigned in first-seen order
    pub branch_id: i64,
    /// Branch name
    pub name: String,
    /// Branch location
    pub location: String,
}

/// One transaction per transformed row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Surrogate key, equal to the 1-based row index in the transformed sequence
    pub payment_id: i64,
    /// Foreign key into the branches table
    pub branch_id: i64,
    /// Transaction timestamp, `YYYY-MM-DD HH:MM:SS`
    pub timestamp: String,
    /// Total amount paid
    pub total_amount: f64,
    /// Payment method
    pub payment_method: String,
}

/// A product, unique by the exact tuple (name, variant, size, price).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Surrogate key, 1-based, assigned in first-seen order
    pub product_id: i64,
    /// Product name
    pub name: String,
    /// Flavour variant, if any
    pub variant: Option<String>,
    /// Size token
    pub size: String,
    /// Unit price
    pub price: f64,
}

/// Link table row joining a transaction to a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductTransaction {
    /// Surrogate key, 1-based, strictly increasing across the whole run
    pub product_transactions_id: i64,
    /// Foreign key into the transactions table
    pub payment_id: i64,
    /// Foreign key into the products table
    pub product_id: i64,
    /// Always 1; the source format carries no quantity field
    pub quantity: i64,
}

/// The four normalized table collections produced by one pipeline run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NormalizedTables {
    pub branches: Vec<Branch>,
    pub transactions: Vec<Transaction>,
    pub products: Vec<Product>,
    pub product_transactions: Vec<ProductTransaction>,
}

impl NormalizedTables {
    /// Render the tables as `(table_name, field-keyed records)` pairs in
    /// foreign-key-safe insertion order.
    pub fn as_records(&self) -> crate::error::Result<Vec<(&'static str, Vec<serde_json::Value>)>> {
        fn to_values<T: Serialize>(rows: &[T]) -> crate::error::Result<Vec<serde_json::Value>> {
            rows.iter()
                .map(|row| serde_json::to_value(row).map_err(Into::into))
                .collect()
        }

        Ok(vec![
            (crate::schema::branches::TABLE, to_values(&self.branches)?),
            (
                crate::schema::transactions::TABLE,
                to_values(&self.transactions)?,
            ),
            (crate::schema::products::TABLE, to_values(&self.products)?),
            (
                crate::schema::product_transactions::TABLE,
                to_values(&self.product_transactions)?,
            ),
        ])
    }
}

/// Output format for exported tables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Comma-separated values format
    Csv,
    /// JSON format
    Json,
}

impl OutputFormat {
    /// Get the file extension for this format
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}
