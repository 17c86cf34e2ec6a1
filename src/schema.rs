//! Database schema definitions
//!
//! This module provides constants for table and column names used with rusqlite.
//! Each table module also names its surrogate-key column, which the loader
//! excludes from inserts because the destination assigns it.

/// Branches table schema
pub mod branches {
    /// Table name
    pub const TABLE: &str = "branches";
    /// Primary key column
    pub const BRANCH_ID: &str = "branch_id";
    /// Branch name column
    pub const NAME: &str = "name";
    /// Branch location column
    pub const LOCATION: &str = "location";
    /// Surrogate key assigned by the destination
    pub const SURROGATE: &str = BRANCH_ID;
}

/// Transactions table schema
pub mod transactions {
    /// Table name
    pub const TABLE: &str = "transactions";
    /// Primary key column
    pub const PAYMENT_ID: &str = "payment_id";
    /// Foreign key to branches column
    pub const BRANCH_ID: &str = "branch_id";
    /// Transaction timestamp column
    pub const TIMESTAMP: &str = "timestamp";
    /// Total amount column
    pub const TOTAL_AMOUNT: &str = "total_amount";
    /// Payment method column
    pub const PAYMENT_METHOD: &str = "payment_method";
    /// Surrogate key assigned by the destination
    pub const SURROGATE: &str = PAYMENT_ID;
}

/// Products table schema
pub mod products {
    /// Table name
    pub const TABLE: &str = "products";
    /// Primary key column
    pub const PRODUCT_ID: &str = "product_id";
    /// Product name column
    pub const NAME: &str = "name";
    /// Variant column (nullable)
    pub const VARIANT: &str = "variant";
    /// Size column
    pub const SIZE: &str = "size";
    /// Unit price column
    pub const PRICE: &str = "price";
    /// Surrogate key assigned by the destination
    pub const SURROGATE: &str = PRODUCT_ID;
}

/// Product-transactions link table schema
pub mod product_transactions {
    /// Table name
    pub const TABLE: &str = "product_transactions";
    /// Primary key column
    pub const PRODUCT_TRANSACTIONS_ID: &str = "product_transactions_id";
    /// Foreign key to transactions column
    pub const PAYMENT_ID: &str = "payment_id";
    /// Foreign key to products column
    pub const PRODUCT_ID: &str = "product_id";
    /// Quantity column
    pub const QUANTITY: &str = "quantity";
    /// Surrogate key assigned by the destination
    pub const SURROGATE: &str = PRODUCT_TRANSACTIONS_ID;
}

/// The four tables in foreign-key-safe insert order.
pub const TABLE_ORDER: [&str; 4] = [
    branches::TABLE,
    transactions::TABLE,
    products::TABLE,
    product_transactions::TABLE,
];

/// Surrogate-key column for a table, if it is one of the four known tables.
#[must_use]
pub fn surrogate_column(table: &str) -> Option<&'static str> {
    match table {
        branches::TABLE => Some(branches::SURROGATE),
        transactions::TABLE => Some(transactions::SURROGATE),
        products::TABLE => Some(products::SURROGATE),
        product_transactions::TABLE => Some(product_transactions::SURROGATE),
        _ => None,
    }
}
