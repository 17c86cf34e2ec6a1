//! Cafe ETL - Point-of-Sale Transaction Pipeline
//!
//! A Rust library for extracting, transforming, and normalizing coffee-shop
//! point-of-sale CSV exports into relational tables.
//!
//! # Features
//!
//! - Extract raw sales rows from headered CSV text
//! - Parse the in-cell item mini-language into structured products
//! - Reformat timestamps and drop sensitive customer fields
//! - Normalize into branches, transactions, products, and link tables
//! - Load into SQLite or export to JSON/CSV files

/// Configuration management
pub mod config;
/// SQLite storage backend
pub mod db;
/// Error types shared across the pipeline
pub mod error;
/// The extract → transform → normalize pipeline facade
pub mod etl;
/// Raw row extraction from CSV text
pub mod extract;
/// File export for prepared rows and normalized tables
pub mod file_writer;
/// Item mini-language parsing
pub mod items;
/// Storage-agnostic table loading
pub mod loader;
/// Logging setup and stage timing
pub mod logging;
/// Metrics collection
pub mod metrics;
/// Data models and structures
pub mod models;
/// Normalization into relational tables
pub mod normalize;
/// Table and column name definitions
pub mod schema;
/// Row transformation and cleaning
pub mod transform;
/// Input validation and sanitization
pub mod validation;

// Re-export key components for easier access
pub use db::Database;
pub use error::{EtlError, Result};
pub use items::ItemParser;
pub use loader::TableLoader;
pub use models::{NormalizedTables, OutputFormat, RawRow, TransformedRow};
