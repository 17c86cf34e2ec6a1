use std::path::Path;

use anyhow::{anyhow, Result};

/// Validation utilities for input sanitization and edge case handling
#[derive(Debug, Copy, Clone)]
pub struct InputValidator;

impl InputValidator {
    /// Validate a source file path before reading it
    pub fn validate_source_path(path: &Path) -> Result<()> {
        Self::validate_file_path(path)?;

        if !path.exists() {
            return Err(anyhow!("Source file does not exist: {path:?}"));
        }

        if !path.is_file() {
            return Err(anyhow!("Source path is not a file: {path:?}"));
        }

        Ok(())
    }

    /// Validate a file path
    pub fn validate_file_path(path: &Path) -> Result<()> {
        if path.to_string_lossy().is_empty() {
            return Err(anyhow!("File path cannot be empty"));
        }

        // Check for path traversal attempts
        let path_str = path.to_string_lossy();
        if path_str.contains("..") || path_str.contains('~') {
            return Err(anyhow!(
                "File path contains potentially dangerous characters"
            ));
        }

        // Check path length
        if path_str.len() > 4096 {
            return Err(anyhow!("File path too long (max 4096 characters)"));
        }

        Ok(())
    }

    /// Validate a destination database path
    pub fn validate_database_path(path: &Path) -> Result<()> {
        Self::validate_file_path(path)?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("db" | "sqlite" | "sqlite3") => Ok(()),
            _ => Err(anyhow!(
                "Database path must end in .db, .sqlite or .sqlite3: {path:?}"
            )),
        }
    }

    /// Validate a table name used in dynamically built SQL.
    ///
    /// Table names reach an INSERT statement verbatim, so anything beyond
    /// lowercase identifiers is rejected outright.
    pub fn validate_table_name(name: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(anyhow!("Table name cannot be empty"));
        }

        if name.len() > 64 {
            return Err(anyhow!("Table name too long (max 64 characters)"));
        }

        if !name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        {
            return Err(anyhow!("Table name contains invalid characters: {name}"));
        }

        Ok(())
    }

    /// Validate a column name used in dynamically built SQL
    pub fn validate_column_name(name: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(anyhow!("Column name cannot be empty"));
        }

        if !name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        {
            return Err(anyhow!("Column name contains invalid characters: {name}"));
        }

        Ok(())
    }

    /// Validate an output format string
    pub fn validate_output_format(format: &str) -> Result<()> {
        let valid_formats = ["json", "csv"];
        if !valid_formats.contains(&format.to_lowercase().as_str()) {
            return Err(anyhow!(
                "Invalid output format: {}. Must be one of: {:?}",
                format,
                valid_formats
            ));
        }

        Ok(())
    }
}
