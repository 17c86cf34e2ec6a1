//! Unit tests for the validation module

use std::path::Path;

use cafe_etl::validation::InputValidator;

#[test]
fn test_validate_file_path_valid() {
    assert!(InputValidator::validate_file_path(Path::new("data/sales.csv")).is_ok());
}

#[test]
fn test_validate_file_path_empty() {
    assert!(InputValidator::validate_file_path(Path::new("")).is_err());
}

#[test]
fn test_validate_file_path_traversal() {
    assert!(InputValidator::validate_file_path(Path::new("../etc/passwd")).is_err());
}

#[test]
fn test_validate_file_path_home_expansion() {
    assert!(InputValidator::validate_file_path(Path::new("~/sales.csv")).is_err());
}

#[test]
fn test_validate_file_path_too_long() {
    let long_path = "a".repeat(5000);
    assert!(InputValidator::validate_file_path(Path::new(&long_path)).is_err());
}

#[test]
fn test_validate_source_path_missing_file() {
    assert!(InputValidator::validate_source_path(Path::new("does/not/exist.csv")).is_err());
}

#[test]
fn test_validate_database_path_extensions() {
    assert!(InputValidator::validate_database_path(Path::new("data/cafe.db")).is_ok());
    assert!(InputValidator::validate_database_path(Path::new("data/cafe.sqlite")).is_ok());
    assert!(InputValidator::validate_database_path(Path::new("data/cafe.sqlite3")).is_ok());
    assert!(InputValidator::validate_database_path(Path::new("data/cafe.txt")).is_err());
    assert!(InputValidator::validate_database_path(Path::new("data/cafe")).is_err());
}

#[test]
fn test_validate_table_name_valid() {
    assert!(InputValidator::validate_table_name("product_transactions").is_ok());
}

#[test]
fn test_validate_table_name_rejects_injection() {
    assert!(InputValidator::validate_table_name("branches; DROP TABLE branches").is_err());
    assert!(InputValidator::validate_table_name("branches--").is_err());
    assert!(InputValidator::validate_table_name("\"branches\"").is_err());
}

#[test]
fn test_validate_table_name_rejects_uppercase() {
    assert!(InputValidator::validate_table_name("Branches").is_err());
}

#[test]
fn test_validate_table_name_empty() {
    assert!(InputValidator::validate_table_name("").is_err());
}

#[test]
fn test_validate_table_name_too_long() {
    let long_name = "a".repeat(65);
    assert!(InputValidator::validate_table_name(&long_name).is_err());
}

#[test]
fn test_validate_column_name_valid() {
    assert!(InputValidator::validate_column_name("payment_method").is_ok());
}

#[test]
fn test_validate_column_name_rejects_punctuation() {
    assert!(InputValidator::validate_column_name("name)").is_err());
    assert!(InputValidator::validate_column_name("name, other").is_err());
}

#[test]
fn test_validate_output_format() {
    assert!(InputValidator::validate_output_format("json").is_ok());
    assert!(InputValidator::validate_output_format("CSV").is_ok());
    assert!(InputValidator::validate_output_format("xml").is_err());
}
