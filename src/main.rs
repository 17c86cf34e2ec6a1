use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use cafe_etl::config::AppConfig;
use cafe_etl::db::Database;
use cafe_etl::items::ItemParser;
use cafe_etl::logging::init_logging;
use cafe_etl::models::OutputFormat;
use cafe_etl::validation::InputValidator;
use cafe_etl::{etl, extract, file_writer, loader, normalize, schema, transform};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline: CSV file in, SQLite database out
    Run {
        /// Path to the point-of-sale CSV export
        #[arg(short, long)]
        input: PathBuf,

        /// SQLite database path (defaults to configuration)
        #[arg(short, long)]
        database: Option<PathBuf>,
    },
    /// Extract and transform a CSV file into a prepared JSON file
    Prepare {
        /// Path to the point-of-sale CSV export
        #[arg(short, long)]
        input: PathBuf,

        /// Prepared rows output file
        #[arg(short, long, default_value = "output/prepared.json")]
        output: PathBuf,
    },
    /// Normalize a prepared JSON file into four table files
    Normalize {
        /// Prepared rows input file
        #[arg(short, long)]
        input: PathBuf,

        /// Output directory for the table files (defaults to configuration)
        #[arg(short, long)]
        output_dir: Option<String>,

        /// Output format (json or csv, defaults to configuration)
        #[arg(short, long)]
        format: Option<String>,
    },
    /// Create the destination tables without loading anything
    Schema {
        /// SQLite database path (defaults to configuration)
        #[arg(short, long)]
        database: Option<PathBuf>,
    },
    /// Load previously written table JSON files into SQLite
    Load {
        /// Directory holding the four table JSON files
        #[arg(short = 'i', long)]
        data_dir: PathBuf,

        /// SQLite database path (defaults to configuration)
        #[arg(short, long)]
        database: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    // Load configuration
    let config = AppConfig::load()?;

    // Initialize logging; the guard must outlive all commands
    let log_file = config.logging.file_path.clone();
    let _guard = init_logging(
        Some(&config.get_log_level()),
        log_file.as_deref().map(Path::new),
        config.logging.format == "json",
    )?;

    info!("Starting cafe-etl");

    // Parse command line arguments
    let cli = Cli::parse();

    match &cli.command {
        Commands::Run { input, database } => run_pipeline(&config, input, database.as_deref())?,
        Commands::Prepare { input, output } => prepare_rows(input, output)?,
        Commands::Normalize {
            input,
            output_dir,
            format,
        } => normalize_prepared(&config, input, output_dir.as_deref(), format.as_deref())?,
        Commands::Schema { database } => create_schema(&config, database.as_deref())?,
        Commands::Load { data_dir, database } => {
            load_table_files(&config, data_dir, database.as_deref())?;
        },
    }

    Ok(())
}

/// Run extract, transform, normalize, and load in one go
fn run_pipeline(config: &AppConfig, input: &Path, database: Option<&Path>) -> Result<()> {
    InputValidator::validate_source_path(input)?;
    let body_text = fs::read_to_string(input)
        .with_context(|| format!("Failed to read input file: {}", input.display()))?;

    let tables = etl::run_with(&body_text, &config.etl.default_location)?;

    let database_path = resolve_database_path(config, database);
    InputValidator::validate_database_path(&database_path)?;
    let mut db = Database::open(&database_path)?;
    loader::load_tables(&mut db, &tables)?;

    info!(database = %database_path.display(), "Pipeline run complete");
    Ok(())
}

/// Extract and transform a CSV file, writing the prepared rows to JSON
fn prepare_rows(input: &Path, output: &Path) -> Result<()> {
    InputValidator::validate_source_path(input)?;
    InputValidator::validate_file_path(output)?;

    let body_text = fs::read_to_string(input)
        .with_context(|| format!("Failed to read input file: {}", input.display()))?;

    let raw_rows = extract::extract(&body_text)?;
    info!("Extracted {} rows", raw_rows.len());

    let parser = ItemParser::new()?;
    let prepared = transform::transform(raw_rows, &parser)?;
    info!("Transformed {} rows", prepared.len());

    file_writer::write_prepared(&prepared, output)?;
    info!(file = %output.display(), "Prepared rows written");
    Ok(())
}

/// Normalize prepared rows into four table files
fn normalize_prepared(
    config: &AppConfig,
    input: &Path,
    output_dir: Option<&str>,
    format: Option<&str>,
) -> Result<()> {
    InputValidator::validate_file_path(input)?;

    let prepared = file_writer::read_prepared(input)?;
    info!("Read {} prepared rows", prepared.len());

    let tables = normalize::normalize_with(&prepared, &config.etl.default_location);

    let output_format = parse_output_format(format.unwrap_or(&config.export.default_format))?;
    let effective_output_dir = output_dir.unwrap_or(&config.export.output_directory);
    let files = file_writer::write_tables(&tables, output_format, Path::new(effective_output_dir))?;
    for file in &files {
        info!(file = %file.display(), "Table file written");
    }
    Ok(())
}

/// Create the destination tables
fn create_schema(config: &AppConfig, database: Option<&Path>) -> Result<()> {
    let database_path = resolve_database_path(config, database);
    InputValidator::validate_database_path(&database_path)?;

    let db = Database::open(&database_path)?;
    db.create_tables()?;
    info!(database = %database_path.display(), "Schema created");
    Ok(())
}

/// Load table JSON files into SQLite in foreign-key-safe order
fn load_table_files(config: &AppConfig, data_dir: &Path, database: Option<&Path>) -> Result<()> {
    let database_path = resolve_database_path(config, database);
    InputValidator::validate_database_path(&database_path)?;

    let mut db = Database::open(&database_path)?;
    db.create_tables()?;

    for table_name in schema::TABLE_ORDER {
        let file_path = data_dir.join(format!("{table_name}.json"));
        let text = fs::read_to_string(&file_path)
            .with_context(|| format!("Failed to read table file: {}", file_path.display()))?;
        let rows: Vec<serde_json::Value> = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse table file: {}", file_path.display()))?;

        let inserted = db.save_table(table_name, &rows)?;
        info!(table = table_name, rows = inserted, "Table loaded");
    }

    Ok(())
}

/// Database path from the command line, environment, or configuration
fn resolve_database_path(config: &AppConfig, database: Option<&Path>) -> PathBuf {
    match database {
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(config.get_database_path()),
    }
}

/// Parse an output format name; unknown names are rejected, not defaulted
fn parse_output_format(format: &str) -> Result<OutputFormat> {
    InputValidator::validate_output_format(format)?;
    match format.to_lowercase().as_str() {
        "csv" => Ok(OutputFormat::Csv),
        _ => Ok(OutputFormat::Json),
    }
}
