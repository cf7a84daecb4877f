// retail-etl-core/src/infrastructure/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum DatabaseError {
    #[error("DuckDB Engine Error: {0}")]
    #[diagnostic(
        code(retail_etl::infra::database::duckdb),
        help("An error occurred inside the SQL engine.")
    )]
    DuckDB(#[from] duckdb::Error),

    #[error("Insert '{template}' failed on row {row} (batch rolled back): {source}")]
    #[diagnostic(
        code(retail_etl::infra::database::insert),
        help("Check that the schema is provisioned and that dimensions were loaded before facts.")
    )]
    InsertFailed {
        template: String,
        row: usize,
        #[source]
        source: duckdb::Error,
    },

    #[error("Connection lock poisoned")]
    #[diagnostic(code(retail_etl::infra::database::poisoned))]
    Poisoned,
}

#[derive(Error, Debug, Diagnostic)]
pub enum InfrastructureError {
    // --- DATABASE (Abstracted) ---
    #[error(transparent)]
    #[diagnostic(transparent)]
    Database(#[from] DatabaseError),

    // --- FILESYSTEM (IO) ---
    #[error("File System Error: {0}")]
    #[diagnostic(
        code(retail_etl::infra::io),
        help("Check file permissions or path validity.")
    )]
    Io(#[from] std::io::Error),

    // --- DATASET (CSV) ---
    #[error("Dataset not found at '{0}'")]
    #[diagnostic(
        code(retail_etl::infra::dataset_missing),
        help("Download the retail orders dataset first or point --dataset at it.")
    )]
    DatasetNotFound(String),

    #[error("Dataset is missing required columns: {}", .0.join(", "))]
    #[diagnostic(
        code(retail_etl::infra::dataset_columns),
        help("Headers are matched case-insensitively, spaces count as underscores.")
    )]
    MissingColumns(Vec<String>),

    #[error("Malformed dataset row at line {line}: {source}")]
    #[diagnostic(code(retail_etl::infra::dataset_row))]
    MalformedRow {
        line: u64,
        #[source]
        source: csv::Error,
    },

    #[error("CSV Error: {0}")]
    #[diagnostic(code(retail_etl::infra::csv))]
    Csv(#[from] csv::Error),

    // --- CONFIG / YAML ---
    #[error("YAML Parsing Error: {0}")]
    #[diagnostic(
        code(retail_etl::infra::yaml),
        help("Check your YAML syntax (indentation, types).")
    )]
    YamlError(#[from] serde_yaml::Error),

    #[error("Configuration Error: {0}")]
    #[diagnostic(code(retail_etl::infra::config))]
    ConfigError(String),

    #[error("Configuration file not found at '{0}'")]
    #[diagnostic(code(retail_etl::infra::config_missing))]
    ConfigNotFound(String),

    // --- REPORTS ---
    #[error("Report serialization failed: {0}")]
    #[diagnostic(code(retail_etl::infra::report))]
    Json(#[from] serde_json::Error),
}

// Shortcut so `?` works directly on duckdb calls
impl From<duckdb::Error> for InfrastructureError {
    fn from(err: duckdb::Error) -> Self {
        InfrastructureError::Database(DatabaseError::DuckDB(err))
    }
}
