// retail-etl-core/src/domain/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum DomainError {
    #[error("Invalid date format '{format}': {reason}")]
    #[diagnostic(
        code(retail_etl::domain::date_format),
        help("Use chrono strftime specifiers, e.g. '%Y-%m-%d'.")
    )]
    InvalidDateFormat { format: String, reason: String },

    #[error("Unexpected value in dimension '{table}': {detail}")]
    #[diagnostic(code(retail_etl::domain::dimension_shape))]
    DimensionShape { table: String, detail: String },

    #[error("Invalid table name '{0}'")]
    #[diagnostic(
        code(retail_etl::domain::identifier),
        help("Table names may only contain letters, digits and underscores.")
    )]
    InvalidIdentifier(String),
}
