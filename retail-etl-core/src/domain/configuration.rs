// retail-etl-core/src/domain/configuration.rs

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::domain::calendar::{DEFAULT_DATE_FORMATS, validate_date_format};

/// Everything a run needs, passed explicitly to each component.
#[derive(Debug, Deserialize, Serialize, Clone, Validate)]
pub struct EtlConfig {
    #[serde(rename = "dataset-path", default = "default_dataset_path")]
    #[validate(length(min = 1, message = "dataset path cannot be empty"))]
    pub dataset_path: String,

    #[serde(rename = "database-path", default = "default_database_path")]
    #[validate(length(min = 1, message = "database path cannot be empty"))]
    pub database_path: String,

    #[serde(rename = "target-path", default = "default_target_path")]
    #[validate(length(min = 1, message = "target path cannot be empty"))]
    pub target_path: String,

    #[serde(default = "default_delimiter")]
    #[validate(custom(function = "validate_delimiter"))]
    pub delimiter: char,

    #[serde(rename = "date-formats", default = "default_date_formats")]
    #[validate(length(min = 1, message = "at least one date format is required"))]
    #[validate(custom(function = "validate_date_formats"))]
    pub date_formats: Vec<String>,
}

impl Default for EtlConfig {
    fn default() -> Self {
        Self {
            dataset_path: default_dataset_path(),
            database_path: default_database_path(),
            target_path: default_target_path(),
            delimiter: default_delimiter(),
            date_formats: default_date_formats(),
        }
    }
}

impl EtlConfig {
    /// The delimiter as the single byte the CSV reader wants.
    pub fn delimiter_byte(&self) -> u8 {
        u8::try_from(self.delimiter).unwrap_or(b',')
    }
}

fn default_dataset_path() -> String {
    "data/clean_dataset.csv".to_string()
}
fn default_database_path() -> String {
    "retail_orders.duckdb".to_string()
}
fn default_target_path() -> String {
    "target".to_string()
}
fn default_delimiter() -> char {
    ','
}
fn default_date_formats() -> Vec<String> {
    DEFAULT_DATE_FORMATS.iter().map(|f| f.to_string()).collect()
}

fn validate_delimiter(delimiter: &char) -> Result<(), ValidationError> {
    if delimiter.is_ascii() && !delimiter.is_ascii_alphanumeric() && *delimiter != '"' {
        Ok(())
    } else {
        Err(ValidationError::new("delimiter_not_ascii_punctuation"))
    }
}

#[allow(clippy::ptr_arg)]
fn validate_date_formats(formats: &Vec<String>) -> Result<(), ValidationError> {
    for format in formats {
        if let Err(e) = validate_date_format(format) {
            let mut err = ValidationError::new("invalid_date_format");
            err.message = Some(e.to_string().into());
            return Err(err);
        }
    }
    Ok(())
}
