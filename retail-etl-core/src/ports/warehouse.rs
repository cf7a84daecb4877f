// retail-etl-core/src/ports/warehouse.rs

// What the pipeline needs from a storage engine, without knowing which one.
// The DuckDB adapter lives in infrastructure::adapters.

use crate::error::EtlError;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

/// Engine-neutral cell value, used both for insert parameters and query results.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SqlValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
}

impl SqlValue {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SqlValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SqlValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Null => f.write_str("NULL"),
            SqlValue::Bool(b) => write!(f, "{b}"),
            SqlValue::Int(v) => write!(f, "{v}"),
            SqlValue::Float(v) => write!(f, "{v}"),
            SqlValue::Text(s) => f.write_str(s),
            SqlValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        SqlValue::Bool(value)
    }
}

impl From<NaiveDate> for SqlValue {
    fn from(value: NaiveDate) -> Self {
        SqlValue::Date(value)
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Int(value)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(SqlValue::Null, Into::into)
    }
}

impl From<f64> for SqlValue {
    fn from(value: f64) -> Self {
        SqlValue::Float(value)
    }
}

/// Column description, independent of the engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSchema {
    pub name: String,
    pub data_type: String,
    pub is_nullable: bool,
}

/// How a batch of rows is sent to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InsertMode {
    /// The statement is issued again for every row.
    RowByRow,
    /// The statement is prepared once and executed per row.
    Batch,
}

#[async_trait]
pub trait Warehouse: Send + Sync {
    async fn execute(&self, statement: &str) -> Result<(), EtlError>;

    /// Inserts all rows inside one transaction. Any failing row rolls the whole
    /// batch back and the error is returned. Returns the number of rows written,
    /// conflict-skipped rows excluded.
    async fn insert_rows(
        &self,
        name: &str,
        sql: &str,
        rows: &[Vec<SqlValue>],
        mode: InsertMode,
    ) -> Result<usize, EtlError>;

    async fn fetch_columns(&self, table_name: &str) -> Result<Vec<ColumnSchema>, EtlError>;

    async fn fetch_rows(&self, query: &str) -> Result<Vec<Vec<SqlValue>>, EtlError>;

    async fn query_scalar(&self, query: &str) -> Result<u64, EtlError>;

    fn engine_name(&self) -> &str;
}
