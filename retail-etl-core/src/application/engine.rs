// retail-etl-core/src/application/engine.rs

use std::time::Instant;
use tracing::{debug, error, instrument};

use crate::domain::error::DomainError;
use crate::error::EtlError;
use crate::ports::{ColumnSchema, SqlValue, Warehouse};

/// Runs ad-hoc SQL with timing, returning every result row.
#[instrument(skip(warehouse), fields(query.len = query.len()))]
pub async fn execute_query(
    warehouse: &dyn Warehouse,
    query: &str,
) -> Result<Vec<Vec<SqlValue>>, EtlError> {
    let start = Instant::now();
    debug!("Executing query: {}", query);

    let result = warehouse.fetch_rows(query).await;
    let duration = start.elapsed();

    match result {
        Ok(rows) => {
            debug!(rows = rows.len(), "Query finished in {:.2?}", duration);
            Ok(rows)
        }
        Err(e) => {
            error!("Query failed after {:.2?}: {}", duration, e);
            Err(e)
        }
    }
}

#[derive(Debug, Clone)]
pub struct TableSample {
    pub table: String,
    pub columns: Vec<ColumnSchema>,
    pub rows: Vec<Vec<SqlValue>>,
    pub total_rows: u64,
}

/// Column layout plus the first `limit` rows of a table.
pub async fn inspect_table(
    warehouse: &dyn Warehouse,
    table: &str,
    limit: usize,
) -> Result<TableSample, EtlError> {
    if table.is_empty() || !table.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(DomainError::InvalidIdentifier(table.to_string()).into());
    }

    let columns = warehouse.fetch_columns(table).await?;
    let total_rows = warehouse
        .query_scalar(&format!("SELECT count(*) FROM {table}"))
        .await?;
    let rows = execute_query(warehouse, &format!("SELECT * FROM {table} LIMIT {limit}")).await?;

    Ok(TableSample {
        table: table.to_string(),
        columns,
        rows,
        total_rows,
    })
}
