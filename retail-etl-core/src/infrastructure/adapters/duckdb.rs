// retail-etl-core/src/infrastructure/adapters/duckdb.rs

use async_trait::async_trait;
use chrono::{Days, NaiveDate};
use duckdb::types::Value;
use duckdb::{Config, Connection, params_from_iter};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, error};

use crate::error::EtlError;
use crate::infrastructure::error::{DatabaseError, InfrastructureError};
use crate::ports::warehouse::{ColumnSchema, InsertMode, SqlValue, Warehouse};

pub struct DuckDBWarehouse {
    conn: Arc<Mutex<Connection>>,
}

impl DuckDBWarehouse {
    /// Opens (or creates) the database file. `:memory:` opens a throwaway database.
    pub fn new(db_path: &str) -> Result<Self, InfrastructureError> {
        let config = Config::default();

        let conn = if db_path == ":memory:" {
            Connection::open_in_memory_with_flags(config)?
        } else {
            Connection::open_with_flags(db_path, config)?
        };

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, EtlError> {
        self.conn
            .lock()
            .map_err(|_| EtlError::from(DatabaseError::Poisoned))
    }
}

fn db_err(e: duckdb::Error) -> EtlError {
    EtlError::from(DatabaseError::DuckDB(e))
}

fn to_duck(value: &SqlValue) -> Value {
    match value {
        SqlValue::Null => Value::Null,
        SqlValue::Bool(b) => Value::Boolean(*b),
        SqlValue::Int(v) => Value::BigInt(*v),
        SqlValue::Float(v) => Value::Double(*v),
        SqlValue::Text(s) => Value::Text(s.clone()),
        // Templates cast date parameters explicitly: CAST(? AS DATE)
        SqlValue::Date(d) => Value::Text(d.format("%Y-%m-%d").to_string()),
    }
}

fn from_duck(value: Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Boolean(b) => SqlValue::Bool(b),
        Value::TinyInt(v) => SqlValue::Int(i64::from(v)),
        Value::SmallInt(v) => SqlValue::Int(i64::from(v)),
        Value::Int(v) => SqlValue::Int(i64::from(v)),
        Value::BigInt(v) => SqlValue::Int(v),
        Value::UTinyInt(v) => SqlValue::Int(i64::from(v)),
        Value::USmallInt(v) => SqlValue::Int(i64::from(v)),
        Value::UInt(v) => SqlValue::Int(i64::from(v)),
        Value::UBigInt(v) => i64::try_from(v)
            .map(SqlValue::Int)
            .unwrap_or_else(|_| SqlValue::Text(v.to_string())),
        Value::Float(v) => SqlValue::Float(f64::from(v)),
        Value::Double(v) => SqlValue::Float(v),
        Value::Decimal(d) => d
            .to_string()
            .parse::<f64>()
            .map(SqlValue::Float)
            .unwrap_or_else(|_| SqlValue::Text(d.to_string())),
        Value::Text(s) => SqlValue::Text(s),
        Value::Date32(days) => epoch_date(days)
            .map(SqlValue::Date)
            .unwrap_or_else(|| SqlValue::Text(days.to_string())),
        other => SqlValue::Text(format!("{other:?}")),
    }
}

fn epoch_date(days: i32) -> Option<NaiveDate> {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1)?;
    if days >= 0 {
        epoch.checked_add_days(Days::new(u64::from(days.unsigned_abs())))
    } else {
        epoch.checked_sub_days(Days::new(u64::from(days.unsigned_abs())))
    }
}

/// Runs every row through `sql` on an open transaction. Returns rows written.
fn insert_all(
    tx: &duckdb::Transaction<'_>,
    name: &str,
    sql: &str,
    rows: &[Vec<SqlValue>],
    mode: InsertMode,
) -> Result<usize, DatabaseError> {
    let failed = |row: usize| {
        let template = name.to_string();
        move |source| DatabaseError::InsertFailed {
            template,
            row,
            source,
        }
    };

    let mut written = 0;
    match mode {
        InsertMode::RowByRow => {
            for (i, row) in rows.iter().enumerate() {
                written += tx
                    .execute(sql, params_from_iter(row.iter().map(to_duck)))
                    .map_err(failed(i))?;
            }
        }
        InsertMode::Batch => {
            let mut stmt = tx.prepare(sql).map_err(failed(0))?;
            for (i, row) in rows.iter().enumerate() {
                written += stmt
                    .execute(params_from_iter(row.iter().map(to_duck)))
                    .map_err(failed(i))?;
            }
        }
    }
    Ok(written)
}

#[async_trait]
impl Warehouse for DuckDBWarehouse {
    async fn execute(&self, statement: &str) -> Result<(), EtlError> {
        let conn = self.lock()?;
        conn.execute_batch(statement).map_err(db_err)
    }

    async fn insert_rows(
        &self,
        name: &str,
        sql: &str,
        rows: &[Vec<SqlValue>],
        mode: InsertMode,
    ) -> Result<usize, EtlError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction().map_err(db_err)?;

        match insert_all(&tx, name, sql, rows, mode) {
            Ok(written) => {
                tx.commit().map_err(db_err)?;
                debug!(template = name, written, "Batch committed");
                Ok(written)
            }
            Err(e) => {
                error!(template = name, error = %e, "Insert failed, rolling back");
                if let Err(rollback) = tx.rollback() {
                    error!(template = name, error = %rollback, "Rollback failed");
                }
                Err(e.into())
            }
        }
    }

    async fn fetch_columns(&self, table_name: &str) -> Result<Vec<ColumnSchema>, EtlError> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(&format!("PRAGMA table_info('{}')", table_name.replace('\'', "''")))
            .map_err(db_err)?;

        let rows = stmt
            .query_map([], |row| {
                Ok(ColumnSchema {
                    name: row.get("name")?,
                    data_type: row.get("type")?,
                    is_nullable: !row.get::<_, bool>("notnull")?,
                })
            })
            .map_err(db_err)?;

        rows.collect::<Result<Vec<_>, _>>().map_err(db_err)
    }

    async fn fetch_rows(&self, query: &str) -> Result<Vec<Vec<SqlValue>>, EtlError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(query).map_err(db_err)?;
        let mut rows = stmt.query([]).map_err(db_err)?;

        let mut out = Vec::new();
        while let Some(row) = rows.next().map_err(db_err)? {
            let width = row.as_ref().column_count();
            let mut values = Vec::with_capacity(width);
            for i in 0..width {
                let value: Value = row.get(i).map_err(db_err)?;
                values.push(from_duck(value));
            }
            out.push(values);
        }
        Ok(out)
    }

    async fn query_scalar(&self, query: &str) -> Result<u64, EtlError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(query).map_err(db_err)?;
        let mut rows = stmt.query([]).map_err(db_err)?;

        let row = rows
            .next()
            .map_err(db_err)?
            .ok_or_else(|| EtlError::InternalError("No scalar value returned".into()))?;

        let value: i64 = row.get(0).map_err(db_err)?;
        u64::try_from(value)
            .map_err(|_| EtlError::InternalError(format!("Negative scalar value: {value}")))
    }

    fn engine_name(&self) -> &str {
        "duckdb"
    }
}
