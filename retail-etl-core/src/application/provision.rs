// retail-etl-core/src/application/provision.rs

use tracing::{error, info, instrument};

use crate::domain::schema::{CREATE_STATEMENTS, DROP_STATEMENTS};
use crate::error::EtlError;
use crate::ports::Warehouse;

/// Drops and recreates the star schema. Leaves an empty warehouse behind.
#[instrument(skip(warehouse), fields(engine = warehouse.engine_name()))]
pub async fn provision_schema(warehouse: &dyn Warehouse) -> Result<(), EtlError> {
    for statement in DROP_STATEMENTS {
        run_ddl(warehouse, statement).await?;
    }
    info!("All tables dropped successfully.");

    for statement in CREATE_STATEMENTS {
        run_ddl(warehouse, statement).await?;
    }
    info!("All tables created successfully.");
    Ok(())
}

async fn run_ddl(warehouse: &dyn Warehouse, statement: &str) -> Result<(), EtlError> {
    warehouse.execute(statement).await.map_err(|e| {
        error!(error = %e, statement, "Schema statement failed");
        e
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::adapters::DuckDBWarehouse;
    use anyhow::Result;

    const TABLES: [&str; 6] = [
        "dim_ship_mode",
        "dim_segment",
        "dim_location",
        "dim_product",
        "dim_date",
        "fact_sales",
    ];

    async fn table_count(wh: &DuckDBWarehouse) -> Result<u64> {
        Ok(wh
            .query_scalar("SELECT count(*) FROM information_schema.tables WHERE table_name LIKE 'dim_%' OR table_name = 'fact_sales'")
            .await?)
    }

    #[tokio::test]
    async fn test_provision_creates_six_tables() -> Result<()> {
        let wh = DuckDBWarehouse::new(":memory:")?;
        provision_schema(&wh).await?;
        assert_eq!(table_count(&wh).await?, 6);

        for table in TABLES {
            assert!(!wh.fetch_columns(table).await?.is_empty(), "{table} missing");
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_provision_twice_resets_data() -> Result<()> {
        let wh = DuckDBWarehouse::new(":memory:")?;
        provision_schema(&wh).await?;
        wh.execute("INSERT INTO dim_segment (segment) VALUES ('Consumer')").await?;
        assert_eq!(wh.query_scalar("SELECT count(*) FROM dim_segment").await?, 1);

        provision_schema(&wh).await?;
        assert_eq!(table_count(&wh).await?, 6);
        assert_eq!(wh.query_scalar("SELECT count(*) FROM dim_segment").await?, 0);
        Ok(())
    }
}
