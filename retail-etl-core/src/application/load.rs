// retail-etl-core/src/application/load.rs

use serde::Serialize;
use tracing::{error, info, instrument};

use crate::domain::dimension::{
    CalendarDay, LocationKey, Product, Segment, ShipMode, ToRow, distinct,
};
use crate::domain::fact::FactRecord;
use crate::domain::order::DatedOrder;
use crate::domain::schema::{
    DATE_INSERT, FACT_INSERT, InsertTemplate, LOCATION_INSERT, PRODUCT_INSERT, SEGMENT_INSERT,
    SHIP_MODE_INSERT,
};
use crate::error::EtlError;
use crate::ports::{InsertMode, Warehouse};

/// Outcome of one template run. `inserted` excludes conflict-skipped rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadReport {
    pub template: String,
    pub table: String,
    pub attempted: usize,
    pub inserted: usize,
    pub mode: InsertMode,
}

impl LoadReport {
    pub fn skipped(&self) -> usize {
        self.attempted.saturating_sub(self.inserted)
    }
}

pub struct Loader<'a> {
    warehouse: &'a dyn Warehouse,
}

impl<'a> Loader<'a> {
    pub fn new(warehouse: &'a dyn Warehouse) -> Self {
        Self { warehouse }
    }

    /// Runs one template over `rows` in a single transaction.
    #[instrument(skip(self, rows), fields(template = template.name, rows = rows.len()))]
    pub async fn load<R: ToRow + Sync>(
        &self,
        template: &InsertTemplate,
        rows: &[R],
        mode: InsertMode,
    ) -> Result<LoadReport, EtlError> {
        let bound: Vec<_> = rows.iter().map(ToRow::to_row).collect();

        let inserted = self
            .warehouse
            .insert_rows(template.name, template.sql, &bound, mode)
            .await
            .map_err(|e| {
                error!(table = template.table, error = %e, "Error inserting data");
                e
            })?;

        info!(
            table = template.table,
            inserted,
            skipped = rows.len().saturating_sub(inserted),
            "Data inserted successfully"
        );

        Ok(LoadReport {
            template: template.name.to_string(),
            table: template.table.to_string(),
            attempted: rows.len(),
            inserted,
            mode,
        })
    }

    /// Loads the five dimensions from the transformed rows, ship mode first.
    /// Stops at the first failing table; earlier tables stay committed.
    pub async fn load_dimensions(&self, rows: &[DatedOrder]) -> Result<Vec<LoadReport>, EtlError> {
        let ship_modes = distinct(rows.iter().map(|r| ShipMode(r.record.ship_mode.clone())));
        let segments = distinct(rows.iter().map(|r| Segment(r.record.segment.clone())));
        let locations = distinct(rows.iter().map(|r| LocationKey::of(&r.record)));
        let products = distinct(rows.iter().map(|r| Product {
            product_id: r.record.product_id.clone(),
            category: r.record.category.clone(),
            sub_category: r.record.sub_category.clone(),
        }));
        let days = distinct(rows.iter().map(|r| CalendarDay {
            date: r.date,
            parts: r.parts.clone(),
        }));

        Ok(vec![
            self.load(&SHIP_MODE_INSERT, &ship_modes, InsertMode::RowByRow).await?,
            self.load(&SEGMENT_INSERT, &segments, InsertMode::RowByRow).await?,
            self.load(&LOCATION_INSERT, &locations, InsertMode::Batch).await?,
            self.load(&PRODUCT_INSERT, &first_per_product(products), InsertMode::Batch).await?,
            self.load(&DATE_INSERT, &days, InsertMode::Batch).await?,
        ])
    }

    pub async fn load_facts(&self, facts: &[FactRecord]) -> Result<LoadReport, EtlError> {
        self.load(&FACT_INSERT, facts, InsertMode::Batch).await
    }
}

// A product id seen with two different categories keeps the first pairing.
fn first_per_product(products: Vec<Product>) -> Vec<Product> {
    let mut seen = std::collections::HashSet::new();
    products
        .into_iter()
        .filter(|p| seen.insert(p.product_id.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::provision::provision_schema;
    use crate::application::transform::tests::order;
    use crate::domain::calendar::DateParts;
    use crate::infrastructure::adapters::DuckDBWarehouse;
    use anyhow::Result;
    use chrono::NaiveDate;

    fn dated(order_id: i64, ship_mode: &str, day: u32) -> DatedOrder {
        let date = NaiveDate::from_ymd_opt(2023, 1, day).unwrap_or_default();
        let mut record = order(order_id, "");
        record.ship_mode = ship_mode.into();
        DatedOrder {
            line: order_id as u64 + 1,
            record,
            date,
            parts: DateParts::derive(date),
        }
    }

    #[tokio::test]
    async fn test_dimensions_are_deduplicated() -> Result<()> {
        let wh = DuckDBWarehouse::new(":memory:")?;
        provision_schema(&wh).await?;

        let rows = vec![
            dated(1, "Second Class", 2),
            dated(2, "Standard Class", 2),
            dated(3, "Second Class", 3),
        ];
        let reports = Loader::new(&wh).load_dimensions(&rows).await?;

        let tables: Vec<&str> = reports.iter().map(|r| r.table.as_str()).collect();
        assert_eq!(
            tables,
            vec!["dim_ship_mode", "dim_segment", "dim_location", "dim_product", "dim_date"]
        );
        assert_eq!(reports[0].inserted, 2);
        assert_eq!(reports[0].mode, InsertMode::RowByRow);
        assert_eq!(reports[1].inserted, 1);
        assert_eq!(reports[2].inserted, 1);
        assert_eq!(reports[3].inserted, 3);
        assert_eq!(reports[4].inserted, 2);
        assert_eq!(reports[4].mode, InsertMode::Batch);

        assert_eq!(wh.query_scalar("SELECT count(*) FROM dim_ship_mode").await?, 2);
        assert_eq!(wh.query_scalar("SELECT count(*) FROM dim_date").await?, 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_reloading_dimensions_inserts_nothing() -> Result<()> {
        let wh = DuckDBWarehouse::new(":memory:")?;
        provision_schema(&wh).await?;
        let rows = vec![dated(1, "Second Class", 2), dated(2, "First Class", 5)];
        let loader = Loader::new(&wh);

        loader.load_dimensions(&rows).await?;
        let again = loader.load_dimensions(&rows).await?;

        assert!(again.iter().all(|r| r.inserted == 0), "{again:?}");
        assert_eq!(again[0].skipped(), 2);
        assert_eq!(wh.query_scalar("SELECT count(*) FROM dim_ship_mode").await?, 2);
        assert_eq!(wh.query_scalar("SELECT count(*) FROM dim_location").await?, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_location_without_postal_code_loads_once() -> Result<()> {
        let wh = DuckDBWarehouse::new(":memory:")?;
        provision_schema(&wh).await?;

        let mut row = dated(1, "Second Class", 2);
        row.record.postal_code = None;
        row.record.city = "Burlington".into();
        row.record.state = "Vermont".into();
        row.record.region = "East".into();
        let rows = vec![row];
        let loader = Loader::new(&wh);

        let first = loader.load_dimensions(&rows).await?;
        let again = loader.load_dimensions(&rows).await?;

        assert_eq!(first[2].inserted, 1);
        assert_eq!(again[2].table, "dim_location");
        assert_eq!(again[2].inserted, 0);
        assert_eq!(wh.query_scalar("SELECT count(*) FROM dim_location").await?, 1);
        assert_eq!(
            wh.query_scalar("SELECT count(*) FROM dim_location WHERE postal_code IS NULL")
                .await?,
            1
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_fact_with_dangling_key_fails_the_batch() -> Result<()> {
        let wh = DuckDBWarehouse::new(":memory:")?;
        provision_schema(&wh).await?;

        let fact = FactRecord {
            order_id: 1,
            product_id: "NOPE".into(),
            ship_mode_id: 99,
            segment_id: 99,
            location_id: 99,
            order_date: NaiveDate::from_ymd_opt(2023, 1, 2).unwrap_or_default(),
            cost_price: 1.0,
            list_price: 1.0,
            quantity: 1,
            discount_percent: None,
            discount: None,
            sale_price: 1.0,
            profit: 0.0,
        };
        assert!(Loader::new(&wh).load_facts(&[fact]).await.is_err());
        assert_eq!(wh.query_scalar("SELECT count(*) FROM fact_sales").await?, 0);
        Ok(())
    }

    #[test]
    fn test_first_product_pairing_wins() {
        let products = vec![
            Product {
                product_id: "P1".into(),
                category: "Furniture".into(),
                sub_category: "Chairs".into(),
            },
            Product {
                product_id: "P1".into(),
                category: "Technology".into(),
                sub_category: "Phones".into(),
            },
        ];
        let kept = first_per_product(products);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].category, "Furniture");
    }
}
