// retail-etl-core/src/application/pipeline.rs

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{error, info, instrument, warn};

use crate::application::load::{LoadReport, Loader};
use crate::application::resolve::KeyResolver;
use crate::application::transform::Transformer;
use crate::domain::configuration::EtlConfig;
use crate::domain::outcome::Rejection;
use crate::error::EtlError;
use crate::infrastructure::dataset::{DatasetOptions, load_dataset};
use crate::infrastructure::fs::write_json;
use crate::ports::Warehouse;

pub const RUN_RESULTS_FILE: &str = "run_results.json";
pub const REJECTED_ROWS_FILE: &str = "rejected_rows.json";

#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub rows_read: usize,
    pub rows_transformed: usize,
    pub rejected: BTreeMap<&'static str, usize>,
    pub loads: Vec<LoadReport>,
    pub facts_loaded: usize,
    pub elapsed_seconds: f64,
}

impl RunSummary {
    pub fn rejected_total(&self) -> usize {
        self.rejected.values().sum()
    }
}

/// Relative paths are taken from the project directory.
pub fn resolve_path(project_dir: &Path, path: &str) -> PathBuf {
    let raw = Path::new(path);
    if raw.is_absolute() {
        raw.to_path_buf()
    } else {
        project_dir.join(raw)
    }
}

/// Full batch: dataset → transform → dimensions → key maps → facts.
///
/// The schema must already exist. Dimension tables committed before a fatal
/// error stay committed. `run_results.json` is written either way; on failure
/// it holds the error and the counts reached before it.
#[instrument(skip(warehouse, config), fields(engine = warehouse.engine_name()))]
pub async fn run_pipeline(
    warehouse: &dyn Warehouse,
    config: &EtlConfig,
    project_dir: &Path,
) -> Result<RunSummary, EtlError> {
    let start = Instant::now();
    let target_dir = resolve_path(project_dir, &config.target_path);

    let mut summary = RunSummary::default();
    let result = run_stages(warehouse, config, project_dir, &mut summary).await;
    summary.elapsed_seconds = start.elapsed().as_secs_f64();

    let rejections = match result {
        Ok(rejections) => rejections,
        Err(e) => {
            summary.error = Some(e.to_string());
            error!(error = %e, "ETL pipeline failed");
            if let Err(write_err) = write_json(&target_dir.join(RUN_RESULTS_FILE), &summary) {
                warn!(error = %write_err, "Could not write the failed run summary");
            }
            return Err(e);
        }
    };

    summary.success = true;
    write_json(&target_dir.join(RUN_RESULTS_FILE), &summary)?;
    write_json(&target_dir.join(REJECTED_ROWS_FILE), &rejections)?;

    if summary.rejected_total() > 0 {
        warn!(rejected = summary.rejected_total(), "Some rows were not loaded");
    }
    info!(
        rows_read = summary.rows_read,
        facts_loaded = summary.facts_loaded,
        elapsed = summary.elapsed_seconds,
        "ETL pipeline completed successfully"
    );
    Ok(summary)
}

// Fills `summary` stage by stage so a failure still reports how far it got.
async fn run_stages(
    warehouse: &dyn Warehouse,
    config: &EtlConfig,
    project_dir: &Path,
    summary: &mut RunSummary,
) -> Result<Vec<Rejection>, EtlError> {
    // 1. EXTRACT
    let dataset_path = resolve_path(project_dir, &config.dataset_path);
    let options = DatasetOptions {
        delimiter: config.delimiter_byte(),
    };
    let rows = load_dataset(&dataset_path, options)?;
    summary.rows_read = rows.len();

    // 2. TRANSFORM
    let dated = Transformer::new(&config.date_formats).transform(rows);
    summary.rows_transformed = dated.accepted.len();
    summary.rejected = dated.rejected_by_kind();

    // 3. DIMENSIONS
    let loader = Loader::new(warehouse);
    summary.loads = loader.load_dimensions(&dated.accepted).await?;

    // 4. KEYS
    let maps = KeyResolver::build(warehouse).await?;
    let facts = maps.resolve(&dated.accepted);
    summary.rejected.extend(facts.rejected_by_kind());

    // 5. FACTS
    let fact_report = loader.load_facts(&facts.accepted).await?;
    summary.facts_loaded = fact_report.inserted;
    summary.loads.push(fact_report);

    warehouse.execute("CHECKPOINT").await?;

    let mut rejections = dated.rejected;
    rejections.extend(facts.rejected);
    Ok(rejections)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::provision::provision_schema;
    use crate::infrastructure::adapters::DuckDBWarehouse;
    use crate::ports::SqlValue;
    use anyhow::Result;
    use std::fs;
    use tempfile::TempDir;

    const HEADER: &str = "Order Id,Order Date,Ship Mode,Segment,Country,City,State,Postal Code,Region,Category,Sub Category,Product Id,cost price,List Price,Quantity,Discount Percent,discount,sale price,profit";

    fn project(lines: &[&str]) -> Result<(TempDir, EtlConfig)> {
        let dir = tempfile::tempdir()?;
        fs::create_dir_all(dir.path().join("data"))?;
        let mut body = String::from(HEADER);
        for line in lines {
            body.push('\n');
            body.push_str(line);
        }
        fs::write(dir.path().join("data/clean_dataset.csv"), body)?;
        Ok((dir, EtlConfig::default()))
    }

    const ROWS: [&str; 3] = [
        "1,2023-03-01,Second Class,Consumer,United States,Henderson,Kentucky,42420,South,Furniture,Bookcases,FUR-BO-10001798,240,260,2,2,5.2,254.8,14.8",
        "2,2023-08-15,Standard Class,Corporate,United States,Los Angeles,California,90036,West,Office Supplies,Labels,OFF-LA-10000240,10,10,2,3,0.6,19.4,-0.6",
        "3,,Standard Class,Consumer,United States,Fort Lauderdale,Florida,33311,South,Furniture,Tables,FUR-TA-10000577,800,960,5,5,48,4752,-48",
    ];

    #[tokio::test]
    async fn test_end_to_end_run() -> Result<()> {
        let (dir, config) = project(&ROWS)?;
        let wh = DuckDBWarehouse::new(":memory:")?;
        provision_schema(&wh).await?;

        let summary = run_pipeline(&wh, &config, dir.path()).await?;
        assert!(summary.success);
        assert_eq!(summary.error, None);
        assert_eq!(summary.rows_read, 3);
        assert_eq!(summary.rows_transformed, 2);
        assert_eq!(summary.facts_loaded, 2);
        assert_eq!(summary.rejected.get("unparseable_date"), Some(&1));
        assert_eq!(summary.loads.len(), 6);

        assert_eq!(wh.query_scalar("SELECT count(*) FROM fact_sales").await?, 2);
        assert_eq!(wh.query_scalar("SELECT count(*) FROM dim_date").await?, 2);
        assert_eq!(wh.query_scalar("SELECT count(*) FROM dim_product").await?, 2);

        // Profit is stored as given, never recomputed.
        let profit = wh
            .fetch_rows("SELECT CAST(profit AS DOUBLE) FROM fact_sales WHERE order_id = 2")
            .await?;
        assert_eq!(profit, vec![vec![SqlValue::Float(-0.6)]]);

        let weekend = wh
            .fetch_rows("SELECT day_name, is_weekend, week FROM dim_date WHERE order_date = DATE '2023-03-01'")
            .await?;
        assert_eq!(
            weekend,
            vec![vec!["Wednesday".into(), SqlValue::Bool(false), SqlValue::Int(9)]]
        );

        assert!(dir.path().join("target").join(RUN_RESULTS_FILE).exists());
        let rejected = fs::read_to_string(dir.path().join("target").join(REJECTED_ROWS_FILE))?;
        assert!(rejected.contains("unparseable_date"));
        Ok(())
    }

    #[tokio::test]
    async fn test_every_fact_references_existing_dimensions() -> Result<()> {
        let (dir, config) = project(&ROWS)?;
        let wh = DuckDBWarehouse::new(":memory:")?;
        provision_schema(&wh).await?;
        run_pipeline(&wh, &config, dir.path()).await?;

        let orphans = wh
            .query_scalar(
                "SELECT count(*) FROM fact_sales f
                 LEFT JOIN dim_ship_mode s USING (ship_mode_id)
                 LEFT JOIN dim_segment g USING (segment_id)
                 LEFT JOIN dim_location l USING (location_id)
                 LEFT JOIN dim_product p USING (product_id)
                 LEFT JOIN dim_date d USING (order_date)
                 WHERE s.ship_mode IS NULL OR g.segment IS NULL OR l.city IS NULL
                    OR p.category IS NULL OR d.year IS NULL",
            )
            .await?;
        assert_eq!(orphans, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_rerun_is_idempotent() -> Result<()> {
        let (dir, config) = project(&ROWS)?;
        let wh = DuckDBWarehouse::new(":memory:")?;
        provision_schema(&wh).await?;

        run_pipeline(&wh, &config, dir.path()).await?;
        let second = run_pipeline(&wh, &config, dir.path()).await?;

        assert_eq!(second.facts_loaded, 0);
        assert!(second.loads.iter().all(|r| r.inserted == 0));
        assert_eq!(wh.query_scalar("SELECT count(*) FROM fact_sales").await?, 2);
        assert_eq!(wh.query_scalar("SELECT count(*) FROM dim_ship_mode").await?, 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_rerun_without_postal_code_keeps_one_location() -> Result<()> {
        let (dir, config) = project(&[
            "1,2023-03-01,Second Class,Consumer,United States,Burlington,Vermont,,East,Technology,Phones,TEC-PH-10002033,10,12,1,,,12,2",
            "2,2023-03-02,Second Class,Consumer,United States,Burlington,Vermont,,East,Furniture,Chairs,FUR-CH-10000454,20,22,1,,,22,2",
        ])?;
        let wh = DuckDBWarehouse::new(":memory:")?;
        provision_schema(&wh).await?;

        let first = run_pipeline(&wh, &config, dir.path()).await?;
        let second = run_pipeline(&wh, &config, dir.path()).await?;

        assert_eq!(first.facts_loaded, 2);
        assert_eq!(second.facts_loaded, 0);
        assert_eq!(wh.query_scalar("SELECT count(*) FROM dim_location").await?, 1);
        assert_eq!(
            wh.query_scalar("SELECT count(DISTINCT location_id) FROM fact_sales").await?,
            1
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_dataset_aborts_before_loading() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let wh = DuckDBWarehouse::new(":memory:")?;
        provision_schema(&wh).await?;

        let result = run_pipeline(&wh, &EtlConfig::default(), dir.path()).await;
        assert!(result.is_err());
        assert_eq!(wh.query_scalar("SELECT count(*) FROM dim_segment").await?, 0);

        let report = fs::read_to_string(dir.path().join("target").join(RUN_RESULTS_FILE))?;
        let report: serde_json::Value = serde_json::from_str(&report)?;
        assert_eq!(report["success"], serde_json::Value::Bool(false));
        assert!(
            report["error"]
                .as_str()
                .is_some_and(|e| e.contains("Dataset not found")),
            "{report}"
        );
        assert!(!dir.path().join("target").join(REJECTED_ROWS_FILE).exists());
        Ok(())
    }

    #[test]
    fn test_resolve_path() {
        let base = Path::new("/srv/etl");
        assert_eq!(resolve_path(base, "target"), PathBuf::from("/srv/etl/target"));
        assert_eq!(resolve_path(base, "/data/x.csv"), PathBuf::from("/data/x.csv"));
    }
}
