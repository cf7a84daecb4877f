// retail-etl/src/commands/run.rs
//
// USE CASE: Run the ETL pipeline.

use anyhow::Context;
use retail_etl_core::application::{provision_schema, run_pipeline};

use super::{database_path, load_project, open_warehouse, render_table};
use crate::cli::ProjectArgs;

pub async fn execute(
    project: ProjectArgs,
    dataset: Option<String>,
    provision: bool,
) -> anyhow::Result<()> {
    let start = std::time::Instant::now();

    // A. Load the Config (Infra)
    println!("⚙️  Loading configuration...");
    let mut config = load_project(&project)?;
    if let Some(dataset) = dataset {
        config.dataset_path = dataset;
    }
    println!("   Dataset: {}", config.dataset_path);

    // B. Open the warehouse
    let db_path = database_path(&project, &config);
    println!("   Engine: DuckDB 🦆 ({})", db_path.display());
    let warehouse = open_warehouse(&db_path, false)?;

    if provision {
        println!("🏗️  Provisioning schema...");
        provision_schema(&warehouse)
            .await
            .context("Schema provisioning failed")?;
    }

    // C. Run the Pipeline (Application Layer)
    let summary = run_pipeline(&warehouse, &config, &project.project_dir)
        .await
        .context("💥 CRITICAL PIPELINE ERROR")?;

    let rows = summary.loads.iter().map(|r| {
        vec![
            r.table.clone(),
            r.attempted.to_string(),
            r.inserted.to_string(),
            r.skipped().to_string(),
        ]
    });
    let header = ["table", "attempted", "inserted", "skipped"].map(String::from);
    println!("{}", render_table(Some(header), rows));

    println!(
        "   Rows read: {}, transformed: {}, rejected: {}",
        summary.rows_read,
        summary.rows_transformed,
        summary.rejected_total()
    );
    for (kind, count) in &summary.rejected {
        println!("   ⚠️  {count} rows dropped ({kind})");
    }
    println!("\n✨ SUCCESS! Pipeline finished in {:.2?}", start.elapsed());
    Ok(())
}
