// retail-etl/src/commands/provision.rs
//
// USE CASE: Drop and recreate the star schema.

use anyhow::Context;
use retail_etl_core::application::provision_schema;

use super::{database_path, load_project, open_warehouse};
use crate::cli::ProjectArgs;

pub async fn execute(project: ProjectArgs) -> anyhow::Result<()> {
    let config = load_project(&project)?;
    let db_path = database_path(&project, &config);

    println!("🏗️  Provisioning schema in {}...", db_path.display());
    let warehouse = open_warehouse(&db_path, false)?;
    provision_schema(&warehouse)
        .await
        .context("Schema provisioning failed")?;

    println!("✨ Schema ready: 5 dimensions, 1 fact table.");
    Ok(())
}
