// retail-etl/src/commands/inspect.rs
//
// USE CASE: Inspect a warehouse table (schema + sample rows).

use retail_etl_core::application::inspect_table;

use super::{database_path, load_project, open_warehouse, render_table};
use crate::cli::ProjectArgs;

pub async fn execute(project: ProjectArgs, table: String, limit: usize) -> anyhow::Result<()> {
    let config = load_project(&project)?;
    let warehouse = open_warehouse(&database_path(&project, &config), true)?;

    let sample = inspect_table(&warehouse, &table, limit).await?;

    println!("\n🔍 Inspecting Table: '{}' ({} rows)", sample.table, sample.total_rows);

    let columns = sample.columns.iter().map(|c| {
        let nullable = if c.is_nullable { "yes" } else { "no" };
        vec![c.name.clone(), c.data_type.clone(), nullable.to_string()]
    });
    let header = ["column", "type", "nullable"].map(String::from);
    println!("{}", render_table(Some(header), columns));

    println!("   --- Rows (Limit {}) ---", limit);
    let header = sample.columns.iter().map(|c| c.name.clone()).collect::<Vec<_>>();
    let rows = sample
        .rows
        .iter()
        .map(|row| row.iter().map(ToString::to_string).collect::<Vec<_>>());
    println!("{}", render_table(Some(header), rows));
    Ok(())
}
