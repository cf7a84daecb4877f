// retail-etl/src/commands/query.rs
//
// USE CASE: Execute a raw SQL query (ad-hoc).

use retail_etl_core::application::execute_query;

use super::{database_path, load_project, open_warehouse, render_table};
use crate::cli::ProjectArgs;

pub async fn execute(project: ProjectArgs, query: String) -> anyhow::Result<()> {
    let config = load_project(&project)?;
    let warehouse = open_warehouse(&database_path(&project, &config), true)?;

    let rows = execute_query(&warehouse, &query).await?;
    let count = rows.len();
    let rendered = rows
        .into_iter()
        .map(|row| row.iter().map(ToString::to_string).collect::<Vec<_>>());
    println!("{}", render_table(None::<Vec<String>>, rendered));
    println!("   {count} row(s)");
    Ok(())
}
