// retail-etl/src/commands/mod.rs

pub mod clean;
pub mod inspect;
pub mod provision;
pub mod query;
pub mod run;

use anyhow::Context;
use comfy_table::Table;
use comfy_table::presets::UTF8_FULL;
use std::path::{Path, PathBuf};
use tracing::debug;

use retail_etl_core::application::pipeline::resolve_path;
use retail_etl_core::domain::EtlConfig;
use retail_etl_core::infrastructure::adapters::DuckDBWarehouse;
use retail_etl_core::infrastructure::config::load_config;

use crate::cli::ProjectArgs;

/// Loads the project configuration and layers the CLI flags on top.
pub fn load_project(project: &ProjectArgs) -> anyhow::Result<EtlConfig> {
    let mut config = load_config(&project.project_dir, project.config.as_deref())
        .with_context(|| {
            format!(
                "Failed to load configuration from {}",
                project.project_dir.display()
            )
        })?;
    if let Some(db_path) = &project.db_path {
        config.database_path = db_path.clone();
    }
    debug!(?config, "Configuration resolved");
    Ok(config)
}

pub fn database_path(project: &ProjectArgs, config: &EtlConfig) -> PathBuf {
    resolve_path(&project.project_dir, &config.database_path)
}

/// Opens the warehouse. With `must_exist`, a missing file is an error instead
/// of a fresh empty database.
pub fn open_warehouse(path: &Path, must_exist: bool) -> anyhow::Result<DuckDBWarehouse> {
    if must_exist && !path.exists() {
        anyhow::bail!(
            "❌ Database not found at: {}\n👉 Have you run 'retail-etl run --provision'?",
            path.display()
        );
    }
    let path_str = path.to_string_lossy();
    DuckDBWarehouse::new(&path_str)
        .with_context(|| format!("Failed to initialize DuckDB at {}", path.display()))
}

pub fn render_table<H, R>(header: Option<H>, rows: R) -> Table
where
    H: IntoIterator<Item = String>,
    R: IntoIterator<Item = Vec<String>>,
{
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    if let Some(header) = header {
        table.set_header(header.into_iter().collect::<Vec<_>>());
    }
    for row in rows {
        table.add_row(row);
    }
    table
}
