// retail-etl/src/commands/clean.rs
//
// USE CASE: Clean run artifacts.

use retail_etl_core::application::clean_artifacts;

use super::load_project;
use crate::cli::ProjectArgs;

pub fn execute(project: ProjectArgs, database: bool) -> anyhow::Result<()> {
    println!("🧹 Cleaning run artifacts...");
    let config = load_project(&project)?;

    let removed = clean_artifacts(&config, &project.project_dir, database)?;
    if removed.is_empty() {
        println!("   Nothing to clean.");
    }
    for path in removed {
        println!("   🗑️  Artifact removed: {path}");
    }
    Ok(())
}
