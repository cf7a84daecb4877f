// retail-etl-core/src/application/clean.rs

use std::fs;
use std::path::{Component, Path};
use tracing::info;

use crate::application::pipeline::resolve_path;
use crate::domain::configuration::EtlConfig;
use crate::error::EtlError;

/// Removes the run artifacts (the target directory) and, when asked, the
/// warehouse file. Returns the paths that were actually removed.
pub fn clean_artifacts(
    config: &EtlConfig,
    project_dir: &Path,
    include_database: bool,
) -> Result<Vec<String>, EtlError> {
    info!("Initializing cleanup sequence...");

    let mut targets = vec![config.target_path.clone()];
    if include_database {
        targets.push(config.database_path.clone());
    }

    let mut removed = Vec::new();
    for target in targets {
        ensure_inside_project(&target)?;
        let full_path = resolve_path(project_dir, &target);

        if full_path.exists() {
            if full_path.is_dir() {
                fs::remove_dir_all(&full_path)?;
            } else {
                fs::remove_file(&full_path)?;
            }
            info!(path = %full_path.display(), "Artifact removed");
            removed.push(target);
        }
    }
    Ok(removed)
}

// Only plain relative paths below the project directory may be deleted.
fn ensure_inside_project(target: &str) -> Result<(), EtlError> {
    let path = Path::new(target);
    let escapes = path.components().any(|c| {
        matches!(
            c,
            Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    });
    if target.trim().is_empty() || escapes || path == Path::new(".") {
        return Err(EtlError::UnsafePath(target.to_string()));
    }
    Ok(())
}
