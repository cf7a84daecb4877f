// retail-etl-core/src/infrastructure/config/project.rs

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};
use validator::Validate;

use crate::domain::configuration::EtlConfig;
use crate::infrastructure::error::InfrastructureError;

const CONFIG_CANDIDATES: [&str; 2] = ["retail_etl.yaml", "retail_etl.yml"];

// --- LOADER ---

/// Loads the run configuration.
///
/// An explicit path must exist. Otherwise the project directory is searched for
/// the usual file names and defaults apply when none is found. Environment
/// overrides are layered on top, then the result is validated.
#[instrument(skip(project_dir, explicit))]
pub fn load_config(
    project_dir: &Path,
    explicit: Option<&Path>,
) -> Result<EtlConfig, InfrastructureError> {
    let config_path = match explicit {
        Some(path) if path.exists() => Some(path.to_path_buf()),
        Some(path) => {
            return Err(InfrastructureError::ConfigNotFound(
                path.display().to_string(),
            ));
        }
        None => find_config(project_dir),
    };

    let mut config = match config_path {
        Some(path) => {
            info!(path = ?path, "Loading configuration");
            let content = fs::read_to_string(&path)?;
            serde_yaml::from_str::<EtlConfig>(&content)?
        }
        None => {
            info!("No configuration file found, using defaults");
            EtlConfig::default()
        }
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());

    config
        .validate()
        .map_err(|e| InfrastructureError::ConfigError(e.to_string()))?;

    Ok(config)
}

fn find_config(root: &Path) -> Option<PathBuf> {
    CONFIG_CANDIDATES
        .iter()
        .map(|name| root.join(name))
        .find(|p| p.exists())
}

/// Layers environment variables over the file values.
/// `DATASET_PATH` is honored for compatibility with existing deployments.
pub fn apply_env_overrides<F>(config: &mut EtlConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(val) = lookup("RETAIL_ETL_DATASET_PATH").or_else(|| lookup("DATASET_PATH")) {
        info!(old = ?config.dataset_path, new = ?val, "Overriding dataset path via ENV");
        config.dataset_path = val;
    }
    if let Some(val) = lookup("RETAIL_ETL_DATABASE_PATH") {
        info!(old = ?config.database_path, new = ?val, "Overriding database path via ENV");
        config.database_path = val;
    }
    if let Some(val) = lookup("RETAIL_ETL_TARGET_PATH") {
        info!(old = ?config.target_path, new = ?val, "Overriding target path via ENV");
        config.target_path = val;
    }
}
