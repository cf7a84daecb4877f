pub mod project;

pub use crate::domain::configuration::EtlConfig;
pub use project::{apply_env_overrides, load_config};
