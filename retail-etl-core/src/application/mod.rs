// retail-etl-core/src/application/mod.rs

pub mod clean;
pub mod engine;
pub mod load;
pub mod pipeline;
pub mod provision;
pub mod resolve;
pub mod transform;

// --- RE-EXPORTS (FACADE) ---
// The CLI only needs `use retail_etl_core::application::{run_pipeline, ...}`.

pub use clean::clean_artifacts;
pub use engine::{TableSample, execute_query, inspect_table};
pub use load::{LoadReport, Loader};
pub use pipeline::{RunSummary, run_pipeline};
pub use provision::provision_schema;
pub use resolve::{KeyMaps, KeyResolver};
pub use transform::Transformer;
