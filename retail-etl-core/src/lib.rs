// retail-etl-core/src/lib.rs

// 1. Documentation is not mandatory yet
#![allow(missing_docs)]
// 2. Memory safety
#![deny(unsafe_code)]
// 3. Robustness
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
// 4. Performance
#![warn(clippy::perf)]

// --- HEXAGONAL MODULES ---

// 1. Ports (Interfaces / Traits)
// The Warehouse contract the application talks to.
pub mod ports;

// 2. Domain
// Order records, calendar derivation, star-schema rows and SQL.
// Depends only on the port value types.
pub mod domain;

// 3. Infrastructure (Adapters)
// DuckDB, CSV dataset reader, configuration files.
pub mod infrastructure;

// 4. Application (Use Cases)
// Provisioning, Transform, Key resolution, Load, Pipeline.
pub mod application;

// --- GLOBAL ERROR HANDLING ---
pub mod error;

// --- RE-EXPORTS (FACADE) ---
pub use error::EtlError;
