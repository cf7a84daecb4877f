pub mod warehouse;

pub use warehouse::{ColumnSchema, InsertMode, SqlValue, Warehouse};
