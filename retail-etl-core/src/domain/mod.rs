pub mod calendar;
pub mod configuration;
pub mod dimension;
pub mod error;
pub mod fact;
pub mod order;
pub mod outcome;
pub mod schema;

// Re-exports to keep imports short elsewhere
pub use calendar::DateParts;
pub use configuration::EtlConfig;
pub use dimension::{CalendarDay, LocationKey, Product, Segment, ShipMode, ToRow, distinct};
pub use error::DomainError;
pub use fact::FactRecord;
pub use order::{DatedOrder, OrderRecord, SourceRow};
pub use outcome::{ForeignKey, RejectReason, Rejection, Screened};
