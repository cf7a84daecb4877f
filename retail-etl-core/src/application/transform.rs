// retail-etl-core/src/application/transform.rs

use tracing::{info, warn};

use crate::domain::calendar::{DateParts, parse_order_date};
use crate::domain::order::{DatedOrder, SourceRow};
use crate::domain::outcome::{RejectReason, Screened};

/// Parses order dates and attaches calendar attributes.
pub struct Transformer<'a> {
    date_formats: &'a [String],
}

impl<'a> Transformer<'a> {
    pub fn new(date_formats: &'a [String]) -> Self {
        Self { date_formats }
    }

    /// Rows whose date does not parse are rejected, never nulled.
    pub fn transform(&self, rows: Vec<SourceRow>) -> Screened<DatedOrder> {
        let mut screened = Screened::default();

        for SourceRow { line, record } in rows {
            match parse_order_date(&record.order_date, self.date_formats) {
                Some(date) => screened.accept(DatedOrder {
                    line,
                    parts: DateParts::derive(date),
                    date,
                    record,
                }),
                None => {
                    let reason = RejectReason::UnparseableDate(record.order_date.clone());
                    screened.reject(line, record.order_id, reason);
                }
            }
        }

        if !screened.rejected.is_empty() {
            warn!(
                dropped = screened.rejected.len(),
                "Rows dropped for unparseable order dates"
            );
        }
        info!(rows = screened.accepted.len(), "Data transformation complete.");
        screened
    }
}
