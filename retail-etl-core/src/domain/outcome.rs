// retail-etl-core/src/domain/outcome.rs
//
// Per-row validity: every screened row is either accepted or rejected with a reason,
// so counts and causes are reported without diffing table sizes.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// The surrogate foreign keys a fact row must resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ForeignKey {
    ShipModeId,
    SegmentId,
    LocationId,
}

impl ForeignKey {
    pub fn column(&self) -> &'static str {
        match self {
            ForeignKey::ShipModeId => "ship_mode_id",
            ForeignKey::SegmentId => "segment_id",
            ForeignKey::LocationId => "location_id",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum RejectReason {
    UnparseableDate(String),
    UnresolvedKeys(Vec<ForeignKey>),
}

impl RejectReason {
    pub fn kind(&self) -> &'static str {
        match self {
            RejectReason::UnparseableDate(_) => "unparseable_date",
            RejectReason::UnresolvedKeys(_) => "unresolved_keys",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::UnparseableDate(raw) => write!(f, "unparseable order date '{raw}'"),
            RejectReason::UnresolvedKeys(keys) => {
                let cols: Vec<&str> = keys.iter().map(ForeignKey::column).collect();
                write!(f, "unresolved {}", cols.join(", "))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rejection {
    pub line: u64,
    pub order_id: i64,
    pub reason: RejectReason,
}

/// Accepted rows plus everything that was dropped on the way.
#[derive(Debug, Clone)]
pub struct Screened<T> {
    pub accepted: Vec<T>,
    pub rejected: Vec<Rejection>,
}

impl<T> Default for Screened<T> {
    fn default() -> Self {
        Self {
            accepted: Vec::new(),
            rejected: Vec::new(),
        }
    }
}

impl<T> Screened<T> {
    pub fn accept(&mut self, row: T) {
        self.accepted.push(row);
    }

    pub fn reject(&mut self, line: u64, order_id: i64, reason: RejectReason) {
        self.rejected.push(Rejection {
            line,
            order_id,
            reason,
        });
    }

    /// Rejection counts keyed by reason kind.
    pub fn rejected_by_kind(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for rejection in &self.rejected {
            *counts.entry(rejection.reason.kind()).or_insert(0) += 1;
        }
        counts
    }
}
