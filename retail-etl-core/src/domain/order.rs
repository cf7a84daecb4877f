// retail-etl-core/src/domain/order.rs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::calendar::DateParts;

/// Columns the input file must provide, in snake_case after header normalization.
pub const REQUIRED_COLUMNS: [&str; 19] = [
    "order_id",
    "product_id",
    "category",
    "sub_category",
    "ship_mode",
    "segment",
    "postal_code",
    "city",
    "state",
    "country",
    "region",
    "order_date",
    "cost_price",
    "list_price",
    "quantity",
    "discount_percent",
    "discount",
    "sale_price",
    "profit",
];

/// One line of the retail orders dataset, as read from disk.
///
/// `order_date` stays raw text here: a bad date is a per-row rejection decided
/// by the transformer, not a structural error of the file.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct OrderRecord {
    pub order_id: i64,
    pub product_id: String,
    pub category: String,
    pub sub_category: String,
    pub ship_mode: String,
    pub segment: String,
    pub postal_code: Option<i64>,
    pub city: String,
    pub state: String,
    pub country: String,
    pub region: String,
    pub order_date: String,
    pub cost_price: f64,
    pub list_price: f64,
    pub quantity: i64,
    pub discount_percent: Option<f64>,
    pub discount: Option<f64>,
    pub sale_price: f64,
    pub profit: f64,
}

/// An order record tagged with the 1-based line it came from (header is line 1).
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRow {
    pub line: u64,
    pub record: OrderRecord,
}

/// A source row whose order date parsed, with its calendar attributes attached.
#[derive(Debug, Clone, PartialEq)]
pub struct DatedOrder {
    pub line: u64,
    pub record: OrderRecord,
    pub date: NaiveDate,
    pub parts: DateParts,
}

/// Turns a raw header such as `"Sub Category"` into `"sub_category"`.
pub fn normalize_header(raw: &str) -> String {
    raw.trim()
        .trim_start_matches('\u{feff}')
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}
