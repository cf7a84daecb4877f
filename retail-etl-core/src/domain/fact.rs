// retail-etl-core/src/domain/fact.rs

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::dimension::ToRow;
use crate::ports::SqlValue;

/// One sales transaction with every foreign key resolved.
///
/// Product and date reference their dimensions by natural key, the other three
/// by surrogate id. There is no partially resolved variant: rows with a missing
/// key never become a `FactRecord`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactRecord {
    pub order_id: i64,
    pub product_id: String,
    pub ship_mode_id: i64,
    pub segment_id: i64,
    pub location_id: i64,
    pub order_date: NaiveDate,
    pub cost_price: f64,
    pub list_price: f64,
    pub quantity: i64,
    pub discount_percent: Option<f64>,
    pub discount: Option<f64>,
    pub sale_price: f64,
    pub profit: f64,
}

impl ToRow for FactRecord {
    fn to_row(&self) -> Vec<SqlValue> {
        vec![
            self.order_id.into(),
            self.product_id.as_str().into(),
            self.ship_mode_id.into(),
            self.segment_id.into(),
            self.location_id.into(),
            self.order_date.into(),
            self.cost_price.into(),
            self.list_price.into(),
            self.quantity.into(),
            self.discount_percent.into(),
            self.discount.into(),
            self.sale_price.into(),
            self.profit.into(),
        ]
    }
}
