// retail-etl-core/src/domain/dimension.rs

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;

use crate::domain::calendar::DateParts;
use crate::domain::order::OrderRecord;
use crate::ports::SqlValue;

/// Anything that can be bound to an insert template, in template column order.
pub trait ToRow {
    fn to_row(&self) -> Vec<SqlValue>;
}

/// Natural key of `dim_location`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct LocationKey {
    pub postal_code: Option<i64>,
    pub city: String,
    pub state: String,
    pub country: String,
    pub region: String,
}

impl LocationKey {
    pub fn of(record: &OrderRecord) -> Self {
        Self {
            postal_code: record.postal_code,
            city: record.city.clone(),
            state: record.state.clone(),
            country: record.country.clone(),
            region: record.region.clone(),
        }
    }
}

impl fmt::Display for LocationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let postal = self
            .postal_code
            .map_or_else(|| "-".to_string(), |p| p.to_string());
        write!(
            f,
            "({}, {}, {}, {}, {})",
            postal, self.city, self.state, self.country, self.region
        )
    }
}

// Column order: (postal_code, country, city, state, region)
impl ToRow for LocationKey {
    fn to_row(&self) -> Vec<SqlValue> {
        vec![
            self.postal_code.into(),
            self.country.as_str().into(),
            self.city.as_str().into(),
            self.state.as_str().into(),
            self.region.as_str().into(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShipMode(pub String);

impl ToRow for ShipMode {
    fn to_row(&self) -> Vec<SqlValue> {
        vec![self.0.as_str().into()]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Segment(pub String);

impl ToRow for Segment {
    fn to_row(&self) -> Vec<SqlValue> {
        vec![self.0.as_str().into()]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Product {
    pub product_id: String,
    pub category: String,
    pub sub_category: String,
}

impl ToRow for Product {
    fn to_row(&self) -> Vec<SqlValue> {
        vec![
            self.product_id.as_str().into(),
            self.category.as_str().into(),
            self.sub_category.as_str().into(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub parts: DateParts,
}

impl ToRow for CalendarDay {
    fn to_row(&self) -> Vec<SqlValue> {
        let p = &self.parts;
        vec![
            self.date.into(),
            i64::from(p.year).into(),
            i64::from(p.quarter).into(),
            i64::from(p.month).into(),
            i64::from(p.week).into(),
            i64::from(p.day).into(),
            p.day_name.as_str().into(),
            p.is_weekend.into(),
        ]
    }
}

/// Drops repeated values, keeping the first occurrence and the input order.
pub fn distinct<T, I>(items: I) -> Vec<T>
where
    T: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distinct_keeps_first_seen_order() {
        let modes = ["Second Class", "Standard Class", "Second Class", "First Class"]
            .into_iter()
            .map(|m| ShipMode(m.to_string()));
        let unique = distinct(modes);
        let names: Vec<&str> = unique.iter().map(|m| m.0.as_str()).collect();
        assert_eq!(names, vec!["Second Class", "Standard Class", "First Class"]);
    }

    #[test]
    fn test_location_row_column_order() {
        let key = LocationKey {
            postal_code: Some(42420),
            city: "Henderson".into(),
            state: "Kentucky".into(),
            country: "United States".into(),
            region: "South".into(),
        };
        assert_eq!(
            key.to_row(),
            vec![
                SqlValue::Int(42420),
                SqlValue::Text("United States".into()),
                SqlValue::Text("Henderson".into()),
                SqlValue::Text("Kentucky".into()),
                SqlValue::Text("South".into()),
            ]
        );
        assert_eq!(
            key.to_string(),
            "(42420, Henderson, Kentucky, United States, South)"
        );
    }

    #[test]
    fn test_location_without_postal_code_binds_null() {
        let key = LocationKey {
            postal_code: None,
            city: "Burlington".into(),
            state: "Vermont".into(),
            country: "United States".into(),
            region: "East".into(),
        };
        assert!(key.to_row()[0].is_null());
    }
}
