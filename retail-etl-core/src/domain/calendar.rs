// retail-etl-core/src/domain/calendar.rs

use chrono::format::{Item, StrftimeItems};
use chrono::{Datelike, NaiveDate, NaiveDateTime, Weekday};
use serde::Serialize;

use crate::domain::error::DomainError;

pub const DEFAULT_DATE_FORMATS: [&str; 5] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d-%m-%Y",
    "%Y-%m-%d %H:%M:%S",
];

/// Calendar attributes stored in `dim_date`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DateParts {
    pub year: i32,
    pub quarter: u32,
    pub month: u32,
    /// ISO 8601 week number.
    pub week: u32,
    pub day: u32,
    pub day_name: String,
    pub is_weekend: bool,
}

impl DateParts {
    pub fn derive(date: NaiveDate) -> Self {
        let month = date.month();
        let weekday = date.weekday();
        Self {
            year: date.year(),
            quarter: (month - 1) / 3 + 1,
            month,
            week: date.iso_week().week(),
            day: date.day(),
            day_name: day_name(weekday).to_string(),
            is_weekend: matches!(weekday, Weekday::Sat | Weekday::Sun),
        }
    }
}

pub fn day_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Parses an order date with the first format that accepts it.
/// Returns `None` for blanks and for values no format understands.
pub fn parse_order_date<S: AsRef<str>>(raw: &str, formats: &[S]) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    formats.iter().find_map(|format| {
        let format = format.as_ref();
        NaiveDate::parse_from_str(raw, format)
            .ok()
            .or_else(|| {
                NaiveDateTime::parse_from_str(raw, format)
                    .ok()
                    .map(|dt| dt.date())
            })
    })
}

/// Rejects strftime patterns chrono cannot interpret.
pub fn validate_date_format(format: &str) -> Result<(), DomainError> {
    if format.trim().is_empty() {
        return Err(DomainError::InvalidDateFormat {
            format: format.to_string(),
            reason: "empty pattern".into(),
        });
    }
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(DomainError::InvalidDateFormat {
            format: format.to_string(),
            reason: "unknown specifier".into(),
        });
    }
    Ok(())
}
