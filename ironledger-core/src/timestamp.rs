//! Fixed-format timestamps at the storage and display boundary.
//!
//! Workout and weight entries carry minute-precision timestamps written as
//! `YYYY-MM-DD HH:MM`; match dates are written as `YYYY-MM-DD`. Internally
//! everything is a chrono value, so comparisons never depend on string order.

use chrono::{NaiveDate, NaiveDateTime, Timelike};

use crate::errors::{LedgerError, Result};

pub const MINUTE_FORMAT: &str = "%Y-%m-%d %H:%M";
pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn parse_minute(value: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value.trim(), MINUTE_FORMAT).map_err(|_| {
        LedgerError::MalformedTimestamp {
            value: value.to_string(),
            format: "YYYY-MM-DD HH:MM",
        }
    })
}

pub fn format_minute(at: &NaiveDateTime) -> String {
    at.format(MINUTE_FORMAT).to_string()
}

pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| {
        LedgerError::MalformedTimestamp {
            value: value.to_string(),
            format: "YYYY-MM-DD",
        }
    })
}

pub fn format_date(date: &NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Drops seconds and below so a stored value survives a format round trip.
pub fn truncate_to_minute(at: NaiveDateTime) -> NaiveDateTime {
    at.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(at)
}

pub fn now_minute() -> NaiveDateTime {
    truncate_to_minute(chrono::Local::now().naive_local())
}

/// Serde adapter writing a `NaiveDateTime` as `YYYY-MM-DD HH:MM`.
pub mod minute_format {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(at: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&super::format_minute(at))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_minute(&raw).map_err(de::Error::custom)
    }
}
