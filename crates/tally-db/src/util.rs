use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::fmt::Display;
use tally_core::error::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("json encode failed: {message}")]
    JsonEncode { message: String },
    #[error("invalid timestamp: {value}")]
    InvalidTimestamp { value: String },
    #[error("value out of range: {value}")]
    OutOfRange { value: String },
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        StoreError::InvalidRow {
            message: value.to_string(),
        }
    }
}

pub fn query_error(err: impl Display) -> StoreError {
    StoreError::Query {
        message: err.to_string(),
    }
}

/// Fixed-width UTC form, so text comparison in SQL orders chronologically.
pub fn to_rfc3339(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn from_rfc3339(value: &str) -> Result<DateTime<Utc>, DbError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| DbError::InvalidTimestamp {
            value: value.to_string(),
        })
}

pub fn encode_json<T: Serialize>(value: &T) -> Result<String, DbError> {
    serde_json::to_string(value).map_err(|err| DbError::JsonEncode {
        message: err.to_string(),
    })
}

pub fn to_sql_int(value: u64) -> Result<i64, DbError> {
    i64::try_from(value).map_err(|_| DbError::OutOfRange {
        value: value.to_string(),
    })
}

pub fn from_sql_int(value: i64) -> Result<u64, DbError> {
    u64::try_from(value).map_err(|_| DbError::OutOfRange {
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn timestamps_are_fixed_width() {
        let whole = Utc.with_ymd_and_hms(2026, 2, 3, 10, 0, 0).unwrap();
        let fractional = whole + chrono::TimeDelta::microseconds(421_955);

        assert_eq!(to_rfc3339(&whole), "2026-02-03T10:00:00.000000Z");
        assert_eq!(to_rfc3339(&fractional), "2026-02-03T10:00:00.421955Z");
        assert!(to_rfc3339(&whole) < to_rfc3339(&fractional));
        assert_eq!(from_rfc3339(&to_rfc3339(&fractional)).unwrap(), fractional);
    }

    #[test]
    fn negative_ints_are_rejected() {
        assert!(from_sql_int(-1).is_err());
        assert_eq!(from_sql_int(7).unwrap(), 7);
    }
}
