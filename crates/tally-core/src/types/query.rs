use crate::error::QueryError;
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// Caller-supplied lookback window and result cap, as received.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowQuery {
    pub days: i64,
    pub limit: i64,
}

/// A validated window anchored at a concrete instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub limit: u32,
}

impl WindowQuery {
    pub fn new(days: i64, limit: i64) -> Self {
        Self { days, limit }
    }

    pub fn resolve(&self, now: DateTime<Utc>) -> Result<Window, QueryError> {
        if self.days <= 0 {
            return Err(QueryError::InvalidInput {
                message: "days must be a positive integer".to_string(),
            });
        }
        if self.limit <= 0 {
            return Err(QueryError::InvalidInput {
                message: "limit must be a positive integer".to_string(),
            });
        }
        let limit = u32::try_from(self.limit).map_err(|_| QueryError::InvalidInput {
            message: "limit is too large".to_string(),
        })?;
        let start = TimeDelta::try_days(self.days)
            .and_then(|span| now.checked_sub_signed(span))
            .ok_or_else(|| QueryError::InvalidInput {
                message: "days is too large".to_string(),
            })?;
        Ok(Window {
            start,
            end: now,
            limit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 3, 12, 0, 0).unwrap()
    }

    #[test]
    fn resolves_window_start() {
        let window = WindowQuery::new(2, 5).resolve(now()).unwrap();
        assert_eq!(window.start, Utc.with_ymd_and_hms(2026, 2, 1, 12, 0, 0).unwrap());
        assert_eq!(window.end, now());
        assert_eq!(window.limit, 5);
    }

    #[test]
    fn rejects_non_positive_values() {
        assert!(WindowQuery::new(0, 5).resolve(now()).is_err());
        assert!(WindowQuery::new(-1, 5).resolve(now()).is_err());
        assert!(WindowQuery::new(30, 0).resolve(now()).is_err());
        assert!(WindowQuery::new(30, -10).resolve(now()).is_err());
    }

    #[test]
    fn rejects_out_of_range_values() {
        assert!(WindowQuery::new(i64::MAX, 5).resolve(now()).is_err());
        assert!(WindowQuery::new(30, i64::MAX).resolve(now()).is_err());
    }
}
