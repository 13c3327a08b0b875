use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;
use std::fmt;

use crate::core::{AppError, Result};

const WEEKDAY_NAMES: [&str; 7] = ["周一", "周二", "周三", "周四", "周五", "周六", "周日"];

/// Parse a `YYYY-MM-DD` request parameter
pub fn parse_date(field: &str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        AppError::validation(format!(
            "Invalid {}: '{}'. Expected YYYY-MM-DD",
            field, value
        ))
    })
}

/// Chinese weekday label (`周一` .. `周日`)
pub fn weekday_label(date: NaiveDate) -> &'static str {
    WEEKDAY_NAMES[date.weekday().num_days_from_monday() as usize]
}

/// Month/day label used on daily sheets (`12月05日`)
pub fn month_day_label(date: NaiveDate) -> String {
    date.format("%m月%d日").to_string()
}

/// Compact date used in file names (`20251205`)
pub fn compact(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

/// Inclusive date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Create a range, rejecting `start > end`
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(AppError::validation(format!(
                "start date ({}) must be before or equal to end date ({})",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    /// Parse both ends from request strings
    pub fn parse(start_field: &str, start: &str, end_field: &str, end: &str) -> Result<Self> {
        let start = parse_date(start_field, start)?;
        let end = parse_date(end_field, end)?;
        Self::new(start, end)
    }

    pub fn single_day(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    /// The `days`-day window ending on `date` (inclusive)
    pub fn trailing(date: NaiveDate, days: i64) -> Self {
        Self {
            start: date - Duration::days(days.max(1) - 1),
            end: date,
        }
    }

    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Sheet label, e.g. `2025.11.10-2025.11.16`
    pub fn label(&self) -> String {
        format!(
            "{}-{}",
            self.start.format("%Y.%m.%d"),
            self.end.format("%Y.%m.%d")
        )
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}
