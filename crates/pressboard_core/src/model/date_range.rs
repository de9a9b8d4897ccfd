//! Date parsing and range normalization for API filters and strategic weeks.
//!
//! # Invariants
//! - A normalized range always has `start <= end`.
//! - Dates are sent to the API as `YYYY-MM-DD`.

use crate::model::validation::ValidationError;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

const API_DATE_FORMAT: &str = "%Y-%m-%d";

static ISO_DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{4})-(\d{2})-(\d{2})(?:[T ].*)?$").expect("valid iso date regex")
});
static DMY_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{2})/(\d{2})/(\d{4})$").expect("valid dmy date regex"));

/// Parses `YYYY-MM-DD`, an ISO timestamp (date part only) or `DD/MM/YYYY`.
pub fn parse_api_date(value: &str) -> Result<NaiveDate, ValidationError> {
    let trimmed = value.trim();
    let parsed = if let Some(caps) = ISO_DATE_RE.captures(trimmed) {
        ymd(&caps[1], &caps[2], &caps[3])
    } else if let Some(caps) = DMY_DATE_RE.captures(trimmed) {
        ymd(&caps[3], &caps[2], &caps[1])
    } else {
        None
    };
    parsed.ok_or_else(|| ValidationError::InvalidDate(trimmed.to_string()))
}

/// Formats a date the way the API expects it.
pub fn format_api_date(date: NaiveDate) -> String {
    date.format(API_DATE_FORMAT).to_string()
}

fn ymd(year: &str, month: &str, day: &str) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}

/// Inclusive date range used by list filters and strategic weeks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Builds a range, swapping reversed bounds.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        if end < start {
            Self {
                start: end,
                end: start,
            }
        } else {
            Self { start, end }
        }
    }

    /// Normalizes raw picker input into a range.
    ///
    /// Rules:
    /// - blank/missing on both ends: no range.
    /// - one end missing: a single-day range on the present end.
    /// - reversed ends: swapped.
    ///
    /// # Errors
    /// - `InvalidDate` when a present end does not parse.
    pub fn normalize(
        start: Option<&str>,
        end: Option<&str>,
    ) -> Result<Option<Self>, ValidationError> {
        let start = non_blank(start).map(parse_api_date).transpose()?;
        let end = non_blank(end).map(parse_api_date).transpose()?;
        Ok(match (start, end) {
            (Some(start), Some(end)) => Some(Self::new(start, end)),
            (Some(day), None) | (None, Some(day)) => Some(Self::new(day, day)),
            (None, None) => None,
        })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Query parameters for list endpoints.
    pub fn query_pairs(&self) -> [(&'static str, String); 2] {
        [
            ("startDate", format_api_date(self.start)),
            ("endDate", format_api_date(self.end)),
        ]
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

/// Serde adapter for API date fields.
pub mod api_date {
    use super::{format_api_date, parse_api_date};
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_api_date(*date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_api_date(&raw).map_err(serde::de::Error::custom)
    }
}
