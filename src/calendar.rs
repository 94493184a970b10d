// ABOUTME: Calendar helpers for instance keys and ISO week numbering
// ABOUTME: Parses and formats day/week/month keys such as day2026049 and week202608
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Instance keys
//!
//! Sessions, logs and photo logs are bucketed by a calendar period encoded as
//! a compact string:
//!
//! - `day{YYYY}{DDD}`: calendar year and zero-padded ordinal day
//! - `week{YYYY}{WW}`: ISO week-numbering year and zero-padded ISO week
//! - `month{YYYY}{MM}`: calendar year and zero-padded month

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, Months, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult};

/// Calendar period an instance key covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstancePeriod {
    /// A single day
    Day,
    /// An ISO week (Monday..Sunday)
    Week,
    /// A calendar month
    Month,
}

impl InstancePeriod {
    /// Key prefix for this period
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
        }
    }
}

impl FromStr for InstancePeriod {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            other => Err(AppError::invalid_input(format!(
                "Unknown instance period '{other}' (expected day, week or month)"
            ))),
        }
    }
}

/// A parsed instance key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstanceKey {
    /// Period kind
    pub period: InstancePeriod,
    /// First date covered by the period
    pub start_date: NaiveDate,
}

impl InstanceKey {
    /// Key for the day containing `date`
    #[must_use]
    pub const fn day(date: NaiveDate) -> Self {
        Self {
            period: InstancePeriod::Day,
            start_date: date,
        }
    }

    /// Key for the ISO week containing `date`
    #[must_use]
    pub fn week(date: NaiveDate) -> Self {
        let offset = u64::from(date.weekday().num_days_from_monday());
        let start_date = date.checked_sub_days(Days::new(offset)).unwrap_or(date);
        Self {
            period: InstancePeriod::Week,
            start_date,
        }
    }

    /// Key for the month containing `date`
    #[must_use]
    pub fn month(date: NaiveDate) -> Self {
        let start_date = date.with_day(1).unwrap_or(date);
        Self {
            period: InstancePeriod::Month,
            start_date,
        }
    }

    /// Key of the given period for [`today`]
    #[must_use]
    pub fn today(period: InstancePeriod) -> Self {
        let date = today();
        match period {
            InstancePeriod::Day => Self::day(date),
            InstancePeriod::Week => Self::week(date),
            InstancePeriod::Month => Self::month(date),
        }
    }

    /// Last date covered by the period (inclusive)
    #[must_use]
    pub fn end_date(&self) -> NaiveDate {
        match self.period {
            InstancePeriod::Day => self.start_date,
            InstancePeriod::Week => self
                .start_date
                .checked_add_days(Days::new(6))
                .unwrap_or(self.start_date),
            InstancePeriod::Month => self
                .start_date
                .checked_add_months(Months::new(1))
                .and_then(|next| next.pred_opt())
                .unwrap_or(self.start_date),
        }
    }

    /// Human-readable label, e.g. "Wednesday, February 18, 2026"
    #[must_use]
    pub fn label(&self) -> String {
        match self.period {
            InstancePeriod::Day => self.start_date.format("%A, %B %-d, %Y").to_string(),
            InstancePeriod::Week => {
                let iso = self.start_date.iso_week();
                format!(
                    "Week {} of {} ({} to {})",
                    iso.week(),
                    iso.year(),
                    self.start_date.format("%b %-d"),
                    self.end_date().format("%b %-d")
                )
            }
            InstancePeriod::Month => self.start_date.format("%B %Y").to_string(),
        }
    }
}

impl fmt::Display for InstanceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let date = self.start_date;
        match self.period {
            InstancePeriod::Day => write!(f, "day{:04}{:03}", date.year(), date.ordinal()),
            InstancePeriod::Week => {
                let iso = date.iso_week();
                write!(f, "week{:04}{:02}", iso.year(), iso.week())
            }
            InstancePeriod::Month => write!(f, "month{:04}{:02}", date.year(), date.month()),
        }
    }
}

impl FromStr for InstanceKey {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AppError::invalid_input(format!("Invalid instance key '{s}'"));

        let split = s.find(|c: char| c.is_ascii_digit()).ok_or_else(invalid)?;
        let (prefix, digits) = s.split_at(split);
        let period: InstancePeriod = prefix.parse().map_err(|_| invalid())?;

        let expected_len = match period {
            InstancePeriod::Day => 7,
            InstancePeriod::Week | InstancePeriod::Month => 6,
        };
        if digits.len() != expected_len || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let year: i32 = digits[..4].parse().map_err(|_| invalid())?;
        let rest: u32 = digits[4..].parse().map_err(|_| invalid())?;

        let start_date = match period {
            InstancePeriod::Day => NaiveDate::from_yo_opt(year, rest),
            InstancePeriod::Week => NaiveDate::from_isoywd_opt(year, rest, Weekday::Mon),
            InstancePeriod::Month => NaiveDate::from_ymd_opt(year, rest, 1),
        }
        .ok_or_else(invalid)?;

        Ok(Self { period, start_date })
    }
}

/// Validate an instance key string, returning it normalized
///
/// # Errors
///
/// Returns an invalid-input error if the key does not parse
pub fn validate_instance(instance: &str) -> AppResult<String> {
    let key: InstanceKey = instance.trim().parse()?;
    Ok(key.to_string())
}

/// Today's date on the server clock (UTC)
///
/// Every "current" period, prompt date and tool default reads the date here.
#[must_use]
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// ISO `(year, week)` containing `date`
#[must_use]
pub fn iso_week_of(date: NaiveDate) -> (i32, u32) {
    let iso = date.iso_week();
    (iso.year(), iso.week())
}

/// ISO `(year, week)` containing [`today`]
#[must_use]
pub fn current_iso_week() -> (i32, u32) {
    iso_week_of(today())
}

/// Monday..Sunday date range of an ISO week
///
/// # Errors
///
/// Returns an invalid-input error if the week does not exist in that year
pub fn iso_week_range(year: i32, week: u32) -> AppResult<(NaiveDate, NaiveDate)> {
    let monday = NaiveDate::from_isoywd_opt(year, week, Weekday::Mon)
        .ok_or_else(|| AppError::invalid_input(format!("Week {week} does not exist in {year}")))?;
    let sunday = NaiveDate::from_isoywd_opt(year, week, Weekday::Sun)
        .ok_or_else(|| AppError::invalid_input(format!("Week {week} does not exist in {year}")))?;
    Ok((monday, sunday))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_day_key_round_trip() {
        let key: InstanceKey = "day2026049".parse().unwrap();
        assert_eq!(key.period, InstancePeriod::Day);
        assert_eq!(key.start_date, date(2026, 2, 18));
        assert_eq!(InstanceKey::day(date(2026, 2, 18)).to_string(), "day2026049");
    }

    #[test]
    fn test_week_key_uses_iso_year() {
        // 2027-01-01 is a Friday in ISO week 53 of 2026
        let key = InstanceKey::week(date(2027, 1, 1));
        assert_eq!(key.to_string(), "week202653");
        assert_eq!(key.start_date, date(2026, 12, 28));
        assert_eq!(key.end_date(), date(2027, 1, 3));

        let parsed: InstanceKey = "week202653".parse().unwrap();
        assert_eq!(parsed, key);
    }

    #[test]
    fn test_month_key_and_range() {
        let key: InstanceKey = "month202602".parse().unwrap();
        assert_eq!(key.start_date, date(2026, 2, 1));
        assert_eq!(key.end_date(), date(2026, 2, 28));
        assert_eq!(InstanceKey::month(date(2026, 2, 14)).to_string(), "month202602");
    }

    #[test]
    fn test_invalid_keys_rejected() {
        for bad in [
            "",
            "day",
            "year2026",
            "day20260",
            "day2026367",
            "day2025000",
            "week202654",
            "month202613",
            "month2026001",
            "day2026O49",
        ] {
            assert!(bad.parse::<InstanceKey>().is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn test_iso_week_of_matches_week_key() {
        assert_eq!(iso_week_of(date(2026, 2, 22)), (2026, 8));
        assert_eq!(iso_week_of(date(2026, 2, 23)), (2026, 9));
        assert_eq!(iso_week_of(date(2027, 1, 1)), (2026, 53));

        let sunday = date(2026, 2, 22);
        let (year, week) = iso_week_of(sunday);
        assert_eq!(
            InstanceKey::week(sunday).to_string(),
            format!("week{year:04}{week:02}")
        );
    }

    #[test]
    fn test_iso_week_range() {
        let (monday, sunday) = iso_week_range(2026, 8).unwrap();
        assert_eq!(monday, date(2026, 2, 16));
        assert_eq!(sunday, date(2026, 2, 22));
        assert!(iso_week_range(2025, 53).is_err());
    }

    #[test]
    fn test_validate_instance_trims() {
        assert_eq!(validate_instance(" day2026049 ").unwrap(), "day2026049");
    }
}
