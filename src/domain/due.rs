//! Due-date expression resolution
//!
//! A due expression is either an absolute date ("2025-03-01",
//! "2025-03-01 14:30", RFC 3339) or a relative offset from now
//! ("3 days", "week", "-2 months"). Relative expressions end with a
//! unit word, optionally pluralized; the prefix is a signed magnitude
//! defaulting to 1. Month and year offsets use calendar arithmetic,
//! so adding one month to 2024-01-31 lands on 2024-02-29.

use chrono::{DateTime, Duration, Months, NaiveDate, NaiveDateTime, TimeZone, Utc};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DueDateError {
    #[error("unrecognized due date expression: '{0}'")]
    Unparseable(String),

    #[error("due date out of range: '{0}'")]
    OutOfRange(String),
}

/// Offset unit for relative expressions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Unit {
    Day,
    Week,
    Month,
    Year,
}

/// Unit suffixes in match order. Plural forms come first so that
/// stripping "days" from "3 days" does not leave a trailing "s".
const UNITS: [(&str, Unit); 8] = [
    ("days", Unit::Day),
    ("day", Unit::Day),
    ("weeks", Unit::Week),
    ("week", Unit::Week),
    ("months", Unit::Month),
    ("month", Unit::Month),
    ("years", Unit::Year),
    ("year", Unit::Year),
];

/// Resolves a due expression to an absolute instant.
///
/// Absolute formats are tried first; anything else must be a relative
/// offset. Resolution is pure: the caller persists nothing until it
/// has an `Ok` value.
pub fn resolve(expr: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>, DueDateError> {
    let expr = expr.trim();
    if expr.is_empty() {
        return Err(DueDateError::Unparseable(expr.to_string()));
    }

    if let Some(instant) = parse_absolute(expr) {
        return Ok(instant);
    }

    parse_relative(expr, now)
}

fn parse_absolute(expr: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(expr) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(dt) = NaiveDateTime::parse_from_str(expr, "%Y-%m-%d %H:%M") {
        return Some(Utc.from_utc_datetime(&dt));
    }

    for fmt in ["%Y-%m-%d", "%d.%m.%Y", "%Y/%m/%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(expr, fmt) {
            let midnight = date.and_hms_opt(0, 0, 0)?;
            return Some(Utc.from_utc_datetime(&midnight));
        }
    }

    None
}

fn parse_relative(expr: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>, DueDateError> {
    let lowered = expr.to_lowercase();

    // First matching unit wins; the remaining prefix must stand alone
    // as a magnitude, so "2 birthdays" fails instead of matching "days".
    let (prefix, unit) = UNITS
        .iter()
        .find_map(|(suffix, unit)| lowered.strip_suffix(suffix).map(|rest| (rest, *unit)))
        .ok_or_else(|| DueDateError::Unparseable(expr.to_string()))?;

    let prefix = prefix.trim();
    let magnitude: i32 = if prefix.is_empty() {
        1
    } else {
        prefix
            .parse()
            .map_err(|_| DueDateError::Unparseable(expr.to_string()))?
    };

    apply_offset(now, magnitude, unit).ok_or_else(|| DueDateError::OutOfRange(expr.to_string()))
}

fn apply_offset(now: DateTime<Utc>, magnitude: i32, unit: Unit) -> Option<DateTime<Utc>> {
    match unit {
        Unit::Day => now.checked_add_signed(Duration::days(i64::from(magnitude))),
        Unit::Week => now.checked_add_signed(Duration::weeks(i64::from(magnitude))),
        Unit::Month => add_months(now, magnitude),
        Unit::Year => add_months(now, magnitude.checked_mul(12)?),
    }
}

fn add_months(now: DateTime<Utc>, months: i32) -> Option<DateTime<Utc>> {
    if months >= 0 {
        now.checked_add_months(Months::new(months as u32))
    } else {
        now.checked_sub_months(Months::new(months.unsigned_abs()))
    }
}
