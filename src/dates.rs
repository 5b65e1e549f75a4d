//! Date-expression parsing and published-date age buckets.
//!
//! Date entries carry free-text expressions. Only two shapes reduce to a
//! sortable year: a bare four-digit year, and a `YYYY-YYYY` range whose
//! second year wins. Anything else is a non-fatal
//! [`IndexError::DateParse`](crate::IndexError::DateParse): the caller
//! skips the year-derived fields for that entry and keeps the rest of the
//! document.

use crate::error::{IndexError, Result};
use chrono::{Datelike, Utc};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref YEAR: Regex = Regex::new(r"^\d{4}$").unwrap();
    static ref YEAR_RANGE: Regex = Regex::new(r"^\d{4}-\d{4}$").unwrap();
}

/// Bucket label for years more than 50 years ago.
pub const MORE_THAN_50_YEARS: &str = "More than 50 years ago";
/// Bucket label for the last 50 years.
pub const LAST_50_YEARS: &str = "Last 50 years";
/// Bucket label for the last 10 years.
pub const LAST_10_YEARS: &str = "Last 10 years";
/// Bucket label for the last 3 years.
pub const LAST_3_YEARS: &str = "Last 3 years";
/// Bucket label for the last 12 months.
pub const LAST_12_MONTHS: &str = "Last 12 months";

/// Reduce a date expression to a sortable year.
///
/// `"1923"` parses to 1923; `"1923-1925"` parses to 1925.
///
/// # Errors
///
/// Returns [`IndexError::DateParse`] for any other expression shape. This
/// is a non-fatal condition: callers skip the single date entry.
pub fn parse_year(expression: &str) -> Result<i32> {
    if YEAR.is_match(expression) {
        return expression
            .parse()
            .map_err(|_| IndexError::DateParse(expression.to_string()));
    }
    if YEAR_RANGE.is_match(expression) {
        return expression[5..]
            .parse()
            .map_err(|_| IndexError::DateParse(expression.to_string()));
    }
    Err(IndexError::DateParse(expression.to_string()))
}

/// All age-bucket labels matching a year that is `years_ago` in the past.
///
/// Buckets are cumulative, not mutually exclusive: a date two years ago
/// falls in the 50-, 10-, and 3-year buckets at once.
#[must_use]
pub fn age_buckets(years_ago: i32) -> Vec<&'static str> {
    let mut buckets = Vec::new();
    if years_ago > 50 {
        buckets.push(MORE_THAN_50_YEARS);
    }
    if years_ago <= 50 {
        buckets.push(LAST_50_YEARS);
    }
    if years_ago <= 10 {
        buckets.push(LAST_10_YEARS);
    }
    if years_ago <= 3 {
        buckets.push(LAST_3_YEARS);
    }
    if years_ago <= 1 {
        buckets.push(LAST_12_MONTHS);
    }
    buckets
}

/// The current calendar year from the system clock.
#[must_use]
pub fn current_year() -> i32 {
    Utc::now().year()
}
