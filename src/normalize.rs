//! Field normalizers.
//!
//! Each function turns raw cell text (or an absent cell) into a typed value.
//! None of them can fail: anything that cannot be interpreted collapses to
//! `None`, so dirty input never aborts a run.

use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate};
use regex::Regex;

use crate::config::DateOrder;

const CURRENCY_SYMBOLS: &[char] = &['$', '£', '€'];
const THOUSANDS_SEPARATOR: char = ',';

const TRUE_TOKENS: &[&str] = &["true", "t", "yes", "y", "1", "in stock", "instock"];
const FALSE_TOKENS: &[&str] = &["false", "f", "no", "n", "0", "out of stock", "oos"];

const CANONICAL_DATE_FORMAT: &str = "%Y-%m-%d";

const YEAR_FIRST_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y.%m.%d",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
];
const NAMED_MONTH_FORMATS: &[&str] = &[
    "%B %d, %Y",
    "%B %d %Y",
    "%d %B %Y",
    "%d %B, %Y",
    "%a, %d %B %Y",
    "%A, %B %d, %Y",
];
// Two-digit-year variants come first: `%Y` would happily read "24" as year 24.
const MONTH_FIRST_FORMATS: &[&str] = &[
    "%m/%d/%y",
    "%m/%d/%Y",
    "%m-%d-%y",
    "%m-%d-%Y",
    "%m.%d.%Y",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];
const DAY_FIRST_FORMATS: &[&str] = &[
    "%d/%m/%y",
    "%d/%m/%Y",
    "%d-%m-%y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

/// Tri-state stock flag. `Unknown` means a value was present but matched
/// neither token set, which is different from an empty cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StockStatus {
    InStock,
    OutOfStock,
    Unknown,
}

impl StockStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockStatus::InStock => "true",
            StockStatus::OutOfStock => "false",
            StockStatus::Unknown => "unknown",
        }
    }
}

impl serde::Serialize for StockStatus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            StockStatus::InStock => serializer.serialize_bool(true),
            StockStatus::OutOfStock => serializer.serialize_bool(false),
            StockStatus::Unknown => serializer.serialize_str("unknown"),
        }
    }
}

pub fn trim_to_option(raw: Option<&str>) -> Option<String> {
    let trimmed = raw?.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Parses a number after dropping currency symbols and thousands separators.
/// Non-finite results (`inf`, `NaN`) count as unparseable.
pub fn parse_number(raw: Option<&str>) -> Option<f64> {
    let trimmed = raw?.trim();
    if trimmed.is_empty() {
        return None;
    }
    let stripped = trimmed
        .chars()
        .filter(|c| !CURRENCY_SYMBOLS.contains(c) && *c != THOUSANDS_SEPARATOR)
        .collect::<String>();
    let value = stripped.trim().parse::<f64>().ok()?;
    value.is_finite().then_some(value)
}

pub fn parse_stock_status(raw: Option<&str>) -> Option<StockStatus> {
    let lowered = raw?.trim().to_lowercase();
    if lowered.is_empty() {
        return None;
    }
    let status = if TRUE_TOKENS.contains(&lowered.as_str()) {
        StockStatus::InStock
    } else if FALSE_TOKENS.contains(&lowered.as_str()) {
        StockStatus::OutOfStock
    } else {
        StockStatus::Unknown
    };
    Some(status)
}

fn iso_date_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("valid date regex"))
}

/// Returns a `YYYY-MM-DD` string. Text already in that shape passes through
/// untouched; anything else goes through [`parse_calendar_date`].
pub fn normalize_date(raw: Option<&str>, order: DateOrder) -> Option<String> {
    let trimmed = raw?.trim();
    if trimmed.is_empty() {
        return None;
    }
    if iso_date_pattern().is_match(trimmed) {
        return Some(trimmed.to_string());
    }
    parse_calendar_date(trimmed, order).map(|date| date.format(CANONICAL_DATE_FORMAT).to_string())
}

/// Permissive date parser.
///
/// Numeric day/month layouts are tried in `order`, then in the opposite
/// order, so `14/03/2024` still resolves under month-first while `03/04/2024`
/// always follows `order`. They run before the year-first layouts because
/// `%Y` accepts short years and would read `03/04/24` as year 3. Timestamps
/// with an offset keep the calendar date as written; no conversion to the
/// host time zone happens.
pub fn parse_calendar_date(text: &str, order: DateOrder) -> Option<NaiveDate> {
    let (preferred, fallback) = match order {
        DateOrder::MonthFirst => (MONTH_FIRST_FORMATS, DAY_FIRST_FORMATS),
        DateOrder::DayFirst => (DAY_FIRST_FORMATS, MONTH_FIRST_FORMATS),
    };
    preferred
        .iter()
        .chain(fallback.iter())
        .chain(YEAR_FIRST_FORMATS.iter())
        .chain(NAMED_MONTH_FORMATS.iter())
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|dt| dt.date_naive())
        })
        .or_else(|| {
            DateTime::parse_from_rfc2822(text)
                .ok()
                .map(|dt| dt.date_naive())
        })
}
