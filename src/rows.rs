//! Raw and cleaned row types plus the cleaning and filtering steps between
//! them.
//!
//! [`RowCleaner::clean`] is total: every [`RawRecord`] yields a
//! [`CleanedRow`]. Rows that end up carrying nothing in any tracked field are
//! then dropped by [`retain_informative`] before aggregation.

use serde::Serialize;

use crate::{
    config::DateOrder,
    contract::normalize_header,
    normalize::{StockStatus, normalize_date, parse_number, parse_stock_status, trim_to_option},
};

pub const RATING_MIN: f64 = 0.0;
pub const RATING_MAX: f64 = 5.0;

/// Cleaned output columns, in serialization order.
pub const CLEANED_COLUMNS: &[&str] = &[
    "product",
    "price",
    "rating",
    "instock",
    "review",
    "launch_date",
];

/// One input row keyed by normalized column name. A column missing from the
/// map (short row, or header never present) reads as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    fields: Vec<(String, String)>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder used by tests and callers assembling rows by hand.
    pub fn with(mut self, column: &str, value: &str) -> Self {
        self.insert(column, value);
        self
    }

    /// Pairs `headers` with `values` positionally. Extra values beyond the
    /// header count are ignored; missing trailing values stay absent.
    pub fn from_pairs<'a, H, V>(headers: H, values: V) -> Self
    where
        H: IntoIterator<Item = &'a str>,
        V: IntoIterator<Item = &'a str>,
    {
        let mut record = Self::new();
        for (header, value) in headers.into_iter().zip(values) {
            record.insert(header, value);
        }
        record
    }

    /// First occurrence of a column wins.
    pub fn insert(&mut self, column: &str, value: &str) {
        let key = normalize_header(column);
        if key.is_empty() || self.fields.iter().any(|(name, _)| *name == key) {
            return;
        }
        self.fields.push((key, value.to_string()));
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CleanedRow {
    pub product: Option<String>,
    pub price: Option<f64>,
    pub rating: Option<f64>,
    pub instock: Option<StockStatus>,
    pub review: Option<String>,
    pub launch_date: Option<String>,
}

impl CleanedRow {
    /// True when at least one tracked field (everything except `review`)
    /// holds a value. `StockStatus::Unknown` counts as a value.
    pub fn carries_information(&self) -> bool {
        self.product.is_some()
            || self.price.is_some()
            || self.rating.is_some()
            || self.instock.is_some()
            || self.launch_date.is_some()
    }

    /// Calendar month bucket (`YYYY-MM`) derived from `launch_date`.
    pub fn launch_month(&self) -> Option<&str> {
        self.launch_date.as_deref().and_then(|date| date.get(..7))
    }

    /// Text cells in [`CLEANED_COLUMNS`] order; absent values render empty.
    pub fn to_record(&self) -> Vec<String> {
        vec![
            self.product.clone().unwrap_or_default(),
            format_optional_number(self.price),
            format_optional_number(self.rating),
            self.instock
                .map(|status| status.as_str().to_string())
                .unwrap_or_default(),
            self.review.clone().unwrap_or_default(),
            self.launch_date.clone().unwrap_or_default(),
        ]
    }
}

fn format_optional_number(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Clamps into `[RATING_MIN, RATING_MAX]`; negative zero comes back as `0.0`.
pub fn clamp_rating(rating: f64) -> f64 {
    let clamped = rating.clamp(RATING_MIN, RATING_MAX);
    if clamped == 0.0 { 0.0 } else { clamped }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RowCleaner {
    review_present: bool,
    date_order: DateOrder,
}

impl RowCleaner {
    /// `review_present` reflects whether the optional `review` column was in
    /// the header row. Without it, no review lookup is attempted.
    pub fn new(review_present: bool, date_order: DateOrder) -> Self {
        Self {
            review_present,
            date_order,
        }
    }

    pub fn clean(&self, raw: &RawRecord) -> CleanedRow {
        let review = if self.review_present {
            trim_to_option(raw.get("review"))
        } else {
            None
        };
        CleanedRow {
            product: trim_to_option(raw.get("product")),
            price: parse_number(raw.get("price")),
            rating: parse_number(raw.get("rating")).map(clamp_rating),
            instock: parse_stock_status(raw.get("instock")),
            review,
            launch_date: normalize_date(raw.get("launch_date"), self.date_order),
        }
    }
}

/// Drops rows with no value in any tracked field.
pub fn retain_informative<I>(rows: I) -> Vec<CleanedRow>
where
    I: IntoIterator<Item = CleanedRow>,
{
    rows.into_iter()
        .filter(CleanedRow::carries_information)
        .collect()
}
