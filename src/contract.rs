//! Column contract and header validation.
//!
//! The input file must carry every [`REQUIRED_COLUMNS`] entry and may carry
//! [`OPTIONAL_COLUMNS`]. Anything else is reported back as unexpected but
//! never blocks processing. Comparison happens on normalized names (see
//! [`normalize_header`]), so header order, case and surrounding whitespace are
//! irrelevant.

use std::collections::HashSet;

use crate::error::AnalysisError;

pub const REQUIRED_COLUMNS: &[&str] = &["product", "price", "rating", "instock", "launch_date"];
pub const OPTIONAL_COLUMNS: &[&str] = &["review"];

/// Canonical form used for every header comparison: trimmed, BOM-stripped,
/// lower-cased.
pub fn normalize_header(name: &str) -> String {
    name.trim_start_matches('\u{feff}').trim().to_lowercase()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnContract {
    pub required: &'static [&'static str],
    pub optional: &'static [&'static str],
}

impl Default for ColumnContract {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl ColumnContract {
    pub const STANDARD: ColumnContract = ColumnContract {
        required: REQUIRED_COLUMNS,
        optional: OPTIONAL_COLUMNS,
    };

    pub fn is_known(&self, column: &str) -> bool {
        self.required.contains(&column) || self.optional.contains(&column)
    }

    /// Compares normalized `headers` against the contract. Blank header cells
    /// (typically left behind by a trailing delimiter) are ignored.
    pub fn check(&self, headers: &[String]) -> HeaderReport {
        let present = headers
            .iter()
            .map(|h| normalize_header(h))
            .filter(|h| !h.is_empty())
            .collect::<Vec<_>>();
        let lookup = present.iter().map(String::as_str).collect::<HashSet<_>>();

        let missing = self
            .required
            .iter()
            .filter(|column| !lookup.contains(*column))
            .map(|column| column.to_string())
            .collect();

        let mut seen = HashSet::new();
        let unexpected = present
            .iter()
            .filter(|column| !self.is_known(column))
            .filter(|column| seen.insert(column.as_str()))
            .cloned()
            .collect();

        HeaderReport {
            missing,
            unexpected,
            found: present,
        }
    }

    /// Runs [`ColumnContract::check`] and converts a missing required column
    /// into [`AnalysisError::Schema`].
    pub fn validate(&self, headers: &[String]) -> Result<HeaderReport, AnalysisError> {
        let report = self.check(headers);
        if report.missing.is_empty() {
            return Ok(report);
        }
        Err(AnalysisError::Schema {
            missing: report.missing,
            required: self.required.iter().map(|c| c.to_string()).collect(),
            found: report.found,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderReport {
    pub missing: Vec<String>,
    pub unexpected: Vec<String>,
    pub found: Vec<String>,
}

impl HeaderReport {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.found.iter().any(|found| found == column)
    }
}
