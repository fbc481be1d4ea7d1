//! Header validation → cleaning → filtering → aggregation.
//!
//! Everything here works on already-decoded input and performs no I/O. The
//! reader in [`crate::io_utils`] produces the headers and records, the
//! command modules serialize whatever comes back.

use log::{debug, warn};
use serde::Serialize;

use crate::{
    aggregate::{AggregateOptions, Analytics, aggregate},
    config::AnalyzerConfig,
    contract::{ColumnContract, HeaderReport},
    error::AnalysisError,
    rows::{CleanedRow, RawRecord, RowCleaner, retain_informative},
};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Warnings {
    pub unexpected_columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub ok: bool,
    pub warnings: Option<Warnings>,
    pub analytics: Analytics,
    pub sample_cleaned_rows: Vec<CleanedRow>,
}

/// Validated and cleaned rows together with the header report that produced
/// them. Rows without any tracked value have already been dropped.
#[derive(Debug, Clone)]
pub struct CleanedTable {
    pub header: HeaderReport,
    pub rows: Vec<CleanedRow>,
    pub dropped: usize,
}

impl CleanedTable {
    pub fn warnings(&self) -> Option<Warnings> {
        (!self.header.unexpected.is_empty()).then(|| Warnings {
            unexpected_columns: self.header.unexpected.clone(),
        })
    }
}

/// Validates `headers` and cleans every record. Fails only on a missing
/// required column.
pub fn clean_table(
    headers: &[String],
    records: &[RawRecord],
    config: &AnalyzerConfig,
) -> Result<CleanedTable, AnalysisError> {
    let header = ColumnContract::STANDARD.validate(headers)?;
    debug!(
        "Header check: {} column(s) found, unexpected {:?}",
        header.found.len(),
        header.unexpected
    );
    if !header.unexpected.is_empty() {
        warn!("Ignoring unexpected column(s): {}", header.unexpected.join(", "));
    }

    let cleaner = RowCleaner::new(header.has_column("review"), config.date_order);
    let rows = retain_informative(records.iter().map(|record| cleaner.clean(record)));
    let dropped = records.len() - rows.len();
    debug!("Cleaned {} row(s), dropped {} empty row(s)", rows.len(), dropped);

    Ok(CleanedTable {
        header,
        rows,
        dropped,
    })
}

pub fn analyze(
    headers: &[String],
    records: &[RawRecord],
    config: &AnalyzerConfig,
) -> Result<AnalysisReport, AnalysisError> {
    let table = clean_table(headers, records, config)?;
    let options = AggregateOptions {
        top_products: config.top_products,
        unknown_product_label: config.unknown_product_label.clone(),
    };
    let analytics = aggregate(&table.rows, &options);
    let warnings = table.warnings();
    let sample_cleaned_rows = table
        .rows
        .into_iter()
        .take(config.sample_rows)
        .collect();

    Ok(AnalysisReport {
        ok: true,
        warnings,
        analytics,
        sample_cleaned_rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::REQUIRED_COLUMNS;

    fn standard_headers() -> Vec<String> {
        REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn clean_table_counts_dropped_rows() {
        let records = vec![
            RawRecord::new().with("product", "Lamp"),
            RawRecord::new().with("product", "  ").with("price", "n/a"),
        ];
        let table = clean_table(&standard_headers(), &records, &AnalyzerConfig::default())
            .expect("clean table");
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.dropped, 1);
        assert!(table.warnings().is_none());
    }

    #[test]
    fn sample_rows_respect_config() {
        let records = (0..5)
            .map(|i| RawRecord::new().with("product", &format!("P{i}")))
            .collect::<Vec<_>>();
        let config = AnalyzerConfig {
            sample_rows: 2,
            ..AnalyzerConfig::default()
        };
        let report = analyze(&standard_headers(), &records, &config).expect("analyze");
        assert_eq!(report.sample_cleaned_rows.len(), 2);
        assert_eq!(report.analytics.total_rows, 5);
    }
}
