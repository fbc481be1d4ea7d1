//! Analyzer settings loaded from YAML.
//!
//! Every field has a default, so an empty document (or no `--config` at all)
//! yields [`AnalyzerConfig::default`]. Unknown keys are rejected to catch
//! typos early.
//!
//! ```yaml
//! top_products: 5
//! sample_rows: 8
//! unknown_product_label: "(unnamed)"
//! date_order: day-first
//! ```

use std::{fs::File, io::BufReader, path::Path};

use anyhow::{Context, Result, ensure};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

pub const DEFAULT_TOP_PRODUCTS: usize = 10;
pub const DEFAULT_SAMPLE_ROWS: usize = 8;
pub const DEFAULT_UNKNOWN_PRODUCT_LABEL: &str = "Unknown";

/// Field order assumed when a numeric date such as `03/04/2024` is ambiguous.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
#[value(rename_all = "kebab-case")]
pub enum DateOrder {
    #[default]
    MonthFirst,
    DayFirst,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalyzerConfig {
    pub top_products: usize,
    pub sample_rows: usize,
    pub unknown_product_label: String,
    pub date_order: DateOrder,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            top_products: DEFAULT_TOP_PRODUCTS,
            sample_rows: DEFAULT_SAMPLE_ROWS,
            unknown_product_label: DEFAULT_UNKNOWN_PRODUCT_LABEL.to_string(),
            date_order: DateOrder::default(),
        }
    }
}

impl AnalyzerConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("Opening config file {path:?}"))?;
        let reader = BufReader::new(file);
        let config: AnalyzerConfig =
            serde_yaml::from_reader(reader).context("Parsing config YAML")?;
        config.ensure_valid()?;
        Ok(config)
    }

    pub fn from_yaml_str(input: &str) -> Result<Self> {
        let config: AnalyzerConfig = serde_yaml::from_str(input).context("Parsing config YAML")?;
        config.ensure_valid()?;
        Ok(config)
    }

    pub fn ensure_valid(&self) -> Result<()> {
        ensure!(
            !self.unknown_product_label.trim().is_empty(),
            "unknown_product_label cannot be blank"
        );
        Ok(())
    }

    /// Loads `path` when given, otherwise starts from defaults, then applies
    /// any command-line overrides.
    pub fn resolve(
        path: Option<&Path>,
        top_products: Option<usize>,
        sample_rows: Option<usize>,
        date_order: Option<DateOrder>,
    ) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        if let Some(top) = top_products {
            config.top_products = top;
        }
        if let Some(rows) = sample_rows {
            config.sample_rows = rows;
        }
        if let Some(order) = date_order {
            config.date_order = order;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_keeps_remaining_defaults() {
        let config = AnalyzerConfig::from_yaml_str("date_order: day-first\n").unwrap();
        assert_eq!(config.date_order, DateOrder::DayFirst);
        assert_eq!(config.top_products, DEFAULT_TOP_PRODUCTS);
        assert_eq!(config.unknown_product_label, "Unknown");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(AnalyzerConfig::from_yaml_str("top_prodcts: 3\n").is_err());
    }

    #[test]
    fn blank_unknown_label_is_rejected() {
        assert!(AnalyzerConfig::from_yaml_str("unknown_product_label: '  '\n").is_err());
    }

    #[test]
    fn overrides_win_over_defaults() {
        let config = AnalyzerConfig::resolve(None, Some(3), None, Some(DateOrder::DayFirst))
            .expect("resolve config");
        assert_eq!(config.top_products, 3);
        assert_eq!(config.sample_rows, DEFAULT_SAMPLE_ROWS);
        assert_eq!(config.date_order, DateOrder::DayFirst);
    }
}
