use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::DateOrder;

#[derive(Debug, Parser)]
#[command(author, version, about = "Clean messy product CSV files and report aggregate statistics", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Validate, clean and aggregate a CSV file into a JSON report
    Analyze(AnalyzeArgs),
    /// Write the validated and cleaned rows back out as CSV
    Clean(CleanArgs),
    /// Preview the first cleaned rows in a formatted table
    Preview(PreviewArgs),
    /// List the required and optional input columns
    Columns,
}

/// Options shared by every command that reads an input file.
#[derive(Debug, Clone, Args)]
pub struct InputArgs {
    /// Input CSV file (`-` reads stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// YAML file with analyzer settings
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,
    /// Field order for ambiguous numeric dates such as 03/04/2024
    #[arg(long = "date-order", value_enum)]
    pub date_order: Option<DateOrder>,
    /// Maximum data rows to read (0 = all)
    #[arg(long, default_value_t = 0)]
    pub limit: usize,
}

impl InputArgs {
    pub fn row_limit(&self) -> Option<usize> {
        (self.limit > 0).then_some(self.limit)
    }
}

#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
#[value(rename_all = "kebab-case")]
pub enum ReportFormat {
    #[default]
    Json,
    Table,
}

#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub source: InputArgs,
    /// Output JSON file (stdout if omitted)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// Report layout
    #[arg(long, value_enum, default_value = "json")]
    pub format: ReportFormat,
    /// Emit single-line JSON instead of pretty-printed
    #[arg(long)]
    pub compact: bool,
    /// Number of products to keep in the ranking
    #[arg(long = "top")]
    pub top: Option<usize>,
    /// Number of cleaned rows to include as a sample
    #[arg(long = "sample-rows")]
    pub sample_rows: Option<usize>,
}

#[derive(Debug, Args)]
pub struct CleanArgs {
    #[command(flatten)]
    pub source: InputArgs,
    /// Output CSV file (stdout if omitted)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// Delimiter to use for output (defaults to input delimiter)
    #[arg(long = "output-delimiter", value_parser = parse_delimiter)]
    pub output_delimiter: Option<u8>,
}

#[derive(Debug, Args)]
pub struct PreviewArgs {
    #[command(flatten)]
    pub source: InputArgs,
    /// Number of cleaned rows to display
    #[arg(long, default_value_t = 10)]
    pub rows: usize,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_delimiter_accepts_named_values() {
        assert_eq!(parse_delimiter("tab"), Ok(b'\t'));
        assert_eq!(parse_delimiter("semicolon"), Ok(b';'));
        assert!(parse_delimiter("").is_err());
        assert!(parse_delimiter("ab").is_err());
    }

    #[test]
    fn analyze_flags_parse() {
        let cli = Cli::try_parse_from([
            "csv-insights",
            "analyze",
            "-i",
            "items.csv",
            "--date-order",
            "day-first",
            "--top",
            "3",
            "--format",
            "table",
        ])
        .expect("parse args");
        match cli.command {
            Commands::Analyze(args) => {
                assert_eq!(args.source.date_order, Some(DateOrder::DayFirst));
                assert_eq!(args.top, Some(3));
                assert_eq!(args.format, ReportFormat::Table);
                assert_eq!(args.source.row_limit(), None);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
