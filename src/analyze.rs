use std::{io::Write, path::Path};

use anyhow::{Context, Result};
use log::{error, info, warn};
use serde::Serialize;

use crate::{
    aggregate::{Analytics, NumericSummary},
    cli::{AnalyzeArgs, InputArgs, ReportFormat},
    config::AnalyzerConfig,
    error::AnalysisError,
    io_utils, load_input,
    pipeline::{self, AnalysisReport},
    table,
};

pub fn execute(args: &AnalyzeArgs) -> Result<()> {
    let outcome = crate::resolve_config(&args.source, args.top, args.sample_rows)
        .map_err(|err| AnalysisError::processing(&err))
        .and_then(|config| run_analysis(&args.source, &config));
    match outcome {
        Ok(report) => {
            info!(
                "Analyzed {} row(s) from {:?}",
                report.analytics.total_rows, args.source.input
            );
            match args.format {
                ReportFormat::Json => write_json(&report, args.output.as_deref(), args.compact),
                ReportFormat::Table => {
                    print_report_tables(&report);
                    Ok(())
                }
            }
        }
        Err(err) => {
            match &err {
                AnalysisError::Processing(_) => error!("[{}] {err}", err.error_code()),
                _ => warn!("[{}] {err}", err.error_code()),
            }
            if args.format == ReportFormat::Json {
                write_json(&err.to_report(), args.output.as_deref(), args.compact)?;
            }
            Err(err.into())
        }
    }
}

/// Loads `source` and runs the whole pipeline over it.
pub fn run_analysis(
    source: &InputArgs,
    config: &AnalyzerConfig,
) -> Result<AnalysisReport, AnalysisError> {
    let input = load_input(source)?;
    pipeline::analyze(&input.headers, &input.records, config)
}

pub fn write_json<T: Serialize>(value: &T, output: Option<&Path>, compact: bool) -> Result<()> {
    let mut writer = io_utils::open_output(output)?;
    let serialized = if compact {
        serde_json::to_writer(&mut writer, value)
    } else {
        serde_json::to_writer_pretty(&mut writer, value)
    };
    serialized.context("Serializing report to JSON")?;
    writeln!(writer)?;
    writer.flush().context("Flushing report output")?;
    Ok(())
}

fn print_report_tables(report: &AnalysisReport) {
    let analytics = &report.analytics;
    println!("Rows analyzed: {}", analytics.total_rows);
    if let Some(warnings) = &report.warnings {
        println!(
            "Unexpected columns: {}",
            warnings.unexpected_columns.join(", ")
        );
    }
    println!();
    table::print_table(
        &strings(&["field", "missing", "count", "min", "max", "mean"]),
        &field_rows(analytics),
    );
    println!();
    table::print_table(
        &strings(&["product", "count"]),
        &analytics
            .top_products
            .iter()
            .map(|entry| vec![entry.product.clone(), entry.count.to_string()])
            .collect::<Vec<_>>(),
    );
    println!();
    let stock = &analytics.instock_counts;
    table::print_table(
        &strings(&["instock", "count"]),
        &[
            vec!["true".to_string(), stock.in_stock.to_string()],
            vec!["false".to_string(), stock.out_of_stock.to_string()],
            vec!["unknown".to_string(), stock.unknown.to_string()],
        ],
    );
    println!();
    table::print_table(
        &strings(&["month", "count", "avg_price", "avg_rating"]),
        &analytics
            .monthly
            .iter()
            .map(|point| {
                vec![
                    point.month.clone(),
                    point.count.to_string(),
                    format_optional(point.avg_price),
                    format_optional(point.avg_rating),
                ]
            })
            .collect::<Vec<_>>(),
    );
}

fn field_rows(analytics: &Analytics) -> Vec<Vec<String>> {
    let missing = &analytics.missing;
    let numeric = |name: &str, missing: usize, summary: &NumericSummary| {
        vec![
            name.to_string(),
            missing.to_string(),
            summary.count.to_string(),
            format_optional(summary.min),
            format_optional(summary.max),
            format_optional(summary.mean),
        ]
    };
    let plain = |name: &str, missing: usize| {
        let mut row = vec![name.to_string(), missing.to_string()];
        row.extend(std::iter::repeat_n(String::new(), 4));
        row
    };
    vec![
        plain("product", missing.product),
        numeric("price", missing.price, &analytics.stats.price),
        numeric("rating", missing.rating, &analytics.stats.rating),
        plain("instock", missing.instock),
        plain("launch_date", missing.launch_date),
    ]
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.4}")
    }
}

fn format_optional(value: Option<f64>) -> String {
    value.map(format_number).unwrap_or_default()
}
