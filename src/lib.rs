pub mod aggregate;
pub mod analyze;
pub mod cli;
pub mod config;
pub mod contract;
pub mod error;
pub mod export;
pub mod io_utils;
pub mod normalize;
pub mod pipeline;
pub mod preview;
pub mod rows;
pub mod table;

use std::{env, sync::OnceLock};

use anyhow::Result;
use clap::Parser;
use log::{LevelFilter, debug, info};

use crate::{
    cli::{Cli, Commands, InputArgs},
    config::AnalyzerConfig,
    contract::ColumnContract,
    error::AnalysisError,
    io_utils::RawTable,
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("csv_insights", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Analyze(args) => analyze::execute(&args),
        Commands::Clean(args) => export::execute(&args),
        Commands::Preview(args) => preview::execute(&args),
        Commands::Columns => handle_columns(),
    }
}

pub(crate) fn resolve_config(
    source: &InputArgs,
    top_products: Option<usize>,
    sample_rows: Option<usize>,
) -> Result<AnalyzerConfig> {
    let config = AnalyzerConfig::resolve(
        source.config.as_deref(),
        top_products,
        sample_rows,
        source.date_order,
    )?;
    debug!("Analyzer config: {config:?}");
    Ok(config)
}

/// Checks the file name, then decodes the whole input. Any read or decode
/// failure becomes [`AnalysisError::Processing`].
pub fn load_input(source: &InputArgs) -> Result<RawTable, AnalysisError> {
    io_utils::ensure_supported_extension(&source.input)?;
    let delimiter = io_utils::resolve_input_delimiter(&source.input, source.delimiter);
    info!(
        "Reading '{}' with delimiter '{}'",
        source.input.display(),
        printable_delimiter(delimiter)
    );
    let encoding = io_utils::resolve_encoding(source.input_encoding.as_deref())
        .map_err(|err| AnalysisError::processing(&err))?;
    let table = io_utils::read_table(&source.input, delimiter, encoding, source.row_limit())
        .map_err(|err| AnalysisError::processing(&err))?;
    info!(
        "Read {} row(s) across {} column(s)",
        table.records.len(),
        table.headers.len()
    );
    Ok(table)
}

fn handle_columns() -> Result<()> {
    let contract = ColumnContract::STANDARD;
    let rows = contract
        .required
        .iter()
        .map(|name| vec![name.to_string(), "required".to_string()])
        .chain(
            contract
                .optional
                .iter()
                .map(|name| vec![name.to_string(), "optional".to_string()]),
        )
        .collect::<Vec<_>>();
    let headers = vec!["column".to_string(), "requirement".to_string()];
    table::print_table(&headers, &rows);
    Ok(())
}

pub(crate) fn printable_delimiter(delimiter: u8) -> String {
    match delimiter {
        b',' => ",".to_string(),
        b'\t' => "\\t".to_string(),
        b'\n' => "\\n".to_string(),
        other => (other as char).to_string(),
    }
}
