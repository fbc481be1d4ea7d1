use anyhow::Result;
use log::info;

use crate::{cli::PreviewArgs, load_input, pipeline, rows::CLEANED_COLUMNS, table};

pub fn execute(args: &PreviewArgs) -> Result<()> {
    let config = crate::resolve_config(&args.source, None, None)?;
    let input = load_input(&args.source)?;
    let cleaned = pipeline::clean_table(&input.headers, &input.records, &config)?;

    let headers = CLEANED_COLUMNS
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>();
    let rows = cleaned
        .rows
        .iter()
        .take(args.rows)
        .map(|row| row.to_record())
        .collect::<Vec<_>>();

    table::print_table(&headers, &rows);
    info!(
        "Displayed {} of {} cleaned row(s) from {:?}",
        rows.len(),
        cleaned.rows.len(),
        args.source.input
    );
    Ok(())
}
