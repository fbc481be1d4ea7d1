//! `clean` command: validated, normalized rows written back out as CSV.

use anyhow::{Context, Result};
use log::info;

use crate::{
    cli::CleanArgs,
    io_utils, load_input, pipeline,
    rows::{CLEANED_COLUMNS, CleanedRow},
};

pub fn execute(args: &CleanArgs) -> Result<()> {
    let config = crate::resolve_config(&args.source, None, None)?;
    let input = load_input(&args.source)?;
    let table = pipeline::clean_table(&input.headers, &input.records, &config)?;

    let input_delimiter =
        io_utils::resolve_input_delimiter(&args.source.input, args.source.delimiter);
    let delimiter = args.output_delimiter.unwrap_or(input_delimiter);
    let writer = io_utils::open_csv_writer(args.output.as_deref(), delimiter)?;
    let written = write_cleaned_rows(writer, &table.rows)?;

    info!(
        "Wrote {} cleaned row(s) to {} ({} empty row(s) dropped, delimiter '{}')",
        written,
        args.output
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "stdout".into()),
        table.dropped,
        crate::printable_delimiter(delimiter)
    );
    Ok(())
}

pub fn write_cleaned_rows<W>(mut writer: csv::Writer<W>, rows: &[CleanedRow]) -> Result<usize>
where
    W: std::io::Write,
{
    writer
        .write_record(CLEANED_COLUMNS)
        .context("Writing cleaned header")?;
    for (idx, row) in rows.iter().enumerate() {
        writer
            .write_record(row.to_record())
            .with_context(|| format!("Writing cleaned row {}", idx + 1))?;
    }
    writer.flush().context("Flushing cleaned output")?;
    Ok(rows.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::StockStatus;

    #[test]
    fn write_cleaned_rows_emits_header_and_blank_nulls() {
        let rows = vec![CleanedRow {
            product: Some("Desk, oak".into()),
            price: Some(129.5),
            rating: None,
            instock: Some(StockStatus::InStock),
            review: None,
            launch_date: Some("2024-02-01".into()),
        }];
        let mut buffer = Vec::new();
        let writer = csv::WriterBuilder::new().from_writer(&mut buffer);
        let written = write_cleaned_rows(writer, &rows).expect("write rows");
        assert_eq!(written, 1);
        let text = String::from_utf8(buffer).expect("utf8");
        assert_eq!(
            text,
            "product,price,rating,instock,review,launch_date\n\"Desk, oak\",129.5,,true,,2024-02-01\n"
        );
    }
}
