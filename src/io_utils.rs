//! I/O utilities for reading tabular input and writing cleaned output.
//!
//! All file access in csv-insights flows through this module:
//!
//! - **Input check**: only `.csv`, `.tsv` and `.txt` files are accepted; the
//!   `-` path reads stdin and skips the check.
//! - **Delimiter resolution**: extension-based (`.tsv` → tab, otherwise
//!   comma) with manual override.
//! - **Encoding**: input decoding via `encoding_rs`, defaulting to UTF-8.
//! - **Ingest**: [`read_table`] decodes the whole file into normalized
//!   headers and [`RawRecord`]s for the analysis pipeline.

use std::{
    fs::File,
    io::{BufReader, BufWriter, Read, Write},
    path::Path,
};

use anyhow::{Context, Result, anyhow};
use encoding_rs::{Encoding, UTF_8};

use crate::{contract::normalize_header, error::AnalysisError, rows::RawRecord};

pub const DEFAULT_CSV_DELIMITER: u8 = b',';
pub const DEFAULT_TSV_DELIMITER: u8 = b'\t';
pub const SUPPORTED_EXTENSIONS: &[&str] = &["csv", "tsv", "txt"];

pub fn is_dash(path: &Path) -> bool {
    path == Path::new("-")
}

pub fn resolve_encoding(label: Option<&str>) -> Result<&'static Encoding> {
    if let Some(value) = label {
        Encoding::for_label(value.trim().as_bytes())
            .ok_or_else(|| anyhow!("Unknown encoding '{value}'"))
    } else {
        Ok(UTF_8)
    }
}

pub fn resolve_input_delimiter(path: &Path, provided: Option<u8>) -> u8 {
    provided.unwrap_or_else(|| match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => DEFAULT_TSV_DELIMITER,
        _ => DEFAULT_CSV_DELIMITER,
    })
}

pub fn ensure_supported_extension(path: &Path) -> Result<(), AnalysisError> {
    if is_dash(path) {
        return Ok(());
    }
    let supported = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        });
    if supported {
        Ok(())
    } else {
        Err(AnalysisError::UnsupportedInput(format!(
            "{} is not a CSV file (expected one of: .{})",
            path.display(),
            SUPPORTED_EXTENSIONS.join(", .")
        )))
    }
}

/// Rows may be shorter or longer than the header; the pairing in
/// [`RawRecord::from_pairs`] deals with the difference.
pub fn open_csv_reader<R>(reader: R, delimiter: u8) -> csv::Reader<R>
where
    R: Read,
{
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(true)
        .delimiter(delimiter)
        .double_quote(true)
        .flexible(true);
    builder.from_reader(reader)
}

pub fn open_csv_reader_from_path(path: &Path, delimiter: u8) -> Result<csv::Reader<Box<dyn Read>>> {
    let reader: Box<dyn Read> = if is_dash(path) {
        Box::new(std::io::stdin().lock())
    } else {
        Box::new(BufReader::new(
            File::open(path).with_context(|| format!("Opening input file {path:?}"))?,
        ))
    };
    Ok(open_csv_reader(reader, delimiter))
}

/// File at `path`, or stdout when `path` is absent or `-`.
pub fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    let writer: Box<dyn Write> = match path {
        Some(p) if !is_dash(p) => Box::new(BufWriter::new(
            File::create(p).with_context(|| format!("Creating output file {p:?}"))?,
        )),
        _ => Box::new(std::io::stdout()),
    };
    Ok(writer)
}

pub fn open_csv_writer(path: Option<&Path>, delimiter: u8) -> Result<csv::Writer<Box<dyn Write>>> {
    let writer = open_output(path)?;
    let mut builder = csv::WriterBuilder::new();
    builder.delimiter(delimiter).double_quote(true);
    Ok(builder.from_writer(writer))
}

pub fn decode_bytes(bytes: &[u8], encoding: &'static Encoding) -> Result<String> {
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        Err(anyhow!(
            "Failed to decode text with encoding {}",
            encoding.name()
        ))
    } else {
        Ok(text.into_owned())
    }
}

pub fn decode_record(record: &csv::ByteRecord, encoding: &'static Encoding) -> Result<Vec<String>> {
    record
        .iter()
        .map(|field| decode_bytes(field, encoding))
        .collect()
}

/// Decoded header row, normalized for contract comparison.
pub fn reader_headers<R>(
    reader: &mut csv::Reader<R>,
    encoding: &'static Encoding,
) -> Result<Vec<String>>
where
    R: Read,
{
    let headers = reader.byte_headers().context("Reading header row")?.clone();
    Ok(decode_record(&headers, encoding)?
        .iter()
        .map(|h| normalize_header(h))
        .collect())
}

#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub records: Vec<RawRecord>,
}

/// Reads the full input into memory. `limit` caps the number of data rows
/// (`None` reads everything).
pub fn read_table(
    path: &Path,
    delimiter: u8,
    encoding: &'static Encoding,
    limit: Option<usize>,
) -> Result<RawTable> {
    let mut reader = open_csv_reader_from_path(path, delimiter)?;
    read_table_from(&mut reader, encoding, limit)
}

pub fn read_table_from<R>(
    reader: &mut csv::Reader<R>,
    encoding: &'static Encoding,
    limit: Option<usize>,
) -> Result<RawTable>
where
    R: Read,
{
    let headers = reader_headers(reader, encoding)?;
    let mut records = Vec::new();
    for (row_idx, record) in reader.byte_records().enumerate() {
        if let Some(limit) = limit
            && row_idx >= limit
        {
            break;
        }
        let record = record.with_context(|| format!("Reading row {}", row_idx + 2))?;
        let decoded = decode_record(&record, encoding)
            .with_context(|| format!("Decoding row {}", row_idx + 2))?;
        records.push(RawRecord::from_pairs(
            headers.iter().map(String::as_str),
            decoded.iter().map(String::as_str),
        ));
    }
    Ok(RawTable { headers, records })
}
