//! I/O utilities for loading and saving datasets as delimited text.
//!
//! - **Delimiter resolution**: extension-based auto-detection (`.tsv` → tab,
//!   everything else → comma) with manual override support.
//! - **Encoding**: input decoding via `encoding_rs`, defaulting to UTF-8.
//!   Output is always UTF-8.
//! - **stdin/stdout**: the `-` path convention routes through standard streams.
//! - **Type inference**: a column loads as integer when every present cell
//!   parses as `i64`, as float when every present cell parses as `f64`, and
//!   as text otherwise. Empty cells are missing values.

use std::{
    fs::File,
    io::{BufReader, BufWriter, Read, Write},
    path::Path,
};

use anyhow::{Context, Result, anyhow};
use csv::QuoteStyle;
use encoding_rs::{Encoding, UTF_8};
use log::debug;

use crate::{
    data::{Value, parse_typed_value},
    dataset::{Column, ColumnData, ColumnType, Dataset},
};

pub const DEFAULT_CSV_DELIMITER: u8 = b',';
pub const DEFAULT_TSV_DELIMITER: u8 = b'\t';

const STDIO_PATH: &str = "-";

/// Input encoding for an optional label such as `latin1` or `windows-1252`.
pub fn resolve_encoding(label: Option<&str>) -> Result<&'static Encoding> {
    match label.map(str::trim) {
        None => Ok(UTF_8),
        Some(name) => {
            Encoding::for_label(name.as_bytes()).ok_or_else(|| anyhow!("Unknown encoding '{name}'"))
        }
    }
}

pub fn resolve_input_delimiter(path: &Path, provided: Option<u8>) -> u8 {
    provided
        .or_else(|| extension_delimiter(path))
        .unwrap_or(DEFAULT_CSV_DELIMITER)
}

/// Output delimiter: explicit choice, then the output extension, then `fallback`.
pub fn resolve_output_delimiter(path: Option<&Path>, provided: Option<u8>, fallback: u8) -> u8 {
    provided
        .or_else(|| path.and_then(extension_delimiter))
        .unwrap_or(fallback)
}

fn extension_delimiter(path: &Path) -> Option<u8> {
    let ext = path.extension()?.to_str()?;
    if ext.eq_ignore_ascii_case("tsv") {
        Some(DEFAULT_TSV_DELIMITER)
    } else if ext.eq_ignore_ascii_case("csv") {
        Some(DEFAULT_CSV_DELIMITER)
    } else {
        None
    }
}

fn is_stdio(path: &Path) -> bool {
    path == Path::new(STDIO_PATH)
}

fn dataset_reader<R: Read>(source: R, delimiter: u8) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .flexible(false)
        .from_reader(source)
}

fn dataset_writer(path: Option<&Path>, delimiter: u8) -> Result<csv::Writer<Box<dyn Write>>> {
    let sink: Box<dyn Write> = match path {
        Some(path) if !is_stdio(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Creating output file {path:?}"))?,
        )),
        _ => Box::new(std::io::stdout()),
    };
    Ok(csv::WriterBuilder::new()
        .delimiter(delimiter)
        .quote_style(QuoteStyle::Necessary)
        .from_writer(sink))
}

/// Decodes every field of `record`, failing on the first malformed one.
fn decode_fields(record: &csv::ByteRecord, encoding: &'static Encoding) -> Result<Vec<String>> {
    record
        .iter()
        .map(|field| {
            let (text, _, malformed) = encoding.decode(field);
            if malformed {
                Err(anyhow!("Invalid {} text in field", encoding.name()))
            } else {
                Ok(text.into_owned())
            }
        })
        .collect()
}

/// Loads a delimited file with a header row into a typed [`Dataset`].
pub fn read_dataset(path: &Path, delimiter: u8, encoding: &'static Encoding) -> Result<Dataset> {
    let source: Box<dyn Read> = if is_stdio(path) {
        Box::new(std::io::stdin().lock())
    } else {
        Box::new(BufReader::new(
            File::open(path).with_context(|| format!("Opening input file {path:?}"))?,
        ))
    };
    let mut reader = dataset_reader(source, delimiter);
    load_dataset(&mut reader, encoding).with_context(|| format!("Reading dataset {path:?}"))
}

fn load_dataset<R: Read>(
    reader: &mut csv::Reader<R>,
    encoding: &'static Encoding,
) -> Result<Dataset> {
    let headers = decode_fields(reader.byte_headers()?, encoding)?;
    let mut cells = vec![Vec::new(); headers.len()];
    for (row_idx, record) in reader.byte_records().enumerate() {
        let record = record.with_context(|| format!("Reading row {}", row_idx + 2))?;
        let decoded = decode_fields(&record, encoding)
            .with_context(|| format!("Decoding row {}", row_idx + 2))?;
        for (column, value) in cells.iter_mut().zip(decoded) {
            column.push(value);
        }
    }

    let mut dataset = Dataset::new();
    for (name, raw) in headers.into_iter().zip(cells) {
        let datatype = infer_column_type(&raw);
        let column = typed_column(&name, &raw, datatype)
            .with_context(|| format!("Column '{name}'"))?;
        debug!("Loaded column '{name}' as {datatype}");
        dataset.add_column(column)?;
    }
    Ok(dataset)
}

/// Narrowest column type able to hold every non-empty cell.
pub fn infer_column_type(raw: &[String]) -> ColumnType {
    let mut present = raw.iter().map(|v| v.trim()).filter(|v| !v.is_empty()).peekable();
    if present.peek().is_none() {
        return ColumnType::Float;
    }
    let present = present.collect::<Vec<_>>();
    if present.iter().all(|v| v.parse::<i64>().is_ok()) {
        ColumnType::Integer
    } else if present.iter().all(|v| v.parse::<f64>().is_ok()) {
        ColumnType::Float
    } else {
        ColumnType::Text
    }
}

fn typed_column(name: &str, raw: &[String], datatype: ColumnType) -> Result<Column> {
    let parsed = raw
        .iter()
        .map(|value| {
            let trimmed = value.trim();
            let cell = if datatype == ColumnType::Text && !trimmed.is_empty() {
                value.as_str()
            } else {
                trimmed
            };
            parse_typed_value(cell, &datatype)
        })
        .collect::<Result<Vec<_>>>()?;
    let data = match datatype {
        ColumnType::Integer => ColumnData::Integer(
            parsed
                .into_iter()
                .map(|v| match v {
                    Some(Value::Integer(i)) => Some(i),
                    _ => None,
                })
                .collect(),
        ),
        ColumnType::Float => ColumnData::Float(
            parsed
                .into_iter()
                .map(|v| match v {
                    Some(Value::Float(f)) => Some(f),
                    _ => None,
                })
                .collect(),
        ),
        ColumnType::Text | ColumnType::Categorical => ColumnData::Text(
            parsed
                .into_iter()
                .map(|v| v.map(|value| value.as_display()))
                .collect(),
        ),
    };
    Ok(Column::new(name, data))
}

/// Writes `dataset` as delimited text; missing cells become empty fields.
pub fn write_dataset(
    dataset: &Dataset,
    path: Option<&Path>,
    delimiter: u8,
    include_header: bool,
) -> Result<()> {
    let mut writer = dataset_writer(path, delimiter)?;
    write_rows(dataset, &mut writer, include_header)?;
    writer.flush().context("Flushing output")?;
    Ok(())
}

fn write_rows<W: Write>(
    dataset: &Dataset,
    writer: &mut csv::Writer<W>,
    include_header: bool,
) -> Result<()> {
    if include_header {
        writer
            .write_record(dataset.column_names())
            .context("Writing header row")?;
    }
    for row in 0..dataset.row_count() {
        writer
            .write_record(dataset.row_display(row))
            .with_context(|| format!("Writing row {}", row + 1))?;
    }
    Ok(())
}
