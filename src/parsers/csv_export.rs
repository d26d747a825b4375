//! CSV export processor
//!
//! The header row names the fields; every data line becomes one row. Each
//! field is cleaned as a scalar string under its header name.

use std::fs;
use std::io::Read;
use std::path::Path;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use super::{positional_id, ParsedRow};
use crate::clean::Cleaner;
use crate::error::Result;

/// Columns checked (in order) for a row identifier
const ID_COLUMNS: &[&str] = &["Name", "RowName", "ID", "Id"];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Read and clean a CSV export file
pub fn process(cleaner: &Cleaner, path: &Path) -> Result<Vec<ParsedRow>> {
    let bytes = fs::read(path)?;
    let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(&bytes[..]);
    process_reader(cleaner, body)
}

/// Clean CSV content from any reader
pub fn process_reader<R: Read>(cleaner: &Cleaner, reader: R) -> Result<Vec<ParsedRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = reader.headers()?.iter().map(String::from).collect();
    let mut rows = Vec::new();

    for (i, record) in reader.records().enumerate() {
        let record = record?;

        // Header -> raw value; a repeated header keeps its last column.
        let raw: IndexMap<&str, &str> = headers
            .iter()
            .map(String::as_str)
            .zip(record.iter())
            .collect();

        let id = row_id(&raw, headers.first()).unwrap_or_else(|| positional_id(i + 1));

        let mut data = Map::new();
        for (&header, &text) in &raw {
            if let Some(cleaned) = cleaner.clean_str(text, Some(header)) {
                data.insert(header.to_string(), Value::String(cleaned));
            }
        }

        if !data.is_empty() {
            rows.push(ParsedRow::new(id, Value::Object(data)));
        }
    }

    Ok(rows)
}

/// First non-empty raw value among the id columns, then the first column
fn row_id(raw: &IndexMap<&str, &str>, first_header: Option<&String>) -> Option<String> {
    let first_column = first_header.map(String::as_str).filter(|h| !h.is_empty());
    for column in ID_COLUMNS.iter().copied().chain(first_column) {
        if let Some(v) = raw.get(column).filter(|v| !v.is_empty()) {
            return Some(v.to_string());
        }
    }
    None
}
