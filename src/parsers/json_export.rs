//! JSON export processor
//!
//! Accepts the three shapes data-table exports come in:
//! - a top-level array of rows
//! - `{"Rows": {"<RowName>": {...}, ...}}`
//! - `{"Rows": [{...}, ...]}`
//!
//! Anything else is cleaned as a single `__root__` row.

use std::fs;
use std::path::Path;

use serde_json::Value;

use super::{positional_id, ParsedRow};
use crate::clean::Cleaner;
use crate::error::Result;

/// Id given to a document that is not a row table
pub const ROOT_ID: &str = "__root__";

/// Read, decode and clean a JSON export file
pub fn process(cleaner: &Cleaner, path: &Path) -> Result<Vec<ParsedRow>> {
    let bytes = fs::read(path)?;
    let document: Value = serde_json::from_slice(&bytes)?;
    Ok(process_value(cleaner, &document))
}

/// Clean an already decoded document into rows
pub fn process_value(cleaner: &Cleaner, document: &Value) -> Vec<ParsedRow> {
    match document {
        Value::Array(rows) => rows_from_seq(cleaner, rows),
        Value::Object(map) => match map.get("Rows") {
            Some(Value::Object(rows)) => rows
                .iter()
                .filter_map(|(id, row)| {
                    cleaner
                        .clean(row_properties(row), None)
                        .map(|data| ParsedRow::new(id.clone(), data))
                })
                .collect(),
            Some(Value::Array(rows)) => rows_from_seq(cleaner, rows),
            _ => root_row(cleaner, document),
        },
        _ => root_row(cleaner, document),
    }
}

fn rows_from_seq(cleaner: &Cleaner, rows: &[Value]) -> Vec<ParsedRow> {
    rows.iter()
        .enumerate()
        .filter_map(|(i, row)| {
            let data = cleaner.clean(row_properties(row), None)?;
            let id = row_name(row).unwrap_or_else(|| positional_id(i + 1));
            Some(ParsedRow::new(id, data))
        })
        .collect()
}

fn root_row(cleaner: &Cleaner, document: &Value) -> Vec<ParsedRow> {
    cleaner
        .clean(document, None)
        .map(|data| vec![ParsedRow::new(ROOT_ID, data)])
        .unwrap_or_default()
}

/// The row's nested "Properties" object, or the row itself
fn row_properties(row: &Value) -> &Value {
    match row {
        Value::Object(map) => map.get("Properties").unwrap_or(row),
        _ => row,
    }
}

/// First usable "Name" / "RowName" of a row
fn row_name(row: &Value) -> Option<String> {
    let map = row.as_object()?;
    ["Name", "RowName"]
        .iter()
        .find_map(|field| map.get(*field).and_then(id_text))
}

/// Render an identifier field, skipping blank and falsy values
fn id_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        Value::Bool(true) => Some("True".to_string()),
        Value::Array(items) if !items.is_empty() => Some(value.to_string()),
        Value::Object(map) if !map.is_empty() => Some(value.to_string()),
        _ => None,
    }
}
