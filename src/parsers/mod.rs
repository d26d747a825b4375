//! Parsers Module
//!
//! Per-format readers that turn one export file into cleaned rows.
//!
//! ## Supported Formats
//! ```text
//! ┌──────────────┬──────────────┬──────────────────────────────────────┐
//! │ Extension    │ Parser       │ Output                               │
//! ├──────────────┼──────────────┼──────────────────────────────────────┤
//! │ .t3d / .copy │ text_export  │ one property map per file            │
//! │ .json        │ json_export  │ one row per table row (or __root__)  │
//! │ .csv         │ csv_export   │ one row per data line                │
//! └──────────────┴──────────────┴──────────────────────────────────────┘
//! ```
//!
//! Every parser runs its values through the [`Cleaner`](crate::clean::Cleaner)
//! before returning, and fails the whole file on the first hard error.

pub mod csv_export;
pub mod json_export;
pub mod text_export;

use serde_json::Value;

/// A cleaned row produced by the JSON and CSV processors
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRow {
    /// Row identifier local to its source file
    pub id: String,

    /// Cleaned payload
    pub data: Value,
}

impl ParsedRow {
    pub fn new(id: impl Into<String>, data: Value) -> Self {
        Self { id: id.into(), data }
    }
}

/// Positional fallback id ("Row_1", "Row_2", ...)
pub(crate) fn positional_id(position: usize) -> String {
    format!("Row_{}", position)
}
