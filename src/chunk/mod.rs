//! Chunk Module
//!
//! Size-capped JSON output for static hosting.
//!
//! ## Responsibilities
//! - Accumulate records per dataset and flush them as numbered chunk files
//! - Keep each chunk near a byte cap (soft target, never splits a record)
//! - Describe every chunk in the manifest index
//!
//! ## Output Layout
//! ```text
//! {output}/
//!   ├── index.json                         (pretty-printed manifest)
//!   └── datasets/
//!       └── <dataset_key>/
//!           ├── <dataset_key>_000.json     (compact chunk)
//!           └── <dataset_key>_001.json
//! ```
//!
//! ## Chunk File Format
//! ```text
//! {"dataset":"items_cdo","chunk":0,"records":[{"id":..,"src":..,"data":..}, ...]}
//! ```

mod index;
mod writer;

use serde::Serialize;
use serde_json::Value;

pub use index::{DatasetEntry, Index, INDEX_FILENAME, SCHEMA_VERSION};
pub use writer::{ChunkInfo, ChunkWriter};

/// Folder under the output root holding one directory per dataset
pub const DATASETS_DIRNAME: &str = "datasets";

/// One cleaned record as written to a chunk
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    /// Path-derived id, optionally suffixed with `::<row id>`
    pub id: String,

    /// Source file, relative to the input root
    pub src: String,

    pub data: Value,
}

impl Record {
    pub fn new(id: impl Into<String>, src: impl Into<String>, data: Value) -> Self {
        Self {
            id: id.into(),
            src: src.into(),
            data,
        }
    }
}
