//! Manifest index
//!
//! `index.json` tells a static site which chunk files exist per dataset.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use indexmap::IndexMap;
use serde::Serialize;

use super::ChunkInfo;
use crate::dataset::SourceKind;
use crate::error::Result;

/// Current manifest format version
pub const SCHEMA_VERSION: u32 = 1;

/// Manifest file name under the output root
pub const INDEX_FILENAME: &str = "index.json";

/// Top-level manifest
#[derive(Debug, Clone, Serialize)]
pub struct Index {
    pub schema_version: u32,

    /// UTC, RFC 3339 with microseconds
    pub generated_at: String,

    pub chunk_cap_mib: u64,

    /// Datasets in first-seen order
    pub datasets: IndexMap<String, DatasetEntry>,
}

/// Manifest entry for one dataset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetEntry {
    pub chunks: Vec<ChunkInfo>,

    pub records_total: usize,

    /// Number of chunk files written
    pub files_total: usize,

    pub source_kind: SourceKind,
}

impl DatasetEntry {
    fn new(source_kind: SourceKind) -> Self {
        Self {
            chunks: Vec::new(),
            records_total: 0,
            files_total: 0,
            source_kind,
        }
    }

    /// Record the final chunk list
    pub fn set_chunks(&mut self, chunks: Vec<ChunkInfo>) {
        self.files_total = chunks.len();
        self.chunks = chunks;
    }
}

impl Index {
    /// Empty manifest stamped with the current time
    pub fn new(chunk_cap_mib: u64) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, false),
            chunk_cap_mib,
            datasets: IndexMap::new(),
        }
    }

    /// Entry for `key`, registering it with `source_kind` on first sight
    pub fn dataset_mut(&mut self, key: &str, source_kind: SourceKind) -> &mut DatasetEntry {
        self.datasets
            .entry(key.to_string())
            .or_insert_with(|| DatasetEntry::new(source_kind))
    }

    pub fn dataset(&self, key: &str) -> Option<&DatasetEntry> {
        self.datasets.get(key)
    }

    /// Total records across all datasets
    pub fn records_total(&self) -> usize {
        self.datasets.values().map(|d| d.records_total).sum()
    }

    /// Write `{output_root}/index.json`, pretty-printed
    pub fn write(&self, output_root: &Path) -> Result<PathBuf> {
        fs::create_dir_all(output_root)?;
        let path = output_root.join(INDEX_FILENAME);
        let raw = serde_json::to_vec_pretty(self)?;
        fs::write(&path, raw)?;
        Ok(path)
    }
}
