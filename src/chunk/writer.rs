//! Chunk Writer
//!
//! Accumulates one dataset's records and writes them as numbered chunks.
//!
//! ## States
//! ```text
//! Empty ──add──▶ Accumulating ──cap reached──▶ Flushed ──add──▶ Accumulating ...
//!                     │
//!                     └──finish──▶ Flushed (final)
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use super::{Record, DATASETS_DIRNAME};
use crate::error::Result;

/// Estimated size of an empty record list (`[]`)
const EMPTY_ESTIMATE: usize = 2;

/// Metadata for one written chunk
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChunkInfo {
    /// Chunk path relative to the output root, forward slashes
    pub file: String,

    /// Number of records in the chunk
    pub records: usize,

    /// Exact size of the written file
    pub bytes: usize,

    /// Chunk index within the dataset
    pub chunk: u32,
}

/// On-disk shape of a chunk file
#[derive(Serialize)]
struct ChunkPayload<'a> {
    dataset: &'a str,
    chunk: u32,
    records: &'a [Record],
}

/// Per-dataset record accumulator
///
/// The byte estimate sums each record's compact size plus one separator.
/// It undercounts the payload wrapper, so the cap is a packaging target,
/// not a hard limit.
pub struct ChunkWriter {
    /// Dataset key (also the file name stem)
    dataset_key: String,
    /// Flush once the estimate would pass this
    cap_bytes: usize,
    /// `{datasets_root}/{dataset_key}`
    out_dir: PathBuf,
    /// Index of the next chunk to write
    chunk_index: u32,
    /// Pending records
    records: Vec<Record>,
    /// Running size estimate of `records`
    approx_bytes: usize,
    /// Every chunk written so far
    written: Vec<ChunkInfo>,
}

impl ChunkWriter {
    /// Create a writer whose chunks go to `{datasets_root}/{dataset_key}/`
    pub fn new(dataset_key: impl Into<String>, cap_bytes: usize, datasets_root: &Path) -> Self {
        let dataset_key = dataset_key.into();
        let out_dir = datasets_root.join(&dataset_key);
        Self {
            dataset_key,
            cap_bytes,
            out_dir,
            chunk_index: 0,
            records: Vec::new(),
            approx_bytes: EMPTY_ESTIMATE,
            written: Vec::new(),
        }
    }

    /// Append a record, flushing the pending chunk first if the record
    /// would push it past the cap
    pub fn add(&mut self, record: Record) -> Result<()> {
        let record_bytes = serde_json::to_vec(&record)?.len();
        let projected = self.approx_bytes + record_bytes + 1;

        if !self.records.is_empty() && projected > self.cap_bytes {
            self.flush()?;
        }

        self.records.push(record);
        self.approx_bytes += record_bytes + 1;
        Ok(())
    }

    /// Write pending records as the next chunk
    ///
    /// Returns `None` without touching disk when nothing is pending.
    pub fn flush(&mut self) -> Result<Option<ChunkInfo>> {
        if self.records.is_empty() {
            return Ok(None);
        }

        let file_name = self.chunk_file_name(self.chunk_index);
        fs::create_dir_all(&self.out_dir)?;

        let payload = ChunkPayload {
            dataset: &self.dataset_key,
            chunk: self.chunk_index,
            records: &self.records,
        };
        let raw = serde_json::to_vec(&payload)?;
        fs::write(self.out_dir.join(&file_name), &raw)?;

        let info = ChunkInfo {
            file: format!("{}/{}/{}", DATASETS_DIRNAME, self.dataset_key, file_name),
            records: self.records.len(),
            bytes: raw.len(),
            chunk: self.chunk_index,
        };
        debug!(
            dataset = %self.dataset_key,
            chunk = info.chunk,
            records = info.records,
            bytes = info.bytes,
            "wrote chunk"
        );

        self.chunk_index += 1;
        self.records.clear();
        self.approx_bytes = EMPTY_ESTIMATE;
        self.written.push(info.clone());

        Ok(Some(info))
    }

    /// Flush the remainder and return every chunk written by this writer
    pub fn finish(mut self) -> Result<Vec<ChunkInfo>> {
        self.flush()?;
        Ok(self.written)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn dataset_key(&self) -> &str {
        &self.dataset_key
    }

    /// Directory the chunks are written to
    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Number of records waiting for the next flush
    pub fn pending_records(&self) -> usize {
        self.records.len()
    }

    /// Current size estimate of the pending records
    pub fn pending_bytes(&self) -> usize {
        self.approx_bytes
    }

    /// Index the next flushed chunk will get
    pub fn next_chunk_index(&self) -> u32 {
        self.chunk_index
    }

    /// Chunks written so far
    pub fn written(&self) -> &[ChunkInfo] {
        &self.written
    }

    /// "<dataset_key>_007.json"
    fn chunk_file_name(&self, index: u32) -> String {
        format!("{}_{:03}.json", self.dataset_key, index)
    }
}
