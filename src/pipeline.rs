//! Pipeline Module
//!
//! Drives a full sanitize run over an input tree.
//!
//! ## Responsibilities
//! - Discover supported export files under the input root
//! - Route each file to its dataset and parser
//! - Feed whole-file record batches to the per-dataset chunk writers
//! - Finish all writers and write the manifest
//!
//! ## Failure Model
//! - Missing input root: fatal, before any work
//! - Parse failure in one file: logged, file skipped, run continues
//! - Chunk write failure while adding a file's records: logged, file counted
//!   as failed, run continues
//! - Final flush or manifest write failure: fatal

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tracing::{debug, error, info, warn};
use walkdir::WalkDir;

use crate::chunk::{ChunkWriter, Index, Record, DATASETS_DIRNAME};
use crate::clean::Cleaner;
use crate::config::Config;
use crate::dataset::{self, DatasetTarget, SourceFormat};
use crate::error::{CodexError, Result};
use crate::parsers::{csv_export, json_export, text_export};

/// Counters reported at the end of a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Supported files found
    pub files_seen: usize,

    /// Files skipped because they failed to parse
    pub files_failed: usize,

    /// Records handed to the chunk writers
    pub records_seen: usize,

    /// Datasets in the manifest
    pub datasets: usize,

    /// Where the manifest was written
    pub index_path: PathBuf,
}

/// A single sanitize run
pub struct Pipeline {
    config: Config,

    /// Absolute input root
    input_root: PathBuf,

    /// `{output_dir}/datasets`
    datasets_root: PathBuf,

    cleaner: Cleaner,

    /// One writer per dataset, first-seen order
    writers: IndexMap<String, ChunkWriter>,

    index: Index,

    summary: RunSummary,
}

impl Pipeline {
    /// Prepare a run
    ///
    /// Fails if the input root does not exist; creates the datasets folder.
    pub fn new(config: Config) -> Result<Self> {
        if !config.input_dir.exists() {
            return Err(CodexError::InputNotFound(config.input_dir.clone()));
        }
        if !config.input_dir.is_dir() {
            return Err(CodexError::Config(format!(
                "input path is not a directory: {}",
                config.input_dir.display()
            )));
        }

        let input_root = fs::canonicalize(&config.input_dir)?;
        let datasets_root = config.output_dir.join(DATASETS_DIRNAME);
        fs::create_dir_all(&datasets_root)?;

        Ok(Self {
            cleaner: Cleaner::new(config.policy.clone()),
            index: Index::new(config.chunk_cap_mib),
            input_root,
            datasets_root,
            config,
            writers: IndexMap::new(),
            summary: RunSummary::default(),
        })
    }

    /// Process every supported file, then write chunks and the manifest
    pub fn run(mut self) -> Result<RunSummary> {
        info!("Input : {}", self.input_root.display());
        info!("Output: {}", self.config.output_dir.display());
        info!("Cap   : {} MiB per file", self.config.chunk_cap_mib);

        for path in discover(&self.input_root) {
            self.process_file(&path)?;
        }

        self.finish()
    }

    /// Route one file: derive its dataset, parse it, hand its records over
    ///
    /// Parse errors and chunk writes that fail mid-run are logged and count
    /// the file as failed. Only path errors escape.
    pub fn process_file(&mut self, path: &Path) -> Result<()> {
        let Some(format) = SourceFormat::from_path(path) else {
            return Ok(());
        };

        self.summary.files_seen += 1;
        let target = dataset::derive(&self.input_root, path)?;
        let src = dataset::relative_posix(&self.input_root, path)?;
        self.register(&target);

        let records = match self.parse_file(path, format, &target, &src) {
            Ok(records) => records,
            Err(e) => {
                error!("!! error parsing {}: {}", path.display(), e);
                self.summary.files_failed += 1;
                return Ok(());
            }
        };

        debug!(
            file = %src,
            dataset = %target.dataset_key,
            records = records.len(),
            "parsed"
        );

        let mut added = 0;
        let mut write_error = None;
        if let Some(writer) = self.writers.get_mut(&target.dataset_key) {
            for record in records {
                if let Err(e) = writer.add(record) {
                    write_error = Some(e);
                    break;
                }
                added += 1;
            }
        }
        self.index
            .dataset_mut(&target.dataset_key, target.source_kind)
            .records_total += added;
        self.summary.records_seen += added;

        if let Some(e) = write_error {
            error!("!! error writing {}: {}", path.display(), e);
            self.summary.files_failed += 1;
        }

        Ok(())
    }

    /// Parse a whole file into records before any of them reach a writer
    fn parse_file(
        &self,
        path: &Path,
        format: SourceFormat,
        target: &DatasetTarget,
        src: &str,
    ) -> Result<Vec<Record>> {
        let rows = match format {
            SourceFormat::TextExport => {
                let props = text_export::parse(&self.cleaner, path)?;
                if props.is_empty() {
                    return Ok(Vec::new());
                }
                let record = Record::new(&target.record_prefix, src, props.into());
                return Ok(vec![record]);
            }
            SourceFormat::Json => json_export::process(&self.cleaner, path)?,
            SourceFormat::Csv => csv_export::process(&self.cleaner, path)?,
        };

        Ok(rows
            .into_iter()
            .map(|row| {
                let id = format!("{}::{}", target.record_prefix, row.id);
                Record::new(id, src, row.data)
            })
            .collect())
    }

    /// Create the writer and manifest entry for a dataset on first sight
    fn register(&mut self, target: &DatasetTarget) {
        if self.writers.contains_key(&target.dataset_key) {
            return;
        }
        let writer = ChunkWriter::new(
            &target.dataset_key,
            self.config.chunk_cap_bytes(),
            &self.datasets_root,
        );
        self.writers.insert(target.dataset_key.clone(), writer);
        self.index.dataset_mut(&target.dataset_key, target.source_kind);
    }

    /// Flush every writer, record chunk lists, write the manifest
    fn finish(mut self) -> Result<RunSummary> {
        for (key, writer) in std::mem::take(&mut self.writers) {
            let chunks = writer.finish()?;
            if let Some(entry) = self.index.datasets.get_mut(&key) {
                entry.set_chunks(chunks);
            }
        }

        let index_path = self.index.write(&self.config.output_dir)?;
        self.summary.datasets = self.index.datasets.len();
        self.summary.index_path = index_path;

        info!("Files seen   : {}", self.summary.files_seen);
        info!("Files failed : {}", self.summary.files_failed);
        info!("Records seen : {}", self.summary.records_seen);
        info!("Datasets out : {}", self.summary.datasets);
        info!("Wrote        : {}", self.summary.index_path.display());

        Ok(self.summary)
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Absolute input root
    pub fn input_root(&self) -> &Path {
        &self.input_root
    }

    /// Folder holding the per-dataset chunk directories
    pub fn datasets_root(&self) -> &Path {
        &self.datasets_root
    }

    /// Manifest as built so far
    pub fn index(&self) -> &Index {
        &self.index
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Counters so far
    pub fn summary(&self) -> &RunSummary {
        &self.summary
    }
}

/// Supported files under `root`, sorted by name within each directory
///
/// Symlinks are followed. Unreadable entries and link loops are logged and
/// skipped.
pub fn discover(root: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("skipping unreadable entry: {}", e);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        if SourceFormat::from_path(entry.path()).is_some() {
            files.push(entry.into_path());
        }
    }
    files
}

/// Run the whole pipeline for `config`
pub fn run(config: Config) -> Result<RunSummary> {
    Pipeline::new(config)?.run()
}
