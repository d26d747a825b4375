//! Dataset Module
//!
//! Maps an export file's location to the dataset it belongs to.
//!
//! ## Layout
//! ```text
//! {input_root}/[CodexDump/]<NN_batch>/[assets|cdo/]<sub/dirs/>File.ext
//!                          │           │              └─ record prefix
//!                          │           └─ source kind
//!                          └─ batch → alias table → dataset key
//! ```
//!
//! Unrecognized layouts land in the `misc` bucket; no file is ever rejected
//! for its path shape.

use std::fmt;
use std::path::{Component, Path};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::error::{CodexError, Result};

/// Wrapper folders the exports are commonly copied under
const CONTAINER_DIRS: &[&str] = &["codexdump", "raw_dump", "rawdumps"];

/// Stable short names for the numbered export batches
const BATCH_ALIASES: &[(&str, &str)] = &[
    ("01_traits", "traits"),
    ("02_status_effects", "status_effects"),
    ("03_injuries_morale", "injuries_morale"),
    ("04_items_all", "items"),
    ("05_weapons", "weapons"),
    ("06_equipment_all", "equipment"),
    ("07_crafting", "crafting"),
    ("08_trading", "trading"),
    ("09_techtree", "tech_tree"),
    ("10_placeables", "placeables"),
    ("11_construction_site", "construction_site"),
    ("12_configs", "configs"),
    ("13_codex_entries", "codex_entries"),
    ("14_map_data", "map_data"),
    ("15_weapon_types", "weapon_types"),
    ("16_characters_tables", "characters"),
    ("17_combat_data", "combat"),
    ("18_factions", "factions"),
    ("19_tutorials", "tutorials"),
    ("20_ui_data", "ui_data"),
];

/// Dataset used when no batch folder is found
const MISC: &str = "misc";

static BATCH_DIR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{2}_").expect("valid regex"));

// =============================================================================
// Types
// =============================================================================

/// Export subfolder kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Assets,
    Cdo,
    Misc,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Assets => "assets",
            SourceKind::Cdo => "cdo",
            SourceKind::Misc => "misc",
        }
    }

    fn from_dir(name: &str) -> Option<Self> {
        match name {
            "assets" => Some(SourceKind::Assets),
            "cdo" => Some(SourceKind::Cdo),
            _ => None,
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input format, chosen by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// Engine text export (.t3d / .copy)
    TextExport,
    Json,
    Csv,
}

impl SourceFormat {
    /// Format for a path, or `None` if the extension is not handled
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "t3d" | "copy" => Some(SourceFormat::TextExport),
            "json" => Some(SourceFormat::Json),
            "csv" => Some(SourceFormat::Csv),
            _ => None,
        }
    }
}

/// Where a file's records go
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetTarget {
    /// e.g. "items_cdo", "traits_assets", "misc"
    pub dataset_key: String,

    pub source_kind: SourceKind,

    /// Remaining path without extension, used to build record ids
    pub record_prefix: String,
}

// =============================================================================
// Derivation
// =============================================================================

/// Derive the dataset target for `file_path` under `input_root`
pub fn derive(input_root: &Path, file_path: &Path) -> Result<DatasetTarget> {
    let rel = file_path
        .strip_prefix(input_root)
        .map_err(|_| CodexError::OutsideInputRoot(file_path.to_path_buf()))?;

    let parts: Vec<String> = rel
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    if parts.is_empty() {
        return Err(CodexError::OutsideInputRoot(file_path.to_path_buf()));
    }

    // Directory segments are everything before the file name.
    let dir_count = parts.len() - 1;
    let mut start = 0;

    if dir_count >= 1 && CONTAINER_DIRS.contains(&parts[0].to_lowercase().as_str()) {
        start = 1;
    }

    let mut batch: Option<&str> = None;
    if start < dir_count && BATCH_DIR.is_match(&parts[start]) {
        batch = Some(parts[start].as_str());
        start += 1;
    }

    let mut source_kind = SourceKind::Misc;
    if batch.is_some() && start < dir_count {
        if let Some(kind) = SourceKind::from_dir(&parts[start]) {
            source_kind = kind;
            start += 1;
        }
    }

    let alias = batch.map(batch_alias).unwrap_or(MISC);
    let dataset_key = match source_kind {
        SourceKind::Assets | SourceKind::Cdo => format!("{}_{}", alias, source_kind),
        SourceKind::Misc => alias.to_string(),
    };

    Ok(DatasetTarget {
        dataset_key,
        source_kind,
        record_prefix: record_prefix(&parts[start..]),
    })
}

/// Alias for a batch folder, or the folder name itself
pub fn batch_alias(batch: &str) -> &str {
    BATCH_ALIASES
        .iter()
        .find(|(name, _)| *name == batch)
        .map(|(_, alias)| *alias)
        .unwrap_or(batch)
}

/// "sub/dir/File.ext" → "sub/dir/File"
fn record_prefix(remaining: &[String]) -> String {
    let mut segments: Vec<&str> = remaining.iter().map(String::as_str).collect();
    if let Some(last) = segments.last_mut() {
        let stem = Path::new(*last)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(*last);
        *last = stem;
    }
    segments.join("/")
}

/// Path relative to `root` with forward slashes
pub fn relative_posix(root: &Path, path: &Path) -> Result<String> {
    let rel = path
        .strip_prefix(root)
        .map_err(|_| CodexError::OutsideInputRoot(path.to_path_buf()))?;
    let parts: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Ok(parts.join("/"))
}
