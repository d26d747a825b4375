//! Configuration for the codex sanitizer
//!
//! Centralized configuration with sensible defaults.

use std::collections::HashSet;
use std::path::PathBuf;

/// Main configuration for a sanitizer run
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Input / Output
    // -------------------------------------------------------------------------
    /// Root folder containing the raw exports (raw_dump / CodexDump)
    pub input_dir: PathBuf,

    /// Root folder for website-ready data
    /// Internal structure:
    ///   {output_dir}/
    ///     ├── index.json       (manifest)
    ///     └── datasets/        (chunk files, one folder per dataset)
    pub output_dir: PathBuf,

    // -------------------------------------------------------------------------
    // Chunking
    // -------------------------------------------------------------------------
    /// Target size per chunk file (in MiB)
    pub chunk_cap_mib: u64,

    // -------------------------------------------------------------------------
    // Cleaning
    // -------------------------------------------------------------------------
    /// Key sets and toggles used by the value sanitizer
    pub policy: SanitizePolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("./raw_dump"),
            output_dir: PathBuf::from("./clean_data"),
            chunk_cap_mib: 20, // keeps chunks well under browser upload and git limits
            policy: SanitizePolicy::default(),
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Chunk cap converted to bytes
    pub fn chunk_cap_bytes(&self) -> usize {
        (self.chunk_cap_mib as usize).saturating_mul(1024 * 1024)
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the input directory
    pub fn input_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.input_dir = path.into();
        self
    }

    /// Set the output directory
    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.output_dir = path.into();
        self
    }

    /// Set the chunk size cap (in MiB)
    pub fn chunk_cap_mib(mut self, mib: u64) -> Self {
        self.config.chunk_cap_mib = mib;
        self
    }

    /// Replace the whole sanitize policy
    pub fn policy(mut self, policy: SanitizePolicy) -> Self {
        self.config.policy = policy;
        self
    }

    /// Toggle shortening of `/Game/...` asset paths
    pub fn strip_asset_paths(mut self, enabled: bool) -> Self {
        self.config.policy.strip_asset_paths = enabled;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

// =============================================================================
// Sanitize Policy
// =============================================================================

/// Keys dropped outright (engine/editor noise)
const DENY_KEYS: &[&str] = &[
    "ExportPath",
    "UberGraphFrame",
    "Cooked",
    "ExternalData",
    "AssetImportData",
    "SoftObjectPath",
];

/// Single-key mappings under these keys are replaced by their inner value
const WRAPPER_KEYS: &[&str] = &["Key", "SourceString", "AssetPathName"];

/// Fields whose asset paths are never shortened (they are join keys)
const KEEP_FULL_KEYS: &[&str] = &[
    "Blueprint",
    "Item",
    "Items",
    "Icon",
    "StatusEffect",
    "StatusEffects",
    "ItemPath",
    "ItemClass",
    "TechTreeItem",
    "TechTreeItemPath",
    "Class",
    "DamageTypeModified",
    "DamageType",
    "WeaponType",
];

/// Policy knobs for the value sanitizer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizePolicy {
    /// Keys removed from every mapping
    pub deny_keys: HashSet<String>,

    /// Keys that mark a single-key wrapper mapping
    pub wrapper_keys: HashSet<String>,

    /// Field names that keep full asset paths when shortening is on
    pub keep_full_keys: HashSet<String>,

    /// Shorten "/Game/.../Foo.Foo" to "Foo" (pretty, but can break joins)
    pub strip_asset_paths: bool,
}

impl Default for SanitizePolicy {
    fn default() -> Self {
        let set = |keys: &[&str]| -> HashSet<String> { keys.iter().map(|k| k.to_string()).collect() };
        Self {
            deny_keys: set(DENY_KEYS),
            wrapper_keys: set(WRAPPER_KEYS),
            keep_full_keys: set(KEEP_FULL_KEYS),
            strip_asset_paths: false,
        }
    }
}

impl SanitizePolicy {
    /// A policy with no denylist, no wrappers and no path shortening
    pub fn permissive() -> Self {
        Self {
            deny_keys: HashSet::new(),
            wrapper_keys: HashSet::new(),
            keep_full_keys: HashSet::new(),
            strip_asset_paths: false,
        }
    }

    /// Whether a field keeps its full asset path
    ///
    /// True for the keep-full set and for any name ending in "path" or
    /// "class" (case-insensitive).
    pub fn keeps_full_path(&self, key_name: Option<&str>) -> bool {
        let Some(key) = key_name.filter(|k| !k.is_empty()) else {
            return false;
        };
        if self.keep_full_keys.contains(key) {
            return true;
        }
        let lower = key.to_lowercase();
        lower.ends_with("path") || lower.ends_with("class")
    }
}
