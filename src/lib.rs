//! # Codex Sanitizer
//!
//! Turns raw game-export dumps into website-ready JSON:
//! - Engine text exports (`.t3d`, `.copy`), JSON and CSV exports in
//! - Recursively cleaned records, bucketed into datasets by folder
//! - Size-capped chunk files plus an `index.json` manifest out
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Discovery (walkdir)                         │
//! │            input root → supported export files               │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                  Dataset Derivation                          │
//! │        path → dataset key, source kind, record prefix        │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┼────────────┐
//!          ▼            ▼            ▼
//!   ┌────────────┐ ┌──────────┐ ┌──────────┐
//!   │ TextExport │ │   JSON   │ │   CSV    │
//!   └─────┬──────┘ └────┬─────┘ └────┬─────┘
//!         └─────────────┼────────────┘
//!                       ▼
//!               ┌──────────────┐
//!               │   Cleaner    │
//!               └──────┬───────┘
//!                      ▼
//!               ┌──────────────┐        ┌─────────────┐
//!               │ ChunkWriter  │───────▶│ index.json  │
//!               │ (per dataset)│        └─────────────┘
//!               └──────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod clean;
pub mod parsers;
pub mod dataset;
pub mod chunk;
pub mod pipeline;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{CodexError, Result};
pub use config::{Config, SanitizePolicy};
pub use clean::Cleaner;
pub use pipeline::{Pipeline, RunSummary};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of the sanitizer
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
