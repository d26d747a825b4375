//! Tests for the chunk writer and manifest index
//!
//! These tests verify:
//! - Flushing empty and non-empty writers
//! - Cap-driven rotation and record order across chunks
//! - Oversized records getting their own chunk
//! - Chunk file naming, payload shape and reported metadata
//! - Manifest shape and pretty-printing

use std::fs;
use std::path::{Path, PathBuf};

use codex_sanitizer::chunk::{ChunkWriter, Index, Record, INDEX_FILENAME, SCHEMA_VERSION};
use codex_sanitizer::dataset::SourceKind;
use serde_json::{json, Value};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_datasets() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("datasets");
    (temp_dir, path)
}

/// Record whose compact encoding is padded by `filler` characters
fn record(i: usize, filler: usize) -> Record {
    Record::new(
        format!("rec_{:03}", i),
        "01_traits/Traits.json",
        json!({"Payload": "x".repeat(filler)}),
    )
}

fn record_size(record: &Record) -> usize {
    serde_json::to_vec(record).unwrap().len()
}

fn read_chunk(dir: &Path, name: &str) -> Value {
    let raw = fs::read(dir.join(name)).unwrap();
    serde_json::from_slice(&raw).unwrap()
}

// =============================================================================
// Flush Tests
// =============================================================================

#[test]
fn test_flush_empty_is_noop() {
    let (_temp, root) = setup_temp_datasets();
    let mut writer = ChunkWriter::new("traits", 1024, &root);

    assert_eq!(writer.flush().unwrap(), None);
    assert_eq!(writer.dataset_key(), "traits");
    assert_eq!(writer.out_dir(), root.join("traits"));
    assert_eq!(writer.next_chunk_index(), 0);
    assert!(!root.join("traits").exists());
}

#[test]
fn test_flush_writes_compact_payload() {
    let (_temp, root) = setup_temp_datasets();
    let mut writer = ChunkWriter::new("traits", 1024 * 1024, &root);

    writer
        .add(Record::new("Brave", "01_traits/Brave.t3d", json!({"Courage": 3})))
        .unwrap();
    let info = writer.flush().unwrap().unwrap();

    let raw = fs::read_to_string(root.join("traits").join("traits_000.json")).unwrap();
    assert_eq!(
        raw,
        r#"{"dataset":"traits","chunk":0,"records":[{"id":"Brave","src":"01_traits/Brave.t3d","data":{"Courage":3}}]}"#
    );
    assert_eq!(info.file, "datasets/traits/traits_000.json");
    assert_eq!(info.records, 1);
    assert_eq!(info.bytes, raw.len());
    assert_eq!(info.chunk, 0);
    assert_eq!(writer.pending_records(), 0);
    assert_eq!(writer.next_chunk_index(), 1);
}

#[test]
fn test_flush_resets_estimate() {
    let (_temp, root) = setup_temp_datasets();
    let mut writer = ChunkWriter::new("traits", 1024 * 1024, &root);

    let rec = record(0, 10);
    let size = record_size(&rec);
    writer.add(rec).unwrap();
    assert_eq!(writer.pending_bytes(), 2 + size + 1);

    writer.flush().unwrap();
    assert_eq!(writer.pending_bytes(), 2);
}

#[test]
fn test_chunk_names_are_zero_padded() {
    let (_temp, root) = setup_temp_datasets();
    let mut writer = ChunkWriter::new("items_cdo", 1024, &root);

    for i in 0..12 {
        writer.add(record(i, 1)).unwrap();
        writer.flush().unwrap();
    }

    assert!(root.join("items_cdo").join("items_cdo_000.json").exists());
    assert!(root.join("items_cdo").join("items_cdo_011.json").exists());
    assert_eq!(writer.written().len(), 12);
}

// =============================================================================
// Cap Tests
// =============================================================================

#[test]
fn test_rotation_respects_cap_and_order() {
    let (_temp, root) = setup_temp_datasets();
    let sample = record(0, 200);
    let size = record_size(&sample);
    // Each record is a bit over a third of the cap: two fit, three do not.
    let cap = size * 3 - 10;
    let mut writer = ChunkWriter::new("crafting", cap, &root);

    for i in 0..7 {
        writer.add(record(i, 200)).unwrap();
    }
    let chunks = writer.finish().unwrap();

    assert_eq!(chunks.iter().map(|c| c.records).collect::<Vec<_>>(), vec![2, 2, 2, 1]);
    for (i, info) in chunks.iter().enumerate() {
        assert_eq!(info.chunk as usize, i);
        let estimate = 2 + info.records * (size + 1);
        assert!(estimate <= cap, "chunk {} estimate {} over cap {}", i, estimate, cap);
    }

    let mut ids = Vec::new();
    for info in &chunks {
        let name = Path::new(&info.file).file_name().unwrap().to_str().unwrap();
        let chunk = read_chunk(&root.join("crafting"), name);
        assert_eq!(chunk["dataset"], json!("crafting"));
        assert_eq!(chunk["chunk"], json!(info.chunk));
        for rec in chunk["records"].as_array().unwrap() {
            ids.push(rec["id"].as_str().unwrap().to_string());
        }
    }
    let expected: Vec<String> = (0..7).map(|i| format!("rec_{:03}", i)).collect();
    assert_eq!(ids, expected);
}

#[test]
fn test_oversized_record_gets_own_chunk() {
    let (_temp, root) = setup_temp_datasets();
    let mut writer = ChunkWriter::new("map_data", 100, &root);

    writer.add(record(0, 5)).unwrap();
    writer.add(record(1, 500)).unwrap();
    writer.add(record(2, 5)).unwrap();
    let chunks = writer.finish().unwrap();

    assert_eq!(chunks.iter().map(|c| c.records).collect::<Vec<_>>(), vec![1, 1, 1]);
    assert!(chunks[1].bytes > 100);
}

#[test]
fn test_first_oversized_record_is_admitted() {
    let (_temp, root) = setup_temp_datasets();
    let mut writer = ChunkWriter::new("map_data", 10, &root);

    writer.add(record(0, 500)).unwrap();

    assert_eq!(writer.pending_records(), 1);
    assert!(writer.written().is_empty());
}

#[test]
fn test_zero_cap_puts_each_record_alone() {
    let (_temp, root) = setup_temp_datasets();
    let mut writer = ChunkWriter::new("misc", 0, &root);

    for i in 0..3 {
        writer.add(record(i, 1)).unwrap();
    }
    let chunks = writer.finish().unwrap();

    assert_eq!(chunks.len(), 3);
}

#[test]
fn test_finish_returns_all_chunks() {
    let (_temp, root) = setup_temp_datasets();
    let size = record_size(&record(0, 50));
    let mut writer = ChunkWriter::new("weapons", size + 3, &root);

    for i in 0..4 {
        writer.add(record(i, 50)).unwrap();
    }
    assert_eq!(writer.written().len(), 3);

    let chunks = writer.finish().unwrap();
    assert_eq!(chunks.len(), 4);
    assert_eq!(chunks[3].file, "datasets/weapons/weapons_003.json");
}

// =============================================================================
// Index Tests
// =============================================================================

#[test]
fn test_index_registers_first_kind() {
    let mut index = Index::new(20);

    index.dataset_mut("items_cdo", SourceKind::Cdo).records_total += 2;
    index.dataset_mut("items_cdo", SourceKind::Misc).records_total += 3;

    let entry = index.dataset("items_cdo").unwrap();
    assert_eq!(entry.source_kind, SourceKind::Cdo);
    assert_eq!(entry.records_total, 5);
    assert_eq!(index.records_total(), 5);
}

#[test]
fn test_index_write_shape() {
    let temp = TempDir::new().unwrap();
    let datasets_root = temp.path().join("datasets");
    let mut writer = ChunkWriter::new("traits_assets", 1024 * 1024, &datasets_root);
    writer.add(record(0, 1)).unwrap();

    let mut index = Index::new(20);
    index.dataset_mut("traits_assets", SourceKind::Assets).records_total = 1;
    index.dataset_mut("configs", SourceKind::Misc);
    let chunks = writer.finish().unwrap();
    index.datasets.get_mut("traits_assets").unwrap().set_chunks(chunks);

    let path = index.write(temp.path()).unwrap();
    assert_eq!(path, temp.path().join(INDEX_FILENAME));

    let raw = fs::read_to_string(&path).unwrap();
    assert!(raw.contains("\n  \"schema_version\": 1"));

    let parsed: Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(parsed["schema_version"], json!(SCHEMA_VERSION));
    assert_eq!(parsed["chunk_cap_mib"], json!(20));
    assert!(parsed["generated_at"].as_str().unwrap().ends_with("+00:00"));

    let keys: Vec<&String> = parsed["datasets"].as_object().unwrap().keys().collect();
    assert_eq!(keys, vec!["traits_assets", "configs"]);

    let traits = &parsed["datasets"]["traits_assets"];
    assert_eq!(traits["records_total"], json!(1));
    assert_eq!(traits["files_total"], json!(1));
    assert_eq!(traits["source_kind"], json!("assets"));
    assert_eq!(
        traits["chunks"][0]["file"],
        json!("datasets/traits_assets/traits_assets_000.json")
    );

    let configs = &parsed["datasets"]["configs"];
    assert_eq!(configs["chunks"], json!([]));
    assert_eq!(configs["files_total"], json!(0));
    assert_eq!(configs["source_kind"], json!("misc"));
}
