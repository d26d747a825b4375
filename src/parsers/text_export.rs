//! Engine text export parser (.t3d / .copy)
//!
//! Line-oriented `Key=Value` dumps with no formal grammar:
//!
//! ```text
//! Begin Object Class=/Script/Game.ItemData Name="Sword"
//!    DisplayName=NSLOCTEXT("Items","Sword","Iron Sword")
//!    Weight=2.5
//!    Tags(0)="Melee"
//!    Tags(2)="OneHanded"
//! End Object
//! ```
//!
//! Structural lines are skipped, `Base(Index)` keys fill a sparse list, and
//! anything malformed is ignored.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Number, Value};

use crate::clean::Cleaner;
use crate::error::Result;

/// Line prefixes that carry structure, not properties
const STRUCTURAL_PREFIXES: &[&str] = &["Begin ", "End ", "CustomProperties", "ObjectArchetype="];

static KEY_INDEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<base>.+)\((?P<idx>\d+)\)$").expect("valid regex"));
static INT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-?\d+$").expect("valid regex"));
static FLOAT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-?\d+\.\d+$").expect("valid regex"));
static LOC_TEXT_TRAILING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"NSLOCTEXT\([^)]*,"([^"]*)"\)\s*$"#).expect("valid regex"));
static LOC_TEXT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"NSLOCTEXT\([^)]*,"([^"]*)"\)"#).expect("valid regex"));

/// Parse a text export file into a cleaned property map
pub fn parse(cleaner: &Cleaner, path: &Path) -> Result<Map<String, Value>> {
    let bytes = fs::read(path)?;
    let text = decode_lossy(bytes);
    Ok(parse_str(cleaner, &text))
}

/// A property as read from the dump, before cleaning
enum Property {
    Scalar(Value),
    /// Sparse list: only the slots actually present are stored
    Indexed(BTreeMap<usize, Value>),
}

impl Property {
    fn into_value(self) -> Value {
        match self {
            Property::Scalar(value) => value,
            Property::Indexed(slots) => Value::Array(slots.into_values().collect()),
        }
    }
}

/// Parse text export content already in memory
pub fn parse_str(cleaner: &Cleaner, text: &str) -> Map<String, Value> {
    let mut props: IndexMap<String, Property> = IndexMap::new();

    for raw_line in text.lines() {
        let line = raw_line.trim();
        if line.is_empty() || STRUCTURAL_PREFIXES.iter().any(|p| line.starts_with(p)) {
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim();
        let value = value.trim();

        if let Some(caps) = KEY_INDEX.captures(key) {
            let Ok(idx) = caps["idx"].parse::<usize>() else {
                continue;
            };
            set_indexed(&mut props, &caps["base"], idx, scalar(value));
            continue;
        }

        props.insert(key.to_string(), Property::Scalar(scalar(value)));
    }

    // Gaps between slots are absent after cleaning, so only present slots
    // are materialized, in index order.
    let raw: Map<String, Value> = props
        .into_iter()
        .map(|(key, prop)| (key, prop.into_value()))
        .collect();
    cleaner.clean_props(&raw)
}

/// Write `value` into slot `idx` of the list property `base`
///
/// A scalar already stored under `base` is replaced by a fresh list.
fn set_indexed(props: &mut IndexMap<String, Property>, base: &str, idx: usize, value: Value) {
    let prop = props
        .entry(base.to_string())
        .or_insert_with(|| Property::Indexed(BTreeMap::new()));
    if let Property::Scalar(_) = prop {
        *prop = Property::Indexed(BTreeMap::new());
    }
    if let Property::Indexed(slots) = prop {
        slots.insert(idx, value);
    }
}

/// Convert a raw right-hand side into a typed value
pub fn scalar(raw: &str) -> Value {
    let v = unquote(raw.trim());
    if v.is_empty() {
        return Value::String(String::new());
    }

    match v {
        "True" => return Value::Bool(true),
        "False" => return Value::Bool(false),
        _ => {}
    }

    if INT.is_match(v) {
        if let Ok(n) = v.parse::<i64>() {
            return Value::Number(n.into());
        }
    }
    if FLOAT.is_match(v) {
        if let Some(n) = v.parse::<f64>().ok().and_then(Number::from_f64) {
            return Value::Number(n);
        }
    }

    if let Some(display) = loc_text(v) {
        return Value::String(display);
    }

    Value::String(v.to_string())
}

/// Strip one pair of matching surrounding quotes
fn unquote(v: &str) -> &str {
    for quote in ['"', '\''] {
        if v.starts_with(quote) && v.ends_with(quote) {
            return v.get(1..v.len().saturating_sub(1).max(1)).unwrap_or("");
        }
    }
    v
}

/// NSLOCTEXT("ns","key","Display") → Display
fn loc_text(v: &str) -> Option<String> {
    LOC_TEXT_TRAILING
        .captures(v)
        .or_else(|| LOC_TEXT.captures(v))
        .map(|caps| caps[1].to_string())
}

/// Decode UTF-8, dropping invalid byte sequences
fn decode_lossy(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).replace('\u{FFFD}', ""),
    }
}
