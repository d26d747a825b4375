//! Value Sanitizer
//!
//! Recursive tree-pruning pass over raw export values.
//!
//! ## Rules
//! - Mappings: unwrap single-key wrappers, drop denylisted keys, drop children
//!   that clean to nothing. An empty result is absent.
//! - Sequences: drop elements that clean to nothing. An empty result is absent.
//! - Strings: trimmed; "", "None", "null" and "NULL" are absent; asset paths
//!   are optionally shortened.
//! - Null is absent. Every other scalar (including `0` and `false`) is kept.

use serde_json::{Map, Value};

use crate::config::SanitizePolicy;

/// Literal strings that mean "no value" in engine exports
const NULL_LITERALS: &[&str] = &["None", "null", "NULL"];

/// Markers of an engine asset path inside a string
const ASSET_PATH_MARKERS: &[&str] = &["/Game/", "/Engine/"];

/// Applies a [`SanitizePolicy`] to raw values.
///
/// Returns `None` for "drop this branch", so a parent never has to compare
/// against sentinel values.
#[derive(Debug, Clone, Default)]
pub struct Cleaner {
    policy: SanitizePolicy,
}

impl Cleaner {
    /// Create a cleaner with the given policy
    pub fn new(policy: SanitizePolicy) -> Self {
        Self { policy }
    }

    /// Clean a value; `key_name` is the field the value sits under, if any.
    pub fn clean(&self, value: &Value, key_name: Option<&str>) -> Option<Value> {
        match value {
            Value::Object(map) => self.clean_map(map, key_name),
            Value::Array(items) => self.clean_seq(items, key_name),
            Value::String(s) => self.clean_str(s, key_name).map(Value::String),
            Value::Null => None,
            other => Some(other.clone()),
        }
    }

    /// Clean a mapping, always yielding a mapping (possibly empty)
    ///
    /// Used by parsers that must hand back a property map even when every
    /// property was dropped or the map unwrapped to a scalar.
    pub fn clean_props(&self, props: &Map<String, Value>) -> Map<String, Value> {
        match self.clean_map(props, None) {
            Some(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }

    /// Clean a single string field
    pub fn clean_str(&self, raw: &str, key_name: Option<&str>) -> Option<String> {
        let s = raw.trim();
        if s.is_empty() || NULL_LITERALS.contains(&s) {
            return None;
        }

        if self.policy.strip_asset_paths
            && ASSET_PATH_MARKERS.iter().any(|m| s.contains(m))
            && !self.policy.keeps_full_path(key_name)
        {
            let short = shorten_asset_path(s);
            return if short.is_empty() { None } else { Some(short) };
        }

        Some(s.to_string())
    }

    fn clean_map(&self, map: &Map<String, Value>, key_name: Option<&str>) -> Option<Value> {
        if map.len() == 1 {
            if let Some((k, inner)) = map.iter().next() {
                if self.policy.wrapper_keys.contains(k) {
                    return self.clean(inner, key_name);
                }
            }
        }

        let mut out = Map::new();
        for (k, v) in map {
            if self.policy.deny_keys.contains(k) {
                continue;
            }
            if let Some(cleaned) = self.clean(v, Some(k)) {
                out.insert(k.clone(), cleaned);
            }
        }

        if out.is_empty() {
            None
        } else {
            Some(Value::Object(out))
        }
    }

    fn clean_seq(&self, items: &[Value], key_name: Option<&str>) -> Option<Value> {
        let out: Vec<Value> = items
            .iter()
            .filter_map(|item| self.clean(item, key_name))
            .collect();

        if out.is_empty() {
            None
        } else {
            Some(Value::Array(out))
        }
    }
}

/// "/Game/Items/Sword.Sword_C'" → "Sword_C"
fn shorten_asset_path(s: &str) -> String {
    s.rsplit('.').next().unwrap_or(s).replace('\'', "")
}
