//! Read/write access to a raw JSON configuration through [`ParamPath`].
//!
//! Reads never fail: a missing key, a `null`, or an intermediate node that is not an
//! object all read as absent. Writes create missing intermediate objects but refuse
//! to replace a foreign (non-object) intermediate value.

use crate::params::ParamPath;
use serde_json::{Map, Value};

/// A write was refused because `segment` already holds a non-object value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Blocked {
    pub path: ParamPath,
    pub segment: &'static str,
}

pub fn get(root: &Value, path: ParamPath) -> Option<&Value> {
    let mut node = root;
    for key in path.segments() {
        node = node.as_object()?.get(key)?;
    }
    if node.is_null() {
        None
    } else {
        Some(node)
    }
}

pub fn get_f64(root: &Value, path: ParamPath) -> Option<f64> {
    get(root, path).and_then(Value::as_f64)
}

pub fn set(root: &mut Value, path: ParamPath, value: Value) -> Result<(), Blocked> {
    let slot = parent_mut(root, path)?;
    slot.insert(leaf(path).to_string(), value);
    Ok(())
}

/// Writes `value` only when the leaf is absent (or `null`). Returns whether it wrote.
pub fn set_if_absent(root: &mut Value, path: ParamPath, value: Value) -> Result<bool, Blocked> {
    let slot = parent_mut(root, path)?;
    match slot.get(leaf(path)) {
        Some(existing) if !existing.is_null() => Ok(false),
        _ => {
            slot.insert(leaf(path).to_string(), value);
            Ok(true)
        }
    }
}

fn leaf(path: ParamPath) -> &'static str {
    path.segments().last().unwrap_or_default()
}

fn parent_mut(root: &mut Value, path: ParamPath) -> Result<&mut Map<String, Value>, Blocked> {
    let segments: Vec<&'static str> = path.segments().collect();
    let parents = &segments[..segments.len().saturating_sub(1)];

    if root.is_null() {
        *root = Value::Object(Map::new());
    }
    let mut node = root;
    let mut at = "";
    for &key in parents {
        let map = node.as_object_mut().ok_or(Blocked { path, segment: at })?;
        let child = map
            .entry(key.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if child.is_null() {
            *child = Value::Object(Map::new());
        }
        node = child;
        at = key;
    }
    node.as_object_mut().ok_or(Blocked { path, segment: at })
}
