//! Dotted-path access over a JSON tree.
//!
//! The store keeps its state as a `serde_json::Value` object tree so that
//! UI code can address any node with a path like `gameProgress.currentPoints`.
//! This module is the thin accessor layer underneath: lookup, assignment
//! (creating intermediate objects as needed) and the deep merge used when a
//! saved snapshot is layered onto the default schema.

use serde_json::{Map, Value};

/// Look up a node by dotted path. Returns `None` if any segment is missing.
/// A missing path is never an error.
pub fn get<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    let mut node = root;
    for segment in path.split('.') {
        node = node.as_object()?.get(segment)?;
    }
    Some(node)
}

/// Assign `value` at `path`, creating intermediate object nodes as needed.
/// An intermediate that exists but is not an object is replaced by an object,
/// mirroring the write-through behavior UI code expects.
pub fn set(root: &mut Value, path: &str, value: Value) {
    let mut segments = path.split('.').peekable();
    let mut node = root;
    while let Some(segment) = segments.next() {
        if !node.is_object() {
            *node = Value::Object(Map::new());
        }
        let map = node.as_object_mut().expect("just ensured object");
        if segments.peek().is_none() {
            map.insert(segment.to_string(), value);
            return;
        }
        node = map
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
    }
}

/// Deep-merge `overlay` onto `base`. Object values merge recursively; arrays
/// and scalars are replaced wholesale. Keys present in `base` but absent from
/// `overlay` are kept, so the default schema is never narrowed by an older
/// snapshot.
pub fn deep_merge(base: &mut Value, overlay: &Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                if let Some(base_value) = base_map.get_mut(key) {
                    if base_value.is_object() && overlay_value.is_object() {
                        deep_merge(base_value, overlay_value);
                        continue;
                    }
                }
                base_map.insert(key.clone(), overlay_value.clone());
            }
        }
        (base, overlay) => *base = overlay.clone(),
    }
}

/// True if `changed` falls under the wildcard `pattern`.
///
/// `"a.b.*"` matches any path starting with `"a.b."`, `"*"` matches every
/// path. Pure string-prefix matching; exact (non-wildcard) patterns match
/// only themselves.
pub fn matches(pattern: &str, changed: &str) -> bool {
    if pattern == "*" {
        return true;
    }
    match pattern.strip_suffix('*') {
        Some(prefix) => changed.starts_with(prefix),
        None => pattern == changed,
    }
}
