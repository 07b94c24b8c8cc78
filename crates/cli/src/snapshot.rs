//! Raw snapshot inspection
//!
//! Works on the undecoded payload so that a change anywhere inside a
//! project (even one the decoder would drop) marks that project affected.

use serde_json::Value;
use std::collections::BTreeMap;

/// Project key of a raw root element
///
/// Mirrors the decoded node: an explicit `projectId` (top level for typed
/// nodes, inside `attributes` for stereotyped ones), else a project's name.
pub fn project_key(element: &Value) -> Option<&str> {
    let explicit = element
        .get("projectId")
        .or_else(|| element.get("attributes").and_then(|a| a.get("projectId")))
        .and_then(Value::as_str);
    if explicit.is_some() {
        return explicit;
    }

    match element.get("kind").and_then(Value::as_str) {
        Some("project") => element.get("name").and_then(Value::as_str),
        _ => None,
    }
}

/// Root elements of a payload (array, single object, or nothing)
pub fn roots(payload: &Value) -> &[Value] {
    match payload {
        Value::Array(items) => items,
        Value::Object(_) => std::slice::from_ref(payload),
        _ => &[],
    }
}

/// Compact JSON text of every keyed root, by project key
pub fn fingerprints(payload: &Value) -> BTreeMap<String, String> {
    roots(payload)
        .iter()
        .filter_map(|root| project_key(root).map(|key| (key.to_string(), root.to_string())))
        .collect()
}

/// Keys added, removed or changed between two fingerprint sets
pub fn changed_projects(
    before: &BTreeMap<String, String>,
    after: &BTreeMap<String, String>,
) -> Vec<String> {
    let mut changed: Vec<String> = after
        .iter()
        .filter(|(key, text)| before.get(*key) != Some(*text))
        .map(|(key, _)| key.clone())
        .collect();

    changed.extend(
        before
            .keys()
            .filter(|key| !after.contains_key(*key))
            .cloned(),
    );
    changed.sort();
    changed
}
