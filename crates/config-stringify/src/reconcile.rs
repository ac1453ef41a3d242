//! Reconciliation: drive a parsed CST object toward a target value graph
//! with the smallest local edits, keeping trivia anchored to its entry.
//!
//! The walk follows the target's key order with an insertion cursor.
//! Renames are detected purely positionally: a target key that is new to
//! the tree, meeting a to-be-removed property exactly at the cursor,
//! replaces that property in place. That keeps `, // inline` comments on
//! properties whose key a migration renamed. The heuristic fires on
//! positional coincidence alone; there is no value similarity check.
//!
//! Values that already match the target are skipped entirely, so their
//! source bytes (number notation, string escapes, layout) never change.

use std::collections::HashSet;

use jsonc_cst::{Node, ObjectNode};
use serde_json::{Map, Value};

pub(crate) fn reconcile(obj: &mut ObjectNode, target: &Map<String, Value>) {
    let mut to_remove: HashSet<String> = obj
        .keys()
        .filter(|k| !target.contains_key(*k))
        .map(str::to_string)
        .collect();
    let mut processed: HashSet<String> = HashSet::new();
    let mut insert_index = 0usize;

    for (key, value) in target {
        if obj.contains_key(key) {
            reconcile_value(obj, key, value);
            if let Some(index) = obj.index_of(key) {
                insert_index = index + 1;
            }
            processed.insert(key.clone());
            continue;
        }

        let rename_candidate = obj
            .key_at(insert_index)
            .filter(|k| to_remove.contains(*k) && !processed.contains(*k))
            .map(str::to_string);
        if let Some(old_key) = rename_candidate {
            obj.replace_entry(insert_index, key, value);
            to_remove.remove(&old_key);
            processed.insert(old_key);
            processed.insert(key.clone());
            upgrade_new_array(obj, key, value);
            insert_index += 1;
            continue;
        }

        obj.insert(insert_index, key, value);
        upgrade_new_array(obj, key, value);
        insert_index += 1;
    }

    let leftover: Vec<String> = obj
        .keys()
        .filter(|k| to_remove.contains(*k) && !processed.contains(*k))
        .map(str::to_string)
        .collect();
    for key in leftover {
        obj.remove(&key);
    }
}

fn reconcile_value(obj: &mut ObjectNode, key: &str, value: &Value) {
    if obj.get(key).is_some_and(|node| node.to_value() == *value) {
        return;
    }
    match value {
        Value::Array(elems) => reconcile_array(obj, key, value, elems),
        Value::Object(nested_target) => {
            if let Some(Node::Object(nested)) = obj.get_mut(key) {
                reconcile(nested, nested_target);
            } else {
                obj.set_value(key, value);
            }
        }
        _ => {
            obj.set_value(key, value);
        }
    }
}

/// Arrays are truncated from the back, then elements are replaced in place
/// (keeping each element's trivia) or appended. Elements are not
/// structurally diffed.
fn reconcile_array(obj: &mut ObjectNode, key: &str, value: &Value, target: &[Value]) {
    if let Some(Node::Array(arr)) = obj.get_mut(key) {
        for index in (target.len()..arr.len()).rev() {
            arr.remove(index);
        }
        for (index, elem) in target.iter().enumerate() {
            if index < arr.len() {
                if arr.get(index).is_some_and(|n| n.to_value() == *elem) {
                    continue;
                }
                arr.replace(index, elem);
            } else {
                arr.push(elem);
            }
        }
    } else {
        obj.set_value(key, value);
        upgrade_new_array(obj, key, value);
    }
}

/// Non-empty arrays rendered from scratch are promoted to one element per
/// line; arrays that existed before keep their layout.
fn upgrade_new_array(obj: &mut ObjectNode, key: &str, value: &Value) {
    if matches!(value, Value::Array(elems) if !elems.is_empty()) {
        if let Some(Node::Array(arr)) = obj.get_mut(key) {
            arr.ensure_multiline();
        }
    }
}
