// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Structural search over nested JSON
//!
//! Responses nest the interesting objects under wrappers whose names and depth
//! change between API revisions. Instead of hard-coding full paths, extractors
//! look for a key anywhere in the tree.
//!
//! The search walks an explicit work stack, so arbitrarily deep payloads cannot
//! exhaust the call stack. Sibling order is unspecified: when a key occurs more
//! than once, which occurrence is returned is not part of the contract.

use serde_json::{Map, Value};

/// Return the first value stored under `key` anywhere in `data`
///
/// Returns `None` when no object in the tree has that key.
pub fn find_key<'a>(data: &'a Value, key: &str) -> Option<&'a Value> {
    let mut stack = vec![data];

    while let Some(current) = stack.pop() {
        match current {
            Value::Object(map) => {
                if let Some(value) = map.get(key) {
                    return Some(value);
                }
                stack.extend(map.values());
            }
            Value::Array(items) => stack.extend(items),
            _ => {}
        }
    }

    None
}

/// Return the first object whose `key` holds a string starting with `prefix`
///
/// The containing object is returned, not the string, so callers can read the
/// sibling fields (a cursor entry's `content`, for instance). Objects where `key`
/// holds a non-matching or non-string value are searched further down.
pub fn find_key_with_prefix<'a>(
    data: &'a Value,
    key: &str,
    prefix: &str,
) -> Option<&'a Map<String, Value>> {
    let mut stack = vec![data];

    while let Some(current) = stack.pop() {
        match current {
            Value::Object(map) => {
                if let Some(Value::String(value)) = map.get(key)
                    && value.starts_with(prefix)
                {
                    return Some(map);
                }
                stack.extend(map.values());
            }
            Value::Array(items) => stack.extend(items),
            _ => {}
        }
    }

    None
}

/// Follow a fixed path of object keys
pub fn lookup<'a>(data: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter()
        .try_fold(data, |current, segment| current.get(*segment))
}

/// Follow the first of several alias paths that resolves to a non-null value
pub fn lookup_any<'a>(data: &'a Value, paths: &[&[&str]]) -> Option<&'a Value> {
    paths
        .iter()
        .filter_map(|path| lookup(data, path))
        .find(|value| !value.is_null())
}
