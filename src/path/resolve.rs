//! Segment splitting and manual traversal.

use crate::error::{Error, Result};
use crate::value::Value;
use once_cell::sync::Lazy;
use regex::Regex;

static INDEX_BRACKETS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[(\d+)\]").expect("index bracket pattern is valid"));

/// Splits a path into its segments.
///
/// Every `[<digits>]` is rewritten to `.<digits>` before splitting on `.`, so
/// `a.b[2].c` and `a.b.2.c` both yield `["a", "b", "2", "c"]`.
pub fn split_path(path: &str) -> Vec<String> {
    INDEX_BRACKETS
        .replace_all(path, ".$1")
        .split('.')
        .map(str::to_string)
        .collect()
}

/// Walks `document` along all but the last segment and returns the container
/// reached, ready for the caller to address its final slot.
///
/// Fails with `PathNotFound` carrying the full path as soon as a step misses.
/// A key that is present with a `null` value does not miss at the step that
/// reads it.
pub fn descend_to_parent<'a>(document: &'a mut Value, segments: &[String]) -> Result<&'a mut Value> {
    let mut current = document;
    let parents = &segments[..segments.len().saturating_sub(1)];

    for segment in parents {
        current = match current.child_mut(segment) {
            Some(next) => next,
            None => {
                tracing::trace!(segment = %segment, "traversal step missed");
                return Err(Error::key_path_not_found(segments));
            }
        };
    }
    Ok(current)
}

/// Overwrites an existing slot of `container`.
///
/// The map key or list slot must already exist; nothing is created here.
pub fn set_child(container: &mut Value, key: &str, value: Value, full_path: &str) -> Result<()> {
    match container.child_mut(key) {
        Some(slot) => {
            *slot = value;
            Ok(())
        }
        None => Err(Error::path_not_found(full_path)),
    }
}

/// Removes a slot from `container`, returning the removed value if present.
///
/// List elements after the removed one shift down by one.
pub fn remove_child(container: &mut Value, key: &str) -> Option<Value> {
    match container {
        Value::Map(m) => m.delete(key),
        Value::List(l) => {
            let index = key.parse::<usize>().ok()?;
            if index < l.len() {
                Some(l.remove(index))
            } else {
                None
            }
        }
        _ => None,
    }
}
