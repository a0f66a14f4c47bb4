//! # JSON Path Merge
//!
//! Path-addressed reading, writing, removal and deep merging of JSON/YAML
//! documents whose shape is only known at runtime.
//!
//! ## Modules
//!
//! - [`value`] - In-memory representation of JSON/YAML values
//! - [`path`] - Path splitting and step-by-step traversal used by writes and removals
//! - [`query`] - Read-only path expressions and the evaluator seam
//! - [`merge`] - Generic deep merge and the path-aware merge engine
//! - [`editor`] - The four document operations behind one configurable type
//!
//! The free functions at the crate root use a shared default [`Editor`].

pub mod editor;
pub mod error;
pub mod guard;
pub mod merge;
pub mod path;
pub mod query;
pub mod value;

pub use editor::{Editor, EditorBuilder};
pub use error::{Error, Operation, Result};
pub use guard::assert_valid_document;
pub use merge::{deep_merge, ArrayMerge, MergeEngine};
pub use path::split_path;
pub use query::{DotPathEvaluator, Expression, QueryError, QueryEvaluator};
pub use value::Value;

use once_cell::sync::Lazy;

static DEFAULT_EDITOR: Lazy<Editor> = Lazy::new(Editor::new);

/// Returns the value at `path` in `document`, or `None` if nothing is found.
pub fn get_value_by_path(document: &Value, path: &str) -> Result<Option<Value>> {
    DEFAULT_EDITOR.get_value_by_path(document, path)
}

/// Replaces the existing value at `path` in place.
pub fn update_by_path<'a>(document: &'a mut Value, path: &str, value: Value) -> Result<&'a mut Value> {
    DEFAULT_EDITOR.update_by_path(document, path, value)
}

/// Removes the existing value at `path` in place.
pub fn remove_by_path<'a>(document: &'a mut Value, path: &str) -> Result<&'a mut Value> {
    DEFAULT_EDITOR.remove_by_path(document, path)
}

/// Merges `source` into `target` at `path`, replacing lists rather than
/// concatenating them.
pub fn merge_objects(target: &Value, source: &Value, path: Option<&str>) -> Result<Value> {
    DEFAULT_EDITOR.merge_objects(target, source, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_free_functions() {
        let mut doc = Value::from(json!({"a": {"b": 1, "c": 2}, "items": ["x", "y"]}));

        assert_eq!(get_value_by_path(&doc, "a.b").unwrap(), Some(Value::Int(1)));

        update_by_path(&mut doc, "items[1]", Value::from("w")).unwrap();
        remove_by_path(&mut doc, "a.b").unwrap();
        assert_eq!(doc, Value::from(json!({"a": {"c": 2}, "items": ["x", "w"]})));

        let merged = merge_objects(&doc, &Value::from(json!({"d": 4})), Some("a")).unwrap();
        assert_eq!(
            merged,
            Value::from(json!({"a": {"c": 2, "d": 4}, "items": ["x", "w"]}))
        );
    }
}
