//! Editor bundles the query evaluator and merge settings behind the four
//! document operations.

use crate::error::{Error, Operation, Result};
use crate::guard::assert_valid_document;
use crate::merge::{ArrayMerge, MergeEngine};
use crate::path::{descend_to_parent, remove_child, set_child, split_path};
use crate::query::{DotPathEvaluator, QueryEvaluator};
use crate::value::Value;
use tracing::debug;

/// EditorBuilder is a builder for creating an Editor.
#[derive(Default)]
pub struct EditorBuilder {
    evaluator: Option<Box<dyn QueryEvaluator>>,
    array_merge: ArrayMerge,
}

impl EditorBuilder {
    /// Creates a new EditorBuilder.
    pub fn new() -> Self {
        EditorBuilder::default()
    }

    /// Sets the evaluator used to read values by path.
    pub fn evaluator(mut self, evaluator: Box<dyn QueryEvaluator>) -> Self {
        self.evaluator = Some(evaluator);
        self
    }

    /// Sets how lists on both sides of a merge are combined.
    pub fn array_merge(mut self, array_merge: ArrayMerge) -> Self {
        self.array_merge = array_merge;
        self
    }

    /// Builds the Editor.
    pub fn build(self) -> Editor {
        Editor {
            evaluator: self
                .evaluator
                .unwrap_or_else(|| Box::new(DotPathEvaluator::new())),
            array_merge: self.array_merge,
        }
    }
}

/// Editor reads, writes, removes and merges values inside documents.
///
/// Writes and removals mutate the document in place. Merges return a new
/// document and leave their inputs alone.
pub struct Editor {
    evaluator: Box<dyn QueryEvaluator>,
    array_merge: ArrayMerge,
}

impl Default for Editor {
    fn default() -> Self {
        Editor::builder().build()
    }
}

impl Editor {
    /// Creates an Editor with the built-in evaluator and replacing list merges.
    pub fn new() -> Self {
        Editor::default()
    }

    /// Creates a new EditorBuilder.
    pub fn builder() -> EditorBuilder {
        EditorBuilder::new()
    }

    /// Returns the value at `path`, or `None` if nothing is found there.
    pub fn get_value_by_path(&self, document: &Value, path: &str) -> Result<Option<Value>> {
        self.search(document, path)
            .map_err(|e| e.within(Operation::Searching, path))
    }

    /// Replaces the value at `path` with `value`.
    ///
    /// The path must already resolve; this never creates structure.
    pub fn update_by_path<'a>(
        &self,
        document: &'a mut Value,
        path: &str,
        value: Value,
    ) -> Result<&'a mut Value> {
        self.update(document, path, value)
            .map_err(|e| e.within(Operation::Updating, path))?;
        Ok(document)
    }

    /// Removes the value at `path`. The slot must exist, though it may hold `null`.
    pub fn remove_by_path<'a>(&self, document: &'a mut Value, path: &str) -> Result<&'a mut Value> {
        self.remove(document, path)
            .map_err(|e| e.within(Operation::Removing, path))?;
        Ok(document)
    }

    /// Merges `source` into `target` at `path`. See [`MergeEngine::merge`].
    pub fn merge_objects(&self, target: &Value, source: &Value, path: Option<&str>) -> Result<Value> {
        MergeEngine::new(&*self.evaluator, self.array_merge)
            .merge(target, source, path)
            .map_err(|e| e.within(Operation::Merging, path.unwrap_or_default()))
    }

    fn search(&self, document: &Value, path: &str) -> Result<Option<Value>> {
        assert_valid_document(document)?;
        self.evaluator
            .evaluate(document, path)
            .map_err(|e| Error::query(path, e))
    }

    fn update(&self, document: &mut Value, path: &str, value: Value) -> Result<()> {
        if self.search(document, path)?.is_none() {
            return Err(Error::path_not_found(path));
        }

        let segments = split_path(path);
        let parent = descend_to_parent(document, &segments)?;
        let last = segments.last().map(String::as_str).unwrap_or_default();
        set_child(parent, last, value, path)?;
        debug!(path, "updated value");
        Ok(())
    }

    fn remove(&self, document: &mut Value, path: &str) -> Result<()> {
        assert_valid_document(document)?;

        let segments = split_path(path);
        let parent = descend_to_parent(document, &segments)?;
        let last = segments.last().map(String::as_str).unwrap_or_default();
        if remove_child(parent, last).is_none() {
            return Err(Error::path_not_found(path));
        }
        debug!(path, "removed value");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::QueryError;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn v(j: serde_json::Value) -> Value {
        Value::from(j)
    }

    #[test]
    fn test_get_value() {
        let editor = Editor::new();
        let doc = v(json!({"bpRequest": {"custLoginId": "user123", "fee": [{"feeAmount": 10.0}]}}));
        assert_eq!(
            editor.get_value_by_path(&doc, "bpRequest.custLoginId").unwrap(),
            Some(v(json!("user123")))
        );
        assert_eq!(
            editor.get_value_by_path(&doc, "bpRequest.fee[0].feeAmount").unwrap(),
            Some(Value::Float(10.0))
        );
        assert_eq!(editor.get_value_by_path(&doc, "bpRequest.nonExistingField").unwrap(), None);
    }

    #[test]
    fn test_get_value_errors() {
        let editor = Editor::new();
        let err = editor.get_value_by_path(&Value::Null, "path").unwrap_err();
        assert!(err.is_invalid_document());
        assert!(err.to_string().contains("Invalid JSON: Input must be a non-null object."));

        let err = editor
            .get_value_by_path(&v(json!({"a": 1})), "invalid[path")
            .unwrap_err();
        assert!(err.is_query_error());
        assert!(err.to_string().starts_with("Error searching JSON with path \"invalid[path\""));
    }

    #[test]
    fn test_update_array_element() {
        let editor = Editor::new();
        let mut doc = v(json!({"items": ["x", "y", "z"]}));
        editor.update_by_path(&mut doc, "items[1]", v(json!("w"))).unwrap();
        assert_eq!(doc, v(json!({"items": ["x", "w", "z"]})));
    }

    #[test]
    fn test_update_nested_field_returns_same_document() {
        let editor = Editor::new();
        let mut doc = v(json!({"bpRequest": {"accountFrom": {"amount": 1000.0, "bankCode": "014"}}}));
        let updated = editor
            .update_by_path(&mut doc, "bpRequest.accountFrom.amount", Value::Float(2000.0))
            .unwrap();
        assert_eq!(
            updated.child("bpRequest").and_then(|b| b.child("accountFrom")),
            Some(&v(json!({"amount": 2000.0, "bankCode": "014"})))
        );
    }

    #[test]
    fn test_update_null_slot_is_allowed() {
        let editor = Editor::new();
        let mut doc = v(json!({"a": {"b": null}}));
        editor.update_by_path(&mut doc, "a.b", v(json!(1))).unwrap();
        assert_eq!(doc, v(json!({"a": {"b": 1}})));
    }

    #[test]
    fn test_update_missing_path() {
        let editor = Editor::new();
        let mut doc = v(json!({"bpRequest": {"x": 1}}));
        let err = editor
            .update_by_path(&mut doc, "bpRequest.nonExistingField.deepField", v(json!("new")))
            .unwrap_err();
        assert!(err.is_path_not_found());
        assert_eq!(
            err.to_string(),
            "Error updating JSON with path \"bpRequest.nonExistingField.deepField\": \
             Path \"bpRequest.nonExistingField.deepField\" does not exist in the JSON object."
        );
        assert_eq!(doc, v(json!({"bpRequest": {"x": 1}})));
    }

    #[test]
    fn test_update_errors() {
        let editor = Editor::new();
        let err = editor.update_by_path(&mut Value::Null, "path", Value::Null).unwrap_err();
        assert!(err.is_invalid_document());

        let mut doc = v(json!({"a": 1}));
        let err = editor.update_by_path(&mut doc, "invalid[path", Value::Null).unwrap_err();
        assert!(err.to_string().starts_with("Error updating JSON with path"));
    }

    #[test]
    fn test_update_negative_index_is_not_written() {
        // readable through the evaluator, but not plain index addressing
        let editor = Editor::new();
        let mut doc = v(json!({"items": [1, 2]}));
        let err = editor.update_by_path(&mut doc, "items[-1]", Value::Null).unwrap_err();
        assert!(err.is_path_not_found());
        assert_eq!(doc, v(json!({"items": [1, 2]})));
    }

    #[test]
    fn test_remove_field() {
        let editor = Editor::new();
        let mut doc = v(json!({"a": {"b": 1, "c": 2}}));
        editor.remove_by_path(&mut doc, "a.b").unwrap();
        assert_eq!(doc, v(json!({"a": {"c": 2}})));
    }

    #[test]
    fn test_remove_null_and_list_slots() {
        let editor = Editor::new();
        let mut doc = v(json!({"n": null, "items": ["a", "b", "c"]}));
        editor.remove_by_path(&mut doc, "n").unwrap();
        editor.remove_by_path(&mut doc, "items[0]").unwrap();
        assert_eq!(doc, v(json!({"items": ["b", "c"]})));
    }

    #[test]
    fn test_remove_missing() {
        let editor = Editor::new();
        let mut doc = v(json!({"bpRequest": {"tempField": "t"}}));

        let err = editor.remove_by_path(&mut doc, "bpRequest.absent").unwrap_err();
        assert!(err.is_path_not_found());
        assert!(err.to_string().contains("Path \"bpRequest.absent\" does not exist"));

        let err = editor.remove_by_path(&mut doc, "nonExisting.deep.path").unwrap_err();
        assert!(err.to_string().contains("Key path not found"));

        let err = editor.remove_by_path(&mut doc, "invalid[path").unwrap_err();
        assert!(err.to_string().starts_with("Error removing JSON with path"));

        let err = editor.remove_by_path(&mut Value::List(vec![]), "a").unwrap_err();
        assert!(err.is_invalid_document());
    }

    struct Failing;

    impl QueryEvaluator for Failing {
        fn evaluate(&self, _: &Value, _: &str) -> std::result::Result<Option<Value>, QueryError> {
            Err(QueryError::evaluation("backend unavailable"))
        }
    }

    #[test]
    fn test_custom_evaluator() {
        let editor = Editor::builder().evaluator(Box::new(Failing)).build();
        let err = editor.get_value_by_path(&v(json!({})), "a").unwrap_err();
        assert!(err.is_query_error());
        assert!(err.to_string().contains("backend unavailable"));

        let err = editor
            .merge_objects(&v(json!({})), &v(json!({})), Some("a"))
            .unwrap_err();
        assert!(err.to_string().starts_with("Error merging JSON with path \"a\""));
    }
}
