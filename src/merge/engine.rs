//! Path-aware merge of a fragment into a document.

use super::deep::{deep_merge, ArrayMerge};
use crate::error::{Error, Result};
use crate::guard::assert_valid_document;
use crate::query::{Expression, QueryError, QueryEvaluator, Step};
use crate::value::{Map, Value};
use tracing::debug;

/// MergeEngine merges a fragment into a document at a destination path.
///
/// Where the destination holds a map the fragment is merged into it field by
/// field. Where it holds a list or a scalar the fragment replaces it. Where it
/// does not exist, the engine looks for the closest existing ancestor and
/// merges there, synthesizing whatever nesting is still missing.
///
/// Only the addressed slot changes: list elements and map fields around it
/// are kept as they are.
pub struct MergeEngine<'a> {
    evaluator: &'a dyn QueryEvaluator,
    arrays: ArrayMerge,
}

impl<'a> MergeEngine<'a> {
    /// Creates an engine reading through `evaluator`.
    pub fn new(evaluator: &'a dyn QueryEvaluator, arrays: ArrayMerge) -> Self {
        MergeEngine { evaluator, arrays }
    }

    /// Merges `source` into `target` at `path` and returns the combined document.
    ///
    /// `None` and `Some("")` both merge at the root, which requires `source` to
    /// be a document too. Inputs are never modified.
    pub fn merge(&self, target: &Value, source: &Value, path: Option<&str>) -> Result<Value> {
        assert_valid_document(target)?;

        let path = match path {
            Some(p) if !p.is_empty() => p,
            _ => {
                assert_valid_document(source)?;
                debug!("merging at root");
                return Ok(deep_merge(target, source, self.arrays));
            }
        };

        let segments = resolve_segments(target, path)?;

        match self.query(target, path)? {
            Some(Value::Map(_)) => {
                debug!(path, "merging into existing object");
                return Ok(self.graft_into(target, &segments, source));
            }
            Some(existing) if !existing.is_null() => {
                debug!(path, kind = existing.type_name(), "replacing existing value");
                return Ok(self.graft_into(target, &segments, source));
            }
            _ => {}
        }

        let Some(anchor) = self.find_anchor(target, &segments)? else {
            debug!(path, "no existing ancestor, synthesizing full path");
            return Ok(self.graft_into(target, &segments, source));
        };

        // The anchor is a strict prefix of `path`, so recursion terminates.
        match self.query(source, &anchor)? {
            Some(sub) if !sub.is_null() => {
                debug!(path, anchor = %anchor, "re-merging at existing ancestor");
                self.merge(target, &sub, Some(anchor.as_str()))
            }
            _ => {
                debug!(path, anchor = %anchor, "source has nothing at ancestor, synthesizing full path");
                Ok(self.graft_into(target, &segments, source))
            }
        }
    }

    /// Returns the longest strict prefix of `segments` that resolves to a
    /// non-null value in `target`, as expression text.
    fn find_anchor(&self, target: &Value, segments: &[String]) -> Result<Option<String>> {
        for len in (1..segments.len()).rev() {
            let prefix = expression_text(&segments[..len]);
            if matches!(self.query(target, &prefix)?, Some(v) if !v.is_null()) {
                return Ok(Some(prefix));
            }
        }
        Ok(None)
    }

    /// Copies `target` and merges `source` into the slot at `segments`.
    fn graft_into(&self, target: &Value, segments: &[String], source: &Value) -> Value {
        let mut merged = target.clone();
        self.graft(&mut merged, segments, source);
        merged
    }

    /// Descends from `slot` along `rest`, creating missing containers, and
    /// merges `source` into the slot reached.
    ///
    /// Existing maps and lists are entered in place. A numeric segment that
    /// needs a new container makes a list, padded with `null` up to the
    /// index; any other segment makes a map.
    fn graft(&self, slot: &mut Value, rest: &[String], source: &Value) {
        let Some((head, tail)) = rest.split_first() else {
            *slot = deep_merge(slot, source, self.arrays);
            return;
        };

        let index = head.parse::<usize>().ok();
        let reusable = matches!((&*slot, index), (Value::List(_), Some(_)) | (Value::Map(_), _));
        if !reusable {
            *slot = match index {
                Some(_) => Value::List(Vec::new()),
                None => Value::Map(Map::new()),
            };
        }

        let child = match (slot, index) {
            (Value::List(items), Some(i)) => {
                if items.len() <= i {
                    items.resize(i + 1, Value::Null);
                }
                &mut items[i]
            }
            (Value::Map(map), _) => map.fields.entry(head.clone()).or_default(),
            // reset to one of the shapes above
            _ => return,
        };
        self.graft(child, tail, source);
    }

    fn query(&self, document: &Value, path: &str) -> Result<Option<Value>> {
        self.evaluator
            .evaluate(document, path)
            .map_err(|e| Error::query(path, e))
    }
}

/// Parses `path` into the segments a merge writes through.
///
/// Quoted field names stay whole. Negative indexes count back from the end of
/// the list `target` holds at that point, and fail when no such element exists.
fn resolve_segments(target: &Value, path: &str) -> Result<Vec<String>> {
    let expr = Expression::parse(path).map_err(|e| Error::query(path, e))?;

    let mut segments: Vec<String> = Vec::with_capacity(expr.len());
    for step in expr.steps() {
        let segment = match step {
            Step::Field(name) => name.clone(),
            Step::Index(index) if *index >= 0 => index.to_string(),
            Step::Index(index) => {
                let resolved = segments
                    .iter()
                    .try_fold(target, |current, segment| current.child(segment))
                    .and_then(Value::as_list)
                    .and_then(|list| list.len().checked_sub(index.unsigned_abs() as usize));
                match resolved {
                    Some(i) => i.to_string(),
                    None => {
                        return Err(Error::query(
                            path,
                            QueryError::evaluation(format!(
                                "index {} does not address an existing element",
                                index
                            )),
                        ))
                    }
                }
            }
        };
        segments.push(segment);
    }
    Ok(segments)
}

fn expression_text(segments: &[String]) -> String {
    segments
        .iter()
        .cloned()
        .map(Step::Field)
        .collect::<Expression>()
        .to_string()
}
