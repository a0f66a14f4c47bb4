//! Generic recursive merge of two values.

use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// ArrayMerge controls what happens when both sides of a merge hold a list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ArrayMerge {
    /// The right-hand list replaces the left-hand list.
    #[default]
    Replace,
    /// The right-hand list is appended to the left-hand list.
    Concat,
}

impl fmt::Display for ArrayMerge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArrayMerge::Replace => write!(f, "replace"),
            ArrayMerge::Concat => write!(f, "concat"),
        }
    }
}

/// Merges `rhs` into `lhs` and returns the result. Neither input is modified.
///
/// Two maps merge key by key, recursing into keys present on both sides. Two
/// lists follow `arrays`. Any other pairing yields a copy of `rhs`, so a map
/// never merges into a scalar or a list, and a `null` on the right wins.
pub fn deep_merge(lhs: &Value, rhs: &Value, arrays: ArrayMerge) -> Value {
    match (lhs, rhs) {
        (Value::Map(left), Value::Map(right)) => {
            let mut out = left.clone();
            for (key, rv) in right.iter() {
                let merged = match left.get(key) {
                    Some(lv) => deep_merge(lv, rv, arrays),
                    None => rv.clone(),
                };
                out.set(key.clone(), merged);
            }
            Value::Map(out)
        }
        (Value::List(left), Value::List(right)) => match arrays {
            ArrayMerge::Replace => Value::List(right.clone()),
            ArrayMerge::Concat => Value::List(left.iter().chain(right.iter()).cloned().collect()),
        },
        (_, rhs) => rhs.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn v(j: serde_json::Value) -> Value {
        Value::from(j)
    }

    #[test]
    fn test_nested_maps_merge() {
        let lhs = v(json!({"a": 1, "b": {"x": 1}}));
        let rhs = v(json!({"b": {"y": 2}, "c": 3}));
        assert_eq!(
            deep_merge(&lhs, &rhs, ArrayMerge::Replace),
            v(json!({"a": 1, "b": {"x": 1, "y": 2}, "c": 3}))
        );
        // inputs untouched
        assert_eq!(lhs, v(json!({"a": 1, "b": {"x": 1}})));
    }

    #[test]
    fn test_list_strategies() {
        let lhs = v(json!({"items": [1, 2, 3]}));
        let rhs = v(json!({"items": ["a", "b"]}));
        assert_eq!(
            deep_merge(&lhs, &rhs, ArrayMerge::Replace),
            v(json!({"items": ["a", "b"]}))
        );
        assert_eq!(
            deep_merge(&lhs, &rhs, ArrayMerge::Concat),
            v(json!({"items": [1, 2, 3, "a", "b"]}))
        );
    }

    #[test]
    fn test_mismatched_kinds_take_rhs() {
        let lhs = v(json!({"s": "text", "m": {"k": 1}, "l": [1]}));
        let rhs = v(json!({"s": {"k": 2}, "m": null, "l": {"k": 3}}));
        assert_eq!(
            deep_merge(&lhs, &rhs, ArrayMerge::Concat),
            v(json!({"s": {"k": 2}, "m": null, "l": {"k": 3}}))
        );
    }

    #[test]
    fn test_empty_rhs_is_identity() {
        let lhs = v(json!({"a": {"b": [1]}}));
        assert_eq!(deep_merge(&lhs, &v(json!({})), ArrayMerge::Replace), lhs);
    }

    #[test]
    fn test_array_merge_names() {
        use clap::ValueEnum;
        assert_eq!(ArrayMerge::from_str("concat", true), Ok(ArrayMerge::Concat));
        assert_eq!(ArrayMerge::from_str("Replace", true), Ok(ArrayMerge::Replace));
        assert!(ArrayMerge::from_str("zip", true).is_err());
        assert_eq!(ArrayMerge::Concat.to_string(), "concat");
    }
}
