//! Evaluation of parsed expressions.

use super::{Expression, QueryError, QueryEvaluator, Step};
use crate::value::Value;

impl Expression {
    /// Resolves the expression against `document`, borrowing the result.
    pub fn find<'a>(&self, document: &'a Value) -> Option<&'a Value> {
        self.steps()
            .iter()
            .try_fold(document, |current, step| apply_step(current, step))
    }
}

fn apply_step<'a>(current: &'a Value, step: &Step) -> Option<&'a Value> {
    match step {
        Step::Field(name) => current.child(name),
        Step::Index(index) => {
            let list = current.as_list()?;
            let resolved = if *index < 0 {
                list.len().checked_sub(index.unsigned_abs() as usize)?
            } else {
                *index as usize
            };
            list.get(resolved)
        }
    }
}

/// DotPathEvaluator is the built-in [`QueryEvaluator`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DotPathEvaluator;

impl DotPathEvaluator {
    pub fn new() -> Self {
        DotPathEvaluator
    }
}

impl QueryEvaluator for DotPathEvaluator {
    fn evaluate(&self, document: &Value, expression: &str) -> Result<Option<Value>, QueryError> {
        let expr = Expression::parse(expression)?;
        Ok(expr.find(document).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc() -> Value {
        Value::from(json!({
            "bpRequest": {
                "custLoginId": "user123",
                "fee": [{"feeAmount": 10.0, "feeType": "TRANSFER_FEE"}],
                "note": null
            },
            "items": ["first", "second", "third"],
            "with space": {"k": 1}
        }))
    }

    fn eval(expr: &str) -> Option<Value> {
        DotPathEvaluator.evaluate(&doc(), expr).unwrap()
    }

    #[test]
    fn test_field_access() {
        assert_eq!(eval("bpRequest.custLoginId"), Some(Value::from("user123")));
        assert_eq!(eval("bpRequest.nonExistingField"), None);
    }

    #[test]
    fn test_index_access() {
        assert_eq!(eval("bpRequest.fee[0].feeAmount"), Some(Value::Float(10.0)));
        assert_eq!(eval("bpRequest.fee.0.feeType"), Some(Value::from("TRANSFER_FEE")));
        assert_eq!(eval("items[-1]"), Some(Value::from("third")));
        assert_eq!(eval("items[3]"), None);
        assert_eq!(eval("items[-4]"), None);
    }

    #[test]
    fn test_null_is_found() {
        assert_eq!(eval("bpRequest.note"), Some(Value::Null));
        assert_eq!(eval("bpRequest.note.deeper"), None);
    }

    #[test]
    fn test_index_on_non_list_misses() {
        assert_eq!(eval("bpRequest[0]"), None);
        assert_eq!(eval("items.first"), None);
    }

    #[test]
    fn test_quoted_field() {
        assert_eq!(eval(r#""with space".k"#), Some(Value::Int(1)));
    }

    #[test]
    fn test_syntax_error_propagates() {
        let err = DotPathEvaluator.evaluate(&doc(), "invalid[path").unwrap_err();
        assert!(matches!(err, QueryError::Syntax { .. }));
    }
}
