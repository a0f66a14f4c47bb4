//! Document eligibility checks.

use crate::error::{Error, Result};
use crate::value::Value;

/// Checks that `value` is a document: a mapping, never null or an array.
pub fn assert_valid_document(value: &Value) -> Result<()> {
    match value {
        Value::Map(_) => Ok(()),
        Value::List(_) => Err(Error::invalid_document("Input must not be an array.")),
        other => Err(Error::invalid_document(format!(
            "Input must be a non-null object. ===> {}",
            crate::value::to_json(other).unwrap_or_else(|_| other.type_name().to_string())
        ))),
    }
}
