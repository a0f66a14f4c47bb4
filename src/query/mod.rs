//! Query module - Read-only path expressions over documents.
//!
//! The [`QueryEvaluator`] trait is the seam the document operations read
//! through. [`DotPathEvaluator`] is the built-in implementation: dotted field
//! access, quoted field names and integer indexing.

mod eval;
mod parser;

pub use eval::*;
pub use parser::*;

use crate::value::Value;
use thiserror::Error;

/// QueryError is raised when an expression cannot be parsed or evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("syntax error at position {position}: {message}")]
    Syntax { position: usize, message: String },

    #[error("{message}")]
    Evaluation { message: String },
}

impl QueryError {
    /// Creates a syntax error.
    pub fn syntax(position: usize, message: impl Into<String>) -> Self {
        QueryError::Syntax {
            position,
            message: message.into(),
        }
    }

    /// Creates an evaluation error.
    pub fn evaluation(message: impl Into<String>) -> Self {
        QueryError::Evaluation {
            message: message.into(),
        }
    }
}

/// QueryEvaluator resolves an expression against a document.
///
/// `Ok(None)` means the expression is well formed but addresses nothing. A
/// stored `null` is returned as `Ok(Some(Value::Null))`.
pub trait QueryEvaluator: Send + Sync {
    fn evaluate(&self, document: &Value, expression: &str) -> Result<Option<Value>, QueryError>;
}
