//! Error types shared by the document operations.

use std::fmt;
use thiserror::Error;

use crate::query;

/// Result type alias for document operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The public operation an error was raised from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Searching,
    Updating,
    Removing,
    Merging,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            Operation::Searching => "searching",
            Operation::Updating => "updating",
            Operation::Removing => "removing",
            Operation::Merging => "merging",
        };
        f.write_str(verb)
    }
}

/// Errors returned by the document operations.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// The value handed in where a document was required is null, a scalar or an array.
    #[error("Invalid JSON: {reason}")]
    InvalidDocument { reason: String },

    /// A write/delete precondition failed or an intermediate segment is missing.
    #[error("{message}")]
    PathNotFound { path: String, message: String },

    /// The query evaluator rejected the expression.
    #[error("query \"{path}\" failed: {message}")]
    QueryError { path: String, message: String },

    /// Wraps the cause with the operation and path that produced it.
    #[error("Error {op} JSON with path \"{path}\": {source}")]
    Operation {
        op: Operation,
        path: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Creates an invalid document error.
    pub fn invalid_document(reason: impl Into<String>) -> Self {
        Error::InvalidDocument {
            reason: reason.into(),
        }
    }

    /// Creates the error raised when an addressed value does not exist.
    pub fn path_not_found(path: impl Into<String>) -> Self {
        let path = path.into();
        Error::PathNotFound {
            message: format!("Path \"{}\" does not exist in the JSON object.", path),
            path,
        }
    }

    /// Creates the error raised when a traversal step finds no container.
    pub fn key_path_not_found(segments: &[String]) -> Self {
        let path = segments.join(".");
        Error::PathNotFound {
            message: format!("Key path not found: {}", path),
            path,
        }
    }

    /// Creates a query error from an evaluator failure.
    pub fn query(path: impl Into<String>, err: query::QueryError) -> Self {
        Error::QueryError {
            path: path.into(),
            message: err.to_string(),
        }
    }

    /// Wraps this error with the operation and path it was raised from.
    pub fn within(self, op: Operation, path: impl Into<String>) -> Self {
        Error::Operation {
            op,
            path: path.into(),
            source: Box::new(self),
        }
    }

    /// Returns the innermost error, looking through operation wrappers.
    pub fn root_cause(&self) -> &Error {
        match self {
            Error::Operation { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Returns true if the root cause is an invalid document.
    pub fn is_invalid_document(&self) -> bool {
        matches!(self.root_cause(), Error::InvalidDocument { .. })
    }

    /// Returns true if the root cause is a missing path.
    pub fn is_path_not_found(&self) -> bool {
        matches!(self.root_cause(), Error::PathNotFound { .. })
    }

    /// Returns true if the root cause is a query failure.
    pub fn is_query_error(&self) -> bool {
        matches!(self.root_cause(), Error::QueryError { .. })
    }
}
