//! Error types for the treeseek crate.

use thiserror::Error;

/// Errors raised while building or evaluating a query.
///
/// All of these are contract violations by the caller; none of them is
/// transient, so nothing in the crate retries.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The data or an argument has a shape the operation cannot accept.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A condition identifier that is not in the registry was invoked.
    #[error("'{0}' is not a registered condition")]
    UnknownOperation(String),

    /// A `where` operator name that is not supported.
    #[error("undefined operator '{0}'")]
    UnknownOperator(String),

    /// A condition was configured with an unusable argument.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A predicate failed while being applied to an item.
    #[error("condition error: {0}")]
    Condition(String),
}

impl QueryError {
    /// Create an invalid-input error.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a condition error.
    pub fn condition(msg: impl Into<String>) -> Self {
        Self::Condition(msg.into())
    }
}

impl From<regex::Error> for QueryError {
    fn from(err: regex::Error) -> Self {
        QueryError::Condition(err.to_string())
    }
}

/// Result type for treeseek operations.
pub type Result<T> = std::result::Result<T, QueryError>;
