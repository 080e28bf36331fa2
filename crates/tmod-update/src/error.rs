//! Error types for modify updates
//!
//! Provides error handling for:
//! - Token stream and cell list reading ([`ReadError`])
//! - Update construction and validation ([`UpdateError`])

use crate::stream::TokenKind;
use tmod_tensor::TensorError;

/// Errors while reading tokens or tensor cells
///
/// Carries no field context; [`UpdateError::MalformedInput`] adds it.
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    /// Input text is not valid JSON
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Stream ended inside a value
    #[error("unexpected end of input")]
    UnexpectedEnd,

    /// Token of the wrong kind
    #[error("expected {expected}, found {found}")]
    UnexpectedToken {
        expected: &'static str,
        found: String,
    },

    /// Key other than `address` or `value` inside a cell
    #[error("unknown key '{0}' in tensor cell")]
    UnknownCellKey(String),

    /// Cell without `address` or `value`
    #[error("tensor cell is missing '{0}'")]
    MissingCellKey(&'static str),

    /// Cell list longer than the reader's limit
    #[error("more than {limit} tensor cells (stopped at {count})")]
    TooManyCells { count: usize, limit: usize },

    /// Cell rejected by the tensor builder
    #[error("invalid tensor cell: {0}")]
    Tensor(#[from] TensorError),
}

impl ReadError {
    /// Create unexpected token error from the current token kind
    pub fn unexpected(expected: &'static str, found: Option<TokenKind>) -> Self {
        match found {
            Some(kind) => Self::UnexpectedToken {
                expected,
                found: kind.to_string(),
            },
            None => Self::UnexpectedEnd,
        }
    }
}

/// Errors while building or validating a modify update
///
/// Every variant is a caller or content error. None is transient.
#[derive(Debug, thiserror::Error)]
pub enum UpdateError {
    /// Field is not a tensor field
    #[error("a modify update can only be applied to tensor fields. Field '{field}' is of type '{data_type}'")]
    InvalidFieldType { field: String, data_type: String },

    /// Field type has an indexed-unbound dimension
    #[error("a modify update cannot be applied to tensor types with indexed unbound dimensions. Field '{field}' has unsupported tensor type '{tensor_type}'")]
    UnsupportedDimensionKind { field: String, tensor_type: String },

    /// Payload structure is wrong
    #[error("malformed modify update for field '{field}': {reason}")]
    MalformedInput { field: String, reason: String },

    /// `operation` is not one of the known literals
    #[error("unknown operation '{operation}' in modify update for field '{field}'")]
    UnknownOperation { field: String, operation: String },

    /// Key other than `operation` or `cells`
    #[error("unknown JSON string '{key}' in modify update for field '{field}'")]
    UnknownKey { field: String, key: String },

    /// No `operation` key
    #[error("modify update for field '{field}' does not contain an operation")]
    MissingOperation { field: String },

    /// No `cells` key
    #[error("modify update for field '{field}' does not contain tensor cells")]
    MissingCells { field: String },

    /// Label beyond the declared size of an indexed-bound dimension
    #[error("dimension '{dimension}' has label '{label}' but type is {tensor_type} (field '{field}')")]
    OutOfBounds {
        field: String,
        dimension: String,
        label: u64,
        size: u64,
        tensor_type: String,
    },

    /// More cells than the configured limit
    #[error("modify update for field '{field}' has {count} cells, limit is {limit}")]
    TooManyCells {
        field: String,
        count: usize,
        limit: usize,
    },
}

impl UpdateError {
    /// Create malformed input error from a read failure
    pub fn malformed(field: impl Into<String>, source: &ReadError) -> Self {
        Self::MalformedInput {
            field: field.into(),
            reason: source.to_string(),
        }
    }

    /// Name of the field the update targeted
    #[must_use]
    pub fn field(&self) -> &str {
        match self {
            Self::InvalidFieldType { field, .. }
            | Self::UnsupportedDimensionKind { field, .. }
            | Self::MalformedInput { field, .. }
            | Self::UnknownOperation { field, .. }
            | Self::UnknownKey { field, .. }
            | Self::MissingOperation { field }
            | Self::MissingCells { field }
            | Self::OutOfBounds { field, .. }
            | Self::TooManyCells { field, .. } => field,
        }
    }

    /// Check if error is retryable
    ///
    /// Always false: resending the same update fails the same way.
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_operation_display() {
        let err = UpdateError::UnknownOperation {
            field: "embedding".to_string(),
            operation: "divide".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "unknown operation 'divide' in modify update for field 'embedding'"
        );
        assert_eq!(err.field(), "embedding");
    }

    #[test]
    fn out_of_bounds_display_names_dimension() {
        let err = UpdateError::OutOfBounds {
            field: "f".to_string(),
            dimension: "x".to_string(),
            label: 2,
            size: 2,
            tensor_type: "tensor(x[2],y{})".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("dimension 'x' has label '2'"));
        assert!(msg.contains("tensor(x[2],y{})"));
    }

    #[test]
    fn malformed_wraps_read_error() {
        let err = UpdateError::malformed("f", &ReadError::MissingCellKey("value"));
        assert!(matches!(err, UpdateError::MalformedInput { .. }));
        assert!(err.to_string().contains("tensor cell is missing 'value'"));
    }

    #[test]
    fn unexpected_at_end_is_unexpected_end() {
        assert!(matches!(
            ReadError::unexpected("object", None),
            ReadError::UnexpectedEnd
        ));
    }

    #[test]
    fn no_update_error_is_retryable() {
        let err = UpdateError::MissingCells {
            field: "f".to_string(),
        };
        assert!(!err.is_retryable());
    }
}
