//! Error types for the tensor model
//!
//! Covers:
//! - Type-spec parsing (`tensor(x[2],y{})`)
//! - Type construction (duplicate or invalid dimensions)
//! - Cell insertion through [`TensorBuilder`](crate::TensorBuilder)

/// Errors raised while describing or building tensors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TensorError {
    /// Type spec text could not be parsed
    #[error("invalid tensor type spec '{spec}': {reason}")]
    InvalidTypeSpec { spec: String, reason: String },

    /// Two dimensions share a name
    #[error("duplicate dimension '{0}'")]
    DuplicateDimension(String),

    /// Dimension name is empty or contains illegal characters
    #[error("invalid dimension name '{0}' (must be alphanumeric or underscore)")]
    InvalidDimensionName(String),

    /// Indexed-bound dimension declared with size zero
    #[error("dimension '{0}' must have a positive size")]
    ZeroSize(String),

    /// Address length differs from the type's rank
    #[error("address has {actual} labels but type {tensor_type} has rank {expected}")]
    RankMismatch {
        expected: usize,
        actual: usize,
        tensor_type: String,
    },

    /// Address names a dimension the type does not have
    #[error("unknown dimension '{dimension}' for type {tensor_type}")]
    UnknownDimension {
        dimension: String,
        tensor_type: String,
    },

    /// Address leaves out one of the type's dimensions
    #[error("missing label for dimension '{dimension}' of type {tensor_type}")]
    MissingDimension {
        dimension: String,
        tensor_type: String,
    },

    /// Label cannot be used for the dimension's kind
    #[error("label '{label}' is not valid for dimension '{dimension}': {reason}")]
    InvalidLabel {
        dimension: String,
        label: String,
        reason: &'static str,
    },

    /// Same address written twice while duplicates are rejected
    #[error("duplicate cell at address {0}")]
    DuplicateCell(String),
}

impl TensorError {
    /// Create type spec parse error
    pub fn invalid_spec(spec: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidTypeSpec {
            spec: spec.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_spec_display() {
        let err = TensorError::invalid_spec("tensor(x[", "unterminated dimension");
        assert_eq!(
            err.to_string(),
            "invalid tensor type spec 'tensor(x[': unterminated dimension"
        );
    }

    #[test]
    fn rank_mismatch_display() {
        let err = TensorError::RankMismatch {
            expected: 2,
            actual: 1,
            tensor_type: "tensor(x[2],y{})".to_string(),
        };
        assert!(err.to_string().contains("rank 2"));
    }
}
