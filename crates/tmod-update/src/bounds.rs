//! Range validation for update cells
//!
//! Update cells are addressed in the converted (all-mapped) type, which has
//! no notion of size. [`BoundsValidator`] checks them against the original
//! type's indexed-bound dimensions.

use tmod_tensor::{DimensionKind, Label, Tensor, TensorType};

/// Indexed-bound range validation
///
/// Fail-fast: the first offending cell aborts validation, and nothing is
/// accepted unless every cell passes.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoundsValidator;

impl BoundsValidator {
    /// Create new validator instance
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Validate every label at an indexed-bound position of `original`
    ///
    /// # Returns
    /// - `Ok(())` if all labels are below their dimension's size, or if
    ///   `original` has no indexed-bound dimension
    /// - `Err(BoundsError::OutOfBounds)` for the first label that is not
    ///
    /// # Performance
    /// O(cells × rank)
    pub fn validate(&self, cells: &Tensor, original: &TensorType) -> Result<(), BoundsError> {
        if !original.has_indexed_bound() {
            return Ok(());
        }

        for (address, _) in cells.cells() {
            if address.len() != original.rank() {
                return Err(BoundsError::RankMismatch {
                    expected: original.rank(),
                    actual: address.len(),
                });
            }

            for (i, dim) in original.dimensions().iter().enumerate() {
                if dim.kind() != DimensionKind::IndexedBound {
                    continue;
                }
                let size = dim.size().unwrap_or(u64::MAX);
                let text = address.label(i).map(Label::to_text).unwrap_or_default();
                let label = address.numeric_label(i).ok_or_else(|| {
                    BoundsError::NonNumericLabel {
                        dimension: dim.name().to_string(),
                        label: text.clone(),
                    }
                })?;
                // "01" and "1" would be distinct cells here but one cell once applied
                if label.to_string() != text {
                    return Err(BoundsError::NonCanonicalLabel {
                        dimension: dim.name().to_string(),
                        label: text,
                    });
                }
                if label >= size {
                    return Err(BoundsError::OutOfBounds {
                        dimension: dim.name().to_string(),
                        label,
                        size,
                        tensor_type: original.to_string(),
                    });
                }
            }
        }

        Ok(())
    }
}

/// Bounds validation failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoundsError {
    /// Label not below the dimension's declared size
    #[error("dimension '{dimension}' has label '{label}' but type is {tensor_type}")]
    OutOfBounds {
        dimension: String,
        label: u64,
        size: u64,
        tensor_type: String,
    },

    /// Label at an indexed position is not a non-negative integer
    #[error("label '{label}' for indexed dimension '{dimension}' is not a non-negative integer")]
    NonNumericLabel { dimension: String, label: String },

    /// Integer label not in plain decimal form, e.g. `01` or `+1`
    #[error("label '{label}' for indexed dimension '{dimension}' is not in canonical form")]
    NonCanonicalLabel { dimension: String, label: String },

    /// Cell address length differs from the original type's rank
    #[error("cell address has {actual} labels, type has rank {expected}")]
    RankMismatch { expected: usize, actual: usize },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::convert_dimensions_to_mapped;

    fn cells(original: &TensorType, addresses: &[&[(&str, &str)]]) -> Tensor {
        let mut builder = Tensor::builder(convert_dimensions_to_mapped(original));
        for address in addresses {
            builder.cell_by_names(address, 1.0).unwrap();
        }
        builder.build()
    }

    #[test]
    fn labels_below_size_pass() {
        let original: TensorType = "tensor(x[2],y{})".parse().unwrap();
        let cells = cells(&original, &[&[("x", "0"), ("y", "a")], &[("x", "1"), ("y", "b")]]);
        assert!(BoundsValidator::new().validate(&cells, &original).is_ok());
    }

    #[test]
    fn label_equal_to_size_fails() {
        let original: TensorType = "tensor(x[2],y{})".parse().unwrap();
        let cells = cells(&original, &[&[("x", "2"), ("y", "a")]]);
        let err = BoundsValidator::new().validate(&cells, &original).unwrap_err();
        assert_eq!(
            err,
            BoundsError::OutOfBounds {
                dimension: "x".to_string(),
                label: 2,
                size: 2,
                tensor_type: "tensor(x[2],y{})".to_string(),
            }
        );
    }

    #[test]
    fn no_bound_dimensions_is_noop() {
        let original: TensorType = "tensor(k{})".parse().unwrap();
        let cells = cells(&original, &[&[("k", "99999")]]);
        assert!(BoundsValidator::new().validate(&cells, &original).is_ok());
    }

    #[test]
    fn non_numeric_label_reported() {
        let original: TensorType = "tensor(x[4])".parse().unwrap();
        let cells = cells(&original, &[&[("x", "one")]]);
        assert!(matches!(
            BoundsValidator::new().validate(&cells, &original),
            Err(BoundsError::NonNumericLabel { .. })
        ));
    }

    #[test]
    fn padded_and_signed_labels_rejected() {
        let original: TensorType = "tensor(x[4])".parse().unwrap();
        for text in ["01", "+1", "00"] {
            let cells = cells(&original, &[&[("x", text)]]);
            assert_eq!(
                BoundsValidator::new().validate(&cells, &original),
                Err(BoundsError::NonCanonicalLabel {
                    dimension: "x".to_string(),
                    label: text.to_string(),
                })
            );
        }
        let zero = cells(&original, &[&[("x", "0")]]);
        assert!(BoundsValidator::new().validate(&zero, &original).is_ok());
    }

    #[test]
    fn checks_every_bound_dimension() {
        let original: TensorType = "tensor(a[3],b[2])".parse().unwrap();
        let cells = cells(&original, &[&[("a", "2"), ("b", "5")]]);
        assert!(matches!(
            BoundsValidator::new().validate(&cells, &original),
            Err(BoundsError::OutOfBounds { ref dimension, label: 5, size: 2, .. }) if dimension == "b"
        ));
    }

    #[test]
    fn rank_mismatch_reported() {
        let original: TensorType = "tensor(a[3],b[2])".parse().unwrap();
        let narrow: TensorType = "tensor(a{})".parse().unwrap();
        let mut builder = Tensor::builder(narrow);
        builder.cell_by_names(&[("a", "0")], 1.0).unwrap();
        assert!(matches!(
            BoundsValidator::new().validate(&builder.build(), &original),
            Err(BoundsError::RankMismatch { expected: 2, actual: 1 })
        ));
    }
}
