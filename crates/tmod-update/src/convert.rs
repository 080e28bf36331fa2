//! Addressing space of update cells
//!
//! Update cells name only the coordinates they touch, so they are read
//! against a copy of the field's type where every indexed dimension is
//! mapped. [`BoundsValidator`](crate::BoundsValidator) restores the range
//! check this drops.

use tmod_tensor::{Dimension, TensorType};

/// Converted type: same dimension names, every dimension mapped
///
/// Total and deterministic. Types with only mapped dimensions come back
/// unchanged.
#[must_use]
pub fn convert_dimensions_to_mapped(original: &TensorType) -> TensorType {
    original.map_dimensions(Dimension::to_mapped)
}
