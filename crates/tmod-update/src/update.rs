//! Partial updates for tensor fields
//!
//! Provides [`PartialUpdate`], a sparse set of cells plus one
//! [`Operation`], and [`FieldUpdate`], the form handed to the store's
//! generic field-update dispatch.

use crate::apply::apply;
use crate::operation::Operation;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use tmod_tensor::Tensor;

/// Modify update for one tensor field
///
/// NOT a full tensor - only the cells being changed, addressed in the
/// converted (all-mapped) type of the field.
///
/// # Invariants
/// - Both operation and cells are always present
/// - Built per incoming update and discarded after [`apply`]
#[derive(Debug, Clone, PartialEq)]
pub struct PartialUpdate {
    /// Operation applied to every cell
    operation: Operation,

    /// Touched cells, in the converted type
    cells: Tensor,
}

impl PartialUpdate {
    /// Create update
    #[inline]
    #[must_use]
    pub fn new(operation: Operation, cells: Tensor) -> Self {
        Self { operation, cells }
    }

    /// Operation
    #[inline]
    #[must_use]
    pub fn operation(&self) -> Operation {
        self.operation
    }

    /// Cells to change
    #[inline]
    #[must_use]
    pub fn cells(&self) -> &Tensor {
        &self.cells
    }

    /// Split into operation and cells
    #[inline]
    #[must_use]
    pub fn into_parts(self) -> (Operation, Tensor) {
        (self.operation, self.cells)
    }

    /// Apply to an existing value, producing a new one
    #[inline]
    #[must_use]
    pub fn apply_to(&self, existing: &Tensor) -> Tensor {
        apply(existing, self)
    }
}

/// Serializes back to the payload form: `{"operation": ..., "cells": [...]}`
impl Serialize for PartialUpdate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("PartialUpdate", 2)?;
        s.serialize_field("operation", &self.operation)?;
        s.serialize_field("cells", &self.cells.cell_list())?;
        s.end()
    }
}

/// Field update recognized by the dispatch reader
#[derive(Debug, Clone, PartialEq)]
pub enum FieldUpdate {
    /// `{"modify": {...}}`
    Modify(PartialUpdate),
}

impl FieldUpdate {
    /// Payload key of this update kind
    #[inline]
    #[must_use]
    pub fn key(&self) -> &'static str {
        match self {
            Self::Modify(_) => UPDATE_MODIFY,
        }
    }

    /// Apply to the field's existing value
    #[must_use]
    pub fn apply_to(&self, existing: &Tensor) -> Tensor {
        match self {
            Self::Modify(update) => update.apply_to(existing),
        }
    }
}

/// Payload key of a modify update
pub const UPDATE_MODIFY: &str = "modify";
