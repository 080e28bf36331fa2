//! Reading modify updates from payloads
//!
//! [`UpdateSpecBuilder`] turns
//!
//! ```text
//! {"operation": "add", "cells": [{"address": {"x": "0", "y": "a"}, "value": 1.5}]}
//! ```
//!
//! into a validated [`PartialUpdate`] for a given [`Field`].

use crate::bounds::{BoundsError, BoundsValidator};
use crate::cells::{CellReader, JsonCellReader};
use crate::config::{DuplicateCells, UpdateConfig};
use crate::convert::convert_dimensions_to_mapped;
use crate::error::{ReadError, UpdateError};
use crate::field::Field;
use crate::operation::Operation;
use crate::stream::{ObjectFields, TokenKind, TokenStream};
use crate::update::{FieldUpdate, PartialUpdate, UPDATE_MODIFY};
use tmod_tensor::{Tensor, TensorType};

/// Payload key naming the operation
pub const MODIFY_OPERATION: &str = "operation";

/// Payload key holding the cell list
pub const TENSOR_CELLS: &str = "cells";

/// Builds [`PartialUpdate`]s from token streams
///
/// Stateless between calls; one builder can serve any number of fields.
#[derive(Debug, Clone)]
pub struct UpdateSpecBuilder<R = JsonCellReader> {
    config: UpdateConfig,
    reader: R,
    validator: BoundsValidator,
}

impl UpdateSpecBuilder<JsonCellReader> {
    /// Create builder reading JSON cell lists
    #[must_use]
    pub fn new(config: UpdateConfig) -> Self {
        let reader = JsonCellReader::new()
            .reject_duplicates(config.duplicate_cells == DuplicateCells::Reject)
            .with_max_cells(config.max_cells);
        Self::with_reader(config, reader)
    }
}

impl Default for UpdateSpecBuilder<JsonCellReader> {
    fn default() -> Self {
        Self::new(UpdateConfig::default())
    }
}

impl<R: CellReader> UpdateSpecBuilder<R> {
    /// Create builder with a custom cell reader
    #[inline]
    #[must_use]
    pub fn with_reader(config: UpdateConfig, reader: R) -> Self {
        Self {
            config,
            reader,
            validator: BoundsValidator::new(),
        }
    }

    /// Configuration in use
    #[inline]
    #[must_use]
    pub fn config(&self) -> &UpdateConfig {
        &self.config
    }

    /// Read a modify update for `field`
    ///
    /// The stream is positioned on the update object's start token and is
    /// left on its end token.
    ///
    /// # Errors
    /// - `InvalidFieldType` if `field` is not a tensor field
    /// - `UnsupportedDimensionKind` if its type has an indexed-unbound dimension
    /// - `MalformedInput` if the payload is not an object or its cells are malformed
    /// - `UnknownOperation`, `UnknownKey`, `MissingOperation`, `MissingCells`
    /// - `OutOfBounds` if a cell is outside an indexed-bound dimension
    /// - `TooManyCells` if the configured limit is exceeded
    pub fn build(
        &self,
        stream: &mut dyn TokenStream,
        field: &Field,
    ) -> Result<PartialUpdate, UpdateError> {
        match self.build_update(stream, field) {
            Ok(update) => {
                tracing::debug!(
                    "Built {} update with {} cells for field '{}'",
                    update.operation(),
                    update.cells().len(),
                    field.name()
                );
                Ok(update)
            }
            Err(e) => {
                tracing::warn!("Rejected modify update: {}", e);
                Err(e)
            }
        }
    }

    /// Read a field update wrapper, e.g. `{"modify": {...}}`
    ///
    /// # Errors
    /// - `UnknownKey` for any wrapper key other than `modify`
    /// - `MalformedInput` if the wrapper is not an object or is empty
    /// - any error of [`build`](Self::build)
    pub fn build_field_update(
        &self,
        stream: &mut dyn TokenStream,
        field: &Field,
    ) -> Result<FieldUpdate, UpdateError> {
        let fields =
            ObjectFields::enter(&*stream).map_err(|e| UpdateError::malformed(field.name(), &e))?;
        let mut update = None;
        while let Some(key) = fields
            .next_field(stream)
            .map_err(|e| UpdateError::malformed(field.name(), &e))?
        {
            match key.as_str() {
                UPDATE_MODIFY => update = Some(FieldUpdate::Modify(self.build(stream, field)?)),
                _ => {
                    return Err(UpdateError::UnknownKey {
                        field: field.name().to_string(),
                        key,
                    })
                }
            }
        }
        update.ok_or_else(|| UpdateError::MalformedInput {
            field: field.name().to_string(),
            reason: "field update contains no update".to_string(),
        })
    }

    fn build_update(
        &self,
        stream: &mut dyn TokenStream,
        field: &Field,
    ) -> Result<PartialUpdate, UpdateError> {
        let original = expect_tensor_field(field)?;
        expect_no_indexed_unbound(field, original)?;
        let fields =
            ObjectFields::enter(&*stream).map_err(|e| UpdateError::malformed(field.name(), &e))?;

        let mut operation = None;
        let mut cells = None;
        while let Some(key) = fields
            .next_field(stream)
            .map_err(|e| UpdateError::malformed(field.name(), &e))?
        {
            match key.as_str() {
                MODIFY_OPERATION => operation = Some(read_operation(stream, field)?),
                TENSOR_CELLS => cells = Some(self.read_cells(stream, field, original)?),
                _ => {
                    return Err(UpdateError::UnknownKey {
                        field: field.name().to_string(),
                        key,
                    })
                }
            }
        }

        let operation = operation.ok_or_else(|| UpdateError::MissingOperation {
            field: field.name().to_string(),
        })?;
        let cells = cells.ok_or_else(|| UpdateError::MissingCells {
            field: field.name().to_string(),
        })?;
        Ok(PartialUpdate::new(operation, cells))
    }

    fn read_cells(
        &self,
        stream: &mut dyn TokenStream,
        field: &Field,
        original: &TensorType,
    ) -> Result<Tensor, UpdateError> {
        let converted = convert_dimensions_to_mapped(original);
        let cells = self
            .reader
            .read_cells(stream, &converted)
            .map_err(|e| match e {
                ReadError::TooManyCells { count, limit } => UpdateError::TooManyCells {
                    field: field.name().to_string(),
                    count,
                    limit,
                },
                other => UpdateError::malformed(field.name(), &other),
            })?;

        // Readers without their own cap
        if cells.len() > self.config.max_cells {
            return Err(UpdateError::TooManyCells {
                field: field.name().to_string(),
                count: cells.len(),
                limit: self.config.max_cells,
            });
        }

        self.validator
            .validate(&cells, original)
            .map_err(|e| bounds_error(field, e))?;
        Ok(cells)
    }
}

fn expect_tensor_field(field: &Field) -> Result<&TensorType, UpdateError> {
    field
        .tensor_type()
        .ok_or_else(|| UpdateError::InvalidFieldType {
            field: field.name().to_string(),
            data_type: field.data_type().name().into_owned(),
        })
}

fn expect_no_indexed_unbound(field: &Field, tensor_type: &TensorType) -> Result<(), UpdateError> {
    if tensor_type.has_indexed_unbound() {
        return Err(UpdateError::UnsupportedDimensionKind {
            field: field.name().to_string(),
            tensor_type: tensor_type.to_string(),
        });
    }
    Ok(())
}

fn read_operation(stream: &mut dyn TokenStream, field: &Field) -> Result<Operation, UpdateError> {
    let name = match stream.current_kind() {
        Some(TokenKind::String) => stream.current_text().unwrap_or_default(),
        other => {
            return Err(UpdateError::malformed(
                field.name(),
                &ReadError::unexpected("operation name string", other),
            ))
        }
    };
    Operation::from_name(name).ok_or_else(|| UpdateError::UnknownOperation {
        field: field.name().to_string(),
        operation: name.to_string(),
    })
}

fn bounds_error(field: &Field, error: BoundsError) -> UpdateError {
    match error {
        BoundsError::OutOfBounds {
            dimension,
            label,
            size,
            tensor_type,
        } => UpdateError::OutOfBounds {
            field: field.name().to_string(),
            dimension,
            label,
            size,
            tensor_type,
        },
        other => UpdateError::MalformedInput {
            field: field.name().to_string(),
            reason: other.to_string(),
        },
    }
}
