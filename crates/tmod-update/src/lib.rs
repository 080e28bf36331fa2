//! tmod modify updates
//!
//! Partial updates to tensor fields: read a `{"operation", "cells"}` payload
//! for a field, validate it against the field's declared type, and merge it
//! into the field's existing value.
//!
//! # Core Concepts
//!
//! - [`convert_dimensions_to_mapped`]: Update cells are read in an all-mapped
//!   view of the field type, so labels are not range-checked while reading
//! - [`BoundsValidator`]: Range check of those cells against the original type
//! - [`UpdateSpecBuilder`]: Payload to validated [`PartialUpdate`]
//! - [`apply`]: Replace, add or multiply the touched cells of an existing tensor
//!
//! # Example
//!
//! ```rust
//! use tmod_tensor::{Tensor, TensorType};
//! use tmod_update::{Field, TokenBuffer, UpdateConfig, UpdateSpecBuilder};
//!
//! let field = Field::tensor("weights", "tensor(x[2],y{})".parse::<TensorType>()?);
//! let mut payload = TokenBuffer::from_json(
//!     r#"{"operation": "add", "cells": [{"address": {"x": "1", "y": "a"}, "value": 2.0}]}"#,
//! )?;
//! let update = UpdateSpecBuilder::new(UpdateConfig::default()).build(&mut payload, &field)?;
//!
//! let existing = Tensor::empty(field.tensor_type().cloned().unwrap_or_else(TensorType::empty));
//! let updated = update.apply_to(&existing);
//! assert_eq!(updated.len(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
mod apply;
mod bounds;
mod builder;
mod cells;
mod config;
mod convert;
mod error;
mod field;
mod operation;
mod update;

pub mod stream;

// Re-exports
pub use apply::apply;
pub use bounds::{BoundsError, BoundsValidator};
pub use builder::{UpdateSpecBuilder, MODIFY_OPERATION, TENSOR_CELLS};
pub use cells::{CellReader, JsonCellReader};
pub use config::{ConfigError, DuplicateCells, UpdateConfig};
pub use convert::convert_dimensions_to_mapped;
pub use error::{ReadError, UpdateError};
pub use field::{DataType, Field};
pub use operation::Operation;
pub use stream::{TokenBuffer, TokenKind, TokenStream};
pub use update::{FieldUpdate, PartialUpdate, UPDATE_MODIFY};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
