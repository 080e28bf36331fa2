//! tmod tensor model
//!
//! Typed sparse tensors as stored in a document field.
//!
//! # Core Concepts
//!
//! - [`TensorType`]: Named dimensions, each mapped, indexed-bound or indexed-unbound
//! - [`TensorAddress`]: One [`Label`] per dimension, in type order
//! - [`Tensor`]: Immutable mapping from address to `f64`
//! - [`TensorBuilder`]: Validating, cell-at-a-time construction
//!
//! # Example
//!
//! ```rust
//! use tmod_tensor::{Tensor, TensorType};
//!
//! let tensor_type: TensorType = "tensor(x[2],y{})".parse()?;
//! let mut builder = Tensor::builder(tensor_type);
//! builder.cell_by_names(&[("x", "0"), ("y", "a")], 1.5)?;
//! let tensor = builder.build();
//!
//! assert_eq!(tensor.len(), 1);
//! # Ok::<(), tmod_tensor::TensorError>(())
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
mod address;
mod dimension;
mod error;
mod tensor;

// Re-exports
pub use address::{Label, TensorAddress};
pub use dimension::{Dimension, DimensionKind, TensorType};
pub use error::TensorError;
pub use tensor::{CellList, Tensor, TensorBuilder};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
