//! Immutable sparse tensor values
//!
//! Provides [`Tensor`], a mapping from [`TensorAddress`] to `f64` scoped to a
//! [`TensorType`], and [`TensorBuilder`] for constructing one cell at a time.

use crate::address::{Label, TensorAddress};
use crate::dimension::{DimensionKind, TensorType};
use crate::error::TensorError;
use serde::ser::{SerializeMap, SerializeSeq, SerializeStruct};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

/// Sparse tensor value
///
/// # Invariants
/// - Every address has exactly `tensor_type.rank()` labels
/// - Labels match their dimension's kind (and bound, for indexed-bound)
/// - Immutable after construction
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    tensor_type: TensorType,
    cells: BTreeMap<TensorAddress, f64>,
}

impl Tensor {
    /// Tensor with no cells
    #[inline]
    #[must_use]
    pub fn empty(tensor_type: TensorType) -> Self {
        Self {
            tensor_type,
            cells: BTreeMap::new(),
        }
    }

    /// Start building a tensor of the given type
    #[inline]
    #[must_use]
    pub fn builder(tensor_type: TensorType) -> TensorBuilder {
        TensorBuilder::new(tensor_type)
    }

    /// Create tensor without validating addresses
    ///
    /// Caller must ensure every address already fits `tensor_type`.
    /// Used when deriving a tensor from one whose cells are known valid.
    #[inline]
    #[must_use]
    pub fn from_cells_unchecked(
        tensor_type: TensorType,
        cells: BTreeMap<TensorAddress, f64>,
    ) -> Self {
        Self { tensor_type, cells }
    }

    /// Type of this tensor
    #[inline]
    #[must_use]
    pub fn tensor_type(&self) -> &TensorType {
        &self.tensor_type
    }

    /// Cell value, if present
    #[inline]
    #[must_use]
    pub fn get(&self, address: &TensorAddress) -> Option<f64> {
        self.cells.get(address).copied()
    }

    /// Cell value, or `default` if absent
    #[inline]
    #[must_use]
    pub fn get_or(&self, address: &TensorAddress, default: f64) -> f64 {
        self.get(address).unwrap_or(default)
    }

    /// Cells in address order
    #[inline]
    pub fn cells(&self) -> impl Iterator<Item = (&TensorAddress, f64)> + '_ {
        self.cells.iter().map(|(a, v)| (a, *v))
    }

    /// Number of cells
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check if tensor has no cells
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Take the cell map out of the tensor
    #[inline]
    #[must_use]
    pub fn into_cells(self) -> BTreeMap<TensorAddress, f64> {
        self.cells
    }

    /// Serializable view of the cells as a JSON cell list
    ///
    /// Each cell becomes `{"address": {dim: label}, "value": n}`, labels as
    /// strings.
    #[inline]
    #[must_use]
    pub fn cell_list(&self) -> CellList<'_> {
        CellList(self)
    }
}

impl Serialize for Tensor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Tensor", 2)?;
        s.serialize_field("type", &self.tensor_type.to_string())?;
        s.serialize_field("cells", &self.cell_list())?;
        s.end()
    }
}

/// JSON cell-list view of a [`Tensor`]
#[derive(Debug, Clone, Copy)]
pub struct CellList<'a>(&'a Tensor);

impl Serialize for CellList<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.0.len()))?;
        for (address, value) in self.0.cells() {
            seq.serialize_element(&CellRepr {
                tensor_type: &self.0.tensor_type,
                address,
                value,
            })?;
        }
        seq.end()
    }
}

struct CellRepr<'a> {
    tensor_type: &'a TensorType,
    address: &'a TensorAddress,
    value: f64,
}

impl Serialize for CellRepr<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Cell", 2)?;
        s.serialize_field(
            "address",
            &AddressRepr {
                tensor_type: self.tensor_type,
                address: self.address,
            },
        )?;
        s.serialize_field("value", &self.value)?;
        s.end()
    }
}

struct AddressRepr<'a> {
    tensor_type: &'a TensorType,
    address: &'a TensorAddress,
}

impl Serialize for AddressRepr<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.address.len()))?;
        for (dim, label) in self.tensor_type.dimensions().iter().zip(self.address.labels()) {
            map.serialize_entry(dim.name(), &label.to_text())?;
        }
        map.end()
    }
}

/// Builder for [`Tensor`]
///
/// Validates every address against the type and normalizes label kinds:
/// numeric text at indexed positions becomes [`Label::Indexed`], integers at
/// mapped positions become text.
#[derive(Debug, Clone)]
pub struct TensorBuilder {
    tensor_type: TensorType,
    cells: BTreeMap<TensorAddress, f64>,
    reject_duplicates: bool,
}

impl TensorBuilder {
    /// Create builder for type
    #[inline]
    #[must_use]
    pub fn new(tensor_type: TensorType) -> Self {
        Self {
            tensor_type,
            cells: BTreeMap::new(),
            reject_duplicates: false,
        }
    }

    /// Fail on repeated addresses instead of overwriting
    #[inline]
    #[must_use]
    pub fn reject_duplicates(mut self, reject: bool) -> Self {
        self.reject_duplicates = reject;
        self
    }

    /// Type being built
    #[inline]
    #[must_use]
    pub fn tensor_type(&self) -> &TensorType {
        &self.tensor_type
    }

    /// Number of cells added so far
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check if no cells were added
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Add cell with positional address
    ///
    /// # Errors
    /// Returns error if the address does not fit the type, or on a repeated
    /// address while duplicates are rejected
    pub fn cell(&mut self, address: TensorAddress, value: f64) -> Result<&mut Self, TensorError> {
        if address.len() != self.tensor_type.rank() {
            return Err(TensorError::RankMismatch {
                expected: self.tensor_type.rank(),
                actual: address.len(),
                tensor_type: self.tensor_type.to_string(),
            });
        }

        let labels = address
            .labels()
            .iter()
            .zip(self.tensor_type.dimensions())
            .map(|(label, dim)| normalize_label(label, dim.name(), dim.kind(), dim.size()))
            .collect::<Result<Vec<_>, _>>()?;
        let address = TensorAddress::new(labels);

        if self.reject_duplicates && self.cells.contains_key(&address) {
            return Err(TensorError::DuplicateCell(
                address.describe(&self.tensor_type),
            ));
        }
        self.cells.insert(address, value);
        Ok(self)
    }

    /// Add cell with address given as `(dimension, label)` pairs in any order
    ///
    /// # Errors
    /// Returns error on unknown, repeated or missing dimensions, or if a
    /// label does not fit its dimension
    pub fn cell_by_names<L>(&mut self, address: &[(&str, L)], value: f64) -> Result<&mut Self, TensorError>
    where
        L: Clone + Into<Label>,
    {
        let mut labels: Vec<Option<Label>> = vec![None; self.tensor_type.rank()];
        for (name, label) in address {
            let i = self
                .tensor_type
                .index_of(name)
                .ok_or_else(|| TensorError::UnknownDimension {
                    dimension: (*name).to_string(),
                    tensor_type: self.tensor_type.to_string(),
                })?;
            if labels[i].replace(label.clone().into()).is_some() {
                return Err(TensorError::DuplicateDimension((*name).to_string()));
            }
        }

        let labels = labels
            .into_iter()
            .zip(self.tensor_type.dimensions())
            .map(|(label, dim)| {
                label.ok_or_else(|| TensorError::MissingDimension {
                    dimension: dim.name().to_string(),
                    tensor_type: self.tensor_type.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        self.cell(TensorAddress::new(labels), value)
    }

    /// Finish building
    #[inline]
    #[must_use]
    pub fn build(self) -> Tensor {
        Tensor {
            tensor_type: self.tensor_type,
            cells: self.cells,
        }
    }
}

fn normalize_label(
    label: &Label,
    dimension: &str,
    kind: DimensionKind,
    size: Option<u64>,
) -> Result<Label, TensorError> {
    let invalid = |reason| TensorError::InvalidLabel {
        dimension: dimension.to_string(),
        label: label.to_text(),
        reason,
    };

    match kind {
        DimensionKind::Mapped => Ok(Label::Mapped(label.to_text())),
        DimensionKind::IndexedBound | DimensionKind::IndexedUnbound => {
            let index = label
                .as_index()
                .ok_or_else(|| invalid("expected a non-negative integer"))?;
            if size.is_some_and(|size| index >= size) {
                return Err(invalid("index out of range"));
            }
            Ok(Label::Indexed(index))
        }
    }
}
