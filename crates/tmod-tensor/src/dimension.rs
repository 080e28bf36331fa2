//! Tensor types and their dimensions
//!
//! Provides [`TensorType`], an ordered set of named [`Dimension`]s, and the
//! textual type spec form `tensor(x[2],y{},z[])`.

use crate::error::TensorError;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// How a dimension is addressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DimensionKind {
    /// Arbitrary string labels, sparse
    Mapped,
    /// Integer labels in `[0, size)`
    IndexedBound,
    /// Integer labels without a declared upper bound
    IndexedUnbound,
}

impl DimensionKind {
    /// Check if labels of this kind are integers
    #[inline]
    #[must_use]
    pub fn is_indexed(self) -> bool {
        matches!(self, Self::IndexedBound | Self::IndexedUnbound)
    }

    /// Check if labels of this kind are strings
    #[inline]
    #[must_use]
    pub fn is_mapped(self) -> bool {
        matches!(self, Self::Mapped)
    }
}

/// One named dimension of a tensor type
///
/// # Invariants
/// - `size` is `Some` iff `kind` is [`DimensionKind::IndexedBound`]
/// - `size` is never zero
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Dimension {
    name: String,
    kind: DimensionKind,
    size: Option<u64>,
}

impl Dimension {
    /// Mapped dimension
    #[inline]
    #[must_use]
    pub fn mapped(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: DimensionKind::Mapped,
            size: None,
        }
    }

    /// Indexed dimension with a declared size
    ///
    /// # Errors
    /// Returns error if `size` is zero
    pub fn indexed(name: impl Into<String>, size: u64) -> Result<Self, TensorError> {
        let name = name.into();
        if size == 0 {
            return Err(TensorError::ZeroSize(name));
        }
        Ok(Self {
            name,
            kind: DimensionKind::IndexedBound,
            size: Some(size),
        })
    }

    /// Indexed dimension without a declared size
    #[inline]
    #[must_use]
    pub fn indexed_unbound(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: DimensionKind::IndexedUnbound,
            size: None,
        }
    }

    /// Dimension name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Dimension kind
    #[inline]
    #[must_use]
    pub fn kind(&self) -> DimensionKind {
        self.kind
    }

    /// Declared size (indexed-bound only)
    #[inline]
    #[must_use]
    pub fn size(&self) -> Option<u64> {
        self.size
    }

    /// Same name, mapped kind
    #[inline]
    #[must_use]
    pub fn to_mapped(&self) -> Self {
        Self::mapped(self.name.clone())
    }
}

impl Display for Dimension {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match (self.kind, self.size) {
            (DimensionKind::Mapped, _) => write!(f, "{}{{}}", self.name),
            (DimensionKind::IndexedBound, Some(size)) => write!(f, "{}[{}]", self.name, size),
            (DimensionKind::IndexedBound | DimensionKind::IndexedUnbound, _) => {
                write!(f, "{}[]", self.name)
            }
        }
    }
}

/// Type of a tensor: its dimensions, sorted by name
///
/// Sorting makes `tensor(y{},x[2])` and `tensor(x[2],y{})` the same type, and
/// fixes the label order of every [`TensorAddress`](crate::TensorAddress).
///
/// # Invariants
/// - Dimension names are unique
/// - Dimensions are sorted by name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct TensorType {
    dimensions: Vec<Dimension>,
}

impl TensorType {
    /// Create type from dimensions (any order)
    ///
    /// # Errors
    /// Returns error on duplicate or invalid dimension names
    pub fn new(mut dimensions: Vec<Dimension>) -> Result<Self, TensorError> {
        for dim in &dimensions {
            validate_name(dim.name())?;
        }
        dimensions.sort_by(|a, b| a.name.cmp(&b.name));
        if let Some(pair) = dimensions.windows(2).find(|w| w[0].name == w[1].name) {
            return Err(TensorError::DuplicateDimension(pair[0].name.clone()));
        }
        Ok(Self { dimensions })
    }

    /// Rank-0 type
    #[inline]
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Dimensions in address order
    #[inline]
    #[must_use]
    pub fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    /// Number of dimensions
    #[inline]
    #[must_use]
    pub fn rank(&self) -> usize {
        self.dimensions.len()
    }

    /// Look up dimension by name
    #[must_use]
    pub fn dimension(&self, name: &str) -> Option<&Dimension> {
        self.index_of(name).map(|i| &self.dimensions[i])
    }

    /// Position of the named dimension in addresses
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.dimensions
            .binary_search_by(|d| d.name.as_str().cmp(name))
            .ok()
    }

    /// Check for any indexed-bound dimension
    #[inline]
    #[must_use]
    pub fn has_indexed_bound(&self) -> bool {
        self.dimensions
            .iter()
            .any(|d| d.kind == DimensionKind::IndexedBound)
    }

    /// Check for any indexed-unbound dimension
    #[inline]
    #[must_use]
    pub fn has_indexed_unbound(&self) -> bool {
        self.dimensions
            .iter()
            .any(|d| d.kind == DimensionKind::IndexedUnbound)
    }

    /// Map every dimension, keeping names (and therefore order)
    #[must_use]
    pub fn map_dimensions(&self, f: impl Fn(&Dimension) -> Dimension) -> Self {
        Self {
            dimensions: self.dimensions.iter().map(f).collect(),
        }
    }
}

impl Display for TensorType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "tensor(")?;
        for (i, dim) in self.dimensions.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{dim}")?;
        }
        write!(f, ")")
    }
}

impl FromStr for TensorType {
    type Err = TensorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let body = s
            .trim()
            .strip_prefix("tensor")
            .map(str::trim_start)
            .and_then(|rest| rest.strip_prefix('('))
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(|| TensorError::invalid_spec(s, "expected 'tensor(...)'"))?;

        if body.trim().is_empty() {
            return Ok(Self::empty());
        }

        let dimensions = body
            .split(',')
            .map(|part| parse_dimension(s, part.trim()))
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(dimensions)
    }
}

fn parse_dimension(spec: &str, part: &str) -> Result<Dimension, TensorError> {
    if let Some(name) = part.strip_suffix("{}") {
        validate_name(name)?;
        return Ok(Dimension::mapped(name));
    }

    let (name, size) = part
        .strip_suffix(']')
        .and_then(|p| p.split_once('['))
        .ok_or_else(|| {
            TensorError::invalid_spec(spec, format!("cannot parse dimension '{part}'"))
        })?;
    validate_name(name)?;

    if size.trim().is_empty() {
        return Ok(Dimension::indexed_unbound(name));
    }
    let size: u64 = size.trim().parse().map_err(|_| {
        TensorError::invalid_spec(spec, format!("invalid size '{size}' for dimension '{name}'"))
    })?;
    Dimension::indexed(name, size)
}

fn validate_name(name: &str) -> Result<(), TensorError> {
    if name.is_empty() || name.contains(|c: char| !c.is_alphanumeric() && c != '_') {
        return Err(TensorError::InvalidDimensionName(name.to_string()));
    }
    Ok(())
}
