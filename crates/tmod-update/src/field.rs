//! Document fields as declared in the schema

use std::borrow::Cow;
use tmod_tensor::TensorType;

/// Declared data type of a field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataType {
    Tensor(TensorType),
    String,
    Int,
    Long,
    Float,
    Double,
    Bool,
}

impl DataType {
    /// Schema name of the type
    #[must_use]
    pub fn name(&self) -> Cow<'static, str> {
        match self {
            Self::Tensor(t) => Cow::Owned(t.to_string()),
            Self::String => Cow::Borrowed("string"),
            Self::Int => Cow::Borrowed("int"),
            Self::Long => Cow::Borrowed("long"),
            Self::Float => Cow::Borrowed("float"),
            Self::Double => Cow::Borrowed("double"),
            Self::Bool => Cow::Borrowed("bool"),
        }
    }
}

/// A named, typed document field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    name: String,
    data_type: DataType,
}

impl Field {
    /// Create field
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }

    /// Tensor field
    #[inline]
    #[must_use]
    pub fn tensor(name: impl Into<String>, tensor_type: TensorType) -> Self {
        Self::new(name, DataType::Tensor(tensor_type))
    }

    /// Field name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared type
    #[inline]
    #[must_use]
    pub fn data_type(&self) -> &DataType {
        &self.data_type
    }

    /// Tensor type, if this is a tensor field
    #[inline]
    #[must_use]
    pub fn tensor_type(&self) -> Option<&TensorType> {
        match &self.data_type {
            DataType::Tensor(t) => Some(t),
            _ => None,
        }
    }
}
