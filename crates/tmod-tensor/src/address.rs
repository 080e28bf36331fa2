//! Cell addresses within a tensor
//!
//! Provides [`TensorAddress`], one [`Label`] per dimension of a
//! [`TensorType`](crate::TensorType), in the type's dimension order.

use crate::dimension::TensorType;
use std::fmt::{self, Display, Formatter};

/// Label of one dimension within an address
///
/// Orders indexed labels before mapped ones, then by value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Label {
    /// Integer label of an indexed dimension
    Indexed(u64),
    /// String label of a mapped dimension
    Mapped(String),
}

impl Label {
    /// Label read as a non-negative integer
    ///
    /// Mapped labels qualify when their text is a decimal number.
    #[must_use]
    pub fn as_index(&self) -> Option<u64> {
        match self {
            Self::Indexed(i) => Some(*i),
            Self::Mapped(s) => s.parse().ok(),
        }
    }

    /// Label as text
    #[must_use]
    pub fn to_text(&self) -> String {
        match self {
            Self::Indexed(i) => i.to_string(),
            Self::Mapped(s) => s.clone(),
        }
    }
}

impl Display for Label {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Indexed(i) => write!(f, "{i}"),
            Self::Mapped(s) => write!(f, "{s}"),
        }
    }
}

impl From<&str> for Label {
    fn from(s: &str) -> Self {
        Self::Mapped(s.to_string())
    }
}

impl From<String> for Label {
    fn from(s: String) -> Self {
        Self::Mapped(s)
    }
}

impl From<u64> for Label {
    fn from(i: u64) -> Self {
        Self::Indexed(i)
    }
}

/// Address of one cell
///
/// Labels are positional: label `i` belongs to dimension `i` of the owning
/// tensor's type.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TensorAddress(Vec<Label>);

impl TensorAddress {
    /// Create address from labels
    #[inline]
    #[must_use]
    pub fn new(labels: Vec<Label>) -> Self {
        Self(labels)
    }

    /// Labels in dimension order
    #[inline]
    #[must_use]
    pub fn labels(&self) -> &[Label] {
        &self.0
    }

    /// Label at position `i`
    #[inline]
    #[must_use]
    pub fn label(&self, i: usize) -> Option<&Label> {
        self.0.get(i)
    }

    /// Label at position `i` read as a non-negative integer
    #[inline]
    #[must_use]
    pub fn numeric_label(&self, i: usize) -> Option<u64> {
        self.0.get(i).and_then(Label::as_index)
    }

    /// Number of labels
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if this is the rank-0 address
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Re-express labels in the kinds of `tensor_type`
    ///
    /// Numeric mapped labels at indexed positions become [`Label::Indexed`];
    /// indexed labels at mapped positions become their decimal text. Labels
    /// that cannot be converted, and positions beyond the type's rank, are
    /// kept as they are.
    #[must_use]
    pub fn coerce_to(&self, tensor_type: &TensorType) -> Self {
        let labels = self
            .0
            .iter()
            .enumerate()
            .map(|(i, label)| match (tensor_type.dimensions().get(i), label) {
                (Some(dim), Label::Mapped(_)) if dim.kind().is_indexed() => label
                    .as_index()
                    .map_or_else(|| label.clone(), Label::Indexed),
                (Some(dim), Label::Indexed(n)) if dim.kind().is_mapped() => {
                    Label::Mapped(n.to_string())
                }
                _ => label.clone(),
            })
            .collect();
        Self(labels)
    }

    /// Render with dimension names, e.g. `(x=0,y=a)`
    #[must_use]
    pub fn describe(&self, tensor_type: &TensorType) -> String {
        let parts: Vec<String> = self
            .0
            .iter()
            .enumerate()
            .map(|(i, label)| match tensor_type.dimensions().get(i) {
                Some(dim) => format!("{}={}", dim.name(), label),
                None => label.to_string(),
            })
            .collect();
        format!("({})", parts.join(","))
    }
}

impl Display for TensorAddress {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        write!(f, "({})", parts.join(","))
    }
}

impl From<Vec<Label>> for TensorAddress {
    fn from(labels: Vec<Label>) -> Self {
        Self(labels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_label_reads_both_kinds() {
        let addr = TensorAddress::new(vec![Label::Indexed(3), "7".into(), "a".into()]);
        assert_eq!(addr.numeric_label(0), Some(3));
        assert_eq!(addr.numeric_label(1), Some(7));
        assert_eq!(addr.numeric_label(2), None);
        assert_eq!(addr.numeric_label(3), None);
    }

    #[test]
    fn negative_text_is_not_numeric() {
        let label = Label::from("-1");
        assert_eq!(label.as_index(), None);
    }

    #[test]
    fn coerce_to_indexed() {
        let t: TensorType = "tensor(x[2],y{})".parse().unwrap();
        let addr = TensorAddress::new(vec!["1".into(), "a".into()]);
        let coerced = addr.coerce_to(&t);
        assert_eq!(coerced.labels(), &[Label::Indexed(1), Label::from("a")]);
    }

    #[test]
    fn coerce_to_mapped() {
        let t: TensorType = "tensor(x{})".parse().unwrap();
        let addr = TensorAddress::new(vec![Label::Indexed(4)]);
        assert_eq!(addr.coerce_to(&t).labels(), &[Label::from("4")]);
    }

    #[test]
    fn coerce_keeps_unparseable_labels() {
        let t: TensorType = "tensor(x[2])".parse().unwrap();
        let addr = TensorAddress::new(vec!["abc".into()]);
        assert_eq!(addr.coerce_to(&t), addr);
    }

    #[test]
    fn display_and_describe() {
        let t: TensorType = "tensor(x[2],y{})".parse().unwrap();
        let addr = TensorAddress::new(vec![Label::Indexed(0), "a".into()]);
        assert_eq!(addr.to_string(), "(0,a)");
        assert_eq!(addr.describe(&t), "(x=0,y=a)");
    }

    #[test]
    fn indexed_labels_sort_numerically() {
        let mut labels = vec![Label::Indexed(10), Label::Indexed(2), Label::from("b")];
        labels.sort();
        assert_eq!(labels, vec![Label::Indexed(2), Label::Indexed(10), Label::from("b")]);
    }
}
