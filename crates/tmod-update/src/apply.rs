//! Applying partial updates to stored tensors

use crate::operation::Operation;
use crate::update::PartialUpdate;
use tmod_tensor::Tensor;

/// Merge `update` into `existing`, returning a new tensor
///
/// Pure: `existing` is not modified. Each update cell is re-addressed in
/// `existing`'s type, then:
///
/// | operation | result                         |
/// |-----------|--------------------------------|
/// | replace   | `v`                            |
/// | add       | `existing.get_or(addr, 0) + v` |
/// | multiply  | `existing.get_or(addr, 0) * v` |
///
/// Multiplying an absent cell therefore yields `0`, not `v`. Cells not named
/// by the update carry over unchanged. The result has `existing`'s type.
///
/// Total for updates built by [`UpdateSpecBuilder`](crate::UpdateSpecBuilder)
/// against the same field type.
///
/// # Performance
/// O(|existing| + |update| · log |existing|)
#[must_use]
pub fn apply(existing: &Tensor, update: &PartialUpdate) -> Tensor {
    let tensor_type = existing.tensor_type();
    let operation = update.operation();
    let mut cells = existing.clone().into_cells();

    for (address, value) in update.cells().cells() {
        let address = address.coerce_to(tensor_type);
        let current = existing.get_or(&address, 0.0);
        let updated = combine(operation, current, value);
        tracing::trace!(
            "{} {} at {}: {} -> {}",
            operation,
            value,
            address.describe(tensor_type),
            current,
            updated
        );
        cells.insert(address, updated);
    }

    tracing::debug!(
        "Applied {} update of {} cells to tensor of {} cells",
        operation,
        update.cells().len(),
        existing.len()
    );
    Tensor::from_cells_unchecked(tensor_type.clone(), cells)
}

fn combine(operation: Operation, current: f64, value: f64) -> f64 {
    match operation {
        Operation::Replace => value,
        Operation::Add => current + value,
        Operation::Multiply => current * value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::convert_dimensions_to_mapped;
    use pretty_assertions::assert_eq;
    use tmod_tensor::{Label, TensorAddress, TensorType};

    fn field_type() -> TensorType {
        "tensor(x[3],y{})".parse().unwrap()
    }

    fn existing() -> Tensor {
        let mut builder = Tensor::builder(field_type());
        builder.cell_by_names(&[("x", "0"), ("y", "a")], 2.0).unwrap();
        builder.cell_by_names(&[("x", "1"), ("y", "a")], 3.0).unwrap();
        builder.build()
    }

    fn update(operation: Operation, cells: &[(&str, &str, f64)]) -> PartialUpdate {
        let mut builder = Tensor::builder(convert_dimensions_to_mapped(&field_type()));
        for (x, y, v) in cells {
            builder.cell_by_names(&[("x", *x), ("y", *y)], *v).unwrap();
        }
        PartialUpdate::new(operation, builder.build())
    }

    fn at(x: u64, y: &str) -> TensorAddress {
        TensorAddress::new(vec![Label::Indexed(x), y.into()])
    }

    #[test]
    fn replace_overwrites_and_inserts() {
        let result = apply(&existing(), &update(Operation::Replace, &[("0", "a", 9.0), ("2", "b", 1.0)]));
        assert_eq!(result.get(&at(0, "a")), Some(9.0));
        assert_eq!(result.get(&at(1, "a")), Some(3.0));
        assert_eq!(result.get(&at(2, "b")), Some(1.0));
        assert_eq!(result.len(), 3);
    }

    #[test]
    fn add_treats_absent_as_zero() {
        let result = apply(&existing(), &update(Operation::Add, &[("0", "a", 0.5), ("2", "a", 4.0)]));
        assert_eq!(result.get(&at(0, "a")), Some(2.5));
        assert_eq!(result.get(&at(2, "a")), Some(4.0));
    }

    #[test]
    fn multiply_absent_cell_yields_zero() {
        let result = apply(&existing(), &update(Operation::Multiply, &[("1", "a", 2.0), ("2", "z", 7.0)]));
        assert_eq!(result.get(&at(1, "a")), Some(6.0));
        assert_eq!(result.get(&at(2, "z")), Some(0.0));
    }

    #[test]
    fn existing_is_not_mutated() {
        let before = existing();
        let _ = apply(&before, &update(Operation::Replace, &[("0", "a", -1.0)]));
        assert_eq!(before, existing());
    }

    #[test]
    fn result_keeps_existing_type() {
        let result = apply(&existing(), &update(Operation::Add, &[("2", "q", 1.0)]));
        assert_eq!(result.tensor_type(), &field_type());
    }

    #[test]
    fn empty_update_is_identity() {
        let result = apply(&existing(), &update(Operation::Multiply, &[]));
        assert_eq!(result, existing());
    }

    #[test]
    fn combine_table() {
        assert_eq!(combine(Operation::Replace, 2.0, 5.0), 5.0);
        assert_eq!(combine(Operation::Add, 2.0, 5.0), 7.0);
        assert_eq!(combine(Operation::Add, 0.0, 5.0), 5.0);
        assert_eq!(combine(Operation::Multiply, 2.0, 5.0), 10.0);
        assert_eq!(combine(Operation::Multiply, 0.0, 5.0), 0.0);
    }
}
