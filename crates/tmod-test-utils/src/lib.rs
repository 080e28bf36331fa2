//! Testing utilities for tmod workspace
//!
//! Shared fixtures for tensor types, fields and update payloads.

#![allow(missing_docs)]
#![allow(clippy::missing_panics_doc)]

use serde_json::Value;
use tmod_tensor::{Tensor, TensorType};
use tmod_update::{Field, PartialUpdate, TokenBuffer, UpdateConfig, UpdateError, UpdateSpecBuilder};

/// Name given to fixture fields
pub const FIELD_NAME: &str = "field";

pub fn tensor_type(spec: &str) -> TensorType {
    spec.parse()
        .unwrap_or_else(|e| panic!("bad fixture type '{spec}': {e}"))
}

pub fn tensor_field(spec: &str) -> Field {
    Field::tensor(FIELD_NAME, tensor_type(spec))
}

pub fn payload(json: &str) -> TokenBuffer {
    TokenBuffer::from_json(json).unwrap_or_else(|e| panic!("bad fixture payload: {e}"))
}

/// `{"operation": op, "cells": [...]}` for the given `(address, value)` pairs
pub fn update_json(operation: &str, cells: &[(&[(&str, &str)], f64)]) -> Value {
    let cells: Vec<Value> = cells
        .iter()
        .map(|(address, value)| {
            let address: serde_json::Map<String, Value> = address
                .iter()
                .map(|(dim, label)| ((*dim).to_string(), Value::from(*label)))
                .collect();
            serde_json::json!({"address": address, "value": value})
        })
        .collect();
    serde_json::json!({"operation": operation, "cells": cells})
}

pub fn try_build(json: &str, field: &Field) -> Result<PartialUpdate, UpdateError> {
    try_build_with(UpdateConfig::default(), json, field)
}

pub fn try_build_with(
    config: UpdateConfig,
    json: &str,
    field: &Field,
) -> Result<PartialUpdate, UpdateError> {
    let mut stream = payload(json);
    UpdateSpecBuilder::new(config).build(&mut stream, field)
}

pub fn build_update(json: &str, field: &Field) -> PartialUpdate {
    try_build(json, field).unwrap_or_else(|e| panic!("fixture update rejected: {e}"))
}

/// Tensor of type `spec` holding `cells`, labels given as text
pub fn tensor(spec: &str, cells: &[(&[(&str, &str)], f64)]) -> Tensor {
    let mut builder = Tensor::builder(tensor_type(spec));
    for (address, value) in cells {
        builder
            .cell_by_names(address, *value)
            .unwrap_or_else(|e| panic!("bad fixture cell: {e}"));
    }
    builder.build()
}

pub fn empty_tensor(spec: &str) -> Tensor {
    Tensor::empty(tensor_type(spec))
}

/// Value at a named address, labels given as text
pub fn value_at(tensor: &Tensor, address: &[(&str, &str)]) -> Option<f64> {
    let probe = self::tensor(&tensor.tensor_type().to_string(), &[(address, 0.0)]);
    let value = probe
        .cells()
        .next()
        .and_then(|(address, _)| tensor.get(address));
    value
}
