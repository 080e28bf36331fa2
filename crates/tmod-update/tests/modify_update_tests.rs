use pretty_assertions::assert_eq;
use tmod_test_utils::{
    build_update, empty_tensor, payload, tensor, tensor_field, try_build, try_build_with,
    update_json, value_at,
};
use tmod_update::{
    apply, convert_dimensions_to_mapped, DuplicateCells, FieldUpdate, Operation, UpdateConfig,
    UpdateError, UpdateSpecBuilder,
};

#[test]
fn add_into_empty_tensor() {
    let field = tensor_field("tensor(x[2],y{})");
    let update = build_update(
        r#"{"operation": "add", "cells": [{"address": {"x": "0", "y": "a"}, "value": 1.5}]}"#,
        &field,
    );

    let result = apply(&empty_tensor("tensor(x[2],y{})"), &update);
    assert_eq!(result.len(), 1);
    assert_eq!(value_at(&result, &[("x", "0"), ("y", "a")]), Some(1.5));
}

#[test]
fn label_at_size_is_out_of_bounds() {
    let field = tensor_field("tensor(x[2],y{})");
    let err = try_build(
        r#"{"operation": "add", "cells": [{"address": {"x": "2", "y": "a"}, "value": 1.5}]}"#,
        &field,
    )
    .unwrap_err();

    match err {
        UpdateError::OutOfBounds {
            dimension,
            label,
            size,
            ..
        } => {
            assert_eq!(dimension, "x");
            assert_eq!(label, 2);
            assert_eq!(size, 2);
        }
        other => panic!("expected OutOfBounds, got {other:?}"),
    }
}

#[test]
fn missing_operation() {
    let field = tensor_field("tensor(x[2],y{})");
    let err = try_build(
        r#"{"cells": [{"address": {"x": "0", "y": "a"}, "value": 1.0}]}"#,
        &field,
    )
    .unwrap_err();
    assert!(matches!(err, UpdateError::MissingOperation { .. }));
}

#[test]
fn unknown_operation() {
    let field = tensor_field("tensor(x[2],y{})");
    let err = try_build(r#"{"operation": "divide", "cells": []}"#, &field).unwrap_err();
    assert!(matches!(err, UpdateError::UnknownOperation { ref operation, .. } if operation == "divide"));
}

#[test]
fn unbound_dimension_rejected_regardless_of_payload() {
    let field = tensor_field("tensor(x[],y{})");
    for json in [
        r#"{"operation": "add", "cells": []}"#,
        r#"{"operation": "bogus"}"#,
        r#"[1, 2, 3]"#,
    ] {
        let err = try_build(json, &field).unwrap_err();
        assert!(
            matches!(err, UpdateError::UnsupportedDimensionKind { .. }),
            "{json}: {err:?}"
        );
    }
}

#[test]
fn mapped_only_type_has_no_range_check() {
    let field = tensor_field("tensor(k{})");
    let update = build_update(
        r#"{"operation": "replace", "cells": [{"address": {"k": "123456789"}, "value": 1.0}]}"#,
        &field,
    );
    assert_eq!(update.cells().len(), 1);
}

#[test]
fn keys_in_any_order() {
    let field = tensor_field("tensor(x[3])");
    let update = build_update(
        r#"{"cells": [{"address": {"x": "1"}, "value": 2.0}], "operation": "multiply"}"#,
        &field,
    );
    assert_eq!(update.operation(), Operation::Multiply);
}

#[test]
fn cells_are_in_converted_type() {
    let field = tensor_field("tensor(x[3],y{})");
    let update = build_update(
        r#"{"operation": "add", "cells": [{"address": {"x": "1", "y": "a"}, "value": 2.0}]}"#,
        &field,
    );
    assert_eq!(
        update.cells().tensor_type(),
        &convert_dimensions_to_mapped(field.tensor_type().unwrap())
    );
}

#[test]
fn replace_touches_only_named_cells() {
    let spec = "tensor(x[3],y{})";
    let existing = tensor(
        spec,
        &[
            (&[("x", "0"), ("y", "a")], 1.0),
            (&[("x", "1"), ("y", "a")], 2.0),
            (&[("x", "2"), ("y", "b")], 3.0),
        ],
    );
    let update = build_update(
        &update_json("replace", &[(&[("x", "1"), ("y", "a")], 20.0)]).to_string(),
        &tensor_field(spec),
    );

    let result = apply(&existing, &update);
    assert_eq!(value_at(&result, &[("x", "0"), ("y", "a")]), Some(1.0));
    assert_eq!(value_at(&result, &[("x", "1"), ("y", "a")]), Some(20.0));
    assert_eq!(value_at(&result, &[("x", "2"), ("y", "b")]), Some(3.0));
    assert_eq!(result.len(), 3);
}

#[test]
fn multiply_on_absent_cell_is_zero() {
    let spec = "tensor(x[2],y{})";
    let update = build_update(
        &update_json("multiply", &[(&[("x", "1"), ("y", "new")], 5.0)]).to_string(),
        &tensor_field(spec),
    );
    let result = apply(&empty_tensor(spec), &update);
    assert_eq!(value_at(&result, &[("x", "1"), ("y", "new")]), Some(0.0));
}

#[test]
fn too_many_cells_rejected() {
    let field = tensor_field("tensor(k{})");
    let json = update_json(
        "add",
        &[(&[("k", "a")], 1.0), (&[("k", "b")], 1.0), (&[("k", "c")], 1.0)],
    );
    let err = try_build_with(UpdateConfig::new().with_max_cells(2), &json.to_string(), &field)
        .unwrap_err();
    assert!(matches!(
        err,
        UpdateError::TooManyCells {
            count: 3,
            limit: 2,
            ..
        }
    ));
}

#[test]
fn duplicate_addresses_follow_config() {
    let field = tensor_field("tensor(k{})");
    let json = r#"{"operation": "replace", "cells": [
        {"address": {"k": "a"}, "value": 1.0},
        {"address": {"k": "a"}, "value": 2.0}
    ]}"#;

    let update = try_build(json, &field).unwrap();
    assert_eq!(update.cells().len(), 1);
    assert_eq!(value_at(update.cells(), &[("k", "a")]), Some(2.0));

    let reject = UpdateConfig::new().with_duplicate_cells(DuplicateCells::Reject);
    let err = try_build_with(reject, json, &field).unwrap_err();
    assert!(matches!(err, UpdateError::MalformedInput { .. }));
}

#[test]
fn differently_written_indexes_cannot_alias_one_cell() {
    let field = tensor_field("tensor(x[4])");
    let existing = tensor("tensor(x[4])", &[(&[("x", "1")], 10.0)]);

    for operation in ["add", "replace"] {
        let json = update_json(operation, &[(&[("x", "1")], 1.0), (&[("x", "01")], 2.0)]);
        for policy in [DuplicateCells::LastWins, DuplicateCells::Reject] {
            let config = UpdateConfig::new().with_duplicate_cells(policy);
            let err = try_build_with(config, &json.to_string(), &field).unwrap_err();
            assert!(
                matches!(err, UpdateError::MalformedInput { .. }),
                "{operation} {policy:?}: {err:?}"
            );
        }
    }

    let signed = update_json("add", &[(&[("x", "+1")], 2.0)]);
    assert!(matches!(
        try_build(&signed.to_string(), &field),
        Err(UpdateError::MalformedInput { .. })
    ));

    let replace = build_update(
        &update_json("replace", &[(&[("x", "1")], 5.0), (&[("x", "1")], 7.0)]).to_string(),
        &field,
    );
    assert_eq!(value_at(&apply(&existing, &replace), &[("x", "1")]), Some(7.0));
}

#[test]
fn wrapped_modify_update() {
    let field = tensor_field("tensor(x[2])");
    let mut stream = payload(
        r#"{"modify": {"operation": "add", "cells": [{"address": {"x": "1"}, "value": 4.0}]}}"#,
    );
    let update = UpdateSpecBuilder::new(UpdateConfig::default())
        .build_field_update(&mut stream, &field)
        .unwrap();
    assert_eq!(update.key(), "modify");

    let FieldUpdate::Modify(inner) = &update;
    assert_eq!(inner.operation(), Operation::Add);

    let result = update.apply_to(&empty_tensor("tensor(x[2])"));
    assert_eq!(value_at(&result, &[("x", "1")]), Some(4.0));
}

#[test]
fn serialized_update_builds_the_same_update() {
    let field = tensor_field("tensor(x[4],y{})");
    let update = build_update(
        &update_json(
            "add",
            &[(&[("x", "3"), ("y", "b")], 0.25), (&[("x", "0"), ("y", "a")], -1.0)],
        )
        .to_string(),
        &field,
    );

    let json = serde_json::to_string(&update).unwrap();
    assert_eq!(build_update(&json, &field), update);
}
