//! Schema-bound deserialization.
//!
//! The binder is the one place where a dynamically typed JSON tree becomes a
//! statically shaped [`Record`]. It walks the schema field by field and fails
//! closed: every mismatch is classified, nothing is coerced, and no partially
//! built record escapes.
//!
//! Binding happens in two passes over the schema's fields:
//!
//! 1. **Shape**: look up each field, apply the presence rule, and type-check
//!    the value, recursing into nested records and lists. No validator runs
//!    until the whole tree has the declared shape.
//! 2. **Validation**: for every field that held a real value, run enum
//!    membership (or the nested schema's validation for records), then the
//!    field's declared validators, then validators registered in the
//!    [`FieldValidatorSet`]. The first failure wins.
//!
//! Keys present in the tree but not declared in the schema are ignored.

use indexmap::IndexMap;
use serde_json::{Map, Value as JsonValue};
use tracing::trace;
use typedex_core::{kind_name, FieldPath, Outcome, ValidationError, Violation};

use crate::kind::FieldKind;
use crate::record::{FieldValue, Record};
use crate::rules::EnumMembership;
use crate::schema::{FieldDescriptor, Presence, Schema};
use crate::validator::{FieldValidator, FieldValidatorSet};

/// Bind a JSON tree to a schema with only the schema's own validators.
pub fn bind(tree: &JsonValue, schema: &Schema) -> Outcome<Record> {
    bind_record(tree, schema, &FieldValidatorSet::new(), &FieldPath::root())
}

/// Bind a JSON tree to a schema.
///
/// `path` is the location of `tree` in the full response and prefixes every
/// reported error path.
pub fn bind_record(
    tree: &JsonValue,
    schema: &Schema,
    extra: &FieldValidatorSet,
    path: &FieldPath,
) -> Outcome<Record> {
    let record = shape_record(tree, schema, path)?;
    validate_record(&record, tree, schema, extra, path)?;
    Ok(record)
}

/// Shape pass. Checks presence and kinds for the whole tree, nested records
/// included, without running any validator.
fn shape_record(tree: &JsonValue, schema: &Schema, path: &FieldPath) -> Outcome<Record> {
    let object = tree.as_object().ok_or_else(|| {
        ValidationError::type_mismatch(
            path.clone(),
            format!("object ({})", schema.name()),
            kind_name(tree),
        )
    })?;

    let mut bound = IndexMap::with_capacity(schema.fields().len());
    for descriptor in schema.fields() {
        let value = shape_field(object, descriptor, path)?;
        bound.insert(descriptor.name().to_string(), value);
    }
    Ok(Record::new(schema.shared_name(), bound))
}

fn shape_field(
    object: &Map<String, JsonValue>,
    descriptor: &FieldDescriptor,
    path: &FieldPath,
) -> Outcome<FieldValue> {
    let field_path = path.key(descriptor.name());
    let raw = object.get(descriptor.name());

    match (raw, descriptor.presence()) {
        (None, Presence::Required) => Err(ValidationError::missing_field(field_path)),
        (Some(JsonValue::Null), Presence::Required) => {
            Err(ValidationError::null_required(field_path))
        }
        (None | Some(JsonValue::Null), Presence::Optional { default }) => {
            trace!(path = %field_path, defaulted = default.is_some(), "Optional field absent");
            Ok(default.clone().unwrap_or(FieldValue::Absent))
        }
        (Some(value), _) => {
            let bound = shape_value(value, descriptor.kind(), &field_path)?;
            trace!(path = %field_path, kind = %descriptor.kind(), "Bound field");
            Ok(bound)
        }
    }
}

fn shape_value(value: &JsonValue, kind: &FieldKind, path: &FieldPath) -> Outcome<FieldValue> {
    let mismatch = || ValidationError::type_mismatch(path.clone(), kind.to_string(), kind_name(value));

    match kind {
        FieldKind::String => value
            .as_str()
            .map(|s| FieldValue::String(s.to_string()))
            .ok_or_else(mismatch),
        FieldKind::Enum(_) => value
            .as_str()
            .map(|s| FieldValue::Enum(s.to_string()))
            .ok_or_else(mismatch),
        FieldKind::Integer => match value {
            JsonValue::Number(n) => n.as_i64().map(FieldValue::Integer).ok_or_else(|| {
                let found = if n.is_u64() {
                    "integer outside i64 range"
                } else {
                    "number"
                };
                ValidationError::type_mismatch(path.clone(), kind.to_string(), found)
            }),
            _ => Err(mismatch()),
        },
        FieldKind::Number => value.as_f64().map(FieldValue::Number).ok_or_else(mismatch),
        FieldKind::Boolean => value.as_bool().map(FieldValue::Boolean).ok_or_else(mismatch),
        FieldKind::Record(schema) => shape_record(value, schema, path).map(FieldValue::Record),
        FieldKind::List(inner) => {
            let items = value.as_array().ok_or_else(mismatch)?;
            items
                .iter()
                .enumerate()
                .map(|(i, item)| shape_value(item, inner, &path.index(i)))
                .collect::<Outcome<Vec<_>>>()
                .map(FieldValue::List)
        }
    }
}

/// Validation pass over a shaped record, in field declaration order.
///
/// Fields whose raw value was missing or null are skipped, so validators
/// only ever see values taken from the response.
fn validate_record(
    record: &Record,
    tree: &JsonValue,
    schema: &Schema,
    extra: &FieldValidatorSet,
    path: &FieldPath,
) -> Outcome<()> {
    let Some(object) = tree.as_object() else {
        return Ok(());
    };

    for descriptor in schema.fields() {
        let Some(raw) = object.get(descriptor.name()).filter(|v| !v.is_null()) else {
            continue;
        };
        let Some(value) = record.get(descriptor.name()) else {
            continue;
        };
        let field_path = path.key(descriptor.name());

        validate_kind(descriptor.kind(), value, raw, extra, &field_path)?;

        let registered = extra.validators_for(schema.name(), descriptor.name());
        for validator in descriptor.validators().iter().chain(registered) {
            if let Err(violation) = validator.check(value) {
                trace!(
                    path = %field_path,
                    validator = validator.name(),
                    code = %violation.code,
                    "Field validator rejected value"
                );
                return Err(rejected(&field_path, raw, violation));
            }
        }
    }
    Ok(())
}

/// Checks implied by the kind itself: enum membership, and the nested
/// schema's validators for records. Lists are checked element by element.
fn validate_kind(
    kind: &FieldKind,
    value: &FieldValue,
    raw: &JsonValue,
    extra: &FieldValidatorSet,
    path: &FieldPath,
) -> Outcome<()> {
    match (kind, value) {
        (FieldKind::Enum(variants), _) => EnumMembership::new(variants.clone())
            .check(value)
            .map_err(|violation| rejected(path, raw, violation)),
        (FieldKind::Record(schema), FieldValue::Record(nested)) => {
            validate_record(nested, raw, schema, extra, path)
        }
        (FieldKind::List(inner), FieldValue::List(items)) => {
            let raw_items = raw.as_array().map(Vec::as_slice).unwrap_or(&[]);
            items
                .iter()
                .zip(raw_items)
                .enumerate()
                .try_for_each(|(i, (item, raw_item))| {
                    validate_kind(inner, item, raw_item, extra, &path.index(i))
                })
        }
        _ => Ok(()),
    }
}

fn rejected(path: &FieldPath, raw: &JsonValue, violation: Violation) -> ValidationError {
    ValidationError::field_validation(path.clone(), raw.to_string(), violation)
}
