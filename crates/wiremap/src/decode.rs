//! Decoder: wire map → resource.
//!
//! Walks the record's [`TypeModel`] and converts each field by category.
//! The first failing field aborts the whole decode; no partially populated
//! resource is handed back.

use serde_json::Value;
use wiremap_value::MaybeValue;

use crate::error::DecodeError;
use crate::identity;
use crate::model::{Binding, Field, Resource, ScalarSlot, TypeModel};
use crate::options::DecodeOptions;
use crate::scalar::{wire_kind, Scalar, ScalarKind, ScalarType};
use crate::WireMap;

/// Decode with default options.
pub fn decode<R: Resource>(wire: &WireMap) -> Result<R, DecodeError> {
    decode_with(wire, &DecodeOptions::default())
}

pub fn decode_with<R: Resource>(wire: &WireMap, options: &DecodeOptions) -> Result<R, DecodeError> {
    let mut resource = R::default();
    let mut cx = DecodeCx::new(options);
    decode_record(&mut resource, wire, &mut cx)?;
    Ok(resource)
}

/// Decode a dynamic value, which must itself be a map.
pub fn decode_value<R: Resource>(value: &Value) -> Result<R, DecodeError> {
    match value {
        Value::Object(wire) => decode(wire),
        other => Err(DecodeError::TypeMismatch {
            field: String::new(),
            found: wire_kind(other),
            expected: "map",
        }),
    }
}

/// Per-call decode state: options and the dotted path of the current record.
pub(crate) struct DecodeCx<'a> {
    options: &'a DecodeOptions,
    path: String,
}

impl<'a> DecodeCx<'a> {
    fn new(options: &'a DecodeOptions) -> Self {
        Self {
            options,
            path: String::new(),
        }
    }

    fn path_to(&self, segment: &str) -> String {
        if self.path.is_empty() {
            segment.to_owned()
        } else {
            format!("{}.{}", self.path, segment)
        }
    }

    fn mismatch(&self, segment: &str, found: &Value, expected: &'static str) -> DecodeError {
        DecodeError::TypeMismatch {
            field: self.path_to(segment),
            found: wire_kind(found),
            expected,
        }
    }

    /// Run `f` with `segment` appended to the current path.
    fn descend<T>(&mut self, segment: &str, f: impl FnOnce(&mut Self) -> T) -> T {
        let saved = self.path.len();
        self.path = self.path_to(segment);
        let out = f(self);
        self.path.truncate(saved);
        out
    }

    fn scalar(&self, segment: &str, kind: ScalarKind, value: &Value) -> Result<Scalar, DecodeError> {
        Scalar::from_wire(kind, value).ok_or_else(|| self.mismatch(segment, value, kind.name()))
    }
}

pub(crate) fn decode_record<R: Resource>(
    resource: &mut R,
    wire: &WireMap,
    cx: &mut DecodeCx<'_>,
) -> Result<(), DecodeError> {
    let model = TypeModel::<R>::of()?;
    tracing::trace!(resource = model.name(), path = %cx.path, "decoding record");
    for field in model.fields() {
        decode_field(field, resource, wire.get(field.wire_name), cx)?;
    }
    if cx.options.assign_identity {
        identity::assign(model, resource);
    }
    Ok(())
}

fn decode_field<R: Resource>(
    field: &Field<R>,
    resource: &mut R,
    value: Option<&Value>,
    cx: &mut DecodeCx<'_>,
) -> Result<(), DecodeError> {
    let name = field.wire_name;
    match &field.binding {
        Binding::Primitive(slot) => match value {
            None | Some(Value::Null) => Ok(()),
            Some(v) => {
                let scalar = cx.scalar(name, slot.kind(), v)?;
                store(slot.as_ref(), resource, MaybeValue::Value(scalar), name, v, cx)
            }
        },
        Binding::MaybeScalar(slot) | Binding::OptionalNullableScalar(slot) => {
            let state = match value {
                None => MaybeValue::Undefined,
                Some(Value::Null) => MaybeValue::Null,
                Some(v) => MaybeValue::Value(cx.scalar(name, slot.kind(), v)?),
            };
            store(slot.as_ref(), resource, state, name, value.unwrap_or(&Value::Null), cx)
        }
        Binding::NullableScalar(slot) => {
            let state = match value {
                None | Some(Value::Null) => MaybeValue::Null,
                Some(v) => MaybeValue::Value(cx.scalar(name, slot.kind(), v)?),
            };
            store(slot.as_ref(), resource, state, name, value.unwrap_or(&Value::Null), cx)
        }
        Binding::Any(lens) => {
            if let Some(v) = value {
                *(lens.get_mut)(resource) = v.clone();
            }
            Ok(())
        }
        Binding::NestedRecord(slot) | Binding::OptionalNestedRecord(slot) => match value {
            None | Some(Value::Null) => Ok(()),
            Some(Value::Object(wire)) => cx.descend(name, |cx| slot.decode(resource, wire, cx)),
            Some(other) => Err(cx.mismatch(name, other, "map")),
        },
        Binding::List(slot) => match value {
            None | Some(Value::Null) => {
                slot.set_absent(resource);
                Ok(())
            }
            Some(Value::Array(items)) => slot.decode(resource, name, items, cx),
            Some(other) if cx.options.strict_lists => Err(cx.mismatch(name, other, "list")),
            Some(other) => {
                tracing::debug!(
                    field = %cx.path_to(name),
                    found = wire_kind(other),
                    "unrecognized list shape, decoding as empty list"
                );
                slot.decode(resource, name, &[], cx)
            }
        },
    }
}

fn store<R>(
    slot: &dyn ScalarSlot<R>,
    resource: &mut R,
    state: MaybeValue<Scalar>,
    name: &str,
    found: &Value,
    cx: &DecodeCx<'_>,
) -> Result<(), DecodeError> {
    if slot.store(resource, state) {
        Ok(())
    } else {
        Err(cx.mismatch(name, found, slot.kind().name()))
    }
}

/// Decode one scalar list element, widening as for plain fields.
pub(crate) fn decode_scalar_element<T: ScalarType>(
    item: &Value,
    name: &str,
    index: usize,
    cx: &DecodeCx<'_>,
) -> Result<T, DecodeError> {
    Scalar::from_wire(T::KIND, item)
        .and_then(T::from_scalar)
        .ok_or_else(|| cx.mismatch(&format!("{name}[{index}]"), item, T::KIND.name()))
}

/// Decode one record list element; `null` yields `None`.
pub(crate) fn decode_record_element<N: Resource>(
    item: &Value,
    name: &str,
    index: usize,
    cx: &mut DecodeCx<'_>,
) -> Result<Option<N>, DecodeError> {
    let segment = format!("{name}[{index}]");
    match item {
        Value::Object(wire) => {
            let mut record = N::default();
            cx.descend(&segment, |cx| decode_record(&mut record, wire, cx))?;
            Ok(Some(record))
        }
        Value::Null => Ok(None),
        other => Err(cx.mismatch(&segment, other, "map")),
    }
}

/// Stand-in for a `null` record list element, finished like a decoded record.
pub(crate) fn default_record<N: Resource>(cx: &mut DecodeCx<'_>) -> Result<N, DecodeError> {
    let mut record = N::default();
    decode_record(&mut record, &WireMap::new(), cx)?;
    Ok(record)
}
