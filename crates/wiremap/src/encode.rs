//! Encoder: resource → wire map.
//!
//! The structural inverse of the decoder. Encoding never fails once the
//! record's type model exists.

use serde_json::Value;
use wiremap_value::MaybeValue;

use crate::error::ConfigurationError;
use crate::model::{Binding, Field, Resource, TypeModel};
use crate::scalar::Scalar;
use crate::WireMap;

/// Encode a resource; fails only if `R`'s type model cannot be built.
pub fn encode<R: Resource>(resource: &R) -> Result<WireMap, ConfigurationError> {
    Ok(TypeModel::<R>::of()?.encode(resource))
}

pub fn encode_value<R: Resource>(resource: &R) -> Result<Value, ConfigurationError> {
    encode(resource).map(Value::Object)
}

impl<R: Resource> TypeModel<R> {
    /// Encode `resource` with this model. Keys follow declaration order.
    pub fn encode(&self, resource: &R) -> WireMap {
        tracing::trace!(resource = self.name(), "encoding record");
        let mut wire = WireMap::new();
        for field in self.fields() {
            if let Some(value) = encode_field(field, resource) {
                wire.insert(field.wire_name.to_owned(), value);
            }
        }
        wire
    }
}

/// Encode a record reached through a nested or list field.
///
/// Nested models are validated and published together with their parent,
/// so the lookup only fails for a record never reached through a model.
pub(crate) fn encode_record<R: Resource>(resource: &R) -> WireMap {
    match TypeModel::<R>::of() {
        Ok(model) => model.encode(resource),
        Err(err) => {
            tracing::error!(%err, "nested record has no type model");
            WireMap::new()
        }
    }
}

/// `None` means the key is omitted.
fn encode_field<R: Resource>(field: &Field<R>, resource: &R) -> Option<Value> {
    match &field.binding {
        Binding::Primitive(slot) => slot.load(resource).into_option().map(Scalar::into_wire),
        // Undefined and Null are indistinguishable on the wire.
        Binding::MaybeScalar(slot) | Binding::NullableScalar(slot) => Some(
            slot.load(resource)
                .into_option()
                .map_or(Value::Null, Scalar::into_wire),
        ),
        Binding::OptionalNullableScalar(slot) => match slot.load(resource) {
            MaybeValue::Undefined => None,
            MaybeValue::Null => Some(Value::Null),
            MaybeValue::Value(scalar) => Some(scalar.into_wire()),
        },
        Binding::Any(lens) => Some((lens.get)(resource).clone()),
        Binding::NestedRecord(slot) | Binding::OptionalNestedRecord(slot) => {
            Some(slot.encode(resource).map_or(Value::Null, Value::Object))
        }
        Binding::List(slot) => slot.encode(resource).map(Value::Array),
    }
}
