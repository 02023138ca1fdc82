//! Field slots: typed accessors erased behind the category they serve.
//!
//! A slot only moves data in and out of a record. What a wire state means
//! for a category is decided by the decoder and encoder.

use std::any::type_name;

use serde_json::Value;
use wiremap_value::{ListValue, MaybeValue, NullableValue};

use super::registry::{self, Pending};
use super::{ElementKind, Resource};
use crate::decode::{self, DecodeCx};
use crate::encode;
use crate::error::{ConfigurationError, DecodeError};
use crate::scalar::{Scalar, ScalarKind, ScalarType};
use crate::WireMap;

/// Accessor pair for a field of type `T` inside record `R`.
pub struct Lens<R, T> {
    pub(crate) get: fn(&R) -> &T,
    pub(crate) get_mut: fn(&mut R) -> &mut T,
}

impl<R, T> Lens<R, T> {
    pub(crate) fn new(get: fn(&R) -> &T, get_mut: fn(&mut R) -> &mut T) -> Self {
        Self { get, get_mut }
    }
}

// ---------------------------------------------------------------------------
// Scalars
// ---------------------------------------------------------------------------

/// Scalar-shaped field, read and written as a three-state scalar.
pub(crate) trait ScalarSlot<R>: Send + Sync {
    fn kind(&self) -> ScalarKind;
    fn load(&self, resource: &R) -> MaybeValue<Scalar>;
    /// Returns `false` when the payload does not fit the field's Rust type.
    fn store(&self, resource: &mut R, value: MaybeValue<Scalar>) -> bool;
}

pub(crate) struct PlainSlot<R, T>(pub(crate) Lens<R, T>);
pub(crate) struct MaybeSlot<R, T>(pub(crate) Lens<R, MaybeValue<T>>);
pub(crate) struct NullableSlot<R, T>(pub(crate) Lens<R, NullableValue<T>>);
pub(crate) struct OptionalNullableSlot<R, T>(pub(crate) Lens<R, Option<NullableValue<T>>>);

fn narrow<T: ScalarType>(value: MaybeValue<Scalar>) -> Option<MaybeValue<T>> {
    match value {
        MaybeValue::Undefined => Some(MaybeValue::Undefined),
        MaybeValue::Null => Some(MaybeValue::Null),
        MaybeValue::Value(s) => T::from_scalar(s).map(MaybeValue::Value),
    }
}

impl<R: Resource, T: ScalarType> ScalarSlot<R> for PlainSlot<R, T> {
    fn kind(&self) -> ScalarKind {
        T::KIND
    }

    fn load(&self, resource: &R) -> MaybeValue<Scalar> {
        MaybeValue::Value((self.0.get)(resource).to_scalar())
    }

    fn store(&self, resource: &mut R, value: MaybeValue<Scalar>) -> bool {
        let Some(value) = narrow::<T>(value) else {
            return false;
        };
        *(self.0.get_mut)(resource) = value.into_option().unwrap_or_default();
        true
    }
}

impl<R: Resource, T: ScalarType> ScalarSlot<R> for MaybeSlot<R, T> {
    fn kind(&self) -> ScalarKind {
        T::KIND
    }

    fn load(&self, resource: &R) -> MaybeValue<Scalar> {
        (self.0.get)(resource).as_ref().map(ScalarType::to_scalar)
    }

    fn store(&self, resource: &mut R, value: MaybeValue<Scalar>) -> bool {
        let Some(value) = narrow::<T>(value) else {
            return false;
        };
        *(self.0.get_mut)(resource) = value;
        true
    }
}

impl<R: Resource, T: ScalarType> ScalarSlot<R> for NullableSlot<R, T> {
    fn kind(&self) -> ScalarKind {
        T::KIND
    }

    fn load(&self, resource: &R) -> MaybeValue<Scalar> {
        match (self.0.get)(resource) {
            NullableValue::Valid(v) => MaybeValue::Value(v.to_scalar()),
            NullableValue::Invalid => MaybeValue::Null,
        }
    }

    fn store(&self, resource: &mut R, value: MaybeValue<Scalar>) -> bool {
        let Some(value) = narrow::<T>(value) else {
            return false;
        };
        *(self.0.get_mut)(resource) = value.into_option().into();
        true
    }
}

impl<R: Resource, T: ScalarType> ScalarSlot<R> for OptionalNullableSlot<R, T> {
    fn kind(&self) -> ScalarKind {
        T::KIND
    }

    fn load(&self, resource: &R) -> MaybeValue<Scalar> {
        match (self.0.get)(resource) {
            None => MaybeValue::Undefined,
            Some(NullableValue::Invalid) => MaybeValue::Null,
            Some(NullableValue::Valid(v)) => MaybeValue::Value(v.to_scalar()),
        }
    }

    fn store(&self, resource: &mut R, value: MaybeValue<Scalar>) -> bool {
        let Some(value) = narrow::<T>(value) else {
            return false;
        };
        *(self.0.get_mut)(resource) = match value {
            MaybeValue::Undefined => None,
            MaybeValue::Null => Some(NullableValue::Invalid),
            MaybeValue::Value(v) => Some(NullableValue::Valid(v)),
        };
        true
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// Field holding a nested record, directly or behind an `Option<Box<_>>`.
pub(crate) trait RecordSlot<R>: Send + Sync {
    fn type_name(&self) -> &'static str;
    fn resolve(&self, pending: &mut Pending) -> Result<(), ConfigurationError>;
    fn decode(&self, resource: &mut R, wire: &WireMap, cx: &mut DecodeCx<'_>) -> Result<(), DecodeError>;
    /// `None` when the record is not allocated.
    fn encode(&self, resource: &R) -> Option<WireMap>;
}

pub(crate) struct NestedSlot<R, N>(pub(crate) Lens<R, N>);
pub(crate) struct OptionalNestedSlot<R, N>(pub(crate) Lens<R, Option<Box<N>>>);

impl<R: Resource, N: Resource> RecordSlot<R> for NestedSlot<R, N> {
    fn type_name(&self) -> &'static str {
        type_name::<N>()
    }

    fn resolve(&self, pending: &mut Pending) -> Result<(), ConfigurationError> {
        registry::resolve::<N>(pending)
    }

    fn decode(&self, resource: &mut R, wire: &WireMap, cx: &mut DecodeCx<'_>) -> Result<(), DecodeError> {
        let target = (self.0.get_mut)(resource);
        *target = N::default();
        decode::decode_record(target, wire, cx)
    }

    fn encode(&self, resource: &R) -> Option<WireMap> {
        Some(encode::encode_record((self.0.get)(resource)))
    }
}

impl<R: Resource, N: Resource> RecordSlot<R> for OptionalNestedSlot<R, N> {
    fn type_name(&self) -> &'static str {
        type_name::<N>()
    }

    fn resolve(&self, pending: &mut Pending) -> Result<(), ConfigurationError> {
        registry::resolve::<N>(pending)
    }

    fn decode(&self, resource: &mut R, wire: &WireMap, cx: &mut DecodeCx<'_>) -> Result<(), DecodeError> {
        let target = (self.0.get_mut)(resource).insert(Box::default());
        decode::decode_record(target.as_mut(), wire, cx)
    }

    fn encode(&self, resource: &R) -> Option<WireMap> {
        (self.0.get)(resource).as_deref().map(encode::encode_record)
    }
}

// ---------------------------------------------------------------------------
// Lists
// ---------------------------------------------------------------------------

/// Field holding a [`ListValue`] of scalars or records.
pub(crate) trait ListSlot<R>: Send + Sync {
    fn element(&self) -> ElementKind;
    fn resolve(&self, pending: &mut Pending) -> Result<(), ConfigurationError>;
    fn set_absent(&self, resource: &mut R);
    fn decode(
        &self,
        resource: &mut R,
        name: &str,
        items: &[Value],
        cx: &mut DecodeCx<'_>,
    ) -> Result<(), DecodeError>;
    /// `None` when the list is absent.
    fn encode(&self, resource: &R) -> Option<Vec<Value>>;
}

pub(crate) struct ScalarListSlot<R, T>(pub(crate) Lens<R, ListValue<T>>);
pub(crate) struct RecordListSlot<R, N>(pub(crate) Lens<R, ListValue<N>>);
pub(crate) struct OptionalRecordListSlot<R, N>(pub(crate) Lens<R, ListValue<Option<N>>>);

impl<R: Resource, T: ScalarType> ListSlot<R> for ScalarListSlot<R, T> {
    fn element(&self) -> ElementKind {
        ElementKind::Scalar(T::KIND)
    }

    fn resolve(&self, _pending: &mut Pending) -> Result<(), ConfigurationError> {
        Ok(())
    }

    fn set_absent(&self, resource: &mut R) {
        *(self.0.get_mut)(resource) = ListValue::Absent;
    }

    fn decode(
        &self,
        resource: &mut R,
        name: &str,
        items: &[Value],
        cx: &mut DecodeCx<'_>,
    ) -> Result<(), DecodeError> {
        let list = items
            .iter()
            .enumerate()
            .map(|(index, item)| decode::decode_scalar_element::<T>(item, name, index, cx))
            .collect::<Result<Vec<_>, _>>()?;
        *(self.0.get_mut)(resource) = ListValue::Present(list);
        Ok(())
    }

    fn encode(&self, resource: &R) -> Option<Vec<Value>> {
        (self.0.get)(resource)
            .as_present()
            .map(|items| items.iter().map(|v| v.to_scalar().into_wire()).collect())
    }
}

impl<R: Resource, N: Resource> ListSlot<R> for RecordListSlot<R, N> {
    fn element(&self) -> ElementKind {
        ElementKind::Record(type_name::<N>())
    }

    fn resolve(&self, pending: &mut Pending) -> Result<(), ConfigurationError> {
        registry::resolve::<N>(pending)
    }

    fn set_absent(&self, resource: &mut R) {
        *(self.0.get_mut)(resource) = ListValue::Absent;
    }

    fn decode(
        &self,
        resource: &mut R,
        name: &str,
        items: &[Value],
        cx: &mut DecodeCx<'_>,
    ) -> Result<(), DecodeError> {
        let mut list = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let record = match decode::decode_record_element::<N>(item, name, index, cx)? {
                Some(record) => record,
                None => decode::default_record::<N>(cx)?,
            };
            list.push(record);
        }
        *(self.0.get_mut)(resource) = ListValue::Present(list);
        Ok(())
    }

    fn encode(&self, resource: &R) -> Option<Vec<Value>> {
        (self.0.get)(resource)
            .as_present()
            .map(|items| items.iter().map(|n| Value::Object(encode::encode_record(n))).collect())
    }
}

impl<R: Resource, N: Resource> ListSlot<R> for OptionalRecordListSlot<R, N> {
    fn element(&self) -> ElementKind {
        ElementKind::OptionalRecord(type_name::<N>())
    }

    fn resolve(&self, pending: &mut Pending) -> Result<(), ConfigurationError> {
        registry::resolve::<N>(pending)
    }

    fn set_absent(&self, resource: &mut R) {
        *(self.0.get_mut)(resource) = ListValue::Absent;
    }

    fn decode(
        &self,
        resource: &mut R,
        name: &str,
        items: &[Value],
        cx: &mut DecodeCx<'_>,
    ) -> Result<(), DecodeError> {
        let mut list = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            list.push(decode::decode_record_element::<N>(item, name, index, cx)?);
        }
        *(self.0.get_mut)(resource) = ListValue::Present(list);
        Ok(())
    }

    fn encode(&self, resource: &R) -> Option<Vec<Value>> {
        (self.0.get)(resource).as_present().map(|items| {
            items
                .iter()
                .map(|n| n.as_ref().map_or(Value::Null, |n| Value::Object(encode::encode_record(n))))
                .collect()
        })
    }
}
