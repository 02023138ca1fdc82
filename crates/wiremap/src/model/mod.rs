//! Type model - the per-record-type field table driving the codec.
//!
//! A record type implements [`Resource`] and registers its fields once in
//! [`Resource::declare`]. Each registration method fixes the field's
//! [`FieldCategory`]; nothing is inferred from type names. The resulting
//! [`TypeModel`] is built on first use, validated, and cached for the life
//! of the process.

mod registry;
mod slot;

use std::any::type_name;
use std::collections::HashSet;

use serde_json::Value;
use wiremap_value::{ListValue, MaybeValue, NullableValue};

use crate::error::ConfigurationError;
use crate::scalar::{ScalarKind, ScalarType};

pub(crate) use registry::Pending;
pub(crate) use slot::{Lens, ListSlot, RecordSlot, ScalarSlot};
use slot::{
    MaybeSlot, NestedSlot, NullableSlot, OptionalNestedSlot, OptionalNullableSlot,
    OptionalRecordListSlot, PlainSlot, RecordListSlot, ScalarListSlot,
};

/// A statically declared record type exchanged as a wire map.
///
/// ```
/// use wiremap::{FieldSet, MaybeValue, Resource};
///
/// #[derive(Default)]
/// struct Network {
///     id: String,
///     name: MaybeValue<String>,
/// }
///
/// impl Resource for Network {
///     fn declare(fields: &mut FieldSet<Self>) {
///         fields
///             .primitive("id", |r| &r.id, |r| &mut r.id)
///             .maybe("name", |r| &r.name, |r| &mut r.name);
///     }
/// }
/// ```
pub trait Resource: Default + Send + Sync + 'static {
    /// Wire name of the identity field.
    const IDENTITY: &'static str = "id";

    fn declare(fields: &mut FieldSet<Self>);
}

/// Element type of a list field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Scalar(ScalarKind),
    Record(&'static str),
    OptionalRecord(&'static str),
}

/// How a field is converted; resolved once when the model is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldCategory {
    Primitive(ScalarKind),
    MaybeScalar(ScalarKind),
    NullableScalar(ScalarKind),
    OptionalNullableScalar(ScalarKind),
    NestedRecord(&'static str),
    OptionalNestedRecord(&'static str),
    List(ElementKind),
    Any,
}

impl std::fmt::Display for FieldCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Primitive(k) => write!(f, "{k}"),
            Self::MaybeScalar(k) => write!(f, "maybe<{k}>"),
            Self::NullableScalar(k) => write!(f, "nullable<{k}>"),
            Self::OptionalNullableScalar(k) => write!(f, "optional<nullable<{k}>>"),
            Self::NestedRecord(n) => write!(f, "{n}"),
            Self::OptionalNestedRecord(n) => write!(f, "optional<{n}>"),
            Self::List(ElementKind::Scalar(k)) => write!(f, "list<{k}>"),
            Self::List(ElementKind::Record(n)) => write!(f, "list<{n}>"),
            Self::List(ElementKind::OptionalRecord(n)) => write!(f, "list<optional<{n}>>"),
            Self::Any => f.write_str("any"),
        }
    }
}

/// Static metadata of one declared field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldDescriptor {
    pub wire_name: &'static str,
    pub category: FieldCategory,
}

pub(crate) enum Binding<R> {
    Primitive(Box<dyn ScalarSlot<R>>),
    MaybeScalar(Box<dyn ScalarSlot<R>>),
    NullableScalar(Box<dyn ScalarSlot<R>>),
    OptionalNullableScalar(Box<dyn ScalarSlot<R>>),
    NestedRecord(Box<dyn RecordSlot<R>>),
    OptionalNestedRecord(Box<dyn RecordSlot<R>>),
    List(Box<dyn ListSlot<R>>),
    Any(Lens<R, Value>),
}

impl<R> Binding<R> {
    fn category(&self) -> FieldCategory {
        match self {
            Self::Primitive(s) => FieldCategory::Primitive(s.kind()),
            Self::MaybeScalar(s) => FieldCategory::MaybeScalar(s.kind()),
            Self::NullableScalar(s) => FieldCategory::NullableScalar(s.kind()),
            Self::OptionalNullableScalar(s) => FieldCategory::OptionalNullableScalar(s.kind()),
            Self::NestedRecord(s) => FieldCategory::NestedRecord(s.type_name()),
            Self::OptionalNestedRecord(s) => FieldCategory::OptionalNestedRecord(s.type_name()),
            Self::List(s) => FieldCategory::List(s.element()),
            Self::Any(_) => FieldCategory::Any,
        }
    }
}

pub(crate) struct Field<R> {
    pub(crate) wire_name: &'static str,
    pub(crate) binding: Binding<R>,
}

/// Field registrations collected from [`Resource::declare`].
pub struct FieldSet<R> {
    fields: Vec<Field<R>>,
}

impl<R: Resource> FieldSet<R> {
    fn push(&mut self, wire_name: &'static str, binding: Binding<R>) -> &mut Self {
        self.fields.push(Field { wire_name, binding });
        self
    }

    /// A plain scalar; an absent key leaves the zero value.
    pub fn primitive<T: ScalarType>(
        &mut self,
        wire_name: &'static str,
        get: fn(&R) -> &T,
        get_mut: fn(&mut R) -> &mut T,
    ) -> &mut Self {
        let slot = PlainSlot(Lens::new(get, get_mut));
        self.push(wire_name, Binding::Primitive(Box::new(slot)))
    }

    pub fn maybe<T: ScalarType>(
        &mut self,
        wire_name: &'static str,
        get: fn(&R) -> &MaybeValue<T>,
        get_mut: fn(&mut R) -> &mut MaybeValue<T>,
    ) -> &mut Self {
        let slot = MaybeSlot(Lens::new(get, get_mut));
        self.push(wire_name, Binding::MaybeScalar(Box::new(slot)))
    }

    pub fn nullable<T: ScalarType>(
        &mut self,
        wire_name: &'static str,
        get: fn(&R) -> &NullableValue<T>,
        get_mut: fn(&mut R) -> &mut NullableValue<T>,
    ) -> &mut Self {
        let slot = NullableSlot(Lens::new(get, get_mut));
        self.push(wire_name, Binding::NullableScalar(Box::new(slot)))
    }

    /// A nullable scalar that also remembers whether the key was sent.
    pub fn optional_nullable<T: ScalarType>(
        &mut self,
        wire_name: &'static str,
        get: fn(&R) -> &Option<NullableValue<T>>,
        get_mut: fn(&mut R) -> &mut Option<NullableValue<T>>,
    ) -> &mut Self {
        let slot = OptionalNullableSlot(Lens::new(get, get_mut));
        self.push(wire_name, Binding::OptionalNullableScalar(Box::new(slot)))
    }

    pub fn nested<N: Resource>(
        &mut self,
        wire_name: &'static str,
        get: fn(&R) -> &N,
        get_mut: fn(&mut R) -> &mut N,
    ) -> &mut Self {
        let slot = NestedSlot(Lens::new(get, get_mut));
        self.push(wire_name, Binding::NestedRecord(Box::new(slot)))
    }

    pub fn optional_nested<N: Resource>(
        &mut self,
        wire_name: &'static str,
        get: fn(&R) -> &Option<Box<N>>,
        get_mut: fn(&mut R) -> &mut Option<Box<N>>,
    ) -> &mut Self {
        let slot = OptionalNestedSlot(Lens::new(get, get_mut));
        self.push(wire_name, Binding::OptionalNestedRecord(Box::new(slot)))
    }

    /// A list of scalars.
    pub fn list<T: ScalarType>(
        &mut self,
        wire_name: &'static str,
        get: fn(&R) -> &ListValue<T>,
        get_mut: fn(&mut R) -> &mut ListValue<T>,
    ) -> &mut Self {
        let slot = ScalarListSlot(Lens::new(get, get_mut));
        self.push(wire_name, Binding::List(Box::new(slot)))
    }

    pub fn record_list<N: Resource>(
        &mut self,
        wire_name: &'static str,
        get: fn(&R) -> &ListValue<N>,
        get_mut: fn(&mut R) -> &mut ListValue<N>,
    ) -> &mut Self {
        let slot = RecordListSlot(Lens::new(get, get_mut));
        self.push(wire_name, Binding::List(Box::new(slot)))
    }

    /// A list of records whose `null` elements stay `None`.
    pub fn optional_record_list<N: Resource>(
        &mut self,
        wire_name: &'static str,
        get: fn(&R) -> &ListValue<Option<N>>,
        get_mut: fn(&mut R) -> &mut ListValue<Option<N>>,
    ) -> &mut Self {
        let slot = OptionalRecordListSlot(Lens::new(get, get_mut));
        self.push(wire_name, Binding::List(Box::new(slot)))
    }

    /// An opaque dynamic value, carried without interpretation.
    pub fn any(
        &mut self,
        wire_name: &'static str,
        get: fn(&R) -> &Value,
        get_mut: fn(&mut R) -> &mut Value,
    ) -> &mut Self {
        self.push(wire_name, Binding::Any(Lens::new(get, get_mut)))
    }
}

/// Immutable field table of one record type.
pub struct TypeModel<R> {
    name: &'static str,
    fields: Vec<Field<R>>,
    descriptors: Vec<FieldDescriptor>,
    identity: Option<usize>,
}

impl<R: Resource> TypeModel<R> {
    /// The cached model of `R`, built and validated on first use.
    pub fn of() -> Result<&'static Self, ConfigurationError> {
        registry::get_or_build::<R>()
    }

    pub(crate) fn build() -> Result<Self, ConfigurationError> {
        let name = type_name::<R>();
        let mut set = FieldSet { fields: Vec::new() };
        R::declare(&mut set);

        let mut seen = HashSet::new();
        for (index, field) in set.fields.iter().enumerate() {
            if field.wire_name.is_empty() {
                tracing::warn!(resource = name, index, "field declared without a wire name");
                return Err(ConfigurationError::MissingWireName { resource: name, index });
            }
            if !seen.insert(field.wire_name) {
                tracing::warn!(resource = name, wire_name = field.wire_name, "duplicate wire name");
                return Err(ConfigurationError::DuplicateWireName {
                    resource: name,
                    wire_name: field.wire_name,
                });
            }
        }

        let descriptors: Vec<FieldDescriptor> = set
            .fields
            .iter()
            .map(|f| FieldDescriptor {
                wire_name: f.wire_name,
                category: f.binding.category(),
            })
            .collect();
        let identity = descriptors.iter().position(|d| {
            d.wire_name == R::IDENTITY && d.category == FieldCategory::Primitive(ScalarKind::String)
        });

        tracing::debug!(resource = name, fields = descriptors.len(), "type model built");
        Ok(Self {
            name,
            fields: set.fields,
            descriptors,
            identity,
        })
    }

    pub(crate) fn resolve_nested(&self, pending: &mut Pending) -> Result<(), ConfigurationError> {
        for field in &self.fields {
            match &field.binding {
                Binding::NestedRecord(slot) | Binding::OptionalNestedRecord(slot) => {
                    slot.resolve(pending)?;
                }
                Binding::List(slot) => slot.resolve(pending)?,
                _ => {}
            }
        }
        Ok(())
    }

    /// Rust type name of the record.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn descriptors(&self) -> &[FieldDescriptor] {
        &self.descriptors
    }

    pub fn descriptor(&self, wire_name: &str) -> Option<&FieldDescriptor> {
        self.descriptors.iter().find(|d| d.wire_name == wire_name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub(crate) fn fields(&self) -> &[Field<R>] {
        &self.fields
    }

    /// The identity slot, when `R::IDENTITY` names a plain string field.
    pub(crate) fn identity_slot(&self) -> Option<&dyn ScalarSlot<R>> {
        match &self.fields[self.identity?].binding {
            Binding::Primitive(slot) => Some(slot.as_ref()),
            _ => None,
        }
    }
}

impl<R> std::fmt::Debug for TypeModel<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeModel")
            .field("name", &self.name)
            .field("descriptors", &self.descriptors)
            .finish()
    }
}
