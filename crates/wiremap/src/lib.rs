//! wiremap - Typed resources over JSON-shaped wire maps.
//!
//! Converts between a dynamic [`WireMap`] and statically declared
//! [`Resource`] types in both directions, keeping the difference between a
//! field that is absent, present as `null`, and present with a value.
//!
//! - [`model`]: per-type field tables ([`TypeModel`], [`FieldSet`])
//! - [`decode`]: wire map → resource
//! - [`encode`]: resource → wire map
//! - [`identity`]: identifier generation for records decoded without one
//! - [`equal`]: numeric-aware wire comparison
//! - [`context`]: the context handed to extension code

pub mod context;
pub mod decode;
pub mod encode;
pub mod equal;
pub mod error;
pub mod identity;
pub mod model;
pub mod options;
pub mod scalar;

pub use serde_json::Value;
pub use wiremap_value::{ListValue, MaybeValue, NullableValue};

pub use context::{Context, ContextEntry, Transaction, UnrecognizedTransaction};
pub use decode::{decode, decode_value, decode_with};
pub use encode::{encode, encode_value};
pub use equal::{wire_equal, wire_map_equal};
pub use error::{ConfigurationError, DecodeError};
pub use identity::{assign_identity, new_uuid};
pub use model::{ElementKind, FieldCategory, FieldDescriptor, FieldSet, Resource, TypeModel};
pub use options::DecodeOptions;
pub use scalar::{Scalar, ScalarKind, ScalarType};

/// Unordered mapping from wire name to dynamic value.
pub type WireMap = serde_json::Map<String, Value>;
