//! Identity assignment for records decoded without an identifier.
//!
//! When the field named by [`Resource::IDENTITY`] is a plain string and is
//! empty after decoding, it receives a fresh UUID. The generated value is
//! what encodes back out, so an absent or empty identifier does not survive
//! a round trip.

use uuid::Uuid;
use wiremap_value::MaybeValue;

use crate::error::ConfigurationError;
use crate::model::{Resource, TypeModel};
use crate::scalar::Scalar;

/// A new random identifier (hyphenated lowercase UUID v4).
pub fn new_uuid() -> String {
    Uuid::new_v4().to_string()
}

/// Give `resource` an identifier if its identity field is empty.
///
/// Returns whether one was generated.
pub fn assign_identity<R: Resource>(resource: &mut R) -> Result<bool, ConfigurationError> {
    Ok(assign(TypeModel::<R>::of()?, resource))
}

pub(crate) fn assign<R: Resource>(model: &TypeModel<R>, resource: &mut R) -> bool {
    let Some(slot) = model.identity_slot() else {
        return false;
    };
    match slot.load(resource) {
        MaybeValue::Value(Scalar::String(id)) if id.is_empty() => {}
        _ => return false,
    }
    let id = new_uuid();
    tracing::debug!(resource = model.name(), %id, "generated identity");
    slot.store(resource, MaybeValue::Value(Scalar::String(id)))
}
