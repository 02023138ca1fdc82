//! Process-wide type model cache, keyed by record type.
//!
//! Models are built outside the lock and leaked once published, so readers
//! get `&'static` references. A type and every record type reachable from it
//! are published together, after all of them validated.

use std::any::{Any, TypeId};
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::sync::{OnceLock, PoisonError, RwLock};

use super::{Resource, TypeModel};
use crate::error::ConfigurationError;

type Published = &'static (dyn Any + Send + Sync);

fn models() -> &'static RwLock<HashMap<TypeId, Published>> {
    static MODELS: OnceLock<RwLock<HashMap<TypeId, Published>>> = OnceLock::new();
    MODELS.get_or_init(Default::default)
}

/// Models built during one resolution, not yet visible to other callers.
#[derive(Default)]
pub(crate) struct Pending {
    visiting: HashSet<TypeId>,
    built: Vec<(TypeId, Box<dyn Any + Send + Sync>)>,
}

pub(crate) fn lookup<R: Resource>() -> Option<&'static TypeModel<R>> {
    let models = models().read().unwrap_or_else(PoisonError::into_inner);
    let published: Published = *models.get(&TypeId::of::<R>())?;
    published.downcast_ref()
}

/// Build and validate `R` and its reachable record types into `pending`.
pub(crate) fn resolve<R: Resource>(pending: &mut Pending) -> Result<(), ConfigurationError> {
    let id = TypeId::of::<R>();
    if pending.visiting.contains(&id) || lookup::<R>().is_some() {
        return Ok(());
    }
    let model = TypeModel::<R>::build()?;
    pending.visiting.insert(id);
    model.resolve_nested(pending)?;
    pending.built.push((id, Box::new(model)));
    Ok(())
}

/// Resolve `R` as the root of a new resolution and publish the result.
pub(crate) fn get_or_build<R: Resource>() -> Result<&'static TypeModel<R>, ConfigurationError> {
    if let Some(model) = lookup::<R>() {
        return Ok(model);
    }
    let mut pending = Pending::default();
    let model = TypeModel::<R>::build()?;
    pending.visiting.insert(TypeId::of::<R>());
    model.resolve_nested(&mut pending)?;
    Ok(publish(model, pending))
}

fn publish<R: Resource>(model: TypeModel<R>, pending: Pending) -> &'static TypeModel<R> {
    let mut models = models().write().unwrap_or_else(PoisonError::into_inner);
    for (id, built) in pending.built {
        // A racing resolution may have published first; its model wins.
        if let Entry::Vacant(slot) = models.entry(id) {
            slot.insert(Box::leak(built));
        }
    }
    let existing: Option<Published> = models.get(&TypeId::of::<R>()).copied();
    // Keyed by `TypeId`, so a published entry always downcasts.
    if let Some(existing) = existing.and_then(|m| m.downcast_ref::<TypeModel<R>>()) {
        return existing;
    }
    let leaked: &'static TypeModel<R> = Box::leak(Box::new(model));
    models.insert(TypeId::of::<R>(), leaked);
    leaked
}
