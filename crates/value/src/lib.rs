//! wiremap-value - Value domain wrappers for typed resources.
//!
//! Provides [`MaybeValue`] (absent / null / value), [`NullableValue`]
//! (invalid / valid) and [`ListValue`] (absent / present list). These are the
//! field types that let a statically typed record keep the optionality
//! information carried by a JSON-shaped wire map.

mod list;
mod maybe;
mod nullable;

pub use list::ListValue;
pub use maybe::MaybeValue;
pub use nullable::NullableValue;
