//! Codec error types.

use thiserror::Error;

/// A record type's field declarations are unusable.
///
/// Raised while building a type model; fatal for that record type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("missing wire name for field #{index} of resource {resource}")]
    MissingWireName { resource: &'static str, index: usize },
    #[error("duplicate wire name '{wire_name}' in resource {resource}")]
    DuplicateWireName {
        resource: &'static str,
        wire_name: &'static str,
    },
}

/// Errors while decoding a wire map into a resource.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("invalid type of '{field}' field ({found}, expecting {expected})")]
    TypeMismatch {
        field: String,
        found: &'static str,
        expected: &'static str,
    },
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

impl DecodeError {
    /// Dotted path of the offending field, for type mismatches.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::TypeMismatch { field, .. } => Some(field),
            Self::Configuration(_) => None,
        }
    }
}
