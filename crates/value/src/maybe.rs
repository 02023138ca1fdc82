//! MaybeValue - a three-valued field wrapper.
//!
//! Distinguishes a key that was never sent (`Undefined`), a key sent as
//! `null` (`Null`) and a key carrying a payload (`Value`).
//!
//! Equality follows loose-null comparison:
//!
//! ```text
//! |-----------|-----------|-------|-------|
//! | Operands  | Undefined | Null  | Value |
//! |-----------|-----------|-------|-------|
//! | Undefined | true      | true  | false |
//! | Null      | true      | true  | false |
//! | Value     | false     | false | A==B  |
//! |-----------|-----------|-------|-------|
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Three-valued wrapper: absent, null, or a payload.
#[derive(Debug, Clone, Copy, Default)]
pub enum MaybeValue<T> {
    /// The key was not present.
    #[default]
    Undefined,
    /// The key was present with a `null` value.
    Null,
    /// The key was present with a payload.
    Value(T),
}

impl<T> MaybeValue<T> {
    pub fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns whether the value is defined and not null.
    pub fn is_value(&self) -> bool {
        matches!(self, Self::Value(_))
    }

    /// Borrow the payload, if any.
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_ref(&self) -> MaybeValue<&T> {
        match self {
            Self::Undefined => MaybeValue::Undefined,
            Self::Null => MaybeValue::Null,
            Self::Value(v) => MaybeValue::Value(v),
        }
    }

    /// Map the payload, keeping `Undefined` and `Null` as they are.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> MaybeValue<U> {
        match self {
            Self::Undefined => MaybeValue::Undefined,
            Self::Null => MaybeValue::Null,
            Self::Value(v) => MaybeValue::Value(f(v)),
        }
    }

    /// Drop the undefined/null distinction.
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Value(v) => Some(v),
            _ => None,
        }
    }
}

impl<T: PartialEq> PartialEq for MaybeValue<T> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Value(a), Self::Value(b)) => a == b,
            (Self::Value(_), _) | (_, Self::Value(_)) => false,
            _ => true,
        }
    }
}

impl<T: Eq> Eq for MaybeValue<T> {}

/// `None` maps to `Null`: an explicit option carries no notion of absence.
impl<T> From<Option<T>> for MaybeValue<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Self::Value(v),
            None => Self::Null,
        }
    }
}

impl<T: Serialize> Serialize for MaybeValue<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Value(v) => serializer.serialize_some(v),
            Self::Undefined | Self::Null => serializer.serialize_none(),
        }
    }
}

/// A missing field only becomes `Undefined` when the containing struct
/// marks it `#[serde(default)]`; otherwise serde reports it as `Null`.
impl<'de, T: Deserialize<'de>> Deserialize<'de> for MaybeValue<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(Self::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_undefined() {
        let m: MaybeValue<i64> = MaybeValue::default();
        assert!(m.is_undefined());
        assert!(!m.is_null());
        assert!(!m.is_value());
    }

    #[test]
    fn undefined_equals_null() {
        assert_eq!(MaybeValue::<i64>::Undefined, MaybeValue::Null);
        assert_eq!(MaybeValue::<i64>::Null, MaybeValue::Undefined);
        assert_eq!(MaybeValue::<i64>::Null, MaybeValue::Null);
    }

    #[test]
    fn value_never_equals_non_value() {
        assert_ne!(MaybeValue::Value(0), MaybeValue::Undefined);
        assert_ne!(MaybeValue::Null, MaybeValue::Value(0));
    }

    #[test]
    fn values_compare_by_payload() {
        assert_eq!(MaybeValue::Value(5), MaybeValue::Value(5));
        assert_ne!(MaybeValue::Value(5), MaybeValue::Value(6));
    }

    #[test]
    fn map_keeps_state() {
        assert!(MaybeValue::<i64>::Null.map(|v| v + 1).is_null());
        assert!(MaybeValue::<i64>::Undefined.map(|v| v + 1).is_undefined());
        assert_eq!(MaybeValue::Value(1).map(|v| v + 1).value(), Some(&2));
    }

    #[test]
    fn from_option_none_is_null() {
        let m: MaybeValue<String> = None.into();
        assert!(m.is_null());
        let m: MaybeValue<String> = Some("a".to_string()).into();
        assert_eq!(m.into_option().as_deref(), Some("a"));
    }
}
