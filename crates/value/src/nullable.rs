//! NullableValue - SQL-style nullable wrapper.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Two-valued wrapper: `Invalid` covers both an absent key and `null`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum NullableValue<T> {
    #[default]
    Invalid,
    Valid(T),
}

impl<T> NullableValue<T> {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Valid(v) => Some(v),
            Self::Invalid => None,
        }
    }

    pub fn as_ref(&self) -> NullableValue<&T> {
        match self {
            Self::Valid(v) => NullableValue::Valid(v),
            Self::Invalid => NullableValue::Invalid,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> NullableValue<U> {
        match self {
            Self::Valid(v) => NullableValue::Valid(f(v)),
            Self::Invalid => NullableValue::Invalid,
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Valid(v) => Some(v),
            Self::Invalid => None,
        }
    }
}

impl<T> From<Option<T>> for NullableValue<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Self::Valid(v),
            None => Self::Invalid,
        }
    }
}

impl<T: Serialize> Serialize for NullableValue<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Valid(v) => serializer.serialize_some(v),
            Self::Invalid => serializer.serialize_none(),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for NullableValue<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(Self::from)
    }
}
