//! ListValue - a list that remembers whether it was sent at all.
//!
//! `Absent` and `Present(vec![])` are different states: the first encodes
//! to an omitted key, the second to `[]`. The distinction lives in the
//! variant, never in the length.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum ListValue<T> {
    /// The key was not present.
    #[default]
    Absent,
    /// The key was present; the list may be empty.
    Present(Vec<T>),
}

impl<T> ListValue<T> {
    /// A present, zero-length list.
    pub fn empty() -> Self {
        Self::Present(Vec::new())
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    /// Elements as a slice; an absent list reads as empty.
    pub fn as_slice(&self) -> &[T] {
        match self {
            Self::Present(items) => items,
            Self::Absent => &[],
        }
    }

    /// Elements of a present list; `None` when absent.
    pub fn as_present(&self) -> Option<&[T]> {
        match self {
            Self::Present(items) => Some(items),
            Self::Absent => None,
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.as_slice().get(index)
    }

    /// Append an element, turning an absent list into a present one.
    pub fn push(&mut self, item: T) {
        match self {
            Self::Present(items) => items.push(item),
            Self::Absent => *self = Self::Present(vec![item]),
        }
    }

    pub fn into_option(self) -> Option<Vec<T>> {
        match self {
            Self::Present(items) => Some(items),
            Self::Absent => None,
        }
    }
}

impl<T> From<Vec<T>> for ListValue<T> {
    fn from(items: Vec<T>) -> Self {
        Self::Present(items)
    }
}

impl<T> FromIterator<T> for ListValue<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::Present(iter.into_iter().collect())
    }
}

impl<T> IntoIterator for ListValue<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.into_option().unwrap_or_default().into_iter()
    }
}

impl<'a, T> IntoIterator for &'a ListValue<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Pair with `skip_serializing_if = "ListValue::is_absent"` to omit the key.
impl<T: Serialize> Serialize for ListValue<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Present(items) => items.serialize(serializer),
            Self::Absent => serializer.serialize_none(),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for ListValue<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Option::<Vec<T>>::deserialize(deserializer)?.map_or(Self::Absent, Self::Present))
    }
}
