//! Scalar kinds and the single numeric widening rule.

use serde_json::{Number, Value};

/// The scalar kind a field is declared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Bool,
    Int,
    Float,
    String,
}

impl ScalarKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::String => "string",
        }
    }
}

impl std::fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A scalar lifted out of a typed field, independent of its Rust width.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    /// Integers above `i64::MAX`; smaller unsigned values use `Int`.
    Uint(u64),
    Float(f64),
    String(String),
}

impl Scalar {
    pub fn kind(&self) -> ScalarKind {
        match self {
            Self::Bool(_) => ScalarKind::Bool,
            Self::Int(_) | Self::Uint(_) => ScalarKind::Int,
            Self::Float(_) => ScalarKind::Float,
            Self::String(_) => ScalarKind::String,
        }
    }

    /// Non-finite floats have no JSON form and become `null`.
    pub fn into_wire(self) -> Value {
        match self {
            Self::Bool(b) => Value::Bool(b),
            Self::Int(i) => Value::from(i),
            Self::Uint(u) => Value::from(u),
            Self::Float(f) => Number::from_f64(f).map_or(Value::Null, Value::Number),
            Self::String(s) => Value::String(s),
        }
    }

    /// Read a wire value as a scalar of `kind`.
    ///
    /// Exact kind matches always succeed. The one widening: an `Int` target
    /// accepts a float whose fractional part is zero. Float targets accept
    /// any JSON number.
    pub fn from_wire(kind: ScalarKind, value: &Value) -> Option<Self> {
        match kind {
            ScalarKind::Bool => value.as_bool().map(Self::Bool),
            ScalarKind::String => value.as_str().map(|s| Self::String(s.to_owned())),
            ScalarKind::Float => value.as_f64().map(Self::Float),
            ScalarKind::Int => {
                let Value::Number(n) = value else {
                    return None;
                };
                if let Some(i) = n.as_i64() {
                    return Some(Self::Int(i));
                }
                if let Some(u) = n.as_u64() {
                    return Some(Self::Uint(u));
                }
                let f = n.as_f64()?;
                if f.fract() != 0.0 {
                    return None;
                }
                // MAX as f64 rounds up to the next power of two, hence the strict bounds.
                if f >= i64::MIN as f64 && f < i64::MAX as f64 {
                    Some(Self::Int(f as i64))
                } else if f >= 0.0 && f < u64::MAX as f64 {
                    Some(Self::Uint(f as u64))
                } else {
                    None
                }
            }
        }
    }

    fn integer(&self) -> Option<i128> {
        match self {
            Self::Int(i) => Some(i128::from(*i)),
            Self::Uint(u) => Some(i128::from(*u)),
            _ => None,
        }
    }
}

/// Kind name of a dynamic wire value, as reported in errors.
pub fn wire_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "map",
    }
}

/// A Rust type usable as a scalar field payload.
pub trait ScalarType: Clone + Default + PartialEq + Send + Sync + 'static {
    const KIND: ScalarKind;

    /// `None` when the scalar is of another kind or out of range.
    fn from_scalar(scalar: Scalar) -> Option<Self>;

    fn to_scalar(&self) -> Scalar;
}

impl ScalarType for bool {
    const KIND: ScalarKind = ScalarKind::Bool;

    fn from_scalar(scalar: Scalar) -> Option<Self> {
        match scalar {
            Scalar::Bool(b) => Some(b),
            _ => None,
        }
    }

    fn to_scalar(&self) -> Scalar {
        Scalar::Bool(*self)
    }
}

impl ScalarType for String {
    const KIND: ScalarKind = ScalarKind::String;

    fn from_scalar(scalar: Scalar) -> Option<Self> {
        match scalar {
            Scalar::String(s) => Some(s),
            _ => None,
        }
    }

    fn to_scalar(&self) -> Scalar {
        Scalar::String(self.clone())
    }
}

impl ScalarType for i64 {
    const KIND: ScalarKind = ScalarKind::Int;

    fn from_scalar(scalar: Scalar) -> Option<Self> {
        scalar.integer().and_then(|i| i64::try_from(i).ok())
    }

    fn to_scalar(&self) -> Scalar {
        Scalar::Int(*self)
    }
}

impl ScalarType for i32 {
    const KIND: ScalarKind = ScalarKind::Int;

    fn from_scalar(scalar: Scalar) -> Option<Self> {
        scalar.integer().and_then(|i| i32::try_from(i).ok())
    }

    fn to_scalar(&self) -> Scalar {
        Scalar::Int(i64::from(*self))
    }
}

impl ScalarType for u32 {
    const KIND: ScalarKind = ScalarKind::Int;

    fn from_scalar(scalar: Scalar) -> Option<Self> {
        scalar.integer().and_then(|i| u32::try_from(i).ok())
    }

    fn to_scalar(&self) -> Scalar {
        Scalar::Int(i64::from(*self))
    }
}

impl ScalarType for u64 {
    const KIND: ScalarKind = ScalarKind::Int;

    fn from_scalar(scalar: Scalar) -> Option<Self> {
        scalar.integer().and_then(|i| u64::try_from(i).ok())
    }

    fn to_scalar(&self) -> Scalar {
        i64::try_from(*self).map_or(Scalar::Uint(*self), Scalar::Int)
    }
}

impl ScalarType for f64 {
    const KIND: ScalarKind = ScalarKind::Float;

    fn from_scalar(scalar: Scalar) -> Option<Self> {
        match scalar {
            Scalar::Float(f) => Some(f),
            _ => None,
        }
    }

    fn to_scalar(&self) -> Scalar {
        Scalar::Float(*self)
    }
}

impl ScalarType for f32 {
    const KIND: ScalarKind = ScalarKind::Float;

    fn from_scalar(scalar: Scalar) -> Option<Self> {
        match scalar {
            // A finite value beyond f32 range would become infinite.
            Scalar::Float(f) if f.is_finite() && !(f as f32).is_finite() => None,
            Scalar::Float(f) => Some(f as f32),
            _ => None,
        }
    }

    fn to_scalar(&self) -> Scalar {
        Scalar::Float(f64::from(*self))
    }
}
