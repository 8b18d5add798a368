//! Values handed to an enum field by application code or the database.

use std::fmt;

use enumfields_core::enums::{EnumMember, MemberValue};

use crate::value::Value;

/// Either an enum member or a raw storage value.
///
/// Everything an enum field accepts converts into a `FieldValue`, so the
/// field's hooks take `impl Into<FieldValue>`.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// An enum member.
    Member(EnumMember),
    /// A primitive value of unknown meaning.
    Raw(Value),
}

impl FieldValue {
    /// Returns `true` for `Null` and the empty string.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Member(_) => false,
            Self::Raw(v) => v.is_empty(),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Member(m) => write!(f, "{m}"),
            Self::Raw(v) => write!(f, "{v}"),
        }
    }
}

impl From<EnumMember> for FieldValue {
    fn from(m: EnumMember) -> Self {
        Self::Member(m)
    }
}

impl From<&EnumMember> for FieldValue {
    fn from(m: &EnumMember) -> Self {
        Self::Member(m.clone())
    }
}

impl From<Value> for FieldValue {
    fn from(v: Value) -> Self {
        Self::Raw(v)
    }
}

impl From<&Value> for FieldValue {
    fn from(v: &Value) -> Self {
        Self::Raw(v.clone())
    }
}

impl From<MemberValue> for FieldValue {
    fn from(v: MemberValue) -> Self {
        Self::Raw(v.into())
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        Self::Raw(Value::from(v))
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        Self::Raw(Value::from(v))
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        Self::Raw(Value::Int(v))
    }
}

impl From<i32> for FieldValue {
    fn from(v: i32) -> Self {
        Self::Raw(Value::from(v))
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        Self::Raw(Value::Bool(v))
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        Self::Raw(Value::Float(v))
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Raw(Value::Null), Into::into)
    }
}
