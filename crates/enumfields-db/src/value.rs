//! Storage values.
//!
//! The [`Value`] enum is what the database sees: enum fields write members out
//! as `Value`s and read them back from `Value`s. Only the primitive kinds an
//! enum column can hold are represented.

use std::fmt;

use enumfields_core::enums::MemberValue;

/// A backend-agnostic representation of a column value.
///
/// # Examples
///
/// ```
/// use enumfields_db::value::Value;
///
/// let v = Value::from(42_i64);
/// assert_eq!(v, Value::Int(42));
///
/// let v = Value::from("hello");
/// assert_eq!(v, Value::String("hello".to_string()));
/// ```
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Value {
    /// SQL NULL.
    Null,
    /// A boolean value.
    Bool(bool),
    /// A 64-bit signed integer.
    Int(i64),
    /// A 64-bit floating-point number.
    Float(f64),
    /// A UTF-8 string.
    String(String),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "NULL"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::String(s) => write!(f, "{s}"),
        }
    }
}

// ── From implementations ───────────────────────────────────────────────

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<MemberValue> for Value {
    fn from(v: MemberValue) -> Self {
        match v {
            MemberValue::Int(i) => Self::Int(i),
            MemberValue::Str(s) => Self::String(s),
        }
    }
}

impl From<&MemberValue> for Value {
    fn from(v: &MemberValue) -> Self {
        v.clone().into()
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(inner) => inner.into(),
            None => Self::Null,
        }
    }
}

impl Value {
    /// Returns `true` if this value is `Null`.
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns `true` for `Null` and the empty string, the two "no value" inputs.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Null => true,
            Self::String(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Attempts to extract an integer value.
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Attempts to extract a string reference.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer this value is numerically equal to, if any.
    ///
    /// Booleans count as 0 and 1; floats count when they are integral.
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn as_integral(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            Self::Bool(b) => Some(i64::from(*b)),
            Self::Float(f)
                if f.is_finite()
                    && f.fract() == 0.0
                    && *f >= i64::MIN as f64
                    && *f < i64::MAX as f64 =>
            {
                Some(*f as i64)
            }
            _ => None,
        }
    }

    /// Returns the integer this value truncates to.
    ///
    /// Like [`as_integral`](Self::as_integral), but finite floats are cut
    /// toward zero instead of being rejected when they have a fraction.
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn truncated_int(&self) -> Option<i64> {
        match self {
            Self::Float(f) if f.is_finite() && *f >= i64::MIN as f64 && *f < i64::MAX as f64 => {
                Some(f.trunc() as i64)
            }
            other => other.as_integral(),
        }
    }

    /// Converts this value to the [`MemberValue`] an enum constructor accepts.
    ///
    /// Strings map to string values and integral numbers to integer values.
    pub fn to_member_value(&self) -> Option<MemberValue> {
        match self {
            Self::String(s) => Some(MemberValue::Str(s.clone())),
            other => other.as_integral().map(MemberValue::Int),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_integers() {
        assert_eq!(Value::from(42_i32), Value::Int(42));
        assert_eq!(Value::from(42_i64), Value::Int(42));
    }

    #[test]
    fn test_from_member_value() {
        assert_eq!(Value::from(MemberValue::Int(3)), Value::Int(3));
        assert_eq!(
            Value::from(&MemberValue::from("r")),
            Value::String("r".into())
        );
    }

    #[test]
    fn test_from_option() {
        let some_val: Option<i64> = Some(42);
        assert_eq!(Value::from(some_val), Value::Int(42));

        let none_val: Option<i64> = None;
        assert_eq!(Value::from(none_val), Value::Null);
    }

    #[test]
    fn test_is_empty() {
        assert!(Value::Null.is_empty());
        assert!(Value::String(String::new()).is_empty());
        assert!(!Value::String(" ".into()).is_empty());
        assert!(!Value::Int(0).is_empty());
    }

    #[test]
    fn test_as_integral() {
        assert_eq!(Value::Int(7).as_integral(), Some(7));
        assert_eq!(Value::Bool(true).as_integral(), Some(1));
        assert_eq!(Value::Float(2.0).as_integral(), Some(2));
        assert_eq!(Value::Float(2.5).as_integral(), None);
        assert_eq!(Value::Float(f64::NAN).as_integral(), None);
        assert_eq!(Value::String("2".into()).as_integral(), None);
    }

    #[test]
    fn test_truncated_int() {
        assert_eq!(Value::Float(2.9).truncated_int(), Some(2));
        assert_eq!(Value::Float(-0.5).truncated_int(), Some(0));
        assert_eq!(Value::Int(7).truncated_int(), Some(7));
        assert_eq!(Value::Float(f64::INFINITY).truncated_int(), None);
        assert_eq!(Value::from("3").truncated_int(), None);
    }

    #[test]
    fn test_to_member_value() {
        assert_eq!(
            Value::String("1".into()).to_member_value(),
            Some(MemberValue::from("1"))
        );
        assert_eq!(Value::Float(1.0).to_member_value(), Some(MemberValue::Int(1)));
        assert_eq!(Value::Null.to_member_value(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Null.to_string(), "NULL");
        assert_eq!(Value::Bool(false).to_string(), "false");
        assert_eq!(Value::Float(1.5).to_string(), "1.5");
        assert_eq!(Value::String("hello".into()).to_string(), "hello");
    }

    #[test]
    fn test_serde_tagged() {
        let json = serde_json::to_string(&Value::Int(1)).unwrap();
        assert_eq!(json, r#"{"type":"Int","value":1}"#);
        let null = serde_json::to_string(&Value::Null).unwrap();
        assert_eq!(null, r#"{"type":"Null"}"#);
        let back: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Value::Int(1));
    }
}
