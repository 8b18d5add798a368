//! Error types for enumfields.
//!
//! [`EnumFieldError`] covers every failure the field adapter, the freeze
//! serializer, and the configuration layer can produce. Coercion failures are
//! surfaced to the host's per-field validation step as a [`ValidationError`]
//! through [`EnumFieldError::to_validation_error`].

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

/// Validation code attached to coercion failures.
pub const INVALID_ENUM_VALUE: &str = "invalid_enum_value";

/// Validation code attached to form choices that are not offered.
pub const INVALID_CHOICE: &str = "invalid_choice";

/// Validation code for missing required input.
pub const REQUIRED: &str = "required";

/// A field-level validation error, as the host's validation flow expects it.
///
/// # Examples
///
/// ```
/// use enumfields_core::error::ValidationError;
///
/// let err = ValidationError::new("This field is required.", "required");
/// assert_eq!(err.code, "required");
/// assert_eq!(err.to_string(), "This field is required.");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The human-readable message.
    pub message: String,
    /// A short code identifying the failure (e.g. "invalid_enum_value").
    pub code: String,
    /// Parameters giving context for the message.
    pub params: HashMap<String, String>,
}

impl ValidationError {
    /// Creates a new `ValidationError` with a message and code.
    pub fn new(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
            params: HashMap::new(),
        }
    }

    /// Adds a parameter to this validation error.
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ValidationError {}

/// The error type for enumfields.
#[derive(Error, Debug)]
pub enum EnumFieldError {
    // ── Coercion ─────────────────────────────────────────────────────

    /// A raw value matched no member of the enum by any accepted representation.
    #[error("{value} is not a valid value for enum {enum_name}")]
    InvalidEnumValue {
        /// The offending raw value, rendered as text.
        value: String,
        /// The qualified name of the enum type.
        enum_name: String,
    },

    /// A configured default could not be constructed into the enum type.
    #[error("Default {value} cannot be converted to enum {enum_name}")]
    InvalidDefaultConversion {
        /// The configured default, rendered as text.
        value: String,
        /// The qualified name of the enum type.
        enum_name: String,
    },

    // ── Enum types ───────────────────────────────────────────────────

    /// An enum type was declared with a repeated member name or value.
    #[error("Enum {enum_name} declares duplicate member {member}")]
    DuplicateMember {
        /// The qualified name of the enum type.
        enum_name: String,
        /// The member name or value that repeats.
        member: String,
    },

    /// A dotted enum path is not present in the enum registry.
    #[error("Unknown enum: {0}")]
    UnknownEnum(String),

    // ── Freeze / unfreeze ────────────────────────────────────────────

    /// A frozen enum tuple has the wrong shape.
    #[error("Malformed frozen enum: {0}")]
    MalformedFreezeTuple(String),

    /// Frozen enum text is not a valid literal expression.
    #[error("Literal syntax error at offset {position}: {message}")]
    LiteralSyntax {
        /// Byte offset of the failure in the input.
        position: usize,
        /// What went wrong.
        message: String,
    },

    // ── Configuration ────────────────────────────────────────────────

    /// A field was constructed with options that cannot work together.
    #[error("Improperly configured: {0}")]
    ImproperlyConfigured(String),

    /// A settings file or value is missing or invalid.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    // ── Serialization ────────────────────────────────────────────────

    /// Migration documents could not be read or written.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // ── Validation ───────────────────────────────────────────────────

    /// Form input failed validation.
    #[error("Validation error: {0}")]
    ValidationError(ValidationError),
}

impl EnumFieldError {
    /// Converts this error into a host validation error.
    ///
    /// Coercion failures keep the `invalid_enum_value` code so callers can
    /// tell them apart from other validation failures.
    pub fn to_validation_error(&self) -> ValidationError {
        match self {
            Self::InvalidEnumValue { value, enum_name } => {
                ValidationError::new(self.to_string(), INVALID_ENUM_VALUE)
                    .with_param("value", value.clone())
                    .with_param("enum", enum_name.clone())
            }
            Self::InvalidDefaultConversion { value, enum_name } => {
                ValidationError::new(self.to_string(), "invalid_default")
                    .with_param("value", value.clone())
                    .with_param("enum", enum_name.clone())
            }
            Self::ValidationError(inner) => inner.clone(),
            other => ValidationError::new(other.to_string(), "invalid"),
        }
    }

    /// Returns the validation code this error maps to.
    pub fn code(&self) -> String {
        self.to_validation_error().code
    }
}

impl From<ValidationError> for EnumFieldError {
    fn from(err: ValidationError) -> Self {
        Self::ValidationError(err)
    }
}

/// A convenience type alias for `Result<T, EnumFieldError>`.
pub type EnumFieldResult<T> = Result<T, EnumFieldError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_enum_value_display() {
        let err = EnumFieldError::InvalidEnumValue {
            value: "invalid".into(),
            enum_name: "tests.Color".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid is not a valid value for enum tests.Color"
        );
    }

    #[test]
    fn test_invalid_enum_value_code() {
        let err = EnumFieldError::InvalidEnumValue {
            value: "x".into(),
            enum_name: "Color".into(),
        };
        let ve = err.to_validation_error();
        assert_eq!(ve.code, INVALID_ENUM_VALUE);
        assert_eq!(ve.params.get("value").map(String::as_str), Some("x"));
        assert_eq!(ve.params.get("enum").map(String::as_str), Some("Color"));
    }

    #[test]
    fn test_validation_error_passes_through() {
        let err: EnumFieldError = ValidationError::new("Required.", REQUIRED).into();
        assert_eq!(err.code(), REQUIRED);
    }

    #[test]
    fn test_other_errors_map_to_invalid() {
        let err = EnumFieldError::UnknownEnum("app.Missing".into());
        assert_eq!(err.code(), "invalid");
        assert!(err.to_string().contains("app.Missing"));
    }

    #[test]
    fn test_literal_syntax_display() {
        let err = EnumFieldError::LiteralSyntax {
            position: 4,
            message: "unexpected character".into(),
        };
        assert_eq!(
            err.to_string(),
            "Literal syntax error at offset 4: unexpected character"
        );
    }
}
