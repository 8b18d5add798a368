//! Reconstructable field descriptions.
//!
//! [`FieldDescription`] is what an enum field reports to the migration
//! framework: enough configuration to rebuild an equivalent field later,
//! without holding on to live enum types. It is plain data and serializes
//! with serde.

use std::sync::Arc;

use enumfields_core::enums::{EnumType, MemberValue};
use enumfields_core::error::EnumFieldResult;
use enumfields_core::registry::resolve_enum;
use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Path recorded for text-backed enum fields.
pub const ENUM_FIELD_PATH: &str = "enumfields.fields.EnumField";

/// Path recorded for integer-backed enum fields.
pub const ENUM_INTEGER_FIELD_PATH: &str = "enumfields.fields.EnumIntegerField";

/// How a description refers to its enum type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EnumReference {
    /// A dotted path resolved through the enum registry.
    Path {
        /// The qualified `module.Name` path.
        path: String,
    },
    /// The enum's members spelled out, for types that are not registered.
    Inline {
        /// Module the type was defined in.
        module: String,
        /// Type name.
        name: String,
        /// Ordered `(member name, value)` pairs.
        members: Vec<(String, MemberValue)>,
    },
}

impl EnumReference {
    /// Builds a path reference.
    pub fn path(path: impl Into<String>) -> Self {
        Self::Path { path: path.into() }
    }

    /// Builds an inline reference carrying `enum_type`'s members.
    pub fn inline(enum_type: &EnumType) -> Self {
        Self::Inline {
            module: enum_type.module().to_string(),
            name: enum_type.name().to_string(),
            members: enum_type.pairs(),
        }
    }

    /// Resolves this reference into an enum type.
    ///
    /// Paths go through the registry; inline members build a new, distinct type.
    pub fn resolve(&self) -> EnumFieldResult<Arc<EnumType>> {
        match self {
            Self::Path { path } => resolve_enum(path),
            Self::Inline {
                module,
                name,
                members,
            } => EnumType::from_parts(module.clone(), name.clone(), members.iter().cloned()),
        }
    }
}

/// Everything needed to rebuild an enum field.
///
/// `default` distinguishes "no default" (`None`) from an explicit null default
/// (`Some(Value::Null)`). Members are recorded by their value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescription {
    /// The attribute name of the field.
    pub name: String,
    /// Which field variant to rebuild.
    pub path: String,
    /// The bound enum type.
    #[serde(rename = "enum")]
    pub enum_ref: EnumReference,
    /// The configured default, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Maximum length of text-backed fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    /// Whether NULL is allowed.
    #[serde(default)]
    pub null: bool,
    /// Whether blank form input is allowed.
    #[serde(default)]
    pub blank: bool,
    /// Whether a UNIQUE constraint is applied.
    #[serde(default)]
    pub unique: bool,
    /// Whether a database index is created.
    #[serde(default)]
    pub db_index: bool,
    /// Explicit human-readable name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verbose_name: Option<String>,
    /// Explicit help text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
    /// Explicit column name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_column: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_reference_resolves_to_new_type() {
        let color = EnumType::builder("tests", "Color")
            .member("RED", "r")
            .build()
            .unwrap();
        let reference = EnumReference::inline(&color);
        let rebuilt = reference.resolve().unwrap();
        assert!(rebuilt.same_members(&color));
        assert!(!rebuilt.is_same(&color));
        assert_eq!(rebuilt.qualified_name(), "tests.Color");
    }

    #[test]
    fn test_unknown_path_fails() {
        assert!(EnumReference::path("nowhere.Nothing").resolve().is_err());
    }

    #[test]
    fn test_reference_serde_shape() {
        let reference = EnumReference::Inline {
            module: "m".into(),
            name: "N".into(),
            members: vec![("A".into(), MemberValue::Int(1))],
        };
        let json = serde_json::to_value(&reference).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"kind": "inline", "module": "m", "name": "N", "members": [["A", 1]]})
        );
        let path = serde_json::to_value(EnumReference::path("a.B")).unwrap();
        assert_eq!(path, serde_json::json!({"kind": "path", "path": "a.B"}));
    }

    #[test]
    fn test_description_defaults_when_deserializing() {
        let json = r#"{"name": "color", "path": "enumfields.fields.EnumField",
                       "enum": {"kind": "path", "path": "a.Color"}}"#;
        let desc: FieldDescription = serde_json::from_str(json).unwrap();
        assert_eq!(desc.default, None);
        assert!(!desc.null);
        assert!(desc.max_length.is_none());
    }

    #[test]
    fn test_explicit_null_default_survives_serde() {
        let desc = FieldDescription {
            name: "color".into(),
            path: ENUM_FIELD_PATH.into(),
            enum_ref: EnumReference::path("a.Color"),
            default: Some(Value::Null),
            max_length: Some(10),
            null: true,
            blank: false,
            unique: false,
            db_index: false,
            verbose_name: None,
            help_text: None,
            db_column: None,
        };
        let json = serde_json::to_string(&desc).unwrap();
        let back: FieldDescription = serde_json::from_str(&json).unwrap();
        assert_eq!(back, desc);
    }
}
