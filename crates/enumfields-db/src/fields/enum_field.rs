//! Enum-backed model fields.
//!
//! An [`EnumField`] binds one enum type to one column. Application code works
//! with [`EnumMember`]s; the database only ever sees the members' primitive
//! values. Two storage variants exist, mirroring the two host column types
//! they wrap: text-backed ([`StorageKind::Char`]) and integer-backed
//! ([`StorageKind::Integer`]).
//!
//! # Examples
//!
//! ```
//! use enumfields_core::enums::EnumType;
//! use enumfields_db::fields::EnumField;
//! use enumfields_db::value::Value;
//!
//! let color = EnumType::builder("tests.test_enums", "Color")
//!     .member("RED", "r")
//!     .member("GREEN", "g")
//!     .build()
//!     .unwrap();
//!
//! let field = EnumField::char("color", color.clone()).build().unwrap();
//! let red = field.to_python("r").unwrap().unwrap();
//! assert_eq!(red, color.member("RED").unwrap());
//! assert_eq!(field.get_prep_value(&red).unwrap(), Value::from("r"));
//! assert!(field.to_python("").unwrap().is_none());
//! ```

use std::sync::Arc;

use enumfields_core::enums::{EnumMember, EnumType, MemberValue};
use enumfields_core::error::{EnumFieldError, EnumFieldResult, ValidationError};
use enumfields_core::registry;
use enumfields_core::settings::SETTINGS;

use super::description::{
    EnumReference, FieldDescription, ENUM_FIELD_PATH, ENUM_INTEGER_FIELD_PATH,
};
use super::input::FieldValue;
use super::mapping::ValueMap;
use super::types::{FieldDef, FieldType};
use crate::value::Value;

/// How an enum field stores its members.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    /// Fixed-length text column.
    Char {
        /// Maximum stored length.
        max_length: usize,
    },
    /// Integer column.
    Integer,
}

/// Where a field gets its enum type from.
#[derive(Debug, Clone)]
pub enum EnumSource {
    /// A live enum type.
    Type(Arc<EnumType>),
    /// A reference resolved at construction time.
    Reference(EnumReference),
}

impl EnumSource {
    fn resolve(self) -> EnumFieldResult<Arc<EnumType>> {
        match self {
            Self::Type(enum_type) => Ok(enum_type),
            Self::Reference(reference) => reference.resolve(),
        }
    }
}

impl From<Arc<EnumType>> for EnumSource {
    fn from(enum_type: Arc<EnumType>) -> Self {
        Self::Type(enum_type)
    }
}

impl From<&Arc<EnumType>> for EnumSource {
    fn from(enum_type: &Arc<EnumType>) -> Self {
        Self::Type(Arc::clone(enum_type))
    }
}

impl From<&str> for EnumSource {
    fn from(path: &str) -> Self {
        Self::Reference(EnumReference::path(path))
    }
}

impl From<EnumReference> for EnumSource {
    fn from(reference: EnumReference) -> Self {
        Self::Reference(reference)
    }
}

/// The fixed capability surface of an enum field adapter.
///
/// This is the seam form fields and migration tooling talk to.
pub trait FieldAdapter: Send + Sync {
    /// Resolves a raw value into a member (`to_python`).
    fn coerce(&self, value: FieldValue) -> EnumFieldResult<Option<EnumMember>>;

    /// Converts a member or raw value into its storage value (`get_prep_value`).
    fn serialize(&self, value: FieldValue) -> EnumFieldResult<Value>;

    /// Returns the selectable `(storage value, label)` pairs.
    fn choices(&self, include_blank: bool) -> Vec<(Value, String)>;

    /// Returns a reconstructable description of the field (`deconstruct`).
    fn describe(&self) -> FieldDescription;
}

#[derive(Debug, Clone, Default)]
struct FieldOptions {
    verbose_name: Option<String>,
    help_text: Option<String>,
    null: bool,
    blank: bool,
    unique: bool,
    db_index: bool,
    default: Option<FieldValue>,
    max_length: Option<usize>,
    db_column: Option<String>,
    choices: Option<Vec<(MemberValue, String)>>,
}

/// Builder for [`EnumField`], returned by [`EnumField::char`] and [`EnumField::integer`].
#[derive(Debug, Clone)]
pub struct EnumFieldBuilder {
    name: String,
    source: EnumSource,
    integer: bool,
    options: FieldOptions,
}

impl EnumFieldBuilder {
    /// Sets the maximum stored length (text-backed fields only).
    #[must_use]
    pub const fn max_length(mut self, max_length: usize) -> Self {
        self.options.max_length = Some(max_length);
        self
    }

    /// Allows NULL in the column.
    #[must_use]
    pub const fn nullable(mut self) -> Self {
        self.options.null = true;
        self
    }

    /// Allows blank form input.
    #[must_use]
    pub const fn blank(mut self) -> Self {
        self.options.blank = true;
        self
    }

    /// Adds a UNIQUE constraint.
    #[must_use]
    pub const fn unique(mut self) -> Self {
        self.options.unique = true;
        self
    }

    /// Requests a database index.
    #[must_use]
    pub const fn db_index(mut self) -> Self {
        self.options.db_index = true;
        self
    }

    /// Sets the default: a member, a raw value, or `None::<EnumMember>` for null.
    #[must_use]
    pub fn default(mut self, value: impl Into<FieldValue>) -> Self {
        self.options.default = Some(value.into());
        self
    }

    /// Sets the human-readable name.
    #[must_use]
    pub fn verbose_name(mut self, name: impl Into<String>) -> Self {
        self.options.verbose_name = Some(name.into());
        self
    }

    /// Sets the help text.
    #[must_use]
    pub fn help_text(mut self, text: impl Into<String>) -> Self {
        self.options.help_text = Some(text.into());
        self
    }

    /// Sets the column name.
    #[must_use]
    pub fn db_column(mut self, column: impl Into<String>) -> Self {
        self.options.db_column = Some(column.into());
        self
    }

    /// Replaces the derived choices with an explicit list.
    #[must_use]
    pub fn choices(mut self, choices: Vec<(MemberValue, String)>) -> Self {
        self.options.choices = Some(choices);
        self
    }

    /// Resolves the enum and finishes the field.
    pub fn build(self) -> EnumFieldResult<EnumField> {
        let _span = enumfields_core::logging::field_span(&self.name).entered();
        let enum_type = self.source.resolve()?;

        let storage = if self.integer {
            if self.options.max_length.is_some() {
                return Err(EnumFieldError::ImproperlyConfigured(format!(
                    "Integer enum field '{}' does not take max_length",
                    self.name
                )));
            }
            if !enum_type.is_integer_valued() {
                return Err(EnumFieldError::ImproperlyConfigured(format!(
                    "Enum {} has non-integer values and cannot back integer field '{}'",
                    enum_type.qualified_name(),
                    self.name
                )));
            }
            StorageKind::Integer
        } else {
            let max_length = self
                .options
                .max_length
                .unwrap_or_else(|| SETTINGS.get().default_max_length);
            let too_long = enum_type
                .pairs()
                .into_iter()
                .map(|(_, value)| value.to_string())
                .find(|value| value.chars().count() > max_length);
            if let Some(value) = too_long {
                tracing::warn!(
                    field = %self.name,
                    max_length,
                    value = %value,
                    "Enum value is longer than the column's max_length"
                );
            }
            StorageKind::Char { max_length }
        };

        let choices = self.options.choices.as_ref().map_or_else(
            || {
                enum_type
                    .members()
                    .map(|m| (Value::from(m.value()), m.label().into_owned()))
                    .collect()
            },
            |explicit| {
                explicit
                    .iter()
                    .map(|(value, label)| (Value::from(value), label.clone()))
                    .collect()
            },
        );

        tracing::debug!(
            field = %self.name,
            enum_name = %enum_type.qualified_name(),
            storage = ?storage,
            "Constructed enum field"
        );

        Ok(EnumField {
            map: ValueMap::new(Arc::clone(&enum_type)),
            name: self.name,
            enum_type,
            storage,
            choices,
            options: self.options,
        })
    }
}

/// A model field whose values are members of one enum type.
#[derive(Debug, Clone)]
pub struct EnumField {
    name: String,
    enum_type: Arc<EnumType>,
    map: ValueMap,
    storage: StorageKind,
    choices: Vec<(Value, String)>,
    options: FieldOptions,
}

impl EnumField {
    /// Starts a text-backed enum field.
    pub fn char(name: impl Into<String>, source: impl Into<EnumSource>) -> EnumFieldBuilder {
        EnumFieldBuilder {
            name: name.into(),
            source: source.into(),
            integer: false,
            options: FieldOptions::default(),
        }
    }

    /// Starts an integer-backed enum field.
    pub fn integer(name: impl Into<String>, source: impl Into<EnumSource>) -> EnumFieldBuilder {
        EnumFieldBuilder {
            name: name.into(),
            source: source.into(),
            integer: true,
            options: FieldOptions::default(),
        }
    }

    /// Rebuilds a field from a description produced by [`EnumField::describe`].
    pub fn from_description(description: &FieldDescription) -> EnumFieldResult<Self> {
        let source = EnumSource::Reference(description.enum_ref.clone());
        let mut builder = match description.path.as_str() {
            ENUM_FIELD_PATH => Self::char(description.name.clone(), source),
            ENUM_INTEGER_FIELD_PATH => Self::integer(description.name.clone(), source),
            other => {
                return Err(EnumFieldError::ImproperlyConfigured(format!(
                    "'{other}' is not an enum field path"
                )))
            }
        };
        builder.options = FieldOptions {
            verbose_name: description.verbose_name.clone(),
            help_text: description.help_text.clone(),
            null: description.null,
            blank: description.blank,
            unique: description.unique,
            db_index: description.db_index,
            default: description.default.clone().map(FieldValue::Raw),
            max_length: description.max_length,
            db_column: description.db_column.clone(),
            choices: None,
        };
        builder.build()
    }

    // ── Attributes ──────────────────────────────────────────────────

    /// Returns the attribute name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the bound enum type.
    pub const fn enum_type(&self) -> &Arc<EnumType> {
        &self.enum_type
    }

    /// Returns the storage variant.
    pub const fn storage(&self) -> StorageKind {
        self.storage
    }

    /// Returns the maximum stored length of text-backed fields.
    pub const fn max_length(&self) -> Option<usize> {
        match self.storage {
            StorageKind::Char { max_length } => Some(max_length),
            StorageKind::Integer => None,
        }
    }

    /// Returns `true` if the column allows NULL.
    pub const fn null(&self) -> bool {
        self.options.null
    }

    /// Returns `true` if blank form input is allowed.
    pub const fn blank(&self) -> bool {
        self.options.blank
    }

    /// Returns the human-readable name.
    pub fn verbose_name(&self) -> String {
        self.options
            .verbose_name
            .clone()
            .unwrap_or_else(|| self.name.replace('_', " "))
    }

    /// Returns the help text.
    pub fn help_text(&self) -> &str {
        self.options.help_text.as_deref().unwrap_or("")
    }

    /// Returns the column name.
    pub fn column(&self) -> &str {
        self.options.db_column.as_deref().unwrap_or(&self.name)
    }

    // ── Reading ─────────────────────────────────────────────────────

    /// Resolves a raw value into a member.
    ///
    /// `Null` and `""` give `None`. Members of the bound type come back
    /// unchanged; anything else must match a member value, the string form of
    /// a value or member, or a member's label, or the call fails with
    /// [`EnumFieldError::InvalidEnumValue`].
    pub fn to_python(&self, value: impl Into<FieldValue>) -> EnumFieldResult<Option<EnumMember>> {
        let value = value.into();
        if value.is_empty() {
            return Ok(None);
        }
        self.map.lookup(&value).map(Some).ok_or_else(|| {
            tracing::trace!(field = %self.name, value = %value, "No enum member matches value");
            self.invalid(&value)
        })
    }

    /// Converts a value read from the column into a member.
    pub fn from_db_value(&self, value: &Value) -> EnumFieldResult<Option<EnumMember>> {
        self.to_python(value)
    }

    // ── Writing ─────────────────────────────────────────────────────

    /// Converts a member (or anything coercible to one) into its storage value.
    ///
    /// Integer-backed fields accept integers directly, truncate floats toward
    /// zero, parse integer strings, and only fall back to coercion for other
    /// inputs.
    pub fn get_prep_value(&self, value: impl Into<FieldValue>) -> EnumFieldResult<Value> {
        let value = value.into();
        match (&value, self.storage) {
            (FieldValue::Raw(Value::Null), _) => Ok(Value::Null),
            (FieldValue::Member(m), _) if m.belongs_to(&self.enum_type) => Ok(m.value().into()),
            (FieldValue::Raw(raw), StorageKind::Integer) => {
                if let Some(i) = raw.truncated_int() {
                    return Ok(Value::Int(i));
                }
                if let Some(i) = raw.as_str().and_then(|s| s.trim().parse::<i64>().ok()) {
                    return Ok(Value::Int(i));
                }
                self.coerce_to_storage(&value)
            }
            _ => self.coerce_to_storage(&value),
        }
    }

    fn coerce_to_storage(&self, value: &FieldValue) -> EnumFieldResult<Value> {
        self.map
            .lookup(value)
            .map(|m| m.value().into())
            .ok_or_else(|| self.invalid(value))
    }

    /// Renders a member for data dumps, keeping integers as integers.
    pub fn value_to_string(&self, value: Option<&EnumMember>) -> Value {
        value.map_or(Value::Null, |m| m.value().into())
    }

    // ── Defaults ────────────────────────────────────────────────────

    /// Returns the configured default as given, before resolution.
    pub const fn default_value(&self) -> Option<&FieldValue> {
        self.options.default.as_ref()
    }

    /// Returns `true` if a default was configured.
    pub const fn has_default(&self) -> bool {
        self.options.default.is_some()
    }

    /// Resolves the default member for new instances.
    ///
    /// Without a configured default the host behavior applies: text columns
    /// that are not nullable default to `""`, everything else to null, and
    /// both mean "no member". A configured raw default must be an exact member
    /// value; string forms are not accepted here.
    pub fn get_default(&self) -> EnumFieldResult<Option<EnumMember>> {
        match &self.options.default {
            None => self.to_python(self.host_default()),
            Some(FieldValue::Member(m)) => Ok(Some(m.clone())),
            Some(FieldValue::Raw(Value::Null)) => Ok(None),
            Some(FieldValue::Raw(raw)) => raw
                .to_member_value()
                .and_then(|v| self.enum_type.from_value(&v))
                .map(Some)
                .ok_or_else(|| EnumFieldError::InvalidDefaultConversion {
                    value: raw.to_string(),
                    enum_name: self.enum_type.qualified_name(),
                }),
        }
    }

    fn host_default(&self) -> Value {
        match self.storage {
            StorageKind::Char { .. } if !self.options.null => Value::String(String::new()),
            _ => Value::Null,
        }
    }

    // ── Choices ─────────────────────────────────────────────────────

    /// Returns the `(storage value, label)` pairs in declaration order.
    pub fn flatchoices(&self) -> &[(Value, String)] {
        &self.choices
    }

    /// Returns the choices, optionally prefixed with a blank placeholder.
    ///
    /// The placeholder defaults to `("", settings.blank_choice_label)` and is
    /// only added when no choice already has an empty value.
    pub fn get_choices(
        &self,
        include_blank: bool,
        blank_choice: Option<(Value, String)>,
    ) -> Vec<(Value, String)> {
        let blank_defined = self.choices.iter().any(|(value, _)| value.is_empty());
        let mut choices = Vec::with_capacity(self.choices.len() + 1);
        if include_blank && !blank_defined {
            choices.push(blank_choice.unwrap_or_else(|| {
                (
                    Value::String(String::new()),
                    SETTINGS.get().blank_choice_label.clone(),
                )
            }));
        }
        choices.extend(self.choices.iter().cloned());
        choices
    }

    // ── Validation ──────────────────────────────────────────────────

    /// Checks a resolved value against the field's null/blank/choices rules.
    pub fn validate(&self, value: Option<&EnumMember>) -> Result<(), ValidationError> {
        let Some(member) = value else {
            if !self.options.null {
                return Err(ValidationError::new("This field cannot be null.", "null"));
            }
            if !self.options.blank {
                return Err(ValidationError::new("This field cannot be blank.", "blank"));
            }
            return Ok(());
        };

        let stored = Value::from(member.value());
        let offered = member.belongs_to(&self.enum_type)
            && self.choices.iter().any(|(value, _)| *value == stored);
        if offered {
            Ok(())
        } else {
            Err(ValidationError::new(
                format!("Value {member} is not a valid choice."),
                enumfields_core::error::INVALID_CHOICE,
            )
            .with_param("value", member.to_string()))
        }
    }

    /// Coerces and validates a raw value, as the host's model validation does.
    pub fn clean(&self, value: impl Into<FieldValue>) -> Result<Option<EnumMember>, ValidationError> {
        let member = self
            .to_python(value)
            .map_err(|e| e.to_validation_error())?;
        self.validate(member.as_ref())?;
        Ok(member)
    }

    // ── Host integration ────────────────────────────────────────────

    /// Lowers this field into the host's primitive column definition.
    pub fn to_field_def(&self) -> FieldDef {
        let field_type = match self.storage {
            StorageKind::Char { .. } => FieldType::CharField,
            StorageKind::Integer => FieldType::IntegerField,
        };
        let mut def = FieldDef::new(self.name.clone(), field_type);
        def.column = self.column().to_string();
        def.null = self.options.null;
        def.blank = self.options.blank;
        def.unique = self.options.unique;
        def.db_index = self.options.db_index;
        def.max_length = self.max_length();
        def.verbose_name = self.verbose_name();
        def.help_text = self.help_text().to_string();
        def.default = self.described_default();
        def.choices = Some(self.choices.clone());
        def
    }

    /// Describes this field so it can be rebuilt later.
    ///
    /// Registered enum types are referenced by path; others are spelled out.
    /// Member defaults are recorded by value and explicit choices are dropped.
    pub fn describe(&self) -> FieldDescription {
        let enum_ref = if registry::is_registered(&self.enum_type) {
            EnumReference::path(self.enum_type.qualified_name())
        } else {
            EnumReference::inline(&self.enum_type)
        };
        FieldDescription {
            name: self.name.clone(),
            path: match self.storage {
                StorageKind::Char { .. } => ENUM_FIELD_PATH,
                StorageKind::Integer => ENUM_INTEGER_FIELD_PATH,
            }
            .to_string(),
            enum_ref,
            default: self.described_default(),
            max_length: self.max_length(),
            null: self.options.null,
            blank: self.options.blank,
            unique: self.options.unique,
            db_index: self.options.db_index,
            verbose_name: self.options.verbose_name.clone(),
            help_text: self.options.help_text.clone(),
            db_column: self.options.db_column.clone(),
        }
    }

    fn described_default(&self) -> Option<Value> {
        self.options.default.as_ref().map(|default| match default {
            FieldValue::Member(m) => m.value().into(),
            FieldValue::Raw(raw) => raw.clone(),
        })
    }

    fn invalid(&self, value: &FieldValue) -> EnumFieldError {
        EnumFieldError::InvalidEnumValue {
            value: value.to_string(),
            enum_name: self.enum_type.qualified_name(),
        }
    }
}

impl FieldAdapter for EnumField {
    fn coerce(&self, value: FieldValue) -> EnumFieldResult<Option<EnumMember>> {
        self.to_python(value)
    }

    fn serialize(&self, value: FieldValue) -> EnumFieldResult<Value> {
        self.get_prep_value(value)
    }

    fn choices(&self, include_blank: bool) -> Vec<(Value, String)> {
        self.get_choices(include_blank, None)
    }

    fn describe(&self) -> FieldDescription {
        Self::describe(self)
    }
}
