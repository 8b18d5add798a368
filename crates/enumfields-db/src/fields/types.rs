//! Host field definitions.
//!
//! [`FieldDef`] is the plain description of a model column that the rest of
//! the ORM consumes (schema generation, admin listing). Enum fields lower
//! themselves into one through
//! [`EnumField::to_field_def`](crate::fields::EnumField::to_field_def), so
//! everything downstream only ever sees primitive columns.

use crate::value::Value;

/// The storage type of a model column.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type")]
pub enum FieldType {
    /// Variable-length string with a max length.
    CharField,
    /// 32-bit signed integer.
    IntegerField,
}

impl FieldType {
    /// Returns the SQL column type, given the field's `max_length`.
    pub fn column_type(&self, max_length: Option<usize>) -> String {
        match (self, max_length) {
            (Self::CharField, Some(n)) => format!("VARCHAR({n})"),
            (Self::CharField, None) => "VARCHAR".to_string(),
            (Self::IntegerField, _) => "INTEGER".to_string(),
        }
    }
}

/// Complete definition of a model column.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    /// The attribute name of this field.
    pub name: String,
    /// The database column name (may differ from `name`).
    pub column: String,
    /// The storage type of this field.
    pub field_type: FieldType,
    /// Whether NULL is allowed in the database.
    pub null: bool,
    /// Whether the field may be left blank in forms.
    pub blank: bool,
    /// Default value written for new rows.
    pub default: Option<Value>,
    /// Whether a UNIQUE constraint is applied.
    pub unique: bool,
    /// Whether a database index should be created.
    pub db_index: bool,
    /// Maximum character length (for `CharField`).
    pub max_length: Option<usize>,
    /// Human-readable help text.
    pub help_text: String,
    /// Human-readable name for the field.
    pub verbose_name: String,
    /// Allowed values as (value, display_label) pairs.
    pub choices: Option<Vec<(Value, String)>>,
}

impl FieldDef {
    /// Creates a new `FieldDef` with sensible defaults.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        let name = name.into();
        Self {
            column: name.clone(),
            verbose_name: name.replace('_', " "),
            name,
            field_type,
            null: false,
            blank: false,
            default: None,
            unique: false,
            db_index: false,
            max_length: None,
            help_text: String::new(),
            choices: None,
        }
    }

    /// Returns the SQL column type of this field.
    pub fn db_type(&self) -> String {
        self.field_type.column_type(self.max_length)
    }

    /// Returns the storage values this field accepts, if it is choice-constrained.
    pub fn choice_values(&self) -> Option<Vec<&Value>> {
        self.choices
            .as_ref()
            .map(|choices| choices.iter().map(|(value, _)| value).collect())
    }
}
