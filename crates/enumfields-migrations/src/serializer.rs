//! Migration file serialization for enum fields.
//!
//! Migration files record enum fields as [`FieldDescription`]s inside a small
//! JSON document. Reading a file back and calling [`MigrationDocument::build_fields`]
//! rebuilds equivalent [`EnumField`]s, resolving registered enums by path and
//! recreating inline ones from their frozen members.

use std::path::{Path, PathBuf};

use enumfields_core::error::{EnumFieldError, EnumFieldResult};
use enumfields_db::fields::{EnumField, FieldDescription};
use serde::{Deserialize, Serialize};

/// A serializable migration touching enum fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MigrationDocument {
    /// The app label this migration belongs to.
    pub app_label: String,
    /// The migration name (e.g. "0001_initial").
    pub name: String,
    /// Dependencies as `[app_label, name]` pairs.
    #[serde(default)]
    pub dependencies: Vec<(String, String)>,
    /// Whether this is the initial migration for the app.
    #[serde(default)]
    pub initial: bool,
    /// The operations to apply.
    pub operations: Vec<FieldOperation>,
}

/// A single field-level migration operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FieldOperation {
    /// Add an enum field to a model.
    AddField {
        /// The model name.
        model_name: String,
        /// The field description.
        field: FieldDescription,
    },
    /// Replace an enum field's definition.
    AlterField {
        /// The model name.
        model_name: String,
        /// The new field description.
        field: FieldDescription,
    },
    /// Remove a field from a model.
    RemoveField {
        /// The model name.
        model_name: String,
        /// The field name.
        field_name: String,
    },
}

impl FieldOperation {
    /// Creates an `AddField` operation for `field`.
    pub fn add_field(model_name: impl Into<String>, field: &EnumField) -> Self {
        Self::AddField {
            model_name: model_name.into(),
            field: field.describe(),
        }
    }

    /// Creates an `AlterField` operation for `field`.
    pub fn alter_field(model_name: impl Into<String>, field: &EnumField) -> Self {
        Self::AlterField {
            model_name: model_name.into(),
            field: field.describe(),
        }
    }

    /// Creates a `RemoveField` operation.
    pub fn remove_field(model_name: impl Into<String>, field_name: impl Into<String>) -> Self {
        Self::RemoveField {
            model_name: model_name.into(),
            field_name: field_name.into(),
        }
    }

    /// Returns the model this operation applies to.
    pub fn model_name(&self) -> &str {
        match self {
            Self::AddField { model_name, .. }
            | Self::AlterField { model_name, .. }
            | Self::RemoveField { model_name, .. } => model_name,
        }
    }

    /// Returns a human-readable summary of the operation.
    pub fn describe(&self) -> String {
        match self {
            Self::AddField { model_name, field } => {
                format!("Add field {} to {model_name}", field.name)
            }
            Self::AlterField { model_name, field } => {
                format!("Alter field {} on {model_name}", field.name)
            }
            Self::RemoveField {
                model_name,
                field_name,
            } => format!("Remove field {field_name} from {model_name}"),
        }
    }
}

impl MigrationDocument {
    /// Creates an empty migration.
    pub fn new(app_label: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            app_label: app_label.into(),
            name: name.into(),
            dependencies: Vec::new(),
            initial: false,
            operations: Vec::new(),
        }
    }

    /// Appends an operation.
    #[must_use]
    pub fn operation(mut self, operation: FieldOperation) -> Self {
        self.operations.push(operation);
        self
    }

    /// Serializes this migration to a JSON string.
    pub fn to_json(&self) -> EnumFieldResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            EnumFieldError::SerializationError(format!("Failed to serialize migration: {e}"))
        })
    }

    /// Deserializes a migration from a JSON string.
    pub fn from_json(json: &str) -> EnumFieldResult<Self> {
        serde_json::from_str(json).map_err(|e| {
            EnumFieldError::SerializationError(format!("Failed to deserialize migration: {e}"))
        })
    }

    /// Writes this migration to a file at the given path.
    pub fn write_to_file(&self, path: &Path) -> EnumFieldResult<()> {
        let json = self.to_json()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                EnumFieldError::SerializationError(format!("Failed to create directory: {e}"))
            })?;
        }
        std::fs::write(path, json).map_err(|e| {
            EnumFieldError::SerializationError(format!("Failed to write migration file: {e}"))
        })?;
        tracing::info!(path = %path.display(), operations = self.operations.len(), "Wrote migration");
        Ok(())
    }

    /// Reads a migration from a file.
    pub fn read_from_file(path: &Path) -> EnumFieldResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            EnumFieldError::SerializationError(format!("Failed to read migration file: {e}"))
        })?;
        Self::from_json(&content)
    }

    /// Rebuilds the fields added or altered by this migration.
    ///
    /// Returns `(model name, field)` pairs in operation order.
    pub fn build_fields(&self) -> EnumFieldResult<Vec<(String, EnumField)>> {
        self.operations
            .iter()
            .filter_map(|op| match op {
                FieldOperation::AddField { model_name, field }
                | FieldOperation::AlterField { model_name, field } => Some((model_name, field)),
                FieldOperation::RemoveField { .. } => None,
            })
            .map(|(model_name, field)| {
                EnumField::from_description(field).map(|f| (model_name.clone(), f))
            })
            .collect()
    }
}

/// Generates a sequential migration filename such as `0002_color_field`.
///
/// Without a custom name, `auto_enum_fields` is used.
pub fn generate_migration_name(number: u32, custom_name: Option<&str>) -> String {
    format!("{number:04}_{}", custom_name.unwrap_or("auto_enum_fields"))
}

/// Determines the next migration number for an app by scanning existing files.
pub fn next_migration_number(migrations_dir: &Path, app_label: &str) -> u32 {
    let app_dir = migrations_dir.join(app_label);
    let Ok(entries) = std::fs::read_dir(&app_dir) else {
        return 1;
    };

    let max_num = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.extension().and_then(|e| e.to_str()) == Some("json"))
        .filter_map(|path| {
            // "0001_initial" -> 1
            path.file_stem()
                .and_then(|n| n.to_str())
                .and_then(|stem| stem.split('_').next())
                .and_then(|num| num.parse::<u32>().ok())
        })
        .max()
        .unwrap_or(0);

    max_num + 1
}

/// Returns the path where a migration file should be written.
pub fn migration_file_path(migrations_dir: &Path, app_label: &str, name: &str) -> PathBuf {
    migrations_dir.join(app_label).join(format!("{name}.json"))
}
