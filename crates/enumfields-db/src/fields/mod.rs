//! Enum-backed model fields.
//!
//! This module provides [`EnumField`], which binds an enum type to a column,
//! along with the pieces it is built from: the [`ValueMap`] used for coercion,
//! the [`FieldDescription`] it reports to migrations, and the primitive
//! [`FieldDef`] it lowers into for the rest of the ORM.

pub mod description;
pub mod enum_field;
pub mod input;
pub mod mapping;
pub mod types;

pub use description::{EnumReference, FieldDescription, ENUM_FIELD_PATH, ENUM_INTEGER_FIELD_PATH};
pub use enum_field::{EnumField, EnumFieldBuilder, EnumSource, FieldAdapter, StorageKind};
pub use input::FieldValue;
pub use mapping::ValueMap;
pub use types::{FieldDef, FieldType};
