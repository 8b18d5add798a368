//! # enumfields-db
//!
//! Model fields whose values are enum members. An [`EnumField`] accepts
//! members, raw values, and the string forms of either; it stores only the
//! members' primitive values and hands members back on read.
//!
//! ## Module Overview
//!
//! - [`fields`] - [`EnumField`], its builder, and the [`FieldAdapter`] seam
//! - [`value`] - The backend-agnostic [`Value`](value::Value) enum
//!
//! ## Example
//!
//! ```
//! use enumfields_core::enums::EnumType;
//! use enumfields_db::{EnumField, Value};
//!
//! let priority = EnumType::builder("app.models", "Priority")
//!     .member("LOW", 1)
//!     .member("HIGH", 2)
//!     .build()
//!     .unwrap();
//!
//! let field = EnumField::integer("priority", &priority).build().unwrap();
//! assert_eq!(field.get_prep_value("2").unwrap(), Value::Int(2));
//! assert_eq!(field.to_python(1_i64).unwrap(), priority.member("LOW"));
//! ```

// These clippy lints are intentionally allowed for the fields crate:
// - struct_excessive_bools: FieldDef and FieldDescription mirror the host field options
// - module_name_repetitions: EnumField lives in fields::enum_field
// - doc_markdown: backtick requirements for documentation items are too strict
// - needless_pass_by_value: builder setters take owned values
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::option_if_let_else)]

pub mod fields;
pub mod value;

pub use fields::{
    EnumField, EnumFieldBuilder, EnumReference, EnumSource, FieldAdapter, FieldDef,
    FieldDescription, FieldType, FieldValue, StorageKind,
};
pub use value::Value;
