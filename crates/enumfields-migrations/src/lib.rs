//! # enumfields-migrations
//!
//! Migration support for enum fields. Enum types are frozen into portable
//! literal tuples for legacy migration files, fields are frozen into
//! `(path, args, kwargs)` triples through introspection rules, and field
//! descriptions are written to and read from JSON migration documents.
//!
//! ## Module Overview
//!
//! - [`literal`] - Literal-only parser and writer for frozen text
//! - [`freeze`] - `freeze`, `freeze_to_text`, `unfreeze`, `unfreeze_text`
//! - [`rules`] - Introspection rules and `field_triple`
//! - [`serializer`] - `MigrationDocument` JSON read/write

// Clippy overrides appropriate for a migration crate.
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::option_if_let_else)]

pub mod freeze;
pub mod literal;
pub mod rules;
pub mod serializer;

// Re-export key types at the crate root.
pub use freeze::{freeze, freeze_to_text, unfreeze, unfreeze_text, FrozenEnum};
pub use literal::Literal;
pub use rules::{
    add_introspection_rules, field_triple, Converter, FieldAttribute, FieldTriple,
    IntrospectionRule, KwargRule,
};
pub use serializer::{FieldOperation, MigrationDocument};
