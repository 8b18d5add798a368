//! # enumfields
//!
//! Enum-backed model fields for django-rs.
//!
//! This is the meta-crate that re-exports all sub-crates for convenient access.
//! You can depend on `enumfields` to get everything, or depend on individual
//! crates for finer-grained control. Code generated by `#[derive(DjangoEnum)]`
//! refers to `::enumfields_core`, so crates using the derive also need a
//! direct `enumfields-core` dependency.
//!
//! ```
//! # #[cfg(feature = "db")]
//! # {
//! use enumfields::prelude::*;
//!
//! let color = EnumType::builder("shop.models", "Color")
//!     .member("RED", "r")
//!     .member("GREEN", "g")
//!     .build()
//!     .unwrap();
//! let field = EnumField::char("color", &color).build().unwrap();
//!
//! let red = field.to_python("r").unwrap().unwrap();
//! assert_eq!(red.to_string(), "Color.RED");
//! assert_eq!(field.get_prep_value(&red).unwrap(), Value::from("r"));
//! # }
//! ```

/// Enum type model, registry, settings, logging, and error types.
pub use enumfields_core as core;

/// `#[derive(DjangoEnum)]`.
#[cfg(feature = "macros")]
pub use enumfields_macros as macros;

/// Enum model fields, field descriptions, and storage values.
#[cfg(feature = "db")]
pub use enumfields_db as db;

/// Enum choice form fields and widgets.
#[cfg(feature = "forms")]
pub use enumfields_forms as forms;

/// Freeze/unfreeze, introspection rules, and migration files.
#[cfg(feature = "migrations")]
pub use enumfields_migrations as migrations;

// ── Third-party re-exports ──────────────────────────────────────────

/// Serialization of values, descriptions, and settings.
pub use serde;
/// JSON encoding for migration documents and settings files.
pub use serde_json;
/// Logging macros used by every crate in the workspace.
pub use tracing;
/// Subscriber setup, for applications not using
/// [`setup_logging`](enumfields_core::logging::setup_logging).
pub use tracing_subscriber;

/// The most commonly used types in one import.
pub mod prelude {
    pub use enumfields_core::{
        DjangoEnum, EnumFieldError, EnumFieldResult, EnumMember, EnumType, MemberValue,
        ValidationError, SETTINGS,
    };

    #[cfg(feature = "macros")]
    pub use enumfields_macros::DjangoEnum;

    #[cfg(feature = "db")]
    pub use enumfields_db::{EnumField, FieldAdapter, FieldValue, StorageKind, Value};

    #[cfg(feature = "forms")]
    pub use enumfields_forms::{formfield, EnumChoiceField};

    #[cfg(feature = "migrations")]
    pub use enumfields_migrations::{freeze, freeze_to_text, unfreeze, unfreeze_text};
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_core_needs_no_features() {
        let color = crate::core::EnumType::builder("shop.models", "Color")
            .member("RED", "r")
            .build()
            .unwrap();
        assert_eq!(color.qualified_name(), "shop.models.Color");
    }

    #[test]
    fn test_third_party_reexports() {
        let doc = crate::serde_json::json!({ "enum": "shop.models.Color" });
        assert_eq!(doc["enum"], "shop.models.Color");
        crate::tracing::debug!(enum_name = "shop.models.Color", "Re-exported tracing");
    }

    #[cfg(all(feature = "db", feature = "forms"))]
    #[test]
    fn test_prelude_with_forms() {
        use crate::prelude::*;
        use std::sync::Arc;

        let color = EnumType::builder("shop.models", "Color")
            .member("RED", "r")
            .build()
            .unwrap();
        let field = Arc::new(EnumField::char("color", &color).build().unwrap());
        let form_field = formfield(&field).unwrap();
        assert!(form_field.valid_value("r"));
    }
}
