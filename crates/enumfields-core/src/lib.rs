//! # enumfields-core
//!
//! Core types for enumfields: the runtime enum type model, the enum registry,
//! error types, settings, and logging. This crate has no dependency on the
//! other enumfields crates.
//!
//! ## Modules
//!
//! - [`enums`] - `EnumType`, `EnumMember`, `MemberValue`, and the `DjangoEnum` trait
//! - [`registry`] - Resolving enum types by dotted path
//! - [`error`] - Error types and result aliases
//! - [`settings`] / [`settings_loader`] - Field settings and their loading
//! - [`logging`] - Tracing-based logging integration
//! - [`utils`] - Text helpers

pub mod enums;
pub mod error;
pub mod logging;
pub mod registry;
pub mod settings;
pub mod settings_loader;
pub mod utils;

// Re-export the most commonly used types at the crate root.
pub use enums::{DjangoEnum, EnumMember, EnumType, EnumTypeBuilder, MemberValue};
pub use error::{EnumFieldError, EnumFieldResult, ValidationError};
pub use registry::{register_enum, resolve_enum};
pub use settings::{Settings, SETTINGS};

#[doc(hidden)]
pub mod __private {
    pub use tracing;
}
