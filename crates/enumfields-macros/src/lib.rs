//! # enumfields-macros
//!
//! Procedural macros for enum-backed fields. Provides `#[derive(DjangoEnum)]`,
//! which turns a fieldless Rust enum into a registered runtime enum type.
//!
//! This crate is independent of the other enumfields crates because proc-macro
//! crates cannot depend on crates that use them.
//!
//! ## Example
//!
//! ```ignore
//! use enumfields_core::enums::DjangoEnum;
//! use enumfields_macros::DjangoEnum;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq, DjangoEnum)]
//! #[enumfield(module = "tests.test_enums")]
//! enum Color {
//!     #[enumfield(value = "r", label = "Reddish")]
//!     Red,
//!     #[enumfield(value = "g")]
//!     Green,
//! }
//!
//! assert_eq!(Color::Red.to_member().to_string(), "Color.RED");
//! ```

mod django_enum;
mod lit_value;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derives `enumfields_core::enums::DjangoEnum` for a fieldless enum.
///
/// Enum attributes: `#[enumfield(module = "...", name = "...")]`.
/// Variant attributes: `#[enumfield(value = "..." | 123, label = "...", rename = "...")]`.
/// Variants without `value` use their integer discriminant.
#[proc_macro_derive(DjangoEnum, attributes(enumfield))]
pub fn derive_django_enum(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    django_enum::derive_django_enum_impl(input).into()
}
