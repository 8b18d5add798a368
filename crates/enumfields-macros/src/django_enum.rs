//! `#[derive(DjangoEnum)]` implementation.
//!
//! This module generates an implementation of the
//! `enumfields_core::enums::DjangoEnum` trait for a fieldless enum. The runtime
//! `EnumType` is built once, cached in a `OnceLock`, and registered under its
//! qualified name so fields can refer to it by path.

use std::collections::HashMap;

use darling::{FromDeriveInput, FromVariant};
use proc_macro2::TokenStream;
use quote::quote;
use syn::DeriveInput;

use crate::lit_value::{discriminant_value, LitValue};

/// Enum-level attributes parsed from `#[enumfield(...)]`.
#[derive(Debug, FromDeriveInput)]
#[darling(attributes(enumfield), supports(enum_unit))]
pub struct EnumOpts {
    pub ident: syn::Ident,
    pub data: darling::ast::Data<VariantOpts, ()>,

    /// Dotted module the type is registered under; defaults to the Rust module path.
    #[darling(default)]
    pub module: Option<String>,

    /// Type name; defaults to the Rust enum name.
    #[darling(default)]
    pub name: Option<String>,
}

/// Per-variant attributes parsed from `#[enumfield(...)]`.
#[derive(Debug, FromVariant)]
#[darling(attributes(enumfield))]
pub struct VariantOpts {
    pub ident: syn::Ident,
    pub discriminant: Option<syn::Expr>,

    /// The stored value. Falls back to an explicit integer discriminant.
    #[darling(default)]
    pub value: Option<LitValue>,

    /// Display label override.
    #[darling(default)]
    pub label: Option<String>,

    /// Member name override; defaults to the variant name in `SCREAMING_SNAKE_CASE`.
    #[darling(default)]
    pub rename: Option<String>,
}

/// Generates the `DjangoEnum` trait implementation for the given derive input.
pub fn derive_django_enum_impl(input: DeriveInput) -> TokenStream {
    let opts = match EnumOpts::from_derive_input(&input) {
        Ok(o) => o,
        Err(e) => return e.write_errors(),
    };

    let Some(variants) = opts.data.as_ref().take_enum() else {
        return darling::Error::unsupported_shape("struct")
            .with_span(&opts.ident)
            .write_errors();
    };

    let enum_ident = &opts.ident;
    let type_name = opts.name.clone().unwrap_or_else(|| enum_ident.to_string());
    let module_tokens = opts.module.as_ref().map_or_else(
        || quote! { module_path!().replace("::", ".") },
        |module| quote! { #module.to_string() },
    );

    let mut errors = darling::Error::accumulator();
    let mut member_tokens = Vec::with_capacity(variants.len());
    let mut to_arms = Vec::with_capacity(variants.len());
    let mut from_arms = Vec::with_capacity(variants.len());
    let mut seen_names: HashMap<String, &syn::Ident> = HashMap::new();
    let mut seen_values: HashMap<LitValue, &syn::Ident> = HashMap::new();

    for (index, variant) in variants.iter().enumerate() {
        let ident = &variant.ident;
        let member_name = variant
            .rename
            .clone()
            .unwrap_or_else(|| screaming_snake_case(&ident.to_string()));

        let value = variant.value.clone().or_else(|| {
            variant
                .discriminant
                .as_ref()
                .and_then(discriminant_value)
                .map(LitValue::Int)
        });
        let Some(value) = value else {
            errors.push(
                darling::Error::custom(
                    "variant needs #[enumfield(value = ...)] or an integer discriminant",
                )
                .with_span(ident),
            );
            continue;
        };
        if let Some(first) = seen_names.insert(member_name.clone(), ident) {
            errors.push(
                darling::Error::custom(format!(
                    "duplicate member name `{member_name}`, already used by `{first}`"
                ))
                .with_span(ident),
            );
        }
        if let Some(first) = seen_values.insert(value.clone(), ident) {
            errors.push(
                darling::Error::custom(format!(
                    "duplicate member value {value}, already used by `{first}`"
                ))
                .with_span(ident),
            );
        }
        let value_tokens = value.to_tokens();

        member_tokens.push(match &variant.label {
            Some(label) => quote! { .labeled_member(#member_name, #value_tokens, #label) },
            None => quote! { .member(#member_name, #value_tokens) },
        });
        to_arms.push(quote! { Self::#ident => #index });
        from_arms.push(quote! { #index => ::std::option::Option::Some(Self::#ident) });
    }

    if let Err(e) = errors.finish() {
        return e.write_errors();
    }

    quote! {
        impl ::enumfields_core::enums::DjangoEnum for #enum_ident {
            fn enum_type() -> ::std::sync::Arc<::enumfields_core::enums::EnumType> {
                static TYPE: ::std::sync::OnceLock<
                    ::std::sync::Arc<::enumfields_core::enums::EnumType>,
                > = ::std::sync::OnceLock::new();
                ::std::sync::Arc::clone(TYPE.get_or_init(|| {
                    let enum_type = ::enumfields_core::enums::EnumType::builder(
                        #module_tokens,
                        #type_name,
                    )
                    #(#member_tokens)*
                    .build()
                    .unwrap_or_else(|e| panic!("invalid enum {}: {e}", #type_name));
                    if let Err(e) = ::enumfields_core::registry::register_enum(
                        ::std::sync::Arc::clone(&enum_type),
                    ) {
                        ::enumfields_core::__private::tracing::warn!(
                            enum_name = %enum_type.qualified_name(),
                            error = %e,
                            "Enum type was not registered"
                        );
                    }
                    enum_type
                }))
            }

            fn to_member(self) -> ::enumfields_core::enums::EnumMember {
                let index = match self {
                    #(#to_arms,)*
                };
                Self::enum_type()
                    .member_at(index)
                    .unwrap_or_else(|| unreachable!("variant index out of range"))
            }

            fn from_member(
                member: &::enumfields_core::enums::EnumMember,
            ) -> ::std::option::Option<Self> {
                if !member.belongs_to(&Self::enum_type()) {
                    return ::std::option::Option::None;
                }
                match member.index() {
                    #(#from_arms,)*
                    _ => ::std::option::Option::None,
                }
            }
        }
    }
}

/// Converts a `CamelCase` identifier into `SCREAMING_SNAKE_CASE`.
fn screaming_snake_case(ident: &str) -> String {
    let mut out = String::with_capacity(ident.len() + 4);
    let mut prev: Option<char> = None;
    let mut chars = ident.chars().peekable();
    while let Some(c) = chars.next() {
        if c.is_uppercase() {
            let after_lower = prev.is_some_and(|p| p.is_lowercase() || p.is_ascii_digit());
            let ends_acronym = prev.is_some_and(char::is_uppercase)
                && chars.peek().is_some_and(|n| n.is_lowercase());
            if after_lower || ends_acronym {
                out.push('_');
            }
        }
        out.extend(c.to_uppercase());
        prev = Some(c);
    }
    out
}
