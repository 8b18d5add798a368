//! Helper type for parsing a member value from darling attributes.
//!
//! Darling has no `FromMeta` for "a string or an integer". This module
//! provides a wrapper that accepts both:
//! - `#[enumfield(value = "r")]` (string literal)
//! - `#[enumfield(value = 3)]` or `#[enumfield(value = -3)]` (integer literal)

use darling::FromMeta;
use proc_macro2::TokenStream;
use quote::quote;

/// A member value literal read from an attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LitValue {
    /// `value = "..."`
    Str(String),
    /// `value = 123`
    Int(i64),
}

impl LitValue {
    /// Returns a `MemberValue` constructor expression for this literal.
    pub fn to_tokens(&self) -> TokenStream {
        match self {
            Self::Str(s) => quote! { ::enumfields_core::enums::MemberValue::Str(#s.to_string()) },
            Self::Int(i) => quote! { ::enumfields_core::enums::MemberValue::Int(#i) },
        }
    }
}

impl std::fmt::Display for LitValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Str(s) => write!(f, "{s:?}"),
            Self::Int(i) => write!(f, "{i}"),
        }
    }
}

impl FromMeta for LitValue {
    fn from_value(value: &syn::Lit) -> darling::Result<Self> {
        match value {
            syn::Lit::Str(lit) => Ok(Self::Str(lit.value())),
            syn::Lit::Int(lit) => lit.base10_parse::<i64>().map(Self::Int).map_err(Into::into),
            _ => Err(darling::Error::unexpected_lit_type(value)),
        }
    }

    /// Handles negative integers, which parse as unary expressions.
    fn from_expr(expr: &syn::Expr) -> darling::Result<Self> {
        match expr {
            syn::Expr::Lit(syn::ExprLit { lit, .. }) => Self::from_value(lit),
            syn::Expr::Unary(syn::ExprUnary {
                op: syn::UnOp::Neg(_),
                expr: inner,
                ..
            }) => match Self::from_expr(inner)? {
                Self::Int(i) => Ok(Self::Int(-i)),
                Self::Str(_) => Err(darling::Error::custom("cannot negate a string value")),
            },
            syn::Expr::Group(group) => Self::from_expr(&group.expr),
            _ => Err(darling::Error::unexpected_expr_type(expr)),
        }
    }
}

/// Reads an explicit discriminant (`Red = 1`) as an integer value.
pub fn discriminant_value(expr: &syn::Expr) -> Option<i64> {
    match LitValue::from_expr(expr) {
        Ok(LitValue::Int(i)) => Some(i),
        _ => None,
    }
}
