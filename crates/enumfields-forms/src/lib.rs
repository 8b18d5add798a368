//! # enumfields-forms
//!
//! Form support for enum-backed model fields. [`formfield`] turns an
//! [`EnumField`](enumfields_db::EnumField) into an [`EnumChoiceField`] that
//! renders the enum's choices and cleans submitted strings into members.
//!
//! ## Module Overview
//!
//! - [`fields`] - [`EnumChoiceField`] and [`formfield`]
//! - [`widgets`] - `Select`, `RadioSelect` and `HiddenInput` widgets

pub mod fields;
pub mod widgets;

pub use fields::{formfield, EnumChoiceField};
pub use widgets::{FormData, Widget, WidgetType};
