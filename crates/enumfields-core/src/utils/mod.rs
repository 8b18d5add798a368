//! Utility functions for enumfields.
//!
//! - [`text`]: label prettification and identifier checks.

pub mod text;
