//! Enum registry for resolving enum types by dotted path.
//!
//! Fields can name their enum as a string such as `"tests.test_enums.Color"`.
//! The path is resolved against the [`EnumRegistry`], which enum types join
//! through [`register_enum`] (derived enums register themselves on first use).

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use once_cell::sync::Lazy;

use crate::enums::EnumType;
use crate::error::{EnumFieldError, EnumFieldResult};
use crate::utils::text::is_dotted_path;

/// A table of enum types keyed by their qualified `module.Name` path.
#[derive(Debug, Default)]
pub struct EnumRegistry {
    types: HashMap<String, Arc<EnumType>>,
}

impl EnumRegistry {
    /// Creates a new, empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `enum_type` under its qualified name.
    ///
    /// Registering the same type again is a no-op. Registering a different
    /// type under a path that is already taken is an error.
    pub fn register(&mut self, enum_type: Arc<EnumType>) -> EnumFieldResult<()> {
        let path = enum_type.qualified_name();
        if !is_dotted_path(&path) {
            return Err(EnumFieldError::ImproperlyConfigured(format!(
                "'{path}' is not a valid dotted enum path"
            )));
        }
        match self.types.get(&path) {
            Some(existing) if existing.is_same(&enum_type) => Ok(()),
            Some(_) => Err(EnumFieldError::ImproperlyConfigured(format!(
                "A different enum is already registered as '{path}'"
            ))),
            None => {
                tracing::debug!(path = %path, "Registered enum type");
                self.types.insert(path, enum_type);
                Ok(())
            }
        }
    }

    /// Returns the enum type registered under `path`, if any.
    pub fn get(&self, path: &str) -> Option<Arc<EnumType>> {
        self.types.get(path).cloned()
    }

    /// Returns `true` if this exact type is the one registered at its path.
    pub fn is_registered(&self, enum_type: &EnumType) -> bool {
        self.types
            .get(&enum_type.qualified_name())
            .is_some_and(|existing| existing.is_same(enum_type))
    }

    /// Returns the number of registered types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns `true` if nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

static ENUM_REGISTRY: Lazy<RwLock<EnumRegistry>> = Lazy::new(|| RwLock::new(EnumRegistry::new()));

/// Registers an enum type in the global registry.
pub fn register_enum(enum_type: Arc<EnumType>) -> EnumFieldResult<()> {
    ENUM_REGISTRY
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .register(enum_type)
}

/// Resolves a dotted path against the global registry.
///
/// # Examples
///
/// ```
/// use enumfields_core::enums::EnumType;
/// use enumfields_core::registry::{register_enum, resolve_enum};
///
/// let size = EnumType::builder("docs.registry", "Size")
///     .member("SMALL", "s")
///     .build()
///     .unwrap();
/// register_enum(size.clone()).unwrap();
///
/// assert!(resolve_enum("docs.registry.Size").unwrap().is_same(&size));
/// assert!(resolve_enum("docs.registry.Missing").is_err());
/// ```
pub fn resolve_enum(path: &str) -> EnumFieldResult<Arc<EnumType>> {
    ENUM_REGISTRY
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(path)
        .ok_or_else(|| EnumFieldError::UnknownEnum(path.to_string()))
}

/// Returns `true` if `enum_type` is the type registered at its own path.
pub fn is_registered(enum_type: &EnumType) -> bool {
    ENUM_REGISTRY
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .is_registered(enum_type)
}
