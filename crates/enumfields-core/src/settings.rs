//! Settings for enumfields.
//!
//! This module provides [`Settings`], the knobs shared by every enum field,
//! and [`LazySettings`], a globally-accessible, lazily-initialized instance.
//! Settings can be loaded from TOML or JSON with
//! [`settings_loader`](crate::settings_loader).

use std::sync::OnceLock;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Framework-wide settings for enum fields.
///
/// Missing keys fall back to their defaults when deserializing.
///
/// # Examples
///
/// ```
/// use enumfields_core::settings::Settings;
///
/// let settings = Settings::default();
/// assert_eq!(settings.default_max_length, 10);
/// assert_eq!(settings.blank_choice_label, "---------");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // ── Core ─────────────────────────────────────────────────────────

    /// Whether debug mode is enabled (pretty logs instead of JSON).
    pub debug: bool,

    // ── Logging ──────────────────────────────────────────────────────

    /// The log filter (e.g. "info", "enumfields_db=debug").
    pub log_level: String,

    // ── Fields ───────────────────────────────────────────────────────

    /// `max_length` given to text-backed enum fields that do not set one.
    pub default_max_length: usize,
    /// Label of the placeholder choice shown before the members.
    pub blank_choice_label: String,

    // ── Legacy migrations ────────────────────────────────────────────

    /// Field path patterns the legacy introspection rules apply to.
    pub legacy_rule_patterns: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: true,
            log_level: "info".to_string(),
            default_max_length: 10,
            blank_choice_label: "---------".to_string(),
            legacy_rule_patterns: vec![r"^enumfields\.fields".to_string()],
        }
    }
}

static DEFAULT_SETTINGS: Lazy<Settings> = Lazy::new(Settings::default);

/// A lazily-initialized, globally-accessible settings container.
///
/// Call [`configure`](LazySettings::configure) once at startup. Until then,
/// [`get`](LazySettings::get) hands out the defaults.
pub struct LazySettings {
    inner: OnceLock<Settings>,
}

impl Default for LazySettings {
    fn default() -> Self {
        Self::new()
    }
}

impl LazySettings {
    /// Creates a new, unconfigured `LazySettings`.
    pub const fn new() -> Self {
        Self {
            inner: OnceLock::new(),
        }
    }

    /// Configures the global settings. Must be called at most once.
    ///
    /// # Panics
    ///
    /// Panics if settings have already been configured.
    pub fn configure(&self, settings: Settings) {
        self.inner
            .set(settings)
            .expect("Settings have already been configured");
    }

    /// Returns the configured settings, or the defaults if none were configured.
    pub fn get(&self) -> &Settings {
        self.inner.get().unwrap_or(&*DEFAULT_SETTINGS)
    }

    /// Returns `true` if settings have been configured.
    pub fn is_configured(&self) -> bool {
        self.inner.get().is_some()
    }
}

/// The global settings instance.
pub static SETTINGS: LazySettings = LazySettings::new();
