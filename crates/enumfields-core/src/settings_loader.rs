//! Settings loading from configuration files.
//!
//! ## Loading Order
//!
//! 1. Start with default settings.
//! 2. Load from a TOML or JSON file (overriding defaults).
//! 3. Apply environment variable overrides (highest priority).
//!
//! ## Environment Variable Mapping
//!
//! | Env Var | Setting |
//! |---|---|
//! | `ENUMFIELDS_DEBUG` | `debug` |
//! | `ENUMFIELDS_LOG_LEVEL` | `log_level` |
//! | `ENUMFIELDS_DEFAULT_MAX_LENGTH` | `default_max_length` |
//! | `ENUMFIELDS_BLANK_CHOICE_LABEL` | `blank_choice_label` |
//! | `ENUMFIELDS_LEGACY_RULE_PATTERNS` | `legacy_rule_patterns` (comma-separated) |

use std::path::Path;

use crate::error::EnumFieldError;
use crate::settings::Settings;

/// Loads settings from a TOML string. Missing keys keep their defaults.
pub fn from_toml_str(toml_str: &str) -> Result<Settings, EnumFieldError> {
    toml::from_str(toml_str)
        .map_err(|e| EnumFieldError::ConfigurationError(format!("Failed to parse TOML: {e}")))
}

/// Loads settings from a TOML file.
pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Settings, EnumFieldError> {
    from_toml_str(&read(path.as_ref(), "TOML")?)
}

/// Loads settings from a TOML file and then applies environment variable overrides.
pub fn from_toml_file_with_env(path: impl AsRef<Path>) -> Result<Settings, EnumFieldError> {
    let mut settings = from_toml_file(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Loads settings from a JSON string. Missing keys keep their defaults.
pub fn from_json_str(json_str: &str) -> Result<Settings, EnumFieldError> {
    serde_json::from_str(json_str)
        .map_err(|e| EnumFieldError::ConfigurationError(format!("Failed to parse JSON: {e}")))
}

/// Loads settings from a JSON file.
pub fn from_json_file(path: impl AsRef<Path>) -> Result<Settings, EnumFieldError> {
    from_json_str(&read(path.as_ref(), "JSON")?)
}

/// Loads settings from just environment variables (starting from defaults).
pub fn from_env() -> Settings {
    let mut settings = Settings::default();
    apply_env_overrides(&mut settings);
    settings
}

/// Applies `ENUMFIELDS_*` environment variable overrides to a settings struct.
///
/// Unparseable numeric values are ignored.
pub fn apply_env_overrides(settings: &mut Settings) {
    if let Ok(val) = std::env::var("ENUMFIELDS_DEBUG") {
        settings.debug = matches!(val.to_lowercase().as_str(), "true" | "1" | "yes");
    }

    if let Ok(val) = std::env::var("ENUMFIELDS_LOG_LEVEL") {
        settings.log_level = val;
    }

    if let Ok(val) = std::env::var("ENUMFIELDS_DEFAULT_MAX_LENGTH") {
        if let Ok(n) = val.trim().parse::<usize>() {
            settings.default_max_length = n;
        }
    }

    if let Ok(val) = std::env::var("ENUMFIELDS_BLANK_CHOICE_LABEL") {
        settings.blank_choice_label = val;
    }

    if let Ok(val) = std::env::var("ENUMFIELDS_LEGACY_RULE_PATTERNS") {
        settings.legacy_rule_patterns = val
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
    }
}

fn read(path: &Path, kind: &str) -> Result<String, EnumFieldError> {
    std::fs::read_to_string(path).map_err(|e| {
        EnumFieldError::ConfigurationError(format!(
            "Failed to read {kind} file '{}': {e}",
            path.display()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_toml_str_basic() {
        let toml = r#"
            debug = false
            default_max_length = 20
            blank_choice_label = "(none)"
        "#;

        let settings = from_toml_str(toml).unwrap();
        assert!(!settings.debug);
        assert_eq!(settings.default_max_length, 20);
        assert_eq!(settings.blank_choice_label, "(none)");
        // Defaults preserved
        assert_eq!(settings.log_level, "info");
    }

    #[test]
    fn test_from_toml_str_empty() {
        assert_eq!(from_toml_str("").unwrap(), Settings::default());
    }

    #[test]
    fn test_from_toml_str_invalid() {
        let err = from_toml_str("debug = [").unwrap_err();
        assert!(matches!(err, EnumFieldError::ConfigurationError(_)));
    }

    #[test]
    fn test_from_json_str_basic() {
        let settings =
            from_json_str(r#"{"log_level": "debug", "legacy_rule_patterns": ["^myapp"]}"#)
                .unwrap();
        assert_eq!(settings.log_level, "debug");
        assert_eq!(settings.legacy_rule_patterns, vec!["^myapp"]);
        assert_eq!(settings.default_max_length, 10);
    }

    #[test]
    fn test_from_json_str_invalid() {
        assert!(from_json_str("{not json").is_err());
    }

    #[test]
    fn test_from_toml_file() {
        let dir = std::env::temp_dir().join("enumfields_test_toml");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("settings.toml");
        std::fs::write(&path, "default_max_length = 16\n").unwrap();

        let settings = from_toml_file(&path).unwrap();
        assert_eq!(settings.default_max_length, 16);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_from_missing_file() {
        let err = from_json_file("/nonexistent/enumfields.json").unwrap_err();
        assert!(err.to_string().contains("Failed to read JSON file"));
    }
}
