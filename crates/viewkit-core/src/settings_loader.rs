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
//! | `VIEWKIT_DEBUG` | `debug` |
//! | `VIEWKIT_LOG_LEVEL` | `log_level` |
//! | `VIEWKIT_TEMPLATE_DIRS` | `template_dirs` (comma-separated) |
//! | `VIEWKIT_PAGE_KWARG` | `page_kwarg` |
//! | `VIEWKIT_STRICT_PAGE_NUMBERS` | `strict_page_numbers` |
//! | `VIEWKIT_JSON_PRETTY` | `json_pretty` |
//!
//! ## Examples
//!
//! ```rust,no_run
//! use viewkit_core::settings_loader;
//!
//! let settings = settings_loader::from_toml_file_with_env("config/viewkit.toml").unwrap();
//! ```

use std::path::{Path, PathBuf};

use crate::error::ViewError;
use crate::settings::Settings;

/// Loads settings from a TOML string. Missing keys keep their defaults.
pub fn from_toml_str(toml_str: &str) -> Result<Settings, ViewError> {
    toml::from_str(toml_str)
        .map_err(|e| ViewError::ConfigurationError(format!("Failed to parse TOML: {e}")))
}

/// Loads settings from a TOML file.
pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Settings, ViewError> {
    from_toml_str(&read_config(path.as_ref(), "TOML")?)
}

/// Loads settings from a TOML file and then applies environment variable overrides.
pub fn from_toml_file_with_env(path: impl AsRef<Path>) -> Result<Settings, ViewError> {
    let mut settings = from_toml_file(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Loads settings from a JSON string. Missing keys keep their defaults.
pub fn from_json_str(json_str: &str) -> Result<Settings, ViewError> {
    serde_json::from_str(json_str)
        .map_err(|e| ViewError::ConfigurationError(format!("Failed to parse JSON: {e}")))
}

/// Loads settings from a JSON file.
pub fn from_json_file(path: impl AsRef<Path>) -> Result<Settings, ViewError> {
    from_json_str(&read_config(path.as_ref(), "JSON")?)
}

/// Loads settings from just environment variables (starting from defaults).
pub fn from_env() -> Settings {
    let mut settings = Settings::default();
    apply_env_overrides(&mut settings);
    settings
}

/// Applies `VIEWKIT_*` environment variable overrides to a settings struct.
pub fn apply_env_overrides(settings: &mut Settings) {
    apply_overrides(settings, |key| std::env::var(key).ok());
}

/// Applies overrides using an arbitrary variable lookup.
///
/// Boolean values accept "true"/"1"/"yes" (case-insensitive); anything else is false.
pub fn apply_overrides<F>(settings: &mut Settings, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(val) = lookup("VIEWKIT_DEBUG") {
        settings.debug = parse_bool(&val);
    }

    if let Some(val) = lookup("VIEWKIT_LOG_LEVEL") {
        settings.log_level = val;
    }

    if let Some(val) = lookup("VIEWKIT_TEMPLATE_DIRS") {
        settings.template_dirs = val
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .collect();
    }

    if let Some(val) = lookup("VIEWKIT_PAGE_KWARG") {
        if !val.is_empty() {
            settings.page_kwarg = val;
        }
    }

    if let Some(val) = lookup("VIEWKIT_STRICT_PAGE_NUMBERS") {
        settings.strict_page_numbers = parse_bool(&val);
    }

    if let Some(val) = lookup("VIEWKIT_JSON_PRETTY") {
        settings.json_pretty = parse_bool(&val);
    }
}

fn parse_bool(val: &str) -> bool {
    matches!(val.to_lowercase().as_str(), "true" | "1" | "yes")
}

fn read_config(path: &Path, kind: &str) -> Result<String, ViewError> {
    std::fs::read_to_string(path).map_err(|e| {
        ViewError::ConfigurationError(format!(
            "Failed to read {kind} file '{}': {e}",
            path.display()
        ))
    })
}
