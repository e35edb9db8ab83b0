//! Loading [`Settings`] from files and the environment.
//!
//! A file only names the keys it changes; everything else keeps its default.
//! Environment variables are applied last and win over the file.
//!
//! ## Environment variables
//!
//! | Env Var | Setting |
//! |---|---|
//! | `FORMBIND_SECRET_KEY` | `secret_key` |
//! | `FORMBIND_DEBUG` | `debug` |
//! | `FORMBIND_LOG_LEVEL` | `log_level` |
//! | `FORMBIND_TABLE_CLASS` | `table_class` |
//! | `FORMBIND_FORM_ACTION` | `form_action` |
//! | `FORMBIND_NONCE_FIELD_NAME` | `nonce_field_name` |
//! | `FORMBIND_DEFAULT_NONCE_ACTION` | `default_nonce_action` |
//!
//! ## Examples
//!
//! ```rust,no_run
//! use formbind_core::settings_loader;
//!
//! let settings = settings_loader::from_toml_file_with_env("config/forms.toml").unwrap();
//! ```

use std::path::Path;

use crate::error::FormError;
use crate::settings::Settings;

/// Parses settings from TOML.
pub fn from_toml_str(toml_str: &str) -> Result<Settings, FormError> {
    toml::from_str(toml_str)
        .map_err(|e| FormError::ConfigurationError(format!("Invalid TOML settings: {e}")))
}

/// Reads and parses a TOML settings file.
pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Settings, FormError> {
    let content = std::fs::read_to_string(path)?;
    from_toml_str(&content)
}

/// [`from_toml_file`] followed by [`apply_env_overrides`].
pub fn from_toml_file_with_env(path: impl AsRef<Path>) -> Result<Settings, FormError> {
    let mut settings = from_toml_file(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Parses settings from JSON.
pub fn from_json_str(json_str: &str) -> Result<Settings, FormError> {
    Ok(serde_json::from_str(json_str)?)
}

/// Defaults with environment overrides applied.
pub fn from_env() -> Settings {
    let mut settings = Settings::default();
    apply_env_overrides(&mut settings);
    settings
}

/// Applies the `FORMBIND_*` variables that are set.
///
/// `FORMBIND_DEBUG` is true for `true`, `1`, or `yes` in any case.
pub fn apply_env_overrides(settings: &mut Settings) {
    let overrides: [(&str, &mut String); 6] = [
        ("FORMBIND_SECRET_KEY", &mut settings.secret_key),
        ("FORMBIND_LOG_LEVEL", &mut settings.log_level),
        ("FORMBIND_TABLE_CLASS", &mut settings.table_class),
        ("FORMBIND_FORM_ACTION", &mut settings.form_action),
        ("FORMBIND_NONCE_FIELD_NAME", &mut settings.nonce_field_name),
        ("FORMBIND_DEFAULT_NONCE_ACTION", &mut settings.default_nonce_action),
    ];
    for (var, slot) in overrides {
        if let Ok(val) = std::env::var(var) {
            *slot = val;
        }
    }

    if let Ok(val) = std::env::var("FORMBIND_DEBUG") {
        settings.debug = matches!(val.to_ascii_lowercase().as_str(), "true" | "1" | "yes");
    }
}
