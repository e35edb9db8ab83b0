//! Settings for formbind.
//!
//! [`Settings`] holds the handful of values the renderer and the logging
//! setup read: wrapper markup defaults, the anti-forgery field name, and the
//! log level. Every field has a default, so a host only overrides what it
//! needs (see [`settings_loader`](crate::settings_loader)).

use serde::{Deserialize, Serialize};

/// The complete set of formbind settings.
///
/// # Examples
///
/// ```
/// use formbind_core::settings::Settings;
///
/// let settings = Settings::default();
/// assert_eq!(settings.table_class, "form-table");
/// assert_eq!(settings.default_nonce_action, "update_options");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // ── Core ─────────────────────────────────────────────────────────

    /// Whether debug mode is enabled. Selects pretty log output.
    pub debug: bool,
    /// The secret key used to sign anti-forgery tokens.
    pub secret_key: String,

    // ── Rendering ────────────────────────────────────────────────────

    /// CSS class of the table emitted by `table` / `form_table`.
    pub table_class: String,
    /// Value of the `action` attribute on emitted forms.
    pub form_action: String,

    // ── Anti-forgery ─────────────────────────────────────────────────

    /// Name of the hidden field carrying the anti-forgery token.
    pub nonce_field_name: String,
    /// Action name used when a form is rendered without an explicit one.
    pub default_nonce_action: String,

    // ── Logging ──────────────────────────────────────────────────────

    /// The log level (e.g. "info", "debug", "warn").
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: true,
            secret_key: String::new(),
            table_class: "form-table".to_string(),
            form_action: String::new(),
            nonce_field_name: "_wpnonce".to_string(),
            default_nonce_action: "update_options".to_string(),
            log_level: "info".to_string(),
        }
    }
}
