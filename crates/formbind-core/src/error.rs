//! Core error types for formbind.
//!
//! Only configuration and host-integration problems are errors. A submitted
//! value that fails validation is never an error: field validators return
//! `None` instead, and missing data resolves to a fallback.

use thiserror::Error;

/// The primary error type for formbind.
#[derive(Error, Debug)]
pub enum FormError {
    // ── Field configuration ──────────────────────────────────────────

    /// A field configuration has no `name`, or an empty one.
    #[error("Empty name")]
    MissingName,

    /// A raw field configuration could not be interpreted.
    #[error("Invalid field configuration: {0}")]
    InvalidConfig(String),

    // ── Settings ─────────────────────────────────────────────────────

    /// A settings value is missing or invalid.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    // ── Signing ──────────────────────────────────────────────────────

    /// An anti-forgery token did not verify.
    #[error("Signature error: {0}")]
    SignatureError(String),

    // ── Serialization ────────────────────────────────────────────────

    /// An error occurred during serialization or deserialization.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // ── IO ───────────────────────────────────────────────────────────

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<serde_json::Error> for FormError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

/// A convenience type alias for `Result<T, FormError>`.
pub type FormResult<T> = Result<T, FormError>;
