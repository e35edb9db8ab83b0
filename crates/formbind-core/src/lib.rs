//! # formbind-core
//!
//! Core types shared by the formbind crates. This crate knows nothing about
//! fields or forms; it provides the foundation the form layer builds on.
//!
//! ## Modules
//!
//! - [`error`] - Error types and result aliases
//! - [`settings`] - Rendering and logging configuration
//! - [`settings_loader`] - Loading settings from TOML, JSON, and the environment
//! - [`logging`] - Tracing-based logging integration
//! - [`signing`] - HMAC-based anti-forgery tokens
//! - [`utils`] - HTML escaping and the default markup sanitizer

pub mod error;
pub mod logging;
pub mod settings;
pub mod settings_loader;
pub mod signing;
pub mod utils;

// Re-export the most commonly used types at the crate root.
pub use error::{FormError, FormResult};
pub use settings::Settings;
