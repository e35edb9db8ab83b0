//! # formbind
//!
//! Declarative form rendering and data binding.
//!
//! This is the meta-crate that re-exports the sub-crates. Depend on
//! `formbind` for everything, or on the individual crates for finer control.
//!
//! ```
//! use formbind::prelude::*;
//! use serde_json::json;
//!
//! let fields = vec![
//!     FieldConfig::new(["profile", "email"]).title("Email"),
//!     FieldConfig::new(["profile", "notify"]).field_type("checkbox").title("Notify"),
//! ];
//!
//! let submitted = json!({"profile": {"email": "x@y.com"}});
//! let saved = validate_data(fields.iter(), &submitted, json!({}));
//! assert_eq!(saved, json!({"profile": {"email": "x@y.com", "notify": false}}));
//!
//! let renderer = FormRenderer::new(Settings::default(), std::sync::Arc::new(StaticNonce::new("t")));
//! let html = renderer.form_table(fields.iter(), &saved, None);
//! assert!(html.contains("value=\"x@y.com\""));
//! ```

/// Errors, settings, logging, escaping, and anti-forgery tokens.
pub use formbind_core as core;

/// Field configs, descriptors, rendering, validation, and binding.
#[cfg(feature = "forms")]
pub use formbind_forms as forms;

pub use serde_json;
pub use tracing;
pub use tracing_subscriber;

/// The commonly used types in one import.
pub mod prelude {
    pub use formbind_core::logging::setup_logging;
    pub use formbind_core::signing::{NonceProvider, NonceSigner};
    pub use formbind_core::{FormError, FormResult, Settings};

    #[cfg(feature = "forms")]
    pub use formbind_forms::{
        input, input_with_value, validate_data, validate_post_data, Field, FieldConfig,
        FieldDescriptor, FieldFactory, FieldPath, FieldType, FormBinder, FormRenderer,
        MetadataStore, StaticNonce, SubmissionSource,
    };
}
