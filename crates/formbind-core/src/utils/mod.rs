//! Utility functions for formbind.
//!
//! - [`text`]: HTML escaping for attribute values and element content.
//! - [`kses`]: the conservative allowlist sanitizer used as the default
//!   validator for text and custom fields.

pub mod kses;
pub mod text;
