//! Validation of submitted form data.
//!
//! Each field looks up its raw value by path (a missing value is `null`),
//! validates it, and writes the result back at the same path. A field that
//! validates to `None` leaves the output untouched, so prior contents of
//! the output survive for rejected or unconfigured fields.

use serde_json::{Map, Value};

use crate::factory::{FieldFactory, IntoDescriptor};
use crate::fields::Field;
use crate::path::{get_value, set_value};
use crate::submission::SubmissionSource;

/// Validates `data` against `fields`, merging accepted values into `existing`.
///
/// Fields whose config fails to build are skipped. A non-object `existing`
/// is replaced by an empty object.
///
/// # Examples
///
/// ```
/// use formbind_forms::{validate_data, FieldConfig};
/// use serde_json::json;
///
/// let fields = [FieldConfig::new(["profile", "email"])];
/// let out = validate_data(
///     fields.iter(),
///     &json!({"profile": {"email": "x@y.com"}}),
///     json!({"profile": {"age": 30}}),
/// );
/// assert_eq!(out, json!({"profile": {"age": 30, "email": "x@y.com"}}));
/// ```
pub fn validate_data<I>(fields: I, data: &Value, existing: Value) -> Value
where
    I: IntoIterator,
    I::Item: IntoDescriptor,
{
    let mut output = if existing.is_object() {
        existing
    } else {
        Value::Object(Map::new())
    };

    for config in fields {
        let Ok(field) = FieldFactory::create(config) else {
            tracing::debug!("skipping field with invalid config");
            continue;
        };
        let raw = get_value(data, field.name()).unwrap_or(&Value::Null);
        match field.validate(raw) {
            Some(value) => set_value(&mut output, field.name(), value),
            None => tracing::debug!(field = %field.name(), "field rejected, not persisted"),
        }
    }
    output
}

/// Validates the host's raw submission against `fields`.
///
/// Same as [`validate_data`], with the data taken from `source`.
pub fn validate_post_data<I>(fields: I, source: &dyn SubmissionSource, existing: Value) -> Value
where
    I: IntoIterator,
    I::Item: IntoDescriptor,
{
    let data = source.raw_submission();
    validate_data(fields, &data, existing)
}
