//! Nested form sections.
//!
//! A [`FormBinder`] holds a data subtree and the path prefix that subtree
//! lives at. Fields rendered through it read their value from the local
//! subtree by their own name, but emit the prefixed name, so a section can
//! be rendered without repeating its path in every field config.

use serde_json::{Map, Value};

use crate::factory::{FieldFactory, IntoDescriptor};
use crate::fields::Field;
use crate::path::{get_value, FieldPath};

/// A view over a data subtree plus the name prefix it is rendered under.
///
/// # Examples
///
/// ```
/// use formbind_forms::{FieldConfig, FormBinder};
/// use serde_json::json;
///
/// let root = FormBinder::new(json!({"section": {"enabled": true}}));
/// let section = root.descend("section");
/// let html = section.input(FieldConfig::new("enabled").field_type("checkbox"));
/// assert!(html.contains("<input checked name=\"section[enabled]\""));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormBinder {
    data: Value,
    prefix: FieldPath,
}

impl FormBinder {
    /// Creates a binder over `data` with no prefix.
    ///
    /// Anything other than an object is treated as empty data.
    pub fn new(data: Value) -> Self {
        let data = if data.is_object() {
            data
        } else {
            Value::Object(Map::new())
        };
        Self {
            data,
            prefix: FieldPath::default(),
        }
    }

    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<FieldPath>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub const fn data(&self) -> &Value {
        &self.data
    }

    pub const fn prefix(&self) -> &FieldPath {
        &self.prefix
    }

    /// Returns a binder over the subtree at `path`, with `path` appended to
    /// the prefix. A missing subtree yields empty data.
    #[must_use]
    pub fn descend(&self, path: impl Into<FieldPath>) -> Self {
        let path = path.into();
        let data = get_value(&self.data, &path).cloned().unwrap_or(Value::Null);
        Self::new(data).with_prefix(self.prefix.join(&path))
    }

    /// Renders a field bound to the local subtree, named under the prefix.
    pub fn input(&self, config: impl IntoDescriptor) -> String {
        let Ok(field) = FieldFactory::create(config) else {
            return String::new();
        };
        let value = get_value(&self.data, field.name()).cloned();
        if self.prefix.is_empty() {
            return field.render(value.as_ref());
        }
        let mut config = field.config().clone();
        config.name = self.prefix.join(&config.name);
        match FieldFactory::create(config) {
            Ok(prefixed) => prefixed.render(value.as_ref()),
            Err(_) => String::new(),
        }
    }
}
