//! Binding fields to a per-object metadata store.
//!
//! Metadata is keyed by object id and key, and each key may hold several
//! values. Checkbox fields read and write the full value list; every other
//! field reads and writes a single value. The key is the last segment of
//! the field's path.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::config::FieldType;
use crate::factory::{FieldFactory, IntoDescriptor};
use crate::fields::Field;
use crate::path::get_value;
use crate::renderer::input_with_value;
use crate::value::{display, to_list};

/// Host-side metadata persistence.
pub trait MetadataStore {
    /// Returns the first value for `key` when `single`, or all values as an
    /// array otherwise. A missing single value is the empty string.
    fn get(&self, object_id: u64, key: &str, single: bool) -> Value;

    /// Adds one more value under `key`.
    fn add(&mut self, object_id: u64, key: &str, value: Value);

    /// Replaces every value under `key` with `value`.
    fn update(&mut self, object_id: u64, key: &str, value: Value);

    /// Deletes the values equal to `value`, or every value when `None`.
    fn delete(&mut self, object_id: u64, key: &str, value: Option<&Value>);
}

/// An ordered in-memory [`MetadataStore`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InMemoryMetaStore {
    entries: BTreeMap<(u64, String), Vec<Value>>,
}

impl InMemoryMetaStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All values stored under `key`.
    pub fn values(&self, object_id: u64, key: &str) -> &[Value] {
        self.entries
            .get(&(object_id, key.to_string()))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

impl MetadataStore for InMemoryMetaStore {
    fn get(&self, object_id: u64, key: &str, single: bool) -> Value {
        let values = self.values(object_id, key);
        if single {
            values.first().cloned().unwrap_or_else(|| Value::String(String::new()))
        } else {
            Value::Array(values.to_vec())
        }
    }

    fn add(&mut self, object_id: u64, key: &str, value: Value) {
        self.entries
            .entry((object_id, key.to_string()))
            .or_default()
            .push(value);
    }

    fn update(&mut self, object_id: u64, key: &str, value: Value) {
        self.entries.insert((object_id, key.to_string()), vec![value]);
    }

    fn delete(&mut self, object_id: u64, key: &str, value: Option<&Value>) {
        let entry = (object_id, key.to_string());
        match value {
            None => {
                self.entries.remove(&entry);
            }
            Some(value) => {
                let target = display(value);
                if let Some(values) = self.entries.get_mut(&entry) {
                    values.retain(|v| display(v) != target);
                    if values.is_empty() {
                        self.entries.remove(&entry);
                    }
                }
            }
        }
    }
}

fn meta_key(field: &impl Field) -> Option<String> {
    field.name().last().map(str::to_string)
}

/// Renders a field bound to its stored metadata.
///
/// The field's `default` is ignored: a stored empty value and a value never
/// stored look the same through the store.
pub fn input_from_meta(
    config: impl IntoDescriptor,
    store: &dyn MetadataStore,
    object_id: u64,
) -> String {
    let Ok(field) = FieldFactory::create(config) else {
        return String::new();
    };
    let Some(key) = meta_key(&field) else {
        return String::new();
    };
    let single = field.config().field_type != FieldType::Checkbox;
    let value = store.get(object_id, &key, single);

    let mut config = field.config().clone();
    config.default = None;
    input_with_value(config, Some(&value))
}

/// Writes submitted `data` for `fields` to the store.
///
/// Checkbox fields add the newly checked values and delete the unchecked
/// ones. Other fields delete their key when the submitted value is missing
/// or the empty string, and overwrite it otherwise.
pub fn update_meta<I>(fields: I, data: &Value, store: &mut dyn MetadataStore, object_id: u64)
where
    I: IntoIterator,
    I::Item: IntoDescriptor,
{
    for config in fields {
        let Ok(field) = FieldFactory::create(config) else {
            continue;
        };
        let Some(key) = meta_key(&field) else {
            continue;
        };
        let submitted = get_value(data, field.name());

        if field.config().field_type == FieldType::Checkbox {
            let new_values = submitted.map(to_list).unwrap_or_default();
            let old_values = to_list(&store.get(object_id, &key, false));
            let new_keys: Vec<String> = new_values.iter().map(display).collect();
            let old_keys: Vec<String> = old_values.iter().map(display).collect();

            for value in new_values.iter().filter(|v| !old_keys.contains(&display(v))) {
                tracing::debug!(object_id, key = %key, value = %value, "adding metadata value");
                store.add(object_id, &key, value.clone());
            }
            for value in old_values.iter().filter(|v| !new_keys.contains(&display(v))) {
                tracing::debug!(object_id, key = %key, value = %value, "deleting metadata value");
                store.delete(object_id, &key, Some(value));
            }
        } else {
            let value = submitted.cloned().unwrap_or_else(|| Value::String(String::new()));
            if value.as_str() == Some("") {
                tracing::debug!(object_id, key = %key, "deleting metadata");
                store.delete(object_id, &key, None);
            } else {
                tracing::debug!(object_id, key = %key, "updating metadata");
                store.update(object_id, &key, value);
            }
        }
    }
}
