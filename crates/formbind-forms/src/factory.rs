//! Builds field descriptors from configuration.

use formbind_core::{FormError, FormResult};
use serde_json::Value;

use crate::choices::Choices;
use crate::config::{FieldConfig, FieldType};
use crate::fields::{
    CustomField, FieldDescriptor, MultiCheckboxField, RadioField, SelectField,
    SingleCheckboxField, TextField,
};
use crate::html::TOKEN;

/// Anything the factory can turn into a descriptor.
///
/// Implemented for configs, raw JSON mappings, and descriptors themselves,
/// which pass through unchanged.
pub trait IntoDescriptor {
    fn into_descriptor(self) -> FormResult<FieldDescriptor>;
}

impl IntoDescriptor for FieldConfig {
    fn into_descriptor(self) -> FormResult<FieldDescriptor> {
        FieldFactory::build(self)
    }
}

impl IntoDescriptor for &FieldConfig {
    fn into_descriptor(self) -> FormResult<FieldDescriptor> {
        FieldFactory::build(self.clone())
    }
}

impl IntoDescriptor for FieldDescriptor {
    fn into_descriptor(self) -> FormResult<FieldDescriptor> {
        Ok(self)
    }
}

impl IntoDescriptor for &FieldDescriptor {
    fn into_descriptor(self) -> FormResult<FieldDescriptor> {
        Ok(self.clone())
    }
}

impl IntoDescriptor for &Value {
    fn into_descriptor(self) -> FormResult<FieldDescriptor> {
        FieldConfig::from_value(self).and_then(FieldFactory::build)
    }
}

/// Maps a field configuration onto its descriptor variant.
pub struct FieldFactory;

impl FieldFactory {
    /// Creates a descriptor.
    ///
    /// Fails with [`FormError::MissingName`] when the name is empty; the
    /// failure is also logged at warn level so callers can skip the field.
    ///
    /// # Examples
    ///
    /// ```
    /// use formbind_forms::{FieldConfig, FieldFactory};
    ///
    /// let field = FieldFactory::create(FieldConfig::new("agree").field_type("checkbox")).unwrap();
    /// assert_eq!(field.kind(), "single_checkbox");
    ///
    /// assert!(FieldFactory::create(FieldConfig::new("")).is_err());
    /// ```
    pub fn create(config: impl IntoDescriptor) -> FormResult<FieldDescriptor> {
        config.into_descriptor()
    }

    fn build(mut config: FieldConfig) -> FormResult<FieldDescriptor> {
        if config.name.first().map_or(true, str::is_empty) {
            tracing::warn!(field_type = %config.field_type, "field config has an empty name");
            return Err(FormError::MissingName);
        }

        config.wrap.get_or_insert_with(|| TOKEN.to_string());
        config.wrap_each.get_or_insert_with(|| TOKEN.to_string());

        let choices = config
            .choices
            .as_ref()
            .map(|list| Choices::expand(list, &mut config.desc, config.numeric));
        if let Some(choices) = &choices {
            config.choices = Some(choices.to_choice_list());
        }

        let descriptor = match (config.field_type.clone(), choices) {
            (FieldType::Radio, choices) => {
                FieldDescriptor::Radio(RadioField::new(config, choices.unwrap_or_default()))
            }
            (FieldType::Select, choices) => {
                FieldDescriptor::Select(SelectField::new(config, choices.unwrap_or_default()))
            }
            (FieldType::Checkbox, Some(choices)) => {
                FieldDescriptor::MultiCheckbox(MultiCheckboxField::new(config, choices))
            }
            (FieldType::Checkbox, None) => {
                FieldDescriptor::SingleCheckbox(SingleCheckboxField::new(config))
            }
            (FieldType::Custom, _) => FieldDescriptor::Custom(CustomField::new(config)),
            (FieldType::Textarea, _) => FieldDescriptor::Text(TextField::new(config, "textarea")),
            (FieldType::Input(input_type), _) => {
                FieldDescriptor::Text(TextField::new(config, input_type))
            }
            (FieldType::Text, _) => FieldDescriptor::Text(TextField::new(config, "text")),
        };
        Ok(descriptor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::choices::{ChoiceList, Description};
    use crate::fields::Field;
    use serde_json::json;

    #[test]
    fn test_dispatch_by_type() {
        let cases = [
            (FieldConfig::new("a"), "text"),
            (FieldConfig::new("a").field_type("textarea"), "text"),
            (FieldConfig::new("a").field_type("password"), "text"),
            (FieldConfig::new("a").field_type("radio").choices(["x"]), "radio"),
            (FieldConfig::new("a").field_type("select").choices(["x"]), "select"),
            (FieldConfig::new("a").field_type("checkbox").choices(["x"]), "multi_checkbox"),
            (FieldConfig::new("a").field_type("checkbox"), "single_checkbox"),
            (FieldConfig::new("a").field_type("custom"), "custom"),
        ];
        for (config, kind) in cases {
            let ty = config.field_type.clone();
            assert_eq!(FieldFactory::create(config).unwrap().kind(), kind, "type {ty}");
        }
    }

    #[test]
    fn test_empty_name_rejected() {
        assert!(matches!(
            FieldFactory::create(FieldConfig::default()),
            Err(FormError::MissingName)
        ));
        assert!(matches!(
            FieldFactory::create(FieldConfig::new(["", "x"])),
            Err(FormError::MissingName)
        ));
    }

    #[test]
    fn test_defaults_filled() {
        let field = FieldFactory::create(FieldConfig::new("a")).unwrap();
        assert_eq!(field.config().wrap.as_deref(), Some(TOKEN));
        assert_eq!(field.config().wrap_each.as_deref(), Some(TOKEN));
    }

    #[test]
    fn test_choices_expanded_into_config() {
        let field = FieldFactory::create(
            FieldConfig::new("size")
                .field_type("select")
                .choices(["s", "m"])
                .desc_per_choice(["Small", "Medium"]),
        )
        .unwrap();
        assert_eq!(
            field.config().choices,
            Some(ChoiceList::Map(vec![
                ("s".into(), "Small".into()),
                ("m".into(), "Medium".into()),
            ]))
        );
        assert_eq!(field.config().desc, Description::default());
    }

    #[test]
    fn test_textarea_renders_textarea() {
        let field = FieldFactory::create(FieldConfig::new("bio").field_type("textarea")).unwrap();
        assert!(field.render(None).contains("<textarea"));
    }

    #[test]
    fn test_descriptor_passes_through() {
        let field = FieldFactory::create(FieldConfig::new("a").field_type("radio")).unwrap();
        let again = FieldFactory::create(&field).unwrap();
        assert_eq!(again.kind(), "radio");
    }

    #[test]
    fn test_from_raw_json() {
        let raw = json!({"name": "color", "type": "radio", "value": {"r": "Red"}});
        let field = FieldFactory::create(&raw).unwrap();
        assert_eq!(field.validate(&json!("r")), Some(json!("r")));

        assert!(FieldFactory::create(&json!({"type": "text"})).is_err());
        assert!(FieldFactory::create(&json!(42)).is_err());
    }
}
