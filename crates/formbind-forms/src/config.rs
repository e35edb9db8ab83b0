//! Field configuration records.
//!
//! A [`FieldConfig`] is the typed, normalized form of one field definition.
//! It is built either through the builder methods or from a raw JSON mapping
//! with [`FieldConfig::from_value`], which applies the legacy option aliases.

use std::fmt;
use std::sync::Arc;

use formbind_core::utils::kses::filter_kses;
use formbind_core::utils::text::escape_html;
use formbind_core::{FormError, FormResult};
use serde_json::Value;

use crate::choices::{ChoiceList, Description};
use crate::html::{AttrValue, Attrs, TOKEN};
use crate::path::FieldPath;
use crate::value::display;

/// The control type of a field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FieldType {
    /// A single-line text input.
    #[default]
    Text,
    /// A multi-line text area.
    Textarea,
    /// A radio button group.
    Radio,
    /// A drop-down select.
    Select,
    /// A single checkbox, or a checkbox group when choices are present.
    Checkbox,
    /// A field rendered and sanitized entirely by callbacks.
    Custom,
    /// Any other input type (`password`, `hidden`, `email`, ...), rendered as a text input.
    Input(String),
}

impl FieldType {
    /// Parses a type tag. Unknown tags become [`FieldType::Input`].
    pub fn parse(tag: &str) -> Self {
        match tag {
            "" | "text" => Self::Text,
            "textarea" => Self::Textarea,
            "radio" => Self::Radio,
            "select" => Self::Select,
            "checkbox" => Self::Checkbox,
            "custom" => Self::Custom,
            other => Self::Input(other.to_string()),
        }
    }

    /// Returns the type tag.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text => "text",
            Self::Textarea => "textarea",
            Self::Radio => "radio",
            Self::Select => "select",
            Self::Checkbox => "checkbox",
            Self::Custom => "custom",
            Self::Input(tag) => tag,
        }
    }
}

impl From<&str> for FieldType {
    fn from(tag: &str) -> Self {
        Self::parse(tag)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a description is placed relative to its control.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DescPos {
    /// Before the control.
    Before,
    /// After the control.
    #[default]
    After,
}

impl DescPos {
    /// Parses `"before"`; anything else is [`DescPos::After`].
    pub fn parse(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("before") {
            Self::Before
        } else {
            Self::After
        }
    }
}

type SanitizeFn = dyn Fn(&Value, &FieldConfig) -> Option<Value> + Send + Sync;
type RenderFn = dyn Fn(Option<&Value>, &FieldConfig) -> String + Send + Sync;

/// A sanitizer callback: `(raw value, config) -> sanitized value`, or `None`
/// to reject.
///
/// The default runs [`filter_kses`] over the value.
#[derive(Clone)]
pub struct Sanitizer(Arc<SanitizeFn>);

impl Sanitizer {
    /// Wraps a closure.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Value, &FieldConfig) -> Option<Value> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Invokes the callback.
    pub fn call(&self, value: &Value, config: &FieldConfig) -> Option<Value> {
        (self.0)(value, config)
    }
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self::new(|value, _| Some(filter_kses(value)))
    }
}

impl fmt::Debug for Sanitizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Sanitizer(..)")
    }
}

/// A render callback for custom fields: `(bound value, config) -> markup`.
///
/// The default is a debug dump of the bound value.
#[derive(Clone)]
pub struct RenderCallback(Arc<RenderFn>);

impl RenderCallback {
    /// Wraps a closure.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Option<&Value>, &FieldConfig) -> String + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Invokes the callback.
    pub fn call(&self, value: Option<&Value>, config: &FieldConfig) -> String {
        (self.0)(value, config)
    }
}

impl Default for RenderCallback {
    fn default() -> Self {
        Self::new(|value, _| debug_dump(value))
    }
}

impl fmt::Debug for RenderCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RenderCallback(..)")
    }
}

/// Dumps a value as escaped, pretty-printed JSON inside `<pre>`.
pub fn debug_dump(value: Option<&Value>) -> String {
    let value = value.unwrap_or(&Value::Null);
    let pretty = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
    format!("<pre>{}</pre>", escape_html(&pretty))
}

/// One field definition.
///
/// # Examples
///
/// ```
/// use formbind_forms::{FieldConfig, FieldType};
///
/// let config = FieldConfig::new(["profile", "color"])
///     .field_type(FieldType::Select)
///     .choices(["red", "blue"])
///     .desc("Favourite colour");
/// assert_eq!(config.name.encode(), "profile[color]");
/// ```
#[derive(Debug, Clone, Default)]
pub struct FieldConfig {
    pub name: FieldPath,
    pub field_type: FieldType,
    pub choices: Option<ChoiceList>,
    pub desc: Description,
    pub desc_pos: DescPos,
    pub wrap: Option<String>,
    pub wrap_each: Option<String>,
    pub extra: Option<Attrs>,
    pub sanitize: Option<Sanitizer>,
    pub render: Option<RenderCallback>,
    pub numeric: bool,
    pub default: Option<Value>,
    /// Static value for text inputs, or the "on" value of a single checkbox.
    pub value: Option<Value>,
    /// Row header used by table rendering. Emitted raw.
    pub title: String,
    /// Placeholder option label for selects.
    pub text: Option<String>,
}

impl FieldConfig {
    pub fn new(name: impl Into<FieldPath>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn field_type(mut self, field_type: impl Into<FieldType>) -> Self {
        self.field_type = field_type.into();
        self
    }

    /// Sets a plain choice list.
    #[must_use]
    pub fn choices<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.choices = Some(ChoiceList::List(values.into_iter().map(Into::into).collect()));
        self
    }

    /// Sets an ordered key→label choice map.
    #[must_use]
    pub fn choice_map<I, K, L>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, L)>,
        K: Into<String>,
        L: Into<String>,
    {
        self.choices = Some(ChoiceList::Map(
            pairs.into_iter().map(|(k, l)| (k.into(), l.into())).collect(),
        ));
        self
    }

    #[must_use]
    pub fn desc(mut self, desc: impl Into<String>) -> Self {
        self.desc = Description::Text(desc.into());
        self
    }

    /// Sets one label per entry of a plain choice list.
    #[must_use]
    pub fn desc_per_choice<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.desc = Description::PerChoice(labels.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub const fn desc_pos(mut self, desc_pos: DescPos) -> Self {
        self.desc_pos = desc_pos;
        self
    }

    #[must_use]
    pub fn wrap(mut self, template: impl Into<String>) -> Self {
        self.wrap = Some(template.into());
        self
    }

    #[must_use]
    pub fn wrap_each(mut self, template: impl Into<String>) -> Self {
        self.wrap_each = Some(template.into());
        self
    }

    #[must_use]
    pub fn extra(mut self, attrs: Attrs) -> Self {
        self.extra = Some(attrs);
        self
    }

    /// Sets extra attributes from a flat attribute string.
    #[must_use]
    pub fn extra_str(self, raw: &str) -> Self {
        self.extra(Attrs::parse(raw))
    }

    /// Adds one extra attribute.
    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.extra.get_or_insert_with(Attrs::new).set(name, value);
        self
    }

    #[must_use]
    pub fn sanitize<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value, &Self) -> Option<Value> + Send + Sync + 'static,
    {
        self.sanitize = Some(Sanitizer::new(f));
        self
    }

    #[must_use]
    pub fn render<F>(mut self, f: F) -> Self
    where
        F: Fn(Option<&Value>, &Self) -> String + Send + Sync + 'static,
    {
        self.render = Some(RenderCallback::new(f));
        self
    }

    #[must_use]
    pub const fn numeric(mut self, numeric: bool) -> Self {
        self.numeric = numeric;
        self
    }

    #[must_use]
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    #[must_use]
    pub fn value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// The `wrap` template, or the bare token.
    pub fn wrap_template(&self) -> &str {
        self.wrap.as_deref().unwrap_or(TOKEN)
    }

    /// The `wrap_each` template, or the bare token.
    pub fn wrap_each_template(&self) -> &str {
        self.wrap_each.as_deref().unwrap_or(TOKEN)
    }

    /// The effective sanitizer.
    pub fn sanitizer(&self) -> Sanitizer {
        self.sanitize.clone().unwrap_or_default()
    }

    /// Builds a config from a raw JSON mapping.
    ///
    /// Aliases are normalized in order: an array or object under `value`
    /// becomes `choices`, then `values` becomes `choices`. A string `extra`
    /// is parsed as an attribute string, and an array `desc` supplies
    /// per-choice labels. Callbacks cannot be given this way.
    ///
    /// # Examples
    ///
    /// ```
    /// use formbind_forms::{FieldConfig, FieldType};
    /// use serde_json::json;
    ///
    /// let config = FieldConfig::from_value(&json!({
    ///     "name": ["opts", "mode"],
    ///     "type": "radio",
    ///     "values": ["fast", "safe"],
    ///     "extra": "class=\"inline\"",
    /// })).unwrap();
    /// assert_eq!(config.field_type, FieldType::Radio);
    /// assert!(config.choices.is_some());
    /// assert!(config.extra.unwrap().contains("class"));
    /// ```
    pub fn from_value(raw: &Value) -> FormResult<Self> {
        let Value::Object(map) = raw else {
            return Err(FormError::InvalidConfig(format!(
                "field config must be a mapping, got {raw}"
            )));
        };

        let mut config = Self {
            name: map.get("name").and_then(FieldPath::from_value).unwrap_or_default(),
            ..Self::default()
        };

        if let Some(tag) = map.get("type").and_then(Value::as_str) {
            config.field_type = FieldType::parse(tag);
        }

        let mut choices = map.get("choices").cloned();
        let mut value = map.get("value").cloned();
        if matches!(value, Some(Value::Array(_) | Value::Object(_))) {
            choices = value.take();
        }
        if let Some(values) = map.get("values") {
            choices = Some(values.clone());
        }
        config.choices = choices.as_ref().and_then(ChoiceList::from_value);
        config.value = value;

        config.desc = match map.get("desc") {
            Some(Value::Array(labels)) => Description::PerChoice(labels.iter().map(display).collect()),
            Some(other) => Description::Text(display(other)),
            None => Description::default(),
        };
        if let Some(pos) = map.get("desc_pos").and_then(Value::as_str) {
            config.desc_pos = DescPos::parse(pos);
        }

        config.wrap = map.get("wrap").and_then(Value::as_str).map(str::to_string);
        config.wrap_each = map.get("wrap_each").and_then(Value::as_str).map(str::to_string);

        config.extra = match map.get("extra") {
            Some(Value::String(raw)) => Some(Attrs::parse(raw)),
            Some(Value::Object(attrs)) => Some(
                attrs
                    .iter()
                    .map(|(name, v)| {
                        let attr = match v {
                            Value::Bool(flag) => AttrValue::Flag(*flag),
                            Value::Null => AttrValue::Flag(false),
                            other => AttrValue::Text(display(other)),
                        };
                        (name.clone(), attr)
                    })
                    .collect(),
            ),
            _ => None,
        };

        config.numeric = map.get("numeric").is_some_and(crate::value::is_truthy);
        config.default = map.get("default").filter(|v| !v.is_null()).cloned();
        config.title = map.get("title").map(display).unwrap_or_default();
        config.text = map.get("text").map(display);

        Ok(config)
    }
}
