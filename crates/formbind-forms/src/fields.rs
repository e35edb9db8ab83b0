//! Field descriptors.
//!
//! A descriptor is a ready-to-use view over one normalized [`FieldConfig`].
//! It renders itself given a bound value and validates a raw submitted
//! value. The set of variants is closed: [`FieldDescriptor`] enumerates
//! them and the factory maps a config onto exactly one.

use std::fmt;

use formbind_core::utils::text::escape_textarea;
use serde_json::Value;

use crate::choices::Choices;
use crate::config::{DescPos, FieldConfig, RenderCallback};
use crate::html::{add_desc, add_label, element, Attrs, Content, TOKEN};
use crate::path::FieldPath;
use crate::value::{display, is_truthy, loose_eq, to_key_list, value_key};

/// Class given to text inputs that have no `extra` attributes.
const TEXT_CLASS: &str = "regular-text";

/// Common behavior of every field variant.
pub trait Field: Send + Sync + fmt::Debug {
    /// The normalized configuration.
    fn config(&self) -> &FieldConfig;

    /// The field's data path.
    fn name(&self) -> &FieldPath {
        &self.config().name
    }

    /// Renders the field with `value` bound. `None` and `null` mean "no value".
    fn render(&self, value: Option<&Value>) -> String;

    /// Validates a raw submitted value. `None` means "do not persist".
    fn validate(&self, value: &Value) -> Option<Value>;
}

/// Resolves the value to render: the bound value, else the configured default.
fn bound<'a>(config: &'a FieldConfig, value: Option<&'a Value>) -> Option<&'a Value> {
    value.filter(|v| !v.is_null()).or(config.default.as_ref())
}

fn wrap(template: &str, inner: &str) -> String {
    template.replace(TOKEN, inner)
}

/// One radio or checkbox input labelled with its choice label.
fn choice_input(name: &str, input_type: &str, key: &str, label: &str, checked: bool) -> String {
    let attrs = Attrs::new()
        .with("checked", checked)
        .with("name", name)
        .with("value", key)
        .with("type", input_type);
    add_label(&element("input", &attrs, Content::Empty), label, DescPos::After)
}

/// A text input, a textarea, or any other plain `<input>` type.
#[derive(Debug, Clone)]
pub struct TextField {
    config: FieldConfig,
    input_type: String,
}

impl TextField {
    pub fn new(config: FieldConfig, input_type: impl Into<String>) -> Self {
        Self {
            config,
            input_type: input_type.into(),
        }
    }

    /// The `type` attribute, or `textarea`.
    pub fn input_type(&self) -> &str {
        &self.input_type
    }

    fn render_inner(&self, value: Option<&Value>) -> String {
        let config = &self.config;
        let name = config.name.encode();

        let mut attrs = config
            .extra
            .clone()
            .unwrap_or_else(|| Attrs::new().with("class", TEXT_CLASS));
        if !attrs.contains("id") && !name.contains('[') {
            attrs.set("id", name.clone());
        }
        attrs.set("name", name);

        let value = value.or(config.value.as_ref()).map(display).unwrap_or_default();
        let input = if self.input_type == "textarea" {
            element("textarea", &attrs, Content::Markup(&escape_textarea(&value)))
        } else {
            attrs.set("value", value);
            attrs.set("type", self.input_type.as_str());
            element("input", &attrs, Content::Empty)
        };
        add_label(&input, config.desc.text(), config.desc_pos)
    }
}

impl Field for TextField {
    fn config(&self) -> &FieldConfig {
        &self.config
    }

    fn render(&self, value: Option<&Value>) -> String {
        let inner = self.render_inner(bound(&self.config, value));
        wrap(self.config.wrap_template(), &inner)
    }

    fn validate(&self, value: &Value) -> Option<Value> {
        self.config.sanitizer().call(value, &self.config)
    }
}

/// Accepts `value` iff its key form is one of the choice keys.
fn validate_choice(choices: &Choices, value: &Value) -> Option<Value> {
    value_key(value)
        .filter(|key| choices.contains_key(key))
        .map(|_| value.clone())
}

/// The choice key selected by `value`, if any.
fn selected_key<'a>(choices: &'a Choices, value: Option<&Value>) -> Option<&'a str> {
    let key = value.and_then(value_key)?;
    choices.keys().find(|k| *k == key)
}

/// A drop-down select.
#[derive(Debug, Clone)]
pub struct SelectField {
    config: FieldConfig,
    choices: Choices,
}

impl SelectField {
    pub const fn new(config: FieldConfig, choices: Choices) -> Self {
        Self { config, choices }
    }

    pub const fn choices(&self) -> &Choices {
        &self.choices
    }

    fn render_inner(&self, value: Option<&Value>) -> String {
        let config = &self.config;
        let selected = selected_key(&self.choices, value);

        let mut options = String::new();
        if let Some(text) = &config.text {
            let attrs = Attrs::new()
                .with("value", "")
                .with("selected", selected.is_none());
            options.push_str(&element("option", &attrs, Content::Markup(text)));
        }
        for (key, label) in self.choices.iter() {
            let attrs = Attrs::new()
                .with("value", key)
                .with("selected", selected == Some(key));
            options.push_str(&element("option", &attrs, Content::Markup(label)));
        }

        let mut attrs = config.extra.clone().unwrap_or_default();
        attrs.set("name", config.name.encode());
        let input = element("select", &attrs, Content::Markup(&options));
        add_label(&input, config.desc.text(), config.desc_pos)
    }
}

impl Field for SelectField {
    fn config(&self) -> &FieldConfig {
        &self.config
    }

    fn render(&self, value: Option<&Value>) -> String {
        let inner = self.render_inner(bound(&self.config, value));
        wrap(self.config.wrap_template(), &inner)
    }

    fn validate(&self, value: &Value) -> Option<Value> {
        validate_choice(&self.choices, value)
    }
}

/// A radio button group. Exactly one option is always checked.
#[derive(Debug, Clone)]
pub struct RadioField {
    config: FieldConfig,
    choices: Choices,
}

impl RadioField {
    pub const fn new(config: FieldConfig, choices: Choices) -> Self {
        Self { config, choices }
    }

    pub const fn choices(&self) -> &Choices {
        &self.choices
    }

    fn render_inner(&self, value: Option<&Value>) -> String {
        let config = &self.config;
        let name = config.name.encode();
        let selected = selected_key(&self.choices, value).or_else(|| self.choices.first_key());

        let options: String = self
            .choices
            .iter()
            .map(|(key, label)| {
                let input = choice_input(&name, "radio", key, label, selected == Some(key));
                wrap(config.wrap_each_template(), &input)
            })
            .collect();
        add_desc(&options, config.desc.text(), config.desc_pos)
    }
}

impl Field for RadioField {
    fn config(&self) -> &FieldConfig {
        &self.config
    }

    fn render(&self, value: Option<&Value>) -> String {
        let inner = self.render_inner(bound(&self.config, value));
        wrap(self.config.wrap_template(), &inner)
    }

    fn validate(&self, value: &Value) -> Option<Value> {
        validate_choice(&self.choices, value)
    }
}

/// A group of checkboxes submitting a list of choice keys.
#[derive(Debug, Clone)]
pub struct MultiCheckboxField {
    config: FieldConfig,
    choices: Choices,
}

impl MultiCheckboxField {
    pub const fn new(config: FieldConfig, choices: Choices) -> Self {
        Self { config, choices }
    }

    pub const fn choices(&self) -> &Choices {
        &self.choices
    }

    fn render_inner(&self, value: Option<&Value>) -> String {
        let config = &self.config;
        let name = format!("{}[]", config.name.encode());
        let checked = value.map(to_key_list).unwrap_or_default();

        let options: String = self
            .choices
            .iter()
            .map(|(key, label)| {
                let on = checked.iter().any(|k| k == key);
                let input = choice_input(&name, "checkbox", key, label, on);
                wrap(config.wrap_each_template(), &input)
            })
            .collect();
        add_desc(&options, config.desc.text(), config.desc_pos)
    }
}

impl Field for MultiCheckboxField {
    fn config(&self) -> &FieldConfig {
        &self.config
    }

    fn render(&self, value: Option<&Value>) -> String {
        let inner = self.render_inner(bound(&self.config, value));
        wrap(self.config.wrap_template(), &inner)
    }

    /// Keeps the submitted keys that are choice keys, in choice order.
    fn validate(&self, value: &Value) -> Option<Value> {
        let submitted = to_key_list(value);
        let kept = self
            .choices
            .keys()
            .filter(|key| submitted.iter().any(|s| s == key))
            .map(Value::from)
            .collect();
        Some(Value::Array(kept))
    }
}

/// A lone on/off checkbox.
#[derive(Debug, Clone)]
pub struct SingleCheckboxField {
    config: FieldConfig,
}

impl SingleCheckboxField {
    pub const fn new(config: FieldConfig) -> Self {
        Self { config }
    }

    /// The value submitted when checked. Defaults to `true`.
    pub fn on_value(&self) -> Value {
        self.config.value.clone().unwrap_or(Value::Bool(true))
    }

    fn render_inner(&self, value: Option<&Value>) -> String {
        let config = &self.config;
        let on = self.on_value();
        let checked = value.is_some_and(|v| is_truthy(v) || loose_eq(v, &on));

        let mut attrs = config.extra.clone().unwrap_or_default();
        attrs.set("checked", checked);
        attrs.set("name", config.name.encode());
        attrs.set("value", display(&on));
        attrs.set("type", "checkbox");
        let input = element("input", &attrs, Content::Empty);
        add_label(&input, config.desc.text(), config.desc_pos)
    }
}

impl Field for SingleCheckboxField {
    fn config(&self) -> &FieldConfig {
        &self.config
    }

    fn render(&self, value: Option<&Value>) -> String {
        let inner = self.render_inner(bound(&self.config, value));
        wrap(self.config.wrap_template(), &inner)
    }

    fn validate(&self, value: &Value) -> Option<Value> {
        Some(Value::Bool(is_truthy(value)))
    }
}

/// A field whose rendering and validation are host callbacks.
///
/// No default substitution or `wrap` is applied; the callback owns the markup.
#[derive(Debug, Clone)]
pub struct CustomField {
    config: FieldConfig,
}

impl CustomField {
    pub const fn new(config: FieldConfig) -> Self {
        Self { config }
    }
}

impl Field for CustomField {
    fn config(&self) -> &FieldConfig {
        &self.config
    }

    fn render(&self, value: Option<&Value>) -> String {
        let callback = self.config.render.clone().unwrap_or_else(RenderCallback::default);
        callback.call(value.filter(|v| !v.is_null()), &self.config)
    }

    fn validate(&self, value: &Value) -> Option<Value> {
        self.config.sanitizer().call(value, &self.config)
    }
}

/// Every field variant.
#[derive(Debug, Clone)]
pub enum FieldDescriptor {
    Text(TextField),
    Select(SelectField),
    Radio(RadioField),
    MultiCheckbox(MultiCheckboxField),
    SingleCheckbox(SingleCheckboxField),
    Custom(CustomField),
}

impl FieldDescriptor {
    /// A short name for the variant.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Select(_) => "select",
            Self::Radio(_) => "radio",
            Self::MultiCheckbox(_) => "multi_checkbox",
            Self::SingleCheckbox(_) => "single_checkbox",
            Self::Custom(_) => "custom",
        }
    }

    fn inner(&self) -> &dyn Field {
        match self {
            Self::Text(f) => f,
            Self::Select(f) => f,
            Self::Radio(f) => f,
            Self::MultiCheckbox(f) => f,
            Self::SingleCheckbox(f) => f,
            Self::Custom(f) => f,
        }
    }
}

impl Field for FieldDescriptor {
    fn config(&self) -> &FieldConfig {
        self.inner().config()
    }

    fn render(&self, value: Option<&Value>) -> String {
        self.inner().render(value)
    }

    fn validate(&self, value: &Value) -> Option<Value> {
        self.inner().validate(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn colors() -> Choices {
        Choices::new(vec![
            ("red".into(), "Red".into()),
            ("blue".into(), "Blue".into()),
        ])
    }

    #[test]
    fn test_text_render_simple_name_gets_id() {
        let field = TextField::new(FieldConfig::new("title"), "text");
        assert_eq!(
            field.render(Some(&json!("Hi"))),
            "<label><input class=\"regular-text\" id=\"title\" name=\"title\" value=\"Hi\" type=\"text\" /></label>\n"
        );
    }

    #[test]
    fn test_text_render_nested_name_no_id() {
        let field = TextField::new(FieldConfig::new(["a", "b"]).attr("size", "5"), "email");
        assert_eq!(
            field.render(None),
            "<label><input size=\"5\" name=\"a[b]\" value=\"\" type=\"email\" /></label>\n"
        );
    }

    #[test]
    fn test_text_render_keeps_explicit_id_and_desc_before() {
        let config = FieldConfig::new("x")
            .attr("id", "custom")
            .desc("Label")
            .desc_pos(DescPos::Before);
        let html = TextField::new(config, "text").render(Some(&json!(3)));
        assert_eq!(
            html,
            "<label>Label <input id=\"custom\" name=\"x\" value=\"3\" type=\"text\" /></label>\n"
        );
    }

    #[test]
    fn test_textarea_escapes_content() {
        let field = TextField::new(FieldConfig::new("bio"), "textarea");
        assert_eq!(
            field.render(Some(&json!("a & <b>"))),
            "<label><textarea class=\"regular-text\" id=\"bio\" name=\"bio\">a &amp; &lt;b&gt;</textarea></label>\n"
        );
    }

    #[test]
    fn test_textarea_body_cannot_close_the_element() {
        let field = TextField::new(FieldConfig::new("bio"), "textarea");
        let html = field.render(Some(&json!("</textarea><script>x</script>")));
        assert_eq!(html.matches("</textarea>").count(), 1);
        assert!(html.contains("&lt;/textarea&gt;&lt;script&gt;"));
    }

    #[test]
    fn test_default_used_when_unbound() {
        let field = TextField::new(FieldConfig::new("n").default_value("dflt"), "text");
        assert!(field.render(None).contains("value=\"dflt\""));
        assert!(field.render(Some(&Value::Null)).contains("value=\"dflt\""));
        assert!(field.render(Some(&json!(""))).contains("value=\"\""));
    }

    #[test]
    fn test_wrap_applied() {
        let field = TextField::new(FieldConfig::new("n").wrap("<p>%input%</p>"), "text");
        let html = field.render(None);
        assert!(html.starts_with("<p><label>"));
        assert!(html.ends_with("</label>\n</p>"));
    }

    #[test]
    fn test_text_validate_uses_sanitizer() {
        let field = TextField::new(FieldConfig::new("n"), "text");
        assert_eq!(field.validate(&json!("<u>x</u>")), Some(json!("x")));

        let upper = FieldConfig::new("n").sanitize(|v, _| Some(json!(display(v).to_uppercase())));
        assert_eq!(TextField::new(upper, "text").validate(&json!("ab")), Some(json!("AB")));
    }

    #[test]
    fn test_select_render_marks_selected() {
        let field = SelectField::new(FieldConfig::new("c").text("Pick"), colors());
        assert_eq!(
            field.render(Some(&json!("blue"))),
            "<label><select name=\"c\"><option value=\"\">Pick</option><option value=\"red\">Red</option><option value=\"blue\" selected>Blue</option></select></label>\n"
        );
    }

    #[test]
    fn test_select_placeholder_selected_when_nothing_matches() {
        let field = SelectField::new(FieldConfig::new("c").text("Pick"), colors());
        let html = field.render(Some(&json!("green")));
        assert!(html.contains("<option value=\"\" selected>Pick</option>"));
        assert!(!html.contains("value=\"red\" selected"));
    }

    #[test]
    fn test_select_validate() {
        let field = SelectField::new(FieldConfig::new("c"), colors());
        assert_eq!(field.validate(&json!("red")), Some(json!("red")));
        assert_eq!(field.validate(&json!("green")), None);
        assert_eq!(field.validate(&json!(null)), None);
    }

    #[test]
    fn test_radio_forces_first_choice() {
        let field = RadioField::new(FieldConfig::new("r"), colors());
        let expected = "<label><input checked name=\"r\" value=\"red\" type=\"radio\" /> Red</label>\n\
                        <label><input name=\"r\" value=\"blue\" type=\"radio\" /> Blue</label>\n";
        assert_eq!(field.render(None), expected);
        assert_eq!(field.render(Some(&json!("purple"))), expected);
    }

    #[test]
    fn test_radio_wrap_each_and_desc() {
        let config = FieldConfig::new("r").wrap_each("<li>%input%</li>").desc("Pick one");
        let html = RadioField::new(config, colors()).render(Some(&json!("blue")));
        assert!(html.starts_with("<li><label><input name=\"r\" value=\"red\""));
        assert!(html.contains("<input checked name=\"r\" value=\"blue\""));
        assert!(html.ends_with("</li> Pick one"));
    }

    #[test]
    fn test_radio_numeric_keys_match_numbers() {
        let choices = Choices::new(vec![("0".into(), "No".into()), ("1".into(), "Yes".into())]);
        let html = RadioField::new(FieldConfig::new("r"), choices).render(Some(&json!(1)));
        assert!(html.contains("<input checked name=\"r\" value=\"1\""));
    }

    #[test]
    fn test_multi_checkbox_render() {
        let field = MultiCheckboxField::new(FieldConfig::new(["s", "tags"]), colors());
        assert_eq!(
            field.render(Some(&json!(["blue"]))),
            "<label><input name=\"s[tags][]\" value=\"red\" type=\"checkbox\" /> Red</label>\n\
             <label><input checked name=\"s[tags][]\" value=\"blue\" type=\"checkbox\" /> Blue</label>\n"
        );
    }

    #[test]
    fn test_multi_checkbox_validate_intersection() {
        let choices = Choices::new(vec![
            ("a".into(), "A".into()),
            ("b".into(), "B".into()),
            ("c".into(), "C".into()),
        ]);
        let field = MultiCheckboxField::new(FieldConfig::new("m"), choices);
        assert_eq!(field.validate(&json!(["c", "b", "x", "b"])), Some(json!(["b", "c"])));
        assert_eq!(field.validate(&json!(null)), Some(json!([])));
        assert_eq!(field.validate(&json!("a")), Some(json!(["a"])));
    }

    #[test]
    fn test_single_checkbox_render() {
        let field = SingleCheckboxField::new(FieldConfig::new("enabled").desc("Enable"));
        assert_eq!(
            field.render(Some(&json!(true))),
            "<label><input checked name=\"enabled\" value=\"1\" type=\"checkbox\" /> Enable</label>\n"
        );
        assert_eq!(
            field.render(None),
            "<label><input name=\"enabled\" value=\"1\" type=\"checkbox\" /> Enable</label>\n"
        );
    }

    #[test]
    fn test_single_checkbox_custom_on_value() {
        let field = SingleCheckboxField::new(FieldConfig::new("agree").value("yes"));
        let html = field.render(Some(&json!("yes")));
        assert!(html.contains("<input checked name=\"agree\" value=\"yes\""));
        assert!(!field.render(Some(&json!(""))).contains("checked"));
    }

    #[test]
    fn test_single_checkbox_validate() {
        let field = SingleCheckboxField::new(FieldConfig::new("c"));
        assert_eq!(field.validate(&json!(null)), Some(json!(false)));
        assert_eq!(field.validate(&json!("1")), Some(json!(true)));
        assert_eq!(field.validate(&json!(false)), Some(json!(false)));
    }

    #[test]
    fn test_custom_delegates() {
        let config = FieldConfig::new("c")
            .wrap("<div>%input%</div>")
            .default_value("ignored")
            .render(|v, cfg| format!("{}={}", cfg.name, v.map(display).unwrap_or_default()))
            .sanitize(|v, _| v.as_str().map(|s| json!(s.trim())));
        let field = CustomField::new(config);
        assert_eq!(field.render(Some(&json!("x"))), "c=x");
        assert_eq!(field.render(None), "c=");
        assert_eq!(field.validate(&json!("  y ")), Some(json!("y")));
        assert_eq!(field.validate(&json!(1)), None);
    }

    #[test]
    fn test_custom_default_callbacks() {
        let field = CustomField::new(FieldConfig::new("c"));
        assert_eq!(field.render(Some(&json!(1))), "<pre>1</pre>");
        assert_eq!(field.validate(&json!("<i>ok</i>")), Some(json!("<i>ok</i>")));
    }

    #[test]
    fn test_descriptor_dispatch() {
        let descriptor = FieldDescriptor::Select(SelectField::new(FieldConfig::new("c"), colors()));
        assert_eq!(descriptor.kind(), "select");
        assert_eq!(descriptor.name().encode(), "c");
        assert_eq!(descriptor.validate(&json!("blue")), Some(json!("blue")));
    }
}
