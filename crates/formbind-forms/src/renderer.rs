//! Composes fields into rows, tables, and forms.

use std::fmt;
use std::sync::Arc;

use formbind_core::logging::form_span;
use formbind_core::signing::{NonceProvider, NonceSigner};
use formbind_core::Settings;
use serde_json::Value;

use crate::factory::{FieldFactory, IntoDescriptor};
use crate::fields::Field;
use crate::html::{element, Attrs, Content};
use crate::path::get_value;

/// Renders one field with an explicit bound value.
///
/// A field whose config fails to build renders as the empty string.
pub fn input_with_value(config: impl IntoDescriptor, value: Option<&Value>) -> String {
    FieldFactory::create(config).map_or_else(|_| String::new(), |field| field.render(value))
}

/// Renders one field, binding the value found at its path in `data`.
///
/// # Examples
///
/// ```
/// use formbind_forms::{input, FieldConfig};
/// use serde_json::json;
///
/// let html = input(FieldConfig::new(["opts", "on"]).field_type("checkbox"), &json!({"opts": {"on": true}}));
/// assert_eq!(html, "<label><input checked name=\"opts[on]\" value=\"1\" type=\"checkbox\" /></label>\n");
/// ```
pub fn input(config: impl IntoDescriptor, data: &Value) -> String {
    match FieldFactory::create(config) {
        Ok(field) => field.render(get_value(data, field.name())),
        Err(_) => String::new(),
    }
}

/// Row, table, and form composition bound to settings and a token provider.
#[derive(Clone)]
pub struct FormRenderer {
    settings: Settings,
    nonce: Arc<dyn NonceProvider>,
}

impl fmt::Debug for FormRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormRenderer")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl FormRenderer {
    pub fn new(settings: Settings, nonce: Arc<dyn NonceProvider>) -> Self {
        Self { settings, nonce }
    }

    /// Creates a renderer that signs tokens with `settings.secret_key`.
    pub fn from_settings(settings: Settings) -> Self {
        if settings.secret_key.is_empty() {
            tracing::warn!("secret_key is empty; anti-forgery tokens are signed with an empty key");
        }
        let signer = NonceSigner::new(settings.secret_key.clone())
            .with_field_name(settings.nonce_field_name.clone());
        Self::new(settings, Arc::new(signer))
    }

    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// See [`input`].
    pub fn input(&self, config: impl IntoDescriptor, data: &Value) -> String {
        input(config, data)
    }

    /// See [`input_with_value`].
    pub fn input_with_value(&self, config: impl IntoDescriptor, value: Option<&Value>) -> String {
        input_with_value(config, value)
    }

    /// Renders a field as a two-cell table row headed by its `title`.
    pub fn table_row(&self, config: impl IntoDescriptor, data: &Value) -> String {
        match FieldFactory::create(config) {
            Ok(field) => {
                let html = field.render(get_value(data, field.name()));
                Self::row_wrap(&field.config().title, &html)
            }
            Err(_) => String::new(),
        }
    }

    /// Renders rows inside a table.
    pub fn table<I>(&self, rows: I, data: &Value) -> String
    where
        I: IntoIterator,
        I::Item: IntoDescriptor,
    {
        let content: String = rows.into_iter().map(|row| self.table_row(row, data)).collect();
        self.table_wrap(&content)
    }

    /// Renders fields inside a form carrying a token for `nonce_action`.
    pub fn form<I>(&self, fields: I, data: &Value, nonce_action: &str) -> String
    where
        I: IntoIterator,
        I::Item: IntoDescriptor,
    {
        let _span = form_span(nonce_action).entered();
        let content: String = fields.into_iter().map(|field| input(field, data)).collect();
        self.form_wrap(&content, Some(nonce_action))
    }

    /// Renders rows as a table inside a form.
    ///
    /// `None` uses the configured default token action.
    pub fn form_table<I>(&self, rows: I, data: &Value, nonce_action: Option<&str>) -> String
    where
        I: IntoIterator,
        I::Item: IntoDescriptor,
    {
        let action = self.action(nonce_action);
        let _span = form_span(action).entered();
        let content: String = rows.into_iter().map(|row| self.table_row(row, data)).collect();
        self.form_table_wrap(&content, Some(action))
    }

    /// Wraps content in a table inside a form.
    pub fn form_table_wrap(&self, content: &str, nonce_action: Option<&str>) -> String {
        self.form_wrap(&self.table_wrap(content), nonce_action)
    }

    /// Wraps content in a post form followed by the token field.
    pub fn form_wrap(&self, content: &str, nonce_action: Option<&str>) -> String {
        let body = format!("{content}{}", self.nonce.nonce_field(self.action(nonce_action)));
        let attrs = Attrs::new()
            .with("method", "post")
            .with("action", self.settings.form_action.as_str());
        element("form", &attrs, Content::Markup(&body))
    }

    pub fn table_wrap(&self, content: &str) -> String {
        let attrs = Attrs::new().with("class", self.settings.table_class.as_str());
        element("table", &attrs, Content::Markup(content))
    }

    /// A row with a raw `title` header cell and a content cell.
    pub fn row_wrap(title: &str, content: &str) -> String {
        let th = element("th", &Attrs::new().with("scope", "row"), Content::Markup(title));
        let td = element("td", &Attrs::new(), Content::Markup(content));
        element("tr", &Attrs::new(), Content::Markup(&(th + &td)))
    }

    fn action<'a>(&'a self, nonce_action: Option<&'a str>) -> &'a str {
        nonce_action.unwrap_or(&self.settings.default_nonce_action)
    }
}

/// A token provider that always emits the same token.
#[derive(Debug, Clone)]
pub struct StaticNonce {
    token: String,
    field_name: String,
}

impl StaticNonce {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            field_name: "_wpnonce".to_string(),
        }
    }

    /// Sets the name of the emitted hidden field.
    #[must_use]
    pub fn with_field_name(mut self, name: impl Into<String>) -> Self {
        self.field_name = name.into();
        self
    }
}

impl NonceProvider for StaticNonce {
    fn nonce_field(&self, action: &str) -> String {
        let attrs = Attrs::new()
            .with("type", "hidden")
            .with("name", self.field_name.as_str())
            .with("value", format!("{action}:{}", self.token));
        element("input", &attrs, Content::Empty)
    }
}
