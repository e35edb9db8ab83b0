//! The markup primitive.
//!
//! Every control and wrapper is emitted through [`element`], which takes a
//! tag, an ordered attribute map, and the element content. Attribute order
//! is insertion order, so output is deterministic.

use std::sync::OnceLock;

use formbind_core::utils::text::{escape_attr, escape_html};
use regex::Regex;

use crate::config::DescPos;

/// Placeholder substituted by a field's inner markup inside `wrap` and
/// `wrap_each` templates.
pub const TOKEN: &str = "%input%";

/// Elements rendered without content or closing tag.
const VOID_TAGS: &[&str] = &[
    "area", "base", "basefont", "br", "hr", "input", "img", "link", "meta",
];

/// The value of one attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
    /// `true` renders the bare attribute name; `false` omits the attribute.
    Flag(bool),
    /// Rendered as `name="value"`, attribute-escaped.
    Text(String),
}

impl From<bool> for AttrValue {
    fn from(flag: bool) -> Self {
        Self::Flag(flag)
    }
}

impl From<&str> for AttrValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

/// An insertion-ordered attribute map.
///
/// # Examples
///
/// ```
/// use formbind_forms::html::Attrs;
///
/// let attrs = Attrs::parse(r#"class="wide" data-x='1' size=3 disabled"#);
/// assert_eq!(attrs.len(), 4);
/// assert!(attrs.contains("disabled"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attrs(Vec<(String, AttrValue)>);

impl Attrs {
    /// Creates an empty attribute map.
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Parses a flat attribute string such as `class="a" id='b' size=3 disabled`.
    ///
    /// Names are lowercased. Bare words become `true` flags; quoted values
    /// with no name are ignored.
    pub fn parse(raw: &str) -> Self {
        static ATTR: OnceLock<Regex> = OnceLock::new();
        let attr = ATTR.get_or_init(|| {
            Regex::new(
                r#"([\w-]+)\s*=\s*"([^"]*)"(?:\s|$)|([\w-]+)\s*=\s*'([^']*)'(?:\s|$)|([\w-]+)\s*=\s*([^\s'"]+)(?:\s|$)|"[^"]*"(?:\s|$)|'[^']*'(?:\s|$)|(\S+)(?:\s|$)"#,
            )
            .unwrap()
        });

        let mut attrs = Self::new();
        for caps in attr.captures_iter(raw) {
            let pair = [(1, 2), (3, 4), (5, 6)]
                .iter()
                .find_map(|(n, v)| Some((caps.get(*n)?, caps.get(*v)?)));
            if let Some((name, value)) = pair {
                attrs.set(name.as_str().to_lowercase(), value.as_str());
            } else if let Some(bare) = caps.get(7) {
                let bare = bare.as_str();
                if bare.chars().all(|c| c.is_alphanumeric() || c == '-' || c == '_') {
                    attrs.set(bare.to_lowercase(), true);
                }
            }
        }
        attrs
    }

    /// Sets an attribute, keeping its position if it already exists.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<AttrValue>) {
        let name = name.into();
        let value = value.into();
        if let Some(slot) = self.0.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = value;
        } else {
            self.0.push((name, value));
        }
    }

    /// Builder form of [`set`](Self::set).
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.set(name, value);
        self
    }

    /// Returns the value of an attribute.
    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Returns `true` if the attribute is set, whatever its value.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Returns the number of attributes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no attributes are set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates attributes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v))
    }

    fn render(&self) -> String {
        let mut out = String::new();
        for (name, value) in &self.0 {
            match value {
                AttrValue::Flag(false) => {}
                AttrValue::Flag(true) => {
                    out.push(' ');
                    out.push_str(name);
                }
                AttrValue::Text(text) => {
                    out.push_str(&format!(r#" {name}="{}""#, escape_attr(text)));
                }
            }
        }
        out
    }
}

impl<K: Into<String>, V: Into<AttrValue>> FromIterator<(K, V)> for Attrs {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attrs = Self::new();
        for (name, value) in iter {
            attrs.set(name, value);
        }
        attrs
    }
}

/// Element content.
#[derive(Debug, Clone, Copy)]
pub enum Content<'a> {
    /// No content.
    Empty,
    /// Text that is HTML-escaped on output.
    Text(&'a str),
    /// Markup embedded verbatim.
    Markup(&'a str),
}

/// Renders one element.
///
/// # Examples
///
/// ```
/// use formbind_forms::html::{element, Attrs, Content};
///
/// let attrs = Attrs::new().with("type", "checkbox").with("checked", true).with("disabled", false);
/// assert_eq!(element("input", &attrs, Content::Empty), r#"<input type="checkbox" checked />"#);
/// assert_eq!(element("th", &Attrs::new(), Content::Text("a<b")), "<th>a&lt;b</th>");
/// ```
pub fn element(tag: &str, attrs: &Attrs, content: Content<'_>) -> String {
    let attrs = attrs.render();
    if VOID_TAGS.contains(&tag) {
        return format!("<{tag}{attrs} />");
    }
    let body = match content {
        Content::Empty => String::new(),
        Content::Text(text) => escape_html(text),
        Content::Markup(markup) => markup.to_string(),
    };
    format!("<{tag}{attrs}>{body}</{tag}>")
}

/// Wraps a control and its description in a `<label>`, followed by a newline.
pub fn add_label(input: &str, desc: &str, desc_pos: DescPos) -> String {
    let inner = add_desc(input, desc, desc_pos);
    element("label", &Attrs::new(), Content::Markup(&inner)) + "\n"
}

/// Places a description before or after a control, separated by a space.
pub fn add_desc(input: &str, desc: &str, desc_pos: DescPos) -> String {
    if desc.is_empty() {
        return input.to_string();
    }
    match desc_pos {
        DescPos::Before => format!("{desc} {input}"),
        DescPos::After => format!("{input} {desc}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_with_text_attrs_escaped() {
        let attrs = Attrs::new().with("value", "a\"b");
        assert_eq!(
            element("input", &attrs, Content::Empty),
            r#"<input value="a&quot;b" />"#
        );
    }

    #[test]
    fn test_element_markup_verbatim() {
        let html = element("td", &Attrs::new(), Content::Markup("<b>x</b>"));
        assert_eq!(html, "<td><b>x</b></td>");
    }

    #[test]
    fn test_element_empty_non_void() {
        assert_eq!(
            element("textarea", &Attrs::new().with("name", "bio"), Content::Empty),
            r#"<textarea name="bio"></textarea>"#
        );
    }

    #[test]
    fn test_set_keeps_position() {
        let mut attrs = Attrs::new().with("a", "1").with("b", "2");
        attrs.set("a", "3");
        let names: Vec<&str> = attrs.iter().map(|(n, _)| n).collect();
        assert_eq!(names, ["a", "b"]);
        assert_eq!(attrs.get("a"), Some(&AttrValue::Text("3".into())));
    }

    #[test]
    fn test_parse_quoting_styles() {
        let attrs = Attrs::parse(r#"class="wide text" id='main' size=3"#);
        assert_eq!(attrs.get("class"), Some(&AttrValue::Text("wide text".into())));
        assert_eq!(attrs.get("id"), Some(&AttrValue::Text("main".into())));
        assert_eq!(attrs.get("size"), Some(&AttrValue::Text("3".into())));
    }

    #[test]
    fn test_parse_bare_words_and_case() {
        let attrs = Attrs::parse("READONLY Style=\"x\"");
        assert_eq!(attrs.get("readonly"), Some(&AttrValue::Flag(true)));
        assert_eq!(attrs.get("style"), Some(&AttrValue::Text("x".into())));
    }

    #[test]
    fn test_parse_ignores_unnamed_quotes() {
        let attrs = Attrs::parse(r#""orphan" rows=4"#);
        assert_eq!(attrs.len(), 1);
        assert!(attrs.contains("rows"));
    }

    #[test]
    fn test_parse_empty() {
        assert!(Attrs::parse("   ").is_empty());
    }

    #[test]
    fn test_add_desc_positions() {
        assert_eq!(add_desc("<i/>", "d", DescPos::After), "<i/> d");
        assert_eq!(add_desc("<i/>", "d", DescPos::Before), "d <i/>");
        assert_eq!(add_desc("<i/>", "", DescPos::Before), "<i/>");
    }

    #[test]
    fn test_add_label() {
        assert_eq!(
            add_label("<input />", "Enable", DescPos::After),
            "<label><input /> Enable</label>\n"
        );
    }

    #[test]
    fn test_from_iterator() {
        let attrs: Attrs = [("rows", "3"), ("cols", "40")].into_iter().collect();
        assert_eq!(attrs.len(), 2);
    }
}
