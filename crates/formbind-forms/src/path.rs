//! Field paths and nested access into form data.
//!
//! A [`FieldPath`] names a location in a nested data tree. The same path is
//! used to look up a bound value, to write a validated value, and to build
//! the `name` attribute of the rendered control: `["section", "enabled"]`
//! renders as `section[enabled]`.
//!
//! Form data is a [`serde_json::Value`]. Object keys are matched directly; a
//! segment that parses as an index also addresses an array element.

use std::fmt;

use formbind_core::utils::text::escape_attr;
use serde_json::{Map, Value};

/// An ordered sequence of keys describing a nested location.
///
/// # Examples
///
/// ```
/// use formbind_forms::path::FieldPath;
///
/// let path = FieldPath::from(["profile", "email"]);
/// assert_eq!(path.encode(), "profile[email]");
/// assert_eq!(FieldPath::from("title").encode(), "title");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldPath(Vec<String>);

impl FieldPath {
    /// Creates a path from its segments.
    pub const fn new(segments: Vec<String>) -> Self {
        Self(segments)
    }

    /// Builds a path from a raw config value: a string, a number, or an
    /// array of those. Returns `None` for anything else.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Self(vec![s.clone()])),
            Value::Number(n) => Some(Self(vec![n.to_string()])),
            Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    Value::String(s) => Some(s.clone()),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                })
                .collect::<Option<Vec<_>>>()
                .map(Self),
            _ => None,
        }
    }

    /// Returns the segments of this path.
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Returns `true` if the path has no segments.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of segments.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns the first segment.
    pub fn first(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    /// Returns the last segment.
    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// Returns a new path with `other` appended to this one.
    #[must_use]
    pub fn join(&self, other: &Self) -> Self {
        let mut segments = self.0.clone();
        segments.extend(other.0.iter().cloned());
        Self(segments)
    }

    /// Encodes the path as a form control name.
    ///
    /// The first segment is used as-is; every later segment is attribute
    /// escaped and wrapped in brackets.
    pub fn encode(&self) -> String {
        let mut segments = self.0.iter();
        let mut name = segments.next().cloned().unwrap_or_default();
        for key in segments {
            name.push('[');
            name.push_str(&escape_attr(key));
            name.push(']');
        }
        name
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl From<&str> for FieldPath {
    fn from(name: &str) -> Self {
        Self(vec![name.to_string()])
    }
}

impl From<String> for FieldPath {
    fn from(name: String) -> Self {
        Self(vec![name])
    }
}

impl From<&String> for FieldPath {
    fn from(name: &String) -> Self {
        Self(vec![name.clone()])
    }
}

impl From<Vec<String>> for FieldPath {
    fn from(segments: Vec<String>) -> Self {
        Self(segments)
    }
}

impl From<Vec<&str>> for FieldPath {
    fn from(segments: Vec<&str>) -> Self {
        Self(segments.into_iter().map(String::from).collect())
    }
}

impl From<&[&str]> for FieldPath {
    fn from(segments: &[&str]) -> Self {
        Self(segments.iter().map(|s| (*s).to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for FieldPath {
    fn from(segments: [&str; N]) -> Self {
        Self(segments.iter().map(|s| (*s).to_string()).collect())
    }
}

impl From<&FieldPath> for FieldPath {
    fn from(path: &FieldPath) -> Self {
        path.clone()
    }
}

/// Looks up the value at `path`.
///
/// Returns `None` as soon as any segment is missing, the node being walked
/// is not a container, or the value found is `null`. An empty path returns
/// `data` itself.
pub fn get_value<'a>(data: &'a Value, path: &FieldPath) -> Option<&'a Value> {
    let mut node = data;
    for key in path.segments() {
        node = child(node, key)?;
    }
    Some(node)
}

/// Looks up the value at `path`, returning `fallback` when it is absent.
///
/// # Examples
///
/// ```
/// use formbind_forms::path::{get_value_or, FieldPath};
/// use serde_json::json;
///
/// let data = json!({"a": {"b": 1}});
/// assert_eq!(get_value_or(&data, &FieldPath::from(["a", "b"]), json!(0)), json!(1));
/// assert_eq!(get_value_or(&data, &FieldPath::from(["a", "x", "y"]), json!(0)), json!(0));
/// ```
pub fn get_value_or(data: &Value, path: &FieldPath, fallback: Value) -> Value {
    get_value(data, path).cloned().unwrap_or(fallback)
}

/// Writes `value` at `path`, creating intermediate objects as needed.
///
/// A non-container found where a container is needed is replaced by an
/// empty object. An array addressed by its next index grows by one item.
/// Any other key turns the array into an object keyed by its indices
/// first. An empty path leaves `data` untouched.
///
/// # Examples
///
/// ```
/// use formbind_forms::path::{set_value, FieldPath};
/// use serde_json::json;
///
/// let mut data = json!({"profile": {"age": 30}});
/// set_value(&mut data, &FieldPath::from(["profile", "email"]), json!("x@y.com"));
/// assert_eq!(data, json!({"profile": {"age": 30, "email": "x@y.com"}}));
/// ```
pub fn set_value(data: &mut Value, path: &FieldPath, value: Value) {
    if path.is_empty() {
        return;
    }
    tracing::trace!(path = %path, "writing form value");

    let mut node = data;
    for key in path.segments() {
        node = slot(node, key);
    }
    *node = value;
}

fn child<'a>(node: &'a Value, key: &str) -> Option<&'a Value> {
    let found = match node {
        Value::Object(map) => map.get(key),
        Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    };
    found.filter(|v| !v.is_null())
}

/// Returns the slot for `key` inside `node`, making `node` a container first.
fn slot<'a>(node: &'a mut Value, key: &str) -> &'a mut Value {
    let index = match &*node {
        Value::Array(items) => key.parse::<usize>().ok().filter(|i| *i <= items.len()),
        _ => None,
    };
    if let Some(i) = index {
        if let Value::Array(items) = &mut *node {
            if i == items.len() {
                items.push(Value::Null);
            }
        }
        return &mut node[i];
    }
    if !node.is_object() {
        *node = Value::Object(into_object(std::mem::take(node)));
    }
    &mut node[key]
}

fn into_object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, v)| (i.to_string(), v))
            .collect(),
        _ => Map::new(),
    }
}
