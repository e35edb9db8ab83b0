//! Raw form submissions.
//!
//! Validation normally receives submitted data explicitly. When it does
//! not, it asks a [`SubmissionSource`] for the host's raw payload. An
//! `application/x-www-form-urlencoded` body is decoded with bracket-name
//! nesting, so `profile[email]=x` lands at `{"profile": {"email": "x"}}`
//! and repeated `tags[]=a&tags[]=b` builds a list.

use serde_json::{Map, Value};

/// Deepest bracket nesting accepted in a submitted name. Deeper pairs are
/// dropped.
pub const MAX_NESTING: usize = 64;

/// Supplies the host's raw submitted form data, already unescaped.
pub trait SubmissionSource {
    fn raw_submission(&self) -> Value;
}

impl SubmissionSource for Value {
    fn raw_submission(&self) -> Value {
        self.clone()
    }
}

/// A url-encoded request body.
#[derive(Debug, Clone, Copy)]
pub struct UrlEncodedBody<'a>(pub &'a str);

impl SubmissionSource for UrlEncodedBody<'_> {
    fn raw_submission(&self) -> Value {
        parse_urlencoded(self.0)
    }
}

/// Decodes a url-encoded body into nested form data.
///
/// # Examples
///
/// ```
/// use formbind_forms::submission::parse_urlencoded;
/// use serde_json::json;
///
/// let data = parse_urlencoded("opts%5Bmode%5D=fast&tags[]=a&tags[]=b&q=x+y");
/// assert_eq!(data, json!({"opts": {"mode": "fast"}, "tags": ["a", "b"], "q": "x y"}));
/// ```
pub fn parse_urlencoded(body: &str) -> Value {
    let mut root = Value::Object(Map::new());
    for pair in body.split('&') {
        if pair.is_empty() {
            continue;
        }
        let (key, value) = pair
            .find('=')
            .map_or((pair, ""), |eq| (&pair[..eq], &pair[eq + 1..]));
        let key = percent_decode(key);
        let segments = split_name(&key);
        if !matches!(segments.first(), Some(Some(base)) if !base.is_empty()) {
            continue;
        }
        if segments.len() > MAX_NESTING + 1 {
            tracing::debug!(depth = segments.len() - 1, "dropping over-nested form field");
            continue;
        }
        insert(&mut root, &segments, Value::String(percent_decode(value)));
    }
    root
}

fn percent_decode(input: &str) -> String {
    let plus_decoded = input.replace('+', " ");
    percent_encoding::percent_decode_str(&plus_decoded)
        .decode_utf8_lossy()
        .into_owned()
}

/// Splits `a[b][]` into `[Some(a), Some(b), None]`, where `None` means "append".
///
/// A name without a well-formed bracket suffix is taken literally.
fn split_name(name: &str) -> Vec<Option<String>> {
    let Some(open) = name.find('[') else {
        return vec![Some(name.to_string())];
    };
    let (base, mut rest) = name.split_at(open);
    let mut segments = vec![Some(base.to_string())];
    while let Some(stripped) = rest.strip_prefix('[') {
        let Some(close) = stripped.find(']') else {
            return vec![Some(name.to_string())];
        };
        let key = &stripped[..close];
        segments.push((!key.is_empty()).then(|| key.to_string()));
        rest = &stripped[close + 1..];
    }
    if rest.is_empty() {
        segments
    } else {
        vec![Some(name.to_string())]
    }
}

fn insert(root: &mut Value, segments: &[Option<String>], value: Value) {
    let mut node = root;
    for segment in segments {
        node = step(node, segment.as_deref());
    }
    *node = value;
}

/// Returns the child for `segment`, appending a new list item for `None`.
fn step<'a>(node: &'a mut Value, segment: Option<&str>) -> &'a mut Value {
    match segment {
        Some(key) => {
            if !node.is_object() {
                *node = Value::Object(Map::new());
            }
            &mut node[key]
        }
        None => {
            if !node.is_array() {
                *node = Value::Array(Vec::new());
            }
            let index = node.as_array().map_or(0, Vec::len);
            if let Value::Array(items) = &mut *node {
                items.push(Value::Null);
            }
            &mut node[index]
        }
    }
}
