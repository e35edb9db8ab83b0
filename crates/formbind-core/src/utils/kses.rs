//! Conservative allowlist markup filter.
//!
//! This is the default sanitizer for text and custom fields. A small set of
//! inline tags survives with a small set of attributes each; every other tag
//! is removed and stray angle brackets are encoded. Filtering already
//! filtered output returns it unchanged.

use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

/// Tags that survive filtering, with the attributes each may keep.
const ALLOWED_TAGS: &[(&str, &[&str])] = &[
    ("a", &["href", "title"]),
    ("abbr", &["title"]),
    ("acronym", &["title"]),
    ("b", &[]),
    ("blockquote", &["cite"]),
    ("cite", &[]),
    ("code", &[]),
    ("del", &["datetime"]),
    ("em", &[]),
    ("i", &[]),
    ("q", &["cite"]),
    ("s", &[]),
    ("strike", &[]),
    ("strong", &[]),
];

/// Attributes holding URLs; these lose scriptable protocols.
const URL_ATTRS: &[&str] = &["href", "cite"];

const BLOCKED_PROTOCOLS: &[&str] = &["javascript:", "vbscript:", "data:"];

/// Filters a JSON value.
///
/// Strings are filtered, other scalars are stringified and filtered, `null`
/// becomes the empty string, and arrays and objects are filtered element by
/// element.
///
/// # Examples
///
/// ```
/// use formbind_core::utils::kses::filter_kses;
/// use serde_json::json;
///
/// assert_eq!(filter_kses(&json!("<b>hi</b><script>x</script>")), json!("<b>hi</b>x"));
/// assert_eq!(filter_kses(&json!(null)), json!(""));
/// assert_eq!(filter_kses(&json!(42)), json!("42"));
/// ```
pub fn filter_kses(value: &Value) -> Value {
    match value {
        Value::Null => Value::String(String::new()),
        Value::Bool(true) => Value::String("1".to_string()),
        Value::Bool(false) => Value::String(String::new()),
        Value::Number(n) => Value::String(n.to_string()),
        Value::String(s) => Value::String(filter_kses_str(s)),
        Value::Array(items) => Value::Array(items.iter().map(filter_kses).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), filter_kses(v)))
                .collect(),
        ),
    }
}

/// Filters a markup string.
pub fn filter_kses_str(input: &str) -> String {
    static COMMENT: OnceLock<Regex> = OnceLock::new();
    static TAG: OnceLock<Regex> = OnceLock::new();

    let comment = COMMENT.get_or_init(|| Regex::new(r"(?s)<!--.*?-->").unwrap());
    let tag = TAG.get_or_init(|| Regex::new(r"(?s)<(/?)([a-zA-Z][a-zA-Z0-9]*)([^<>]*)>").unwrap());

    let input = comment.replace_all(input, "");
    let mut out = String::with_capacity(input.len());
    let mut last = 0;
    for caps in tag.captures_iter(&input) {
        let whole = caps.get(0).expect("group 0 always matches");
        push_text(&mut out, &input[last..whole.start()]);
        last = whole.end();

        let name = caps[2].to_ascii_lowercase();
        let Some(allowed) = allowed_attrs(&name) else {
            continue;
        };
        if &caps[1] == "/" {
            out.push_str(&format!("</{name}>"));
        } else {
            out.push('<');
            out.push_str(&name);
            out.push_str(&filter_attrs(&caps[3], allowed));
            out.push('>');
        }
    }
    push_text(&mut out, &input[last..]);
    out
}

fn allowed_attrs(tag: &str) -> Option<&'static [&'static str]> {
    ALLOWED_TAGS
        .iter()
        .find(|(name, _)| *name == tag)
        .map(|(_, attrs)| *attrs)
}

/// Keeps allowed attributes, re-emitted double-quoted.
fn filter_attrs(raw: &str, allowed: &[&str]) -> String {
    static ATTR: OnceLock<Regex> = OnceLock::new();
    let attr = ATTR.get_or_init(|| {
        Regex::new(r#"([a-zA-Z_:][-a-zA-Z0-9_:.]*)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#)
            .unwrap()
    });

    let mut out = String::new();
    for caps in attr.captures_iter(raw) {
        let name = caps[1].to_ascii_lowercase();
        if !allowed.contains(&name.as_str()) || out.contains(&format!(" {name}=")) {
            continue;
        }
        let value = caps
            .get(2)
            .or_else(|| caps.get(3))
            .or_else(|| caps.get(4))
            .map_or("", |m| m.as_str());
        if URL_ATTRS.contains(&name.as_str()) && has_blocked_protocol(value) {
            continue;
        }
        let value = value.replace('"', "&quot;");
        out.push_str(&format!(r#" {name}="{value}""#));
    }
    out
}

fn has_blocked_protocol(url: &str) -> bool {
    let compact: String = url
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect::<String>()
        .to_ascii_lowercase();
    BLOCKED_PROTOCOLS.iter().any(|p| compact.starts_with(p))
}

fn push_text(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_text_untouched() {
        assert_eq!(filter_kses_str("hello world"), "hello world");
        assert_eq!(filter_kses_str("x@y.com"), "x@y.com");
    }

    #[test]
    fn test_disallowed_tags_removed() {
        assert_eq!(
            filter_kses_str("<p>para</p><script>alert(1)</script>"),
            "paraalert(1)"
        );
    }

    #[test]
    fn test_allowed_tag_keeps_allowed_attrs() {
        assert_eq!(
            filter_kses_str(r#"<a href='/x' onclick="evil()" title=t>link</a>"#),
            r#"<a href="/x" title="t">link</a>"#
        );
    }

    #[test]
    fn test_tag_names_lowercased() {
        assert_eq!(filter_kses_str("<STRONG>x</STRONG>"), "<strong>x</strong>");
    }

    #[test]
    fn test_javascript_href_dropped() {
        assert_eq!(
            filter_kses_str(r#"<a href=" JavaScript:alert(1)">x</a>"#),
            "<a>x</a>"
        );
        assert_eq!(
            filter_kses_str(r#"<q cite="data:text/html,hi">x</q>"#),
            "<q>x</q>"
        );
    }

    #[test]
    fn test_stray_brackets_encoded() {
        assert_eq!(filter_kses_str("1 < 2 > 0"), "1 &lt; 2 &gt; 0");
    }

    #[test]
    fn test_comments_removed() {
        assert_eq!(filter_kses_str("a<!-- hidden -->b"), "ab");
    }

    #[test]
    fn test_duplicate_attribute_kept_once() {
        assert_eq!(
            filter_kses_str(r#"<abbr title="a" title="b">x</abbr>"#),
            r#"<abbr title="a">x</abbr>"#
        );
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            r#"<a href='/a"b' title=x>y</a> <em>e</em> 3 < 4"#,
            "<div><b>bold</b></div>",
            "it's & fine",
        ];
        for input in inputs {
            let once = filter_kses_str(input);
            assert_eq!(filter_kses_str(&once), once, "input: {input}");
        }
    }

    #[test]
    fn test_filter_value_variants() {
        assert_eq!(filter_kses(&json!(true)), json!("1"));
        assert_eq!(filter_kses(&json!(false)), json!(""));
        assert_eq!(filter_kses(&json!(["<i>a</i>", "<u>b</u>"])), json!(["<i>a</i>", "b"]));
        assert_eq!(filter_kses(&json!({"k": "<u>v</u>"})), json!({"k": "v"}));
    }
}
