//! HTML escaping helpers.

use regex::Regex;
use std::sync::OnceLock;

/// Escapes `&`, `<`, `>`, `"` and `'` for use as HTML text content.
///
/// # Examples
///
/// ```
/// use formbind_core::utils::text::escape_html;
///
/// assert_eq!(escape_html("<b>\"hi\" & 'bye'</b>"), "&lt;b&gt;&quot;hi&quot; &amp; &#039;bye&#039;&lt;/b&gt;");
/// ```
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        push_escaped(&mut out, c);
    }
    out
}

/// Escapes a string for use inside a double-quoted attribute value.
///
/// Unlike [`escape_html`], character references already present in the
/// input (`&amp;`, `&#8217;`, `&#x27;`) are kept as they are, so escaping an
/// escaped value does not change it.
///
/// # Examples
///
/// ```
/// use formbind_core::utils::text::escape_attr;
///
/// assert_eq!(escape_attr("a \"b\" & c"), "a &quot;b&quot; &amp; c");
/// assert_eq!(escape_attr("already &amp; done"), "already &amp; done");
/// ```
pub fn escape_attr(s: &str) -> String {
    static ENTITY: OnceLock<Regex> = OnceLock::new();
    let entity = ENTITY.get_or_init(|| {
        Regex::new(r"^&(?:[a-zA-Z][a-zA-Z0-9]*|#[0-9]+|#[xX][0-9a-fA-F]+);").unwrap()
    });

    let mut out = String::with_capacity(s.len());
    for (i, c) in s.char_indices() {
        if c == '&' && entity.is_match(&s[i..]) {
            out.push('&');
        } else {
            push_escaped(&mut out, c);
        }
    }
    out
}

/// Escapes text placed between `<textarea>` tags.
pub fn escape_textarea(s: &str) -> String {
    escape_html(s)
}

fn push_escaped(out: &mut String, c: char) {
    match c {
        '&' => out.push_str("&amp;"),
        '<' => out.push_str("&lt;"),
        '>' => out.push_str("&gt;"),
        '"' => out.push_str("&quot;"),
        '\'' => out.push_str("&#039;"),
        _ => out.push(c),
    }
}
