//! Markup escaping and serialization of [`VNode`] trees.

use crate::VNode;

pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

pub fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

/// Escape `& < > " '` for use in text or a double-quoted attribute.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 8);
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Decode the named entities produced by [`escape`] plus numeric references.
/// Unknown entities are left as written.
pub fn unescape(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        match tail.find(';').and_then(|semi| decode_entity(&tail[1..semi]).map(|c| (c, semi))) {
            Some((c, semi)) => {
                out.push(c);
                rest = &tail[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let num = name.strip_prefix('#')?;
            let code = match num.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => num.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}

/// Serialize a virtual tree to markup. Attributes are written in sorted order
/// so the output is stable.
pub fn to_html(node: &VNode) -> String {
    let mut out = String::new();
    write_node(node, &mut out);
    out
}

fn write_node(node: &VNode, out: &mut String) {
    match node {
        VNode::Text(t) => out.push_str(&escape(t)),
        VNode::Comment(c) => {
            out.push_str("<!--");
            out.push_str(c);
            out.push_str("-->");
        }
        VNode::Handoff(h) => {
            out.push_str("<!--weft:handoff ");
            out.push_str(&h.id);
            out.push_str("-->");
        }
        VNode::Element {
            tag,
            props,
            children,
        } => {
            out.push('<');
            out.push_str(tag);
            let mut keys: Vec<_> = props.attrs.keys().collect();
            keys.sort();
            for k in keys {
                out.push(' ');
                out.push_str(k);
                out.push_str("=\"");
                out.push_str(&escape(&props.attrs[k]));
                out.push('"');
            }
            out.push('>');
            if is_void(tag) && children.is_empty() {
                return;
            }
            for c in children {
                write_node(c, out);
            }
            out.push_str("</");
            out.push_str(tag);
            out.push('>');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{h, text};

    #[test]
    fn escape_and_unescape_are_inverse() {
        let raw = r#"<a href="x">Tom & 'Jerry'</a>"#;
        assert_eq!(unescape(&escape(raw)), raw);
    }

    #[test]
    fn unescape_numeric_and_unknown() {
        assert_eq!(unescape("&#65;&#x42;&bogus;"), "AB&bogus;");
        assert_eq!(unescape("a & b"), "a & b");
    }

    #[test]
    fn void_elements_have_no_close_tag() {
        let v = h("p", (), vec![text("a<b"), h("br", (), vec![])]);
        assert_eq!(to_html(&v), "<p>a&lt;b<br></p>");
    }
}
