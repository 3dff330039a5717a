//! Turns a compiled tree back into equivalent source text.

use crate::node::{AttrValue, Element, Node};
use crate::scanner::{DEFAULT_CLOSE, DEFAULT_OPEN};
use crate::tokenizer::is_void_element;

pub fn unparse(nodes: &[Node]) -> String {
    unparse_with(nodes, DEFAULT_OPEN, DEFAULT_CLOSE)
}

/// Unparse a tree compiled with non-default starting delimiters.
pub fn unparse_with(nodes: &[Node], open: &str, close: &str) -> String {
    let mut u = Unparser {
        open: open.to_string(),
        close: close.to_string(),
        out: String::new(),
    };
    u.nodes(nodes);
    u.out
}

struct Unparser {
    open: String,
    close: String,
    out: String,
}

impl Unparser {
    fn tag(&mut self, sigil: &str, key: &str) {
        self.out.push_str(&self.open);
        self.out.push_str(sigil);
        self.out.push_str(key);
        self.out.push_str(&self.close);
    }

    fn nodes(&mut self, nodes: &[Node]) {
        for n in nodes {
            self.node(n);
        }
    }

    fn node(&mut self, node: &Node) {
        match node {
            Node::Element(e) => self.element(e),
            Node::Text(t) | Node::Elided(t) => self.out.push_str(t),
            Node::Interpolator { key, escaped } => self.tag(if *escaped { "" } else { "&" }, key),
            Node::Section(s) => {
                self.tag(if s.inverted { "^" } else { "#" }, &s.key);
                self.nodes(&s.children);
                self.tag("/", &s.key);
            }
            Node::Partial { key } => self.tag(">", key),
            Node::Comment { children, .. } => {
                self.out.push_str("<!--");
                self.nodes(children);
                self.out.push_str("-->");
            }
            Node::Slot { key, children, .. } => {
                self.tag("$", key);
                self.nodes(children);
                self.tag("/", key);
            }
            Node::Note(text) => self.tag("!", text),
            Node::Debug { key } => self.tag("!@", key),
            Node::Delimiters { open, close } => {
                self.tag("=", &format!("{open} {close}="));
                self.open = open.clone();
                self.close = close.clone();
            }
        }
    }

    fn element(&mut self, e: &Element) {
        self.out.push('<');
        self.out.push_str(&e.tag);
        for attr in &e.static_attrs {
            self.out.push(' ');
            self.out.push_str(&attr.name);
            match &attr.value {
                AttrValue::Bool => {}
                AttrValue::Static(v) => {
                    let q = quote_for(v.contains('"'));
                    self.out.push('=');
                    self.out.push(q);
                    self.out.push_str(v);
                    self.out.push(q);
                }
                AttrValue::Tokens(tokens) => {
                    let q = quote_for(has_double_quote(tokens));
                    self.out.push('=');
                    self.out.push(q);
                    self.nodes(tokens);
                    self.out.push(q);
                }
            }
        }
        for dynamic in &e.dynamic_attrs {
            self.out.push(' ');
            self.node(dynamic);
        }
        self.out.push('>');
        self.nodes(&e.children);
        if !is_void_element(&e.tag) {
            self.out.push_str("</");
            self.out.push_str(&e.tag);
            self.out.push('>');
        }
    }
}

fn quote_for(has_double: bool) -> char {
    if has_double { '\'' } else { '"' }
}

fn has_double_quote(nodes: &[Node]) -> bool {
    nodes.iter().any(|n| match n {
        Node::Text(t) => t.contains('"'),
        other => has_double_quote(other.children()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile::compile;

    #[test]
    fn writes_attributes_and_directives() {
        let src = r#"<input type="text" disabled value='{{v}}'>"#;
        let out = unparse(&compile(src).unwrap().nodes);
        assert_eq!(out, r#"<input type="text" disabled value="{{v}}">"#);
    }

    #[test]
    fn follows_delimiter_changes() {
        let src = "{{=<% %>=}}<%#a%><%&b%><%/a%>";
        assert_eq!(unparse(&compile(src).unwrap().nodes), src);
    }
}
