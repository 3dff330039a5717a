use weft_dom::{Props, VNode, unescape};
use weft_template::Namespace;

use super::{Attr, Object, Stack};

/// Builds a virtual tree. Text and attribute values are entity-decoded.
#[derive(Debug, Default)]
pub struct VTreeStack {
    open: Vec<(String, Props, Vec<VNode>)>,
    roots: Vec<VNode>,
}

impl VTreeStack {
    pub fn new() -> Self {
        Self::default()
    }

    fn siblings(&mut self) -> &mut Vec<VNode> {
        match self.open.last_mut() {
            Some((_, _, children)) => children,
            None => &mut self.roots,
        }
    }

    fn push(&mut self, node: VNode) {
        let siblings = self.siblings();
        match (siblings.last_mut(), node) {
            (Some(VNode::Text(prev)), VNode::Text(t)) => prev.push_str(&t),
            (_, node) => siblings.push(node),
        }
    }

    /// Close anything left open and return the top-level nodes.
    pub fn finish(mut self) -> Vec<VNode> {
        while !self.open.is_empty() {
            self.close_element();
        }
        self.roots
    }
}

impl Stack for VTreeStack {
    fn open_element(&mut self, tag: &str, ns: Option<Namespace>, attrs: &[Attr]) {
        let mut props = Props::new();
        for (name, value) in attrs {
            let value = value.as_deref().map(unescape).unwrap_or_default();
            props.attrs.insert(name.clone(), value);
        }
        if let Some(ns) = ns {
            props = props.with_namespace(ns.as_str());
        }
        self.open.push((tag.to_string(), props, Vec::new()));
    }

    fn close_element(&mut self) {
        if let Some((tag, props, children)) = self.open.pop() {
            self.push(VNode::Element {
                tag,
                props,
                children,
            });
        }
    }

    fn create_object(&mut self, object: Object) {
        match object {
            Object::Text(t) if t.is_empty() => {}
            Object::Text(t) => self.push(VNode::Text(unescape(&t))),
            Object::Node(n) => self.push(n),
        }
    }

    fn create_comment(&mut self, text: &str) {
        self.push(VNode::Comment(text.to_string()));
    }
}
