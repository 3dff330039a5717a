use std::fmt;

use serde::{Deserialize, Serialize};

/// Hierarchical ordinal path such as `0.2.1`, assigned when a frame opens.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub(crate) fn root(ordinal: usize) -> Self {
        NodeId(ordinal.to_string())
    }
    pub(crate) fn child(&self, ordinal: usize) -> Self {
        NodeId(format!("{}.{}", self.0, ordinal))
    }
    /// Attribute frames count separately from child frames.
    pub(crate) fn attr(&self, ordinal: usize) -> Self {
        NodeId(format!("{}.a{}", self.0, ordinal))
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Namespace {
    #[serde(rename = "svg")]
    Svg,
}

impl Namespace {
    pub fn as_str(&self) -> &'static str {
        match self {
            Namespace::Svg => "svg",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttrValue {
    /// `disabled`
    #[serde(rename = "b")]
    Bool,
    /// `class="app"`
    #[serde(rename = "s")]
    Static(String),
    /// `class="item {{state}}"`, rendered to a string per pass.
    #[serde(rename = "n")]
    Tokens(Vec<Node>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticAttr {
    #[serde(rename = "k")]
    pub name: String,
    #[serde(rename = "v")]
    pub value: AttrValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: NodeId,
    #[serde(rename = "t")]
    pub tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ns: Option<Namespace>,
    #[serde(rename = "a", default, skip_serializing_if = "Vec::is_empty")]
    pub static_attrs: Vec<StaticAttr>,
    /// Attribute tokens placed between attributes: sections wrapping raw
    /// attribute text, or interpolations producing attribute text.
    #[serde(rename = "d", default, skip_serializing_if = "Vec::is_empty")]
    pub dynamic_attrs: Vec<Node>,
    #[serde(rename = "c", default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: NodeId,
    #[serde(rename = "k")]
    pub key: String,
    #[serde(rename = "v", default, skip_serializing_if = "is_false")]
    pub inverted: bool,
    #[serde(rename = "c", default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    #[serde(rename = "e")]
    Element(Element),
    #[serde(rename = "t")]
    Text(String),
    /// Whitespace stripped from a standalone line; renders nothing.
    #[serde(rename = "w")]
    Elided(String),
    #[serde(rename = "i")]
    Interpolator {
        #[serde(rename = "k")]
        key: String,
        #[serde(rename = "x")]
        escaped: bool,
    },
    #[serde(rename = "s")]
    Section(Section),
    #[serde(rename = "p")]
    Partial {
        #[serde(rename = "k")]
        key: String,
    },
    /// Markup comment; its content may contain directives.
    #[serde(rename = "c")]
    Comment {
        id: NodeId,
        #[serde(rename = "c", default, skip_serializing_if = "Vec::is_empty")]
        children: Vec<Node>,
    },
    /// Child-component handoff point with a default subtree.
    #[serde(rename = "slot")]
    Slot {
        id: NodeId,
        #[serde(rename = "k")]
        key: String,
        #[serde(rename = "c", default, skip_serializing_if = "Vec::is_empty")]
        children: Vec<Node>,
    },
    /// `{{! ... }}`
    #[serde(rename = "n")]
    Note(String),
    /// `{{!@key}}`
    #[serde(rename = "dbg")]
    Debug {
        #[serde(rename = "k")]
        key: String,
    },
    /// `{{=<% %>=}}`
    #[serde(rename = "dl")]
    Delimiters { open: String, close: String },
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl Node {
    pub fn id(&self) -> Option<&NodeId> {
        match self {
            Node::Element(e) => Some(&e.id),
            Node::Section(s) => Some(&s.id),
            Node::Comment { id, .. } | Node::Slot { id, .. } => Some(id),
            _ => None,
        }
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::Element(e) => &e.children,
            Node::Section(s) => &s.children,
            Node::Comment { children, .. } | Node::Slot { children, .. } => children,
            _ => &[],
        }
    }
}
