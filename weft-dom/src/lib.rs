//! Virtual tree produced by the weft renderer, plus the two reconciliation
//! primitives (`diff` and `patch`) consumed by hosts.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

pub mod diff;
pub mod html;
pub mod patch;

pub use diff::{Patch, diff, diff_children};
pub use html::{escape, to_html, unescape};
pub use patch::{patch, patch_children};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum VNode {
    Element {
        tag: String,
        props: Props,
        children: Vec<VNode>,
    },
    Text(String),
    Comment(String),
    /// A position handed over to the host's component layer.
    Handoff(Handoff),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Props {
    pub attrs: HashMap<String, String>,
    /// Set for elements created inside an `<svg>` subtree.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

impl Props {
    pub fn new() -> Self {
        Self {
            attrs: HashMap::new(),
            namespace: None,
        }
    }
    pub fn set(mut self, k: impl Into<String>, v: impl Into<String>) -> Self {
        self.attrs.insert(k.into(), v.into());
        self
    }
    pub fn with_namespace(mut self, ns: impl Into<String>) -> Self {
        self.namespace = Some(ns.into());
        self
    }
}

// Allow concise props creation
impl From<()> for Props {
    fn from(_: ()) -> Self {
        Props::default()
    }
}
impl From<Vec<(&str, &str)>> for Props {
    fn from(v: Vec<(&str, &str)>) -> Self {
        let mut p = Props::new();
        for (k, v) in v {
            p.attrs.insert(k.to_string(), v.to_string());
        }
        p
    }
}

/// Marker left in the tree where a child component takes over.
///
/// `scope` is a JSON snapshot of the data scope active at the slot, so the
/// host can instantiate the child against it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Handoff {
    pub id: String,
    /// Slot name as written in the template.
    pub name: String,
    pub host: String,
    pub scope: serde_json::Value,
}

pub fn h(tag: impl Into<String>, props: impl Into<Props>, children: Vec<VNode>) -> VNode {
    VNode::Element {
        tag: tag.into(),
        props: props.into(),
        children,
    }
}
pub fn text(t: impl Into<String>) -> VNode {
    VNode::Text(t.into())
}
pub fn comment(t: impl Into<String>) -> VNode {
    VNode::Comment(t.into())
}
