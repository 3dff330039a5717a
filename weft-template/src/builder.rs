use crate::error::StructuralError;
use crate::node::{AttrValue, Element, Namespace, Node, NodeId, Section, StaticAttr};
use crate::tokenizer::is_void_element;

/// What a frame on the builder stack will close into.
#[derive(Debug, Clone, PartialEq)]
pub enum OpenKind {
    Element { tag: String },
    Attribute { name: String },
    Section { key: String, inverted: bool },
    Slot { key: String },
    Comment,
}

#[derive(Debug)]
enum FrameKind {
    Element {
        tag: String,
        ns: Option<Namespace>,
        in_start_tag: bool,
        static_attrs: Vec<StaticAttr>,
        dynamic_attrs: Vec<Node>,
    },
    Attribute {
        name: String,
        has_value: bool,
    },
    Section {
        key: String,
        inverted: bool,
    },
    Slot {
        key: String,
    },
    Comment,
}

#[derive(Debug)]
struct Frame {
    id: NodeId,
    kind: FrameKind,
    children: Vec<Node>,
    next_child: usize,
    next_attr: usize,
}

impl Frame {
    fn in_start_tag(&self) -> bool {
        matches!(
            self.kind,
            FrameKind::Element {
                in_start_tag: true,
                ..
            }
        )
    }

    /// Where leaves and closed children go.
    fn sink(&mut self) -> &mut Vec<Node> {
        match &mut self.kind {
            FrameKind::Element {
                in_start_tag: true,
                dynamic_attrs,
                ..
            } => dynamic_attrs,
            _ => &mut self.children,
        }
    }

    fn into_node(self) -> Node {
        let Frame {
            id, kind, children, ..
        } = self;
        match kind {
            FrameKind::Element {
                tag,
                ns,
                static_attrs,
                dynamic_attrs,
                ..
            } => Node::Element(Element {
                id,
                tag,
                ns,
                static_attrs,
                dynamic_attrs,
                children,
            }),
            FrameKind::Section { key, inverted } => Node::Section(Section {
                id,
                key,
                inverted,
                children,
            }),
            FrameKind::Slot { key } => Node::Slot { id, key, children },
            FrameKind::Comment => Node::Comment { id, children },
            // attributes are folded by `close_element` before this is reached
            FrameKind::Attribute { .. } => Node::Text(String::new()),
        }
    }
}

/// Depth-tracked frame stack that turns open/close calls into a node tree.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    stack: Vec<Frame>,
    output: Vec<Node>,
    next_root: usize,
    svg_root: Option<NodeId>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a frame and return its id.
    pub fn open_element(&mut self, kind: OpenKind) -> Result<NodeId, StructuralError> {
        if let OpenKind::Attribute { name } = &kind {
            if !self.stack.last().is_some_and(Frame::in_start_tag) {
                return Err(StructuralError::new(
                    self.stack.last().map_or("-", |f| f.id.as_str()),
                    format!("attribute `{name}` outside a start tag"),
                ));
            }
        }
        let is_attr = matches!(kind, OpenKind::Attribute { .. });
        let id = match self.stack.last_mut() {
            Some(top) if is_attr => {
                let id = top.id.attr(top.next_attr);
                top.next_attr += 1;
                id
            }
            Some(top) => {
                let id = top.id.child(top.next_child);
                top.next_child += 1;
                id
            }
            None => {
                let id = NodeId::root(self.next_root);
                self.next_root += 1;
                id
            }
        };

        let kind = match kind {
            OpenKind::Element { tag } => {
                self.check_placement(&id, &tag)?;
                if tag == "svg" && self.svg_root.is_none() {
                    self.svg_root = Some(id.clone());
                }
                let ns = self.svg_root.as_ref().map(|_| Namespace::Svg);
                FrameKind::Element {
                    tag,
                    ns,
                    in_start_tag: true,
                    static_attrs: Vec::new(),
                    dynamic_attrs: Vec::new(),
                }
            }
            OpenKind::Attribute { name } => FrameKind::Attribute {
                name,
                has_value: false,
            },
            OpenKind::Section { key, inverted } => FrameKind::Section { key, inverted },
            OpenKind::Slot { key } => FrameKind::Slot { key },
            OpenKind::Comment => FrameKind::Comment,
        };

        self.stack.push(Frame {
            id: id.clone(),
            kind,
            children: Vec::new(),
            next_child: 0,
            next_attr: 0,
        });
        Ok(id)
    }

    fn check_placement(&self, id: &NodeId, tag: &str) -> Result<(), StructuralError> {
        let allowed: &[&str] = match tag {
            "tr" => &["table", "thead", "tbody", "tfoot"],
            "td" | "th" => &["tr"],
            "thead" | "tbody" | "tfoot" | "caption" | "colgroup" => &["table"],
            "col" => &["colgroup", "table"],
            _ => return Ok(()),
        };
        let parent = self.stack.iter().rev().find_map(|f| match &f.kind {
            FrameKind::Element { tag, .. } => Some(tag.as_str()),
            _ => None,
        });
        match parent {
            Some(p) if allowed.contains(&p) => Ok(()),
            other => Err(StructuralError::new(
                id.as_str(),
                format!(
                    "<{tag}> is not allowed inside {}",
                    other.map_or("the document root".to_string(), |p| format!("<{p}>"))
                ),
            )),
        }
    }

    /// Pop the top frame, which must be `handle`.
    pub fn close_element(&mut self, handle: &NodeId) -> Result<(), StructuralError> {
        let Some(top) = self.stack.last() else {
            return Err(StructuralError::new(handle.as_str(), "stack empty"));
        };
        if &top.id != handle {
            return Err(StructuralError::new(
                top.id.as_str(),
                format!("improperly paired: closing {handle} while {} is open", top.id),
            ));
        }
        let Some(frame) = self.stack.pop() else {
            return Err(StructuralError::new(handle.as_str(), "stack empty"));
        };
        if self.svg_root.as_ref() == Some(&frame.id) {
            self.svg_root = None;
        }

        if let FrameKind::Attribute { name, has_value } = frame.kind {
            let mut children = frame.children;
            let value = if !has_value {
                AttrValue::Bool
            } else if children.is_empty() {
                AttrValue::Static(String::new())
            } else if let [Node::Text(_)] = children.as_slice() {
                match children.pop() {
                    Some(Node::Text(t)) => AttrValue::Static(t),
                    _ => AttrValue::Static(String::new()),
                }
            } else {
                AttrValue::Tokens(children)
            };
            return match self.stack.last_mut().map(|f| &mut f.kind) {
                Some(FrameKind::Element { static_attrs, .. }) => {
                    static_attrs.push(StaticAttr { name, value });
                    Ok(())
                }
                _ => Err(StructuralError::new(
                    frame.id.as_str(),
                    "attribute closed outside its element",
                )),
            };
        }

        let node = frame.into_node();
        self.sink().push(node);
        Ok(())
    }

    /// Close the innermost frame if it is an element named `tag`.
    pub fn close_tag(&mut self, tag: &str) -> Result<(), StructuralError> {
        if is_void_element(tag) {
            return Err(StructuralError::new(
                self.stack.last().map_or("-", |f| f.id.as_str()),
                format!("void element <{tag}> has no end tag"),
            ));
        }
        match self.stack.last() {
            Some(Frame {
                id,
                kind: FrameKind::Element { tag: open, .. },
                ..
            }) if open == tag => {
                let id = id.clone();
                self.close_element(&id)
            }
            Some(top) => Err(StructuralError::new(
                top.id.as_str(),
                format!("improperly paired: </{tag}> does not close {}", top.id),
            )),
            None => Err(StructuralError::new("-", format!("</{tag}> with stack empty"))),
        }
    }

    /// Finish the start tag of the innermost element. Void and self-closing
    /// elements close right away. Returns the element's id and tag.
    pub fn end_start_tag(
        &mut self,
        self_closing: bool,
    ) -> Result<(NodeId, String), StructuralError> {
        let top = match self.stack.last_mut() {
            Some(top) if top.in_start_tag() => top,
            Some(top) => {
                return Err(StructuralError::new(
                    top.id.as_str(),
                    "start tag ended while a directive was open inside it",
                ));
            }
            None => return Err(StructuralError::new("-", "stack empty")),
        };
        let id = top.id.clone();
        let tag = match &mut top.kind {
            FrameKind::Element {
                tag, in_start_tag, ..
            } => {
                *in_start_tag = false;
                tag.clone()
            }
            _ => String::new(),
        };
        if self_closing || is_void_element(&tag) {
            self.close_element(&id)?;
        }
        Ok((id, tag))
    }

    /// The current attribute frame now has a value, possibly empty.
    pub fn mark_attr_value(&mut self) {
        if let Some(Frame {
            kind: FrameKind::Attribute { has_value, .. },
            ..
        }) = self.stack.last_mut()
        {
            *has_value = true;
        }
    }

    /// Append a leaf to the current frame or the top level.
    pub fn create_object(&mut self, node: Node) {
        if let Node::Text(t) = &node {
            self.push_str(t);
            return;
        }
        self.sink().push(node);
    }

    pub fn push_text(&mut self, c: char) {
        let sink = self.sink();
        match sink.last_mut() {
            Some(Node::Text(t)) => t.push(c),
            _ => sink.push(Node::Text(c.to_string())),
        }
    }

    pub fn push_str(&mut self, s: &str) {
        if s.is_empty() {
            return;
        }
        let sink = self.sink();
        match sink.last_mut() {
            Some(Node::Text(t)) => t.push_str(s),
            _ => sink.push(Node::Text(s.to_string())),
        }
    }

    /// Id of the innermost frame, if any.
    pub fn current(&self) -> Option<&NodeId> {
        self.stack.last().map(|f| &f.id)
    }

    fn sink(&mut self) -> &mut Vec<Node> {
        match self.stack.last_mut() {
            Some(frame) => frame.sink(),
            None => &mut self.output,
        }
    }

    pub fn get_output(self) -> Result<Vec<Node>, StructuralError> {
        if let Some(top) = self.stack.last() {
            return Err(StructuralError::new(
                top.id.as_str(),
                format!("{} frame(s) left open", self.stack.len()),
            ));
        }
        Ok(self.output)
    }
}
