//! Compile driver: interleaves the directive scanner with the markup
//! tokenizer and feeds both into the tree builder.

use std::collections::HashMap;
use std::ops::Range;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::builder::{OpenKind, TreeBuilder};
use crate::error::{CompileError, ParseError, StructuralError};
use crate::node::{Node, NodeId};
use crate::options::CompileOptions;
use crate::scanner::{DirectiveKind, Scanner, standalone_spans};
use crate::tokenizer::{MarkupEvent, Mode, Quote, Region, Tokenizer};

/// Output of a compile: the node tree and the partials it references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Compiled {
    pub nodes: Vec<Node>,
    pub partial_names: Vec<String>,
}

pub fn compile(src: &str) -> Result<Compiled, CompileError> {
    compile_with(src, &CompileOptions::default())
}

pub fn compile_with(src: &str, opts: &CompileOptions) -> Result<Compiled, CompileError> {
    debug!(len = src.len(), markup_only = opts.markup_only, "compile begin");
    let compiled = Compiler::new(src, opts).run()?;
    debug!(
        nodes = compiled.nodes.len(),
        partials = compiled.partial_names.len(),
        "compile end"
    );
    Ok(compiled)
}

#[derive(Debug)]
struct OpenDirective {
    id: NodeId,
    /// Opened between attributes of a start tag.
    in_attrs: bool,
}

struct Compiler<'a> {
    src: &'a str,
    opts: &'a CompileOptions,
    scanner: Scanner,
    tokenizer: Tokenizer,
    builder: TreeBuilder,
    events: Vec<MarkupEvent>,
    open_directives: HashMap<String, Vec<OpenDirective>>,
    attr_sections: usize,
    attr_frame: Option<NodeId>,
    comment_frames: Vec<NodeId>,
    partial_names: Vec<String>,
}

impl<'a> Compiler<'a> {
    fn new(src: &'a str, opts: &'a CompileOptions) -> Self {
        Self {
            src,
            opts,
            scanner: Scanner::with_delimiters(
                opts.open_delimiter.clone(),
                opts.close_delimiter.clone(),
            ),
            tokenizer: Tokenizer::new(),
            builder: TreeBuilder::new(),
            events: Vec::new(),
            open_directives: HashMap::new(),
            attr_sections: 0,
            attr_frame: None,
            comment_frames: Vec::new(),
            partial_names: Vec::new(),
        }
    }

    fn run(mut self) -> Result<Compiled, CompileError> {
        let spans: Vec<Range<usize>> = if self.opts.markup_only || !self.opts.elide_standalone {
            Vec::new()
        } else {
            standalone_spans(self.src, &self.scanner)?
        };
        let mut spans = spans.into_iter().peekable();

        let mut pos = 0;
        while pos < self.src.len() {
            while spans.peek().is_some_and(|s| s.start < pos) {
                spans.next();
            }
            if let Some(span) = spans.next_if(|s| s.start == pos) {
                if self.tokenizer.accepts_elision() {
                    self.tokenizer.interrupt(&mut self.events);
                    self.apply_events()?;
                    self.builder
                        .create_object(Node::Elided(self.src[span.clone()].to_string()));
                    pos = span.end;
                    continue;
                }
            }

            if !self.opts.markup_only && self.scanner.starts_at(self.src, pos) {
                pos = self.directive(pos)?;
                continue;
            }

            let Some(c) = self.src[pos..].chars().next() else {
                break;
            };
            pos += c.len_utf8();
            self.tokenizer.feed(c, &mut self.events);
            self.apply_events()?;
            if self.attr_sections > 0 {
                self.builder.push_text(c);
            }
        }

        self.tokenizer
            .finish(&mut self.events)
            .map_err(|msg| ParseError::at(self.src, self.src.len(), msg))?;
        self.apply_events()?;

        let nodes = self.builder.get_output()?;
        Ok(Compiled {
            nodes,
            partial_names: self.partial_names,
        })
    }

    fn apply_events(&mut self) -> Result<(), CompileError> {
        let mut events = std::mem::take(&mut self.events);
        for ev in events.drain(..) {
            if self.attr_sections > 0 {
                if let MarkupEvent::StartTagEnd { .. } = ev {
                    let id = self.builder.current().map_or("-", NodeId::as_str);
                    return Err(StructuralError::new(
                        id,
                        "start tag ends before its attribute section closes",
                    )
                    .into());
                }
                continue;
            }
            match ev {
                MarkupEvent::Text(c)
                | MarkupEvent::AttrValueChar(c)
                | MarkupEvent::CommentChar(c) => self.builder.push_text(c),
                MarkupEvent::StartTag(tag) => {
                    self.builder.open_element(OpenKind::Element { tag })?;
                }
                MarkupEvent::AttrName(name) => {
                    let id = self.builder.open_element(OpenKind::Attribute { name })?;
                    self.attr_frame = Some(id);
                }
                MarkupEvent::AttrValueStart => self.builder.mark_attr_value(),
                MarkupEvent::AttrValueEnd | MarkupEvent::AttrNoValue => {
                    if let Some(id) = self.attr_frame.take() {
                        self.builder.close_element(&id)?;
                    }
                }
                MarkupEvent::StartTagEnd { self_closing } => {
                    self.builder.end_start_tag(self_closing)?;
                }
                MarkupEvent::EndTag(tag) => self.builder.close_tag(&tag)?,
                MarkupEvent::CommentStart => {
                    let id = self.builder.open_element(OpenKind::Comment)?;
                    self.comment_frames.push(id);
                }
                MarkupEvent::CommentEnd => {
                    if let Some(id) = self.comment_frames.pop() {
                        self.builder.close_element(&id)?;
                    }
                }
                MarkupEvent::Declaration(decl) => self.builder.push_str(&decl),
            }
        }
        self.events = events;
        Ok(())
    }

    /// Handle the directive at `pos` and return the offset just past it.
    fn directive(&mut self, pos: usize) -> Result<usize, CompileError> {
        let region = self.tokenizer.region();
        let mode = self.tokenizer.mode();
        let dir = self.scanner.scan(self.src, pos)?;
        trace!(kind = ?dir.kind, offset = pos, ?region, "directive");

        let src = self.src;
        let fail = |msg: &str| -> CompileError { ParseError::at(src, pos, msg).into() };

        let closes_attr_section = match &dir.kind {
            DirectiveKind::Close { key } => self
                .open_directives
                .get(key)
                .and_then(|open| open.last())
                .is_some_and(|d| d.in_attrs),
            _ => false,
        };

        if region == Region::TagName {
            return Err(fail("directive inside a tag name"));
        }
        if closes_attr_section {
            let settled = matches!(region, Region::AttrGap | Region::AttrName)
                || matches!(mode, Mode::BeforeAttrValue | Mode::AttrValue(Quote::Unquoted));
            if !settled {
                return Err(fail("attribute section must close between attributes"));
            }
        } else if region == Region::AttrName {
            return Err(fail("directive inside an attribute name"));
        }

        let in_tag = matches!(region, Region::AttrGap | Region::AttrName | Region::AttrValue);
        if in_tag {
            match &dir.kind {
                DirectiveKind::Interpolate { escaped: false, .. } => {
                    return Err(fail("unescaped interpolation inside an attribute"));
                }
                DirectiveKind::Partial { .. } => return Err(fail("partial inside an attribute")),
                DirectiveKind::Slot { .. } => return Err(fail("slot inside an attribute")),
                DirectiveKind::Debug { .. } => {
                    return Err(fail("debug comment inside an attribute"));
                }
                _ => {}
            }
        }

        if closes_attr_section {
            self.tokenizer.settle_attribute(&mut self.events);
        } else {
            self.tokenizer.interrupt(&mut self.events);
        }
        self.apply_events()?;

        match dir.kind {
            DirectiveKind::Interpolate { key, escaped } => {
                self.builder.create_object(Node::Interpolator { key, escaped })
            }
            DirectiveKind::Section { key, inverted } => {
                let id = self.builder.open_element(OpenKind::Section {
                    key: key.clone(),
                    inverted,
                })?;
                self.push_open(key, id, region == Region::AttrGap);
            }
            DirectiveKind::Slot { key } => {
                let id = self.builder.open_element(OpenKind::Slot { key: key.clone() })?;
                self.push_open(key, id, false);
            }
            DirectiveKind::Close { key } => {
                let open = self
                    .open_directives
                    .get_mut(&key)
                    .and_then(Vec::pop)
                    .ok_or_else(|| {
                        StructuralError::new(
                            self.builder.current().map_or("-", NodeId::as_str),
                            format!("close of unopened section `{key}`"),
                        )
                    })?;
                self.builder.close_element(&open.id)?;
                if open.in_attrs {
                    self.attr_sections -= 1;
                }
            }
            DirectiveKind::Partial { key } => {
                if !self.partial_names.contains(&key) {
                    self.partial_names.push(key.clone());
                }
                self.builder.create_object(Node::Partial { key });
            }
            DirectiveKind::Comment(text) => self.builder.create_object(Node::Note(text)),
            DirectiveKind::Debug { key } => self.builder.create_object(Node::Debug { key }),
            DirectiveKind::Delimiters { open, close } => {
                self.builder.create_object(Node::Delimiters { open, close })
            }
        }
        Ok(dir.end)
    }

    fn push_open(&mut self, key: String, id: NodeId, in_attrs: bool) {
        if in_attrs {
            self.attr_sections += 1;
        }
        self.open_directives
            .entry(key)
            .or_default()
            .push(OpenDirective { id, in_attrs });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::AttrValue;

    #[test]
    fn section_wraps_children() {
        let out = compile("<p>{{#a}}x{{/a}}</p>").unwrap();
        let Node::Element(p) = &out.nodes[0] else {
            panic!("expected element");
        };
        let Node::Section(s) = &p.children[0] else {
            panic!("expected section");
        };
        assert_eq!(s.id.as_str(), "0.0");
        assert_eq!(s.children, vec![Node::Text("x".into())]);
    }

    #[test]
    fn interpolation_in_attribute_value_makes_tokens() {
        let out = compile(r#"<a href="/u/{{id}}">"#).unwrap_err();
        // unclosed <a>
        assert!(matches!(out, CompileError::Structural(_)));

        let out = compile(r#"<a href="/u/{{id}}"></a>"#).unwrap();
        let Node::Element(a) = &out.nodes[0] else {
            panic!("expected element");
        };
        assert_eq!(
            a.static_attrs[0].value,
            AttrValue::Tokens(vec![
                Node::Text("/u/".into()),
                Node::Interpolator {
                    key: "id".into(),
                    escaped: true
                },
            ])
        );
    }

    #[test]
    fn markup_only_leaves_braces_alone() {
        let out = compile_with("<b>{{x}}</b>", &CompileOptions::markup_only()).unwrap();
        let Node::Element(b) = &out.nodes[0] else {
            panic!("expected element");
        };
        assert_eq!(b.children, vec![Node::Text("{{x}}".into())]);
    }

    #[test]
    fn partial_names_are_unique_and_ordered() {
        let out = compile("{{>b}}{{>a}}{{>b}}").unwrap();
        assert_eq!(out.partial_names, vec!["b".to_string(), "a".to_string()]);
    }
}
