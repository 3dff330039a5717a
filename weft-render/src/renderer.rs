//! Depth-first interpreter over a compiled tree.

use std::rc::Rc;

use tracing::{debug, trace};
use weft_dom::{Handoff, VNode, escape};
use weft_template::{
    AttrValue, CompileOptions, Element, Node, Section, compile, compile_with, parse_attributes,
    unparse,
};

use crate::context::Context;
use crate::options::RenderOptions;
use crate::stack::{Attr, Object, Stack, StringStack};
use crate::template::Partials;
use crate::value::Value;
use crate::warn::{Logger, TracingLogger, Warning};

/// Everything a render pass needs besides the tree and the data.
#[derive(Clone)]
pub struct RenderSettings {
    /// Partials for this call; they take precedence over attached ones.
    pub partials: Partials,
    /// Set to hand slots over to a host component layer.
    pub host: Option<String>,
    pub options: RenderOptions,
    pub logger: Rc<dyn Logger>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            partials: Partials::new(),
            host: None,
            options: RenderOptions::default(),
            logger: Rc::new(TracingLogger),
        }
    }
}

impl RenderSettings {
    pub fn with_partials(mut self, partials: Partials) -> Self {
        self.partials = partials;
        self
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_logger(mut self, logger: Rc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }
}

pub struct Renderer<'s> {
    settings: &'s RenderSettings,
    partial_depth: usize,
}

impl<'s> Renderer<'s> {
    pub fn new(settings: &'s RenderSettings) -> Self {
        Self {
            settings,
            partial_depth: 0,
        }
    }

    pub fn render(
        &mut self,
        nodes: &[Node],
        ctx: &Context,
        stack: &mut dyn Stack,
        partials: &Partials,
    ) {
        for node in nodes {
            self.node(node, ctx, stack, partials);
        }
    }

    fn node(&mut self, node: &Node, ctx: &Context, stack: &mut dyn Stack, partials: &Partials) {
        match node {
            Node::Text(t) => stack.create_object(Object::Text(t.clone())),
            Node::Interpolator { key, escaped } => {
                self.interpolate(key, *escaped, ctx, stack, partials)
            }
            Node::Section(s) if s.inverted => {
                let empty = ctx.lookup(&s.key).is_none_or(|v| {
                    !v.is_truthy() || (Context::is_sequence(&v) && v.items().is_empty())
                });
                if empty {
                    self.render(&s.children, ctx, stack, partials);
                }
            }
            Node::Section(s) => self.section(s, ctx, stack, partials),
            Node::Partial { key } => self.partial(key, ctx, stack, partials),
            Node::Element(e) => self.element(e, ctx, stack, partials),
            Node::Comment { children, .. } => {
                let text = self.render_to_string(children, ctx, partials);
                stack.create_comment(&text);
            }
            Node::Slot { id, key, children } => match &self.settings.host {
                Some(host) => stack.create_object(Object::Node(VNode::Handoff(Handoff {
                    id: id.to_string(),
                    name: key.clone(),
                    host: host.clone(),
                    scope: ctx.scope().to_json(),
                }))),
                None => self.render(children, ctx, stack, partials),
            },
            Node::Debug { key } => {
                if let Some(v) = ctx.lookup(key) {
                    stack.create_comment(&format!("{key}={}", v.to_text()));
                }
            }
            Node::Elided(_) | Node::Note(_) | Node::Delimiters { .. } => {}
        }
    }

    fn interpolate(
        &mut self,
        key: &str,
        escaped: bool,
        ctx: &Context,
        stack: &mut dyn Stack,
        partials: &Partials,
    ) {
        let Some(value) = ctx.lookup_with(key, &mut |f| f("")) else {
            return;
        };
        if escaped {
            let text = value.to_text();
            if !text.is_empty() {
                stack.create_object(Object::Text(escape(&text)));
            }
            return;
        }
        match value {
            Value::Node(n) => stack.create_object(Object::Node(n)),
            v => {
                let text = v.to_text();
                if text.contains(['<', '&']) {
                    self.markup(text, ctx, stack, partials);
                } else if !text.is_empty() {
                    stack.create_object(Object::Text(text));
                }
            }
        }
    }

    /// Render a value's markup through the markup-only compiler.
    fn markup(&mut self, text: String, ctx: &Context, stack: &mut dyn Stack, partials: &Partials) {
        match compile_with(&text, &CompileOptions::markup_only()) {
            Ok(compiled) => self.render(&compiled.nodes, ctx, stack, partials),
            Err(err) => {
                debug!(error = %err, "value is not well-formed markup; emitting verbatim");
                stack.create_object(Object::Text(text));
            }
        }
    }

    fn section(&mut self, s: &Section, ctx: &Context, stack: &mut dyn Stack, partials: &Partials) {
        let mut from_lambda = false;
        let value = ctx.lookup_with(&s.key, &mut |f| {
            from_lambda = true;
            f(&unparse(&s.children))
        });
        let Some(value) = value else {
            return;
        };

        if from_lambda {
            let text = value.to_text();
            match compile(&text) {
                Ok(compiled) => self.render(&compiled.nodes, ctx, stack, partials),
                Err(err) => {
                    debug!(
                        key = %s.key,
                        error = %err,
                        "lambda output did not compile; emitting verbatim"
                    );
                    stack.create_object(Object::Text(text));
                }
            }
            return;
        }

        if Context::is_sequence(&value) {
            for item in value.items() {
                let child = ctx.push(item.clone());
                self.render(&s.children, &child, stack, partials);
            }
            return;
        }
        match &value {
            Value::Map(_) => {
                let child = ctx.push(value.clone());
                self.render(&s.children, &child, stack, partials);
            }
            v if v.is_truthy() => self.render(&s.children, ctx, stack, partials),
            _ => {}
        }
    }

    fn partial(&mut self, key: &str, ctx: &Context, stack: &mut dyn Stack, partials: &Partials) {
        let Some(tpl) = partials.get(key) else {
            self.settings.logger.warn(Warning::MissingPartial {
                name: key.to_string(),
            });
            return;
        };
        let limit = self.settings.options.max_partial_depth;
        if self.partial_depth >= limit {
            self.settings.logger.warn(Warning::PartialDepth {
                name: key.to_string(),
                limit,
            });
            return;
        }
        trace!(partial = key, depth = self.partial_depth, "enter partial");

        let mut scope = partials.clone();
        scope.extend(tpl.attached_partials());
        scope.insert(key.to_string(), tpl.clone());

        self.partial_depth += 1;
        self.render(tpl.nodes(), ctx, stack, &scope);
        self.partial_depth -= 1;
    }

    fn element(&mut self, e: &Element, ctx: &Context, stack: &mut dyn Stack, partials: &Partials) {
        let mut attrs: Vec<Attr> = Vec::with_capacity(e.static_attrs.len());
        for a in &e.static_attrs {
            let value = match &a.value {
                AttrValue::Bool => None,
                AttrValue::Static(v) => Some(v.clone()),
                AttrValue::Tokens(tokens) => Some(self.render_to_string(tokens, ctx, partials)),
            };
            attrs.push((a.name.clone(), value));
        }

        if !e.dynamic_attrs.is_empty() {
            let parts: Vec<String> = e
                .dynamic_attrs
                .iter()
                .map(|n| self.render_to_string(std::slice::from_ref(n), ctx, partials))
                .filter(|s| !s.trim().is_empty())
                .collect();
            for (name, value) in parse_attributes(&parts.join(" ")) {
                match attrs.iter_mut().find(|(n, _)| *n == name) {
                    Some(slot) => slot.1 = value,
                    None => attrs.push((name, value)),
                }
            }
        }

        stack.open_element(&e.tag, e.ns, &attrs);
        self.render(&e.children, ctx, stack, partials);
        stack.close_element();
    }

    /// Render into a scratch string stack.
    fn render_to_string(&mut self, nodes: &[Node], ctx: &Context, partials: &Partials) -> String {
        let mut scratch = StringStack::new();
        self.render(nodes, ctx, &mut scratch, partials);
        scratch.finish()
    }
}
