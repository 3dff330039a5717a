//! Compiled, shareable template objects.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use thiserror::Error;
use weft_dom::{Patch, VNode, diff_children, patch_children};
use weft_template::{Bundle, BundleError, CompileError, CompileOptions, Compiled, Node, unparse};

use crate::context::Context;
use crate::renderer::{RenderSettings, Renderer};
use crate::stack::{Stack, StringStack, TraceStack, VTreeStack};
use crate::warn::Warning;

pub type Partials = HashMap<String, Template>;

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error(transparent)]
    Bundle(#[from] BundleError),
    #[error("template `{name}`: {source}")]
    Compile {
        name: String,
        #[source]
        source: CompileError,
    },
}

struct Inner {
    nodes: Vec<Node>,
    partial_names: Vec<String>,
    partials: RefCell<Partials>,
}

/// A compiled tree plus its attached partials and host.
///
/// Clones share the tree and the partial map, so a template can be handed
/// to many callers or registered as a partial of itself.
#[derive(Clone)]
pub struct Template {
    inner: Rc<Inner>,
    host: Option<Rc<str>>,
}

impl fmt::Debug for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut attached: Vec<String> = self.inner.partials.borrow().keys().cloned().collect();
        attached.sort();
        f.debug_struct("Template")
            .field("nodes", &self.inner.nodes.len())
            .field("partial_names", &self.inner.partial_names)
            .field("attached", &attached)
            .field("host", &self.host)
            .finish()
    }
}

impl From<Compiled> for Template {
    fn from(c: Compiled) -> Self {
        Template {
            inner: Rc::new(Inner {
                nodes: c.nodes,
                partial_names: c.partial_names,
                partials: RefCell::new(Partials::new()),
            }),
            host: None,
        }
    }
}

impl Template {
    pub fn compile(src: &str) -> Result<Template, CompileError> {
        Ok(weft_template::compile(src)?.into())
    }

    pub fn compile_with(src: &str, opts: &CompileOptions) -> Result<Template, CompileError> {
        Ok(weft_template::compile_with(src, opts)?.into())
    }

    pub fn nodes(&self) -> &[Node] {
        &self.inner.nodes
    }

    /// Partials referenced by `{{>name}}`, in order of first use.
    pub fn partial_names(&self) -> &[String] {
        &self.inner.partial_names
    }

    /// Equivalent source text.
    pub fn source(&self) -> String {
        unparse(&self.inner.nodes)
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(&self.inner.nodes).unwrap_or(serde_json::Value::Null)
    }

    /// Register partials. Lookups happen at render time, so a partial may
    /// be attached after the templates that use it.
    pub fn attach_partials(&self, partials: impl IntoIterator<Item = (String, Template)>) {
        self.inner.partials.borrow_mut().extend(partials);
    }

    pub fn attached_partials(&self) -> Partials {
        self.inner.partials.borrow().clone()
    }

    /// Partial names that nothing attached resolves.
    pub fn missing_partials(&self) -> Vec<&str> {
        let attached = self.inner.partials.borrow();
        self.inner
            .partial_names
            .iter()
            .filter(|n| !attached.contains_key(n.as_str()))
            .map(String::as_str)
            .collect()
    }

    /// Derived template sharing this tree whose virtual-tree renders hand
    /// slots over to `host`.
    pub fn attach_host(&self, host: &str) -> Template {
        Template {
            inner: self.inner.clone(),
            host: Some(Rc::from(host)),
        }
    }

    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    /// Drive `stack` with this tree. Partials in `settings` override
    /// attached ones of the same name.
    pub fn render(&self, ctx: &Context, stack: &mut dyn Stack, settings: &RenderSettings) {
        let mut partials = self.attached_partials();
        partials.extend(settings.partials.iter().map(|(k, v)| (k.clone(), v.clone())));
        Renderer::new(settings).render(&self.inner.nodes, ctx, stack, &partials);
    }

    pub fn to_markup_string(&self, ctx: &Context) -> String {
        self.to_markup_string_with(ctx, &RenderSettings::default())
    }

    /// Markup is always headless: slots render their default content even
    /// when `settings` names a host.
    pub fn to_markup_string_with(&self, ctx: &Context, settings: &RenderSettings) -> String {
        let mut stack = StringStack::new();
        if settings.host.is_some() {
            let headless = RenderSettings {
                host: None,
                ..settings.clone()
            };
            self.render(ctx, &mut stack, &headless);
        } else {
            self.render(ctx, &mut stack, settings);
        }
        stack.finish()
    }

    /// Virtual tree. `host`, or the attached host, turns slots into handoffs.
    pub fn to_virtual_tree(&self, ctx: &Context, host: Option<&str>) -> Vec<VNode> {
        let mut settings = RenderSettings::default();
        settings.host = host.or(self.host()).map(str::to_string);
        self.to_virtual_tree_with(ctx, &settings)
    }

    pub fn to_virtual_tree_with(&self, ctx: &Context, settings: &RenderSettings) -> Vec<VNode> {
        let mut stack = VTreeStack::new();
        self.render(ctx, &mut stack, settings);
        stack.finish()
    }

    pub fn to_trace(&self, ctx: &Context) -> String {
        let mut stack = TraceStack::new();
        self.render(ctx, &mut stack, &RenderSettings::default());
        stack.finish()
    }

    /// Re-render and diff against `old`.
    pub fn update(&self, old: &[VNode], ctx: &Context) -> (Vec<VNode>, Vec<Patch>) {
        let mut settings = RenderSettings::default();
        settings.host = self.host().map(str::to_string);
        self.update_with(old, ctx, &settings)
    }

    /// With `validate_updates` on, a patch list that does not reproduce the
    /// new tree is reported as a render invariant warning.
    pub fn update_with(
        &self,
        old: &[VNode],
        ctx: &Context,
        settings: &RenderSettings,
    ) -> (Vec<VNode>, Vec<Patch>) {
        let new = self.to_virtual_tree_with(ctx, settings);
        let patches = diff_children(old, &new);
        if settings.options.validate_updates && patch_children(old, &patches) != new {
            settings.logger.warn(Warning::RenderInvariant(format!(
                "{} patch(es) did not reproduce the rendered tree",
                patches.len()
            )));
        }
        (new, patches)
    }
}

/// Compile every template in a bundle file, keyed by name.
pub fn compile_bundle(src: &str, base: &CompileOptions) -> Result<Partials, TemplateError> {
    let bundle = Bundle::parse(src)?;
    let mut out = Partials::new();
    for entry in &bundle.templates {
        let opts = entry.compile_options(base);
        let tpl = Template::compile_with(&entry.content, &opts).map_err(|source| {
            TemplateError::Compile {
                name: entry.name.clone(),
                source,
            }
        })?;
        out.insert(entry.name.clone(), tpl);
    }
    Ok(out)
}
