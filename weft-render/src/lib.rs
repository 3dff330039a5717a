//! Renders compiled weft templates against hierarchical data.
//!
//! A [`Template`] is walked by a [`Renderer`] which resolves names through a
//! [`Context`] and drives a [`Stack`] backend: a virtual tree, a markup
//! string or a debug trace.

pub mod context;
pub mod options;
pub mod renderer;
pub mod scope;
pub mod stack;
pub mod template;
pub mod value;
pub mod warn;

pub use context::Context;
pub use options::RenderOptions;
pub use renderer::{RenderSettings, Renderer};
pub use scope::{Adaptor, DataAdaptor};
pub use stack::{Object, Stack, StringStack, TraceStack, VTreeStack};
pub use template::{Partials, Template, TemplateError, compile_bundle};
pub use value::{Lambda, Value};
pub use warn::{CollectingLogger, Logger, TracingLogger, Warning};
