//! Output sinks the renderer drives.
//!
//! Every backend sees the same four primitives in the same order as the
//! tree is walked, so a new output format is one more impl of [`Stack`].

use weft_dom::VNode;
use weft_template::Namespace;

mod string;
mod trace;
mod vtree;

pub use string::StringStack;
pub use trace::TraceStack;
pub use vtree::VTreeStack;

/// Attribute as rendered: name plus markup-form value, `None` for a bare
/// boolean attribute.
pub type Attr = (String, Option<String>);

#[derive(Debug, Clone, PartialEq)]
pub enum Object {
    /// Markup-form text: entities are still encoded.
    Text(String),
    Node(VNode),
}

pub trait Stack {
    fn open_element(&mut self, tag: &str, ns: Option<Namespace>, attrs: &[Attr]);
    fn close_element(&mut self);
    fn create_object(&mut self, object: Object);
    fn create_comment(&mut self, text: &str);
}
