pub mod builder;
pub mod bundle;
pub mod compile;
pub mod error;
pub mod node;
pub mod options;
pub mod scanner;
pub mod tokenizer;
pub mod unparse;

pub use bundle::{Attr, Bundle, BundleEntry};
pub use compile::{Compiled, compile, compile_with};
pub use error::{BundleError, CompileError, ParseError, StructuralError};
pub use node::{AttrValue, Element, Namespace, Node, NodeId, Section, StaticAttr};
pub use options::CompileOptions;
pub use tokenizer::{is_void_element, parse_attributes};
pub use unparse::{unparse, unparse_with};
