use std::fmt::Write;

use weft_dom::to_html;
use weft_template::Namespace;

use super::{Attr, Object, Stack};

/// One indented line per primitive call, for debugging renders.
#[derive(Debug, Default)]
pub struct TraceStack {
    out: String,
    depth: usize,
}

impl TraceStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finish(self) -> String {
        self.out
    }

    fn line(&mut self, args: std::fmt::Arguments<'_>) {
        for _ in 0..self.depth {
            self.out.push_str("  ");
        }
        let _ = self.out.write_fmt(args);
        self.out.push('\n');
    }
}

impl Stack for TraceStack {
    fn open_element(&mut self, tag: &str, ns: Option<Namespace>, attrs: &[Attr]) {
        let mut desc = tag.to_string();
        if let Some(ns) = ns {
            let _ = write!(desc, " ns={}", ns.as_str());
        }
        for (name, value) in attrs {
            match value {
                Some(v) => {
                    let _ = write!(desc, " {name}={v:?}");
                }
                None => {
                    let _ = write!(desc, " {name}");
                }
            }
        }
        self.line(format_args!("open {desc}"));
        self.depth += 1;
    }

    fn close_element(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.line(format_args!("close"));
    }

    fn create_object(&mut self, object: Object) {
        match object {
            Object::Text(t) => self.line(format_args!("text {t:?}")),
            Object::Node(n) => self.line(format_args!("node {}", to_html(&n))),
        }
    }

    fn create_comment(&mut self, text: &str) {
        self.line(format_args!("comment {text:?}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indents_by_depth() {
        let mut s = TraceStack::new();
        s.open_element("ul", None, &[("class".into(), Some("x".into()))]);
        s.create_object(Object::Text("hi".into()));
        s.close_element();
        assert_eq!(s.finish(), "open ul class=\"x\"\n  text \"hi\"\nclose\n");
    }
}
