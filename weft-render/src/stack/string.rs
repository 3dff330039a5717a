use weft_dom::{html::is_void, to_html};
use weft_template::Namespace;

use super::{Attr, Object, Stack};

/// Writes markup. Text is already in markup form and goes out verbatim.
#[derive(Debug, Default)]
pub struct StringStack {
    out: String,
    open: Vec<String>,
}

impl StringStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finish(mut self) -> String {
        while !self.open.is_empty() {
            self.close_element();
        }
        self.out
    }
}

impl Stack for StringStack {
    fn open_element(&mut self, tag: &str, _ns: Option<Namespace>, attrs: &[Attr]) {
        self.out.push('<');
        self.out.push_str(tag);
        for (name, value) in attrs {
            self.out.push(' ');
            self.out.push_str(name);
            if let Some(v) = value {
                let q = if v.contains('"') { '\'' } else { '"' };
                self.out.push('=');
                self.out.push(q);
                self.out.push_str(v);
                self.out.push(q);
            }
        }
        self.out.push('>');
        self.open.push(tag.to_string());
    }

    fn close_element(&mut self) {
        if let Some(tag) = self.open.pop() {
            if !is_void(&tag) {
                self.out.push_str("</");
                self.out.push_str(&tag);
                self.out.push('>');
            }
        }
    }

    fn create_object(&mut self, object: Object) {
        match object {
            Object::Text(t) => self.out.push_str(&t),
            Object::Node(n) => self.out.push_str(&to_html(&n)),
        }
    }

    fn create_comment(&mut self, text: &str) {
        self.out.push_str("<!--");
        self.out.push_str(text);
        self.out.push_str("-->");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn void_elements_are_not_closed() {
        let mut s = StringStack::new();
        s.open_element("p", None, &[]);
        s.open_element(
            "input",
            None,
            &[("value".into(), Some("say \"hi\"".into())), ("checked".into(), None)],
        );
        s.close_element();
        s.create_object(Object::Text("a &amp; b".into()));
        s.close_element();
        assert_eq!(
            s.finish(),
            r#"<p><input value='say "hi"' checked>a &amp; b</p>"#
        );
    }
}
