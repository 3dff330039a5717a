//! Streaming markup tokenizer.
//!
//! Fed one char at a time so the compile driver can stop between any two
//! chars, ask which [`Region`] the lexer is in, and splice a directive into
//! the right place. Not a conforming HTML5 tokenizer: it covers tags,
//! attributes, comments, declarations and raw-text elements.

pub const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "textarea", "title"];

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

pub fn is_void_element(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quote {
    Double,
    Single,
    Unquoted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Text,
    TagOpen,
    EndTagOpen,
    TagName,
    EndTagName,
    BeforeAttrName,
    AttrName,
    AfterAttrName,
    BeforeAttrValue,
    AttrValue(Quote),
    AfterAttrValue,
    SelfClosing,
    MarkupDecl,
    Declaration,
    Comment,
    RawText,
}

/// Where a directive would land if it appeared now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Text,
    Comment,
    RawText,
    TagName,
    /// In the middle of an attribute name.
    AttrName,
    /// Between attributes of an open start tag.
    AttrGap,
    AttrValue,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MarkupEvent {
    Text(char),
    StartTag(String),
    AttrName(String),
    AttrValueStart,
    AttrValueChar(char),
    AttrValueEnd,
    AttrNoValue,
    StartTagEnd { self_closing: bool },
    EndTag(String),
    CommentStart,
    CommentChar(char),
    CommentEnd,
    Declaration(String),
}

#[derive(Debug, Clone)]
pub struct Tokenizer {
    mode: Mode,
    buf: String,
    tag: String,
    dashes: usize,
    raw_tag: Option<String>,
    pending: String,
    end_tag_done: bool,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer {
    pub fn new() -> Self {
        Self::in_mode(Mode::Text)
    }

    fn in_mode(mode: Mode) -> Self {
        Self {
            mode,
            buf: String::new(),
            tag: String::new(),
            dashes: 0,
            raw_tag: None,
            pending: String::new(),
            end_tag_done: false,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn region(&self) -> Region {
        match self.mode {
            Mode::Text | Mode::TagOpen | Mode::EndTagOpen | Mode::MarkupDecl => Region::Text,
            Mode::Comment => Region::Comment,
            Mode::RawText => Region::RawText,
            Mode::TagName | Mode::EndTagName | Mode::Declaration => Region::TagName,
            Mode::AttrName => Region::AttrName,
            Mode::BeforeAttrName
            | Mode::AfterAttrName
            | Mode::AfterAttrValue
            | Mode::SelfClosing => Region::AttrGap,
            Mode::BeforeAttrValue | Mode::AttrValue(_) => Region::AttrValue,
        }
    }

    /// Whether stripped standalone whitespace can be taken out of the stream here.
    pub fn accepts_elision(&self) -> bool {
        matches!(self.mode, Mode::Text | Mode::Comment | Mode::RawText)
    }

    pub fn feed(&mut self, c: char, out: &mut Vec<MarkupEvent>) {
        let mut next = Some(c);
        while let Some(ch) = next.take() {
            next = self.step(ch, out);
        }
    }

    /// Returns a char to reprocess in the new mode.
    fn step(&mut self, c: char, out: &mut Vec<MarkupEvent>) -> Option<char> {
        match self.mode {
            Mode::Text => {
                if c == '<' {
                    self.mode = Mode::TagOpen;
                } else {
                    out.push(MarkupEvent::Text(c));
                }
            }
            Mode::TagOpen => {
                if c.is_ascii_alphabetic() {
                    self.buf.clear();
                    self.buf.push(c.to_ascii_lowercase());
                    self.mode = Mode::TagName;
                } else if c == '/' {
                    self.mode = Mode::EndTagOpen;
                } else if c == '!' {
                    self.buf.clear();
                    self.mode = Mode::MarkupDecl;
                } else {
                    out.push(MarkupEvent::Text('<'));
                    self.mode = Mode::Text;
                    return Some(c);
                }
            }
            Mode::EndTagOpen => {
                if c.is_ascii_alphabetic() {
                    self.buf.clear();
                    self.buf.push(c.to_ascii_lowercase());
                    self.end_tag_done = false;
                    self.mode = Mode::EndTagName;
                } else {
                    out.push(MarkupEvent::Text('<'));
                    out.push(MarkupEvent::Text('/'));
                    self.mode = Mode::Text;
                    return Some(c);
                }
            }
            Mode::TagName => match c {
                '>' => {
                    self.emit_start_tag(out);
                    self.end_start_tag(false, out);
                }
                '/' => {
                    self.emit_start_tag(out);
                    self.mode = Mode::SelfClosing;
                }
                c if c.is_whitespace() => {
                    self.emit_start_tag(out);
                    self.mode = Mode::BeforeAttrName;
                }
                c => self.buf.push(c.to_ascii_lowercase()),
            },
            Mode::EndTagName => match c {
                '>' => {
                    out.push(MarkupEvent::EndTag(std::mem::take(&mut self.buf)));
                    self.mode = Mode::Text;
                }
                c if c.is_whitespace() => self.end_tag_done = true,
                c => {
                    if !self.end_tag_done {
                        self.buf.push(c.to_ascii_lowercase());
                    }
                }
            },
            Mode::BeforeAttrName => match c {
                '/' => self.mode = Mode::SelfClosing,
                '>' => self.end_start_tag(false, out),
                c if c.is_whitespace() => {}
                c => {
                    self.buf.clear();
                    self.buf.push(c);
                    self.mode = Mode::AttrName;
                }
            },
            Mode::AttrName => match c {
                '=' => {
                    self.emit_attr_name(out);
                    self.mode = Mode::BeforeAttrValue;
                }
                '/' => {
                    self.emit_attr_name(out);
                    out.push(MarkupEvent::AttrNoValue);
                    self.mode = Mode::SelfClosing;
                }
                '>' => {
                    self.emit_attr_name(out);
                    out.push(MarkupEvent::AttrNoValue);
                    self.end_start_tag(false, out);
                }
                c if c.is_whitespace() => {
                    self.emit_attr_name(out);
                    self.mode = Mode::AfterAttrName;
                }
                c => self.buf.push(c),
            },
            Mode::AfterAttrName => match c {
                '=' => self.mode = Mode::BeforeAttrValue,
                '/' => {
                    out.push(MarkupEvent::AttrNoValue);
                    self.mode = Mode::SelfClosing;
                }
                '>' => {
                    out.push(MarkupEvent::AttrNoValue);
                    self.end_start_tag(false, out);
                }
                c if c.is_whitespace() => {}
                c => {
                    out.push(MarkupEvent::AttrNoValue);
                    self.buf.clear();
                    self.buf.push(c);
                    self.mode = Mode::AttrName;
                }
            },
            Mode::BeforeAttrValue => match c {
                '"' => {
                    out.push(MarkupEvent::AttrValueStart);
                    self.mode = Mode::AttrValue(Quote::Double);
                }
                '\'' => {
                    out.push(MarkupEvent::AttrValueStart);
                    self.mode = Mode::AttrValue(Quote::Single);
                }
                '>' => {
                    out.push(MarkupEvent::AttrValueStart);
                    out.push(MarkupEvent::AttrValueEnd);
                    self.end_start_tag(false, out);
                }
                c if c.is_whitespace() => {}
                c => {
                    out.push(MarkupEvent::AttrValueStart);
                    self.mode = Mode::AttrValue(Quote::Unquoted);
                    return Some(c);
                }
            },
            Mode::AttrValue(q) => match (q, c) {
                (Quote::Double, '"') | (Quote::Single, '\'') => {
                    out.push(MarkupEvent::AttrValueEnd);
                    self.mode = Mode::AfterAttrValue;
                }
                (Quote::Unquoted, '>') => {
                    out.push(MarkupEvent::AttrValueEnd);
                    self.end_start_tag(false, out);
                }
                (Quote::Unquoted, c) if c.is_whitespace() => {
                    out.push(MarkupEvent::AttrValueEnd);
                    self.mode = Mode::BeforeAttrName;
                }
                (_, c) => out.push(MarkupEvent::AttrValueChar(c)),
            },
            Mode::AfterAttrValue => match c {
                '/' => self.mode = Mode::SelfClosing,
                '>' => self.end_start_tag(false, out),
                c if c.is_whitespace() => self.mode = Mode::BeforeAttrName,
                c => {
                    self.mode = Mode::BeforeAttrName;
                    return Some(c);
                }
            },
            Mode::SelfClosing => {
                if c == '>' {
                    self.end_start_tag(true, out);
                } else {
                    self.mode = Mode::BeforeAttrName;
                    return Some(c);
                }
            }
            Mode::MarkupDecl => {
                self.buf.push(c);
                if self.buf == "--" {
                    self.buf.clear();
                    self.dashes = 0;
                    out.push(MarkupEvent::CommentStart);
                    self.mode = Mode::Comment;
                } else if c == '>' {
                    out.push(MarkupEvent::Declaration(format!("<!{}", self.buf)));
                    self.buf.clear();
                    self.mode = Mode::Text;
                } else if self.buf != "-" {
                    self.mode = Mode::Declaration;
                }
            }
            Mode::Declaration => {
                self.buf.push(c);
                if c == '>' {
                    out.push(MarkupEvent::Declaration(format!("<!{}", self.buf)));
                    self.buf.clear();
                    self.mode = Mode::Text;
                }
            }
            Mode::Comment => {
                if c == '-' {
                    self.dashes += 1;
                } else if c == '>' && self.dashes >= 2 {
                    for _ in 2..self.dashes {
                        out.push(MarkupEvent::CommentChar('-'));
                    }
                    self.dashes = 0;
                    out.push(MarkupEvent::CommentEnd);
                    self.mode = Mode::Text;
                } else {
                    self.flush_dashes(out);
                    out.push(MarkupEvent::CommentChar(c));
                }
            }
            Mode::RawText => return self.step_raw(c, out),
        }
        None
    }

    fn step_raw(&mut self, c: char, out: &mut Vec<MarkupEvent>) -> Option<char> {
        if self.pending.is_empty() {
            if c == '<' {
                self.pending.push(c);
            } else {
                out.push(MarkupEvent::Text(c));
            }
            return None;
        }
        self.pending.push(c);
        let tag = self.raw_tag.clone().unwrap_or_default();
        let target = format!("</{tag}>");
        let candidate = self.pending.to_ascii_lowercase();
        if target.starts_with(&candidate) {
            if candidate.len() == target.len() {
                self.pending.clear();
                self.raw_tag = None;
                self.mode = Mode::Text;
                out.push(MarkupEvent::EndTag(tag));
            }
            return None;
        }
        let last = self.pending.pop();
        for ch in self.pending.drain(..) {
            out.push(MarkupEvent::Text(ch));
        }
        last
    }

    fn emit_start_tag(&mut self, out: &mut Vec<MarkupEvent>) {
        self.tag = std::mem::take(&mut self.buf);
        out.push(MarkupEvent::StartTag(self.tag.clone()));
    }

    fn emit_attr_name(&mut self, out: &mut Vec<MarkupEvent>) {
        out.push(MarkupEvent::AttrName(std::mem::take(&mut self.buf)));
    }

    fn end_start_tag(&mut self, self_closing: bool, out: &mut Vec<MarkupEvent>) {
        out.push(MarkupEvent::StartTagEnd { self_closing });
        if !self_closing && RAW_TEXT_ELEMENTS.contains(&self.tag.as_str()) {
            self.raw_tag = Some(self.tag.clone());
            self.mode = Mode::RawText;
        } else {
            self.mode = Mode::Text;
        }
    }

    fn flush_dashes(&mut self, out: &mut Vec<MarkupEvent>) {
        for _ in 0..self.dashes {
            out.push(MarkupEvent::CommentChar('-'));
        }
        self.dashes = 0;
    }

    /// Settle any half-read construct before a directive is spliced in.
    ///
    /// Pending lookahead is flushed, a bare attribute name becomes a boolean
    /// attribute, and `name=` followed by a directive starts an unquoted value.
    /// Tag names and attribute names in progress are left alone; the caller
    /// rejects directives there.
    pub fn interrupt(&mut self, out: &mut Vec<MarkupEvent>) {
        match self.mode {
            Mode::Comment => self.flush_dashes(out),
            Mode::RawText => {
                for ch in self.pending.drain(..) {
                    out.push(MarkupEvent::Text(ch));
                }
            }
            Mode::TagOpen => {
                out.push(MarkupEvent::Text('<'));
                self.mode = Mode::Text;
            }
            Mode::EndTagOpen => {
                out.push(MarkupEvent::Text('<'));
                out.push(MarkupEvent::Text('/'));
                self.mode = Mode::Text;
            }
            Mode::MarkupDecl => {
                out.push(MarkupEvent::Text('<'));
                out.push(MarkupEvent::Text('!'));
                for ch in self.buf.drain(..) {
                    out.push(MarkupEvent::Text(ch));
                }
                self.mode = Mode::Text;
            }
            Mode::AfterAttrName => {
                out.push(MarkupEvent::AttrNoValue);
                self.mode = Mode::BeforeAttrName;
            }
            Mode::BeforeAttrValue => {
                out.push(MarkupEvent::AttrValueStart);
                self.mode = Mode::AttrValue(Quote::Unquoted);
            }
            Mode::AfterAttrValue | Mode::SelfClosing => self.mode = Mode::BeforeAttrName,
            _ => {}
        }
    }

    /// Finish a bare attribute name or an unquoted value so the tokenizer
    /// stands between attributes. Used when an attribute section closes.
    pub fn settle_attribute(&mut self, out: &mut Vec<MarkupEvent>) {
        match self.mode {
            Mode::AttrName => {
                self.emit_attr_name(out);
                out.push(MarkupEvent::AttrNoValue);
                self.mode = Mode::BeforeAttrName;
            }
            Mode::AttrValue(Quote::Unquoted) => {
                out.push(MarkupEvent::AttrValueEnd);
                self.mode = Mode::BeforeAttrName;
            }
            Mode::BeforeAttrValue => {
                out.push(MarkupEvent::AttrValueStart);
                out.push(MarkupEvent::AttrValueEnd);
                self.mode = Mode::BeforeAttrName;
            }
            _ => self.interrupt(out),
        }
    }

    /// Flush at end of input. Fails when a tag is left open.
    pub fn finish(&mut self, out: &mut Vec<MarkupEvent>) -> Result<(), &'static str> {
        match self.mode {
            Mode::Text | Mode::Comment | Mode::RawText | Mode::TagOpen | Mode::EndTagOpen
            | Mode::MarkupDecl => {
                self.interrupt(out);
                Ok(())
            }
            Mode::Declaration => Err("unterminated declaration"),
            Mode::EndTagName => Err("unterminated end tag"),
            _ => Err("unterminated start tag"),
        }
    }
}

/// Split rendered attribute text such as ` data-x="1" checked` into pairs.
/// `None` marks a boolean attribute. Anything after a stray `>` is ignored.
pub fn parse_attributes(src: &str) -> Vec<(String, Option<String>)> {
    let mut tok = Tokenizer::in_mode(Mode::BeforeAttrName);
    let mut events = Vec::new();
    for c in src.chars() {
        tok.feed(c, &mut events);
        if tok.mode() == Mode::Text {
            break;
        }
    }
    if tok.mode() != Mode::Text {
        tok.feed('>', &mut events);
    }

    let mut attrs = Vec::new();
    let mut name: Option<String> = None;
    let mut value: Option<String> = None;
    for ev in events {
        match ev {
            MarkupEvent::AttrName(n) => name = Some(n),
            MarkupEvent::AttrValueStart => value = Some(String::new()),
            MarkupEvent::AttrValueChar(c) => {
                if let Some(v) = value.as_mut() {
                    v.push(c);
                }
            }
            MarkupEvent::AttrValueEnd | MarkupEvent::AttrNoValue => {
                if let Some(n) = name.take() {
                    attrs.push((n, value.take()));
                }
            }
            _ => {}
        }
    }
    attrs
}

#[cfg(test)]
mod tests {
    use super::*;
    use MarkupEvent::*;

    fn events(src: &str) -> Vec<MarkupEvent> {
        let mut t = Tokenizer::new();
        let mut out = Vec::new();
        for c in src.chars() {
            t.feed(c, &mut out);
        }
        t.finish(&mut out).unwrap();
        out
    }

    #[test]
    fn tag_with_attributes() {
        let ev = events(r#"<a href='x' hidden>"#);
        assert_eq!(
            ev,
            vec![
                StartTag("a".into()),
                AttrName("href".into()),
                AttrValueStart,
                AttrValueChar('x'),
                AttrValueEnd,
                AttrName("hidden".into()),
                AttrNoValue,
                StartTagEnd {
                    self_closing: false
                },
            ]
        );
    }

    #[test]
    fn comment_with_inner_dashes() {
        let ev = events("<!-- a-b --->");
        let text: String = ev
            .iter()
            .filter_map(|e| match e {
                CommentChar(c) => Some(*c),
                _ => None,
            })
            .collect();
        assert_eq!(text, " a-b -");
        assert_eq!(ev.first(), Some(&CommentStart));
        assert_eq!(ev.last(), Some(&CommentEnd));
    }

    #[test]
    fn lone_angle_bracket_is_text() {
        assert_eq!(events("a < b"), vec![Text('a'), Text(' '), Text('<'), Text(' '), Text('b')]);
    }

    #[test]
    fn raw_text_ignores_markup_until_its_end_tag() {
        let ev = events("<script>a<b></script>");
        assert!(ev.contains(&Text('<')));
        assert_eq!(ev.last(), Some(&EndTag("script".into())));
        assert!(!ev.iter().any(|e| matches!(e, StartTag(t) if t == "b")));
    }

    #[test]
    fn regions_track_position() {
        let mut t = Tokenizer::new();
        let mut out = Vec::new();
        for (c, region) in [
            ('<', Region::Text),
            ('p', Region::TagName),
            (' ', Region::AttrGap),
            ('i', Region::AttrName),
            ('=', Region::AttrValue),
            ('"', Region::AttrValue),
            ('"', Region::AttrGap),
            ('>', Region::Text),
        ] {
            t.feed(c, &mut out);
            assert_eq!(t.region(), region, "after {c:?}");
        }
    }

    #[test]
    fn unterminated_tag_fails_at_finish() {
        let mut t = Tokenizer::new();
        let mut out = Vec::new();
        for c in "<div class=".chars() {
            t.feed(c, &mut out);
        }
        assert!(t.finish(&mut out).is_err());
    }

    #[test]
    fn parses_attribute_text() {
        assert_eq!(
            parse_attributes(r#" data-y="z" checked title=a"#),
            vec![
                ("data-y".to_string(), Some("z".to_string())),
                ("checked".to_string(), None),
                ("title".to_string(), Some("a".to_string())),
            ]
        );
    }
}
