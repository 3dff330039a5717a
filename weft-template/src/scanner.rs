//! Directive scanner: finds `{{...}}` directives and classifies them.
//!
//! The scanner knows nothing about markup. It owns the current delimiter
//! pair, which a `{{=<% %>=}}` directive replaces for the rest of the
//! compile unit.

use std::ops::Range;

use crate::error::ParseError;

pub const DEFAULT_OPEN: &str = "{{";
pub const DEFAULT_CLOSE: &str = "}}";
/// Comments starting with this marker are kept as debug interpolators.
pub const DEBUG_MARKER: char = '@';

#[derive(Debug, Clone, PartialEq)]
pub enum DirectiveKind {
    Interpolate { key: String, escaped: bool },
    Section { key: String, inverted: bool },
    Slot { key: String },
    Close { key: String },
    Partial { key: String },
    Comment(String),
    Debug { key: String },
    Delimiters { open: String, close: String },
}

impl DirectiveKind {
    /// Structural directives make a line eligible for standalone elision.
    pub fn is_structural(&self) -> bool {
        !matches!(self, DirectiveKind::Interpolate { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Directive {
    pub kind: DirectiveKind,
    /// Byte offset of the open delimiter.
    pub start: usize,
    /// Byte offset just past the close delimiter.
    pub end: usize,
}

#[derive(Debug, Clone)]
pub struct Scanner {
    open: String,
    close: String,
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new()
    }
}

impl Scanner {
    pub fn new() -> Self {
        Self::with_delimiters(DEFAULT_OPEN, DEFAULT_CLOSE)
    }

    pub fn with_delimiters(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            open: open.into(),
            close: close.into(),
        }
    }

    pub fn delimiters(&self) -> (&str, &str) {
        (&self.open, &self.close)
    }

    pub fn starts_at(&self, src: &str, pos: usize) -> bool {
        src[pos..].starts_with(&self.open)
    }

    /// Offset of the next open delimiter at or after `from`.
    pub fn find_next(&self, src: &str, from: usize) -> Option<usize> {
        src[from..].find(&self.open).map(|i| from + i)
    }

    /// Scan the directive whose open delimiter sits at `pos`.
    pub fn scan(&mut self, src: &str, pos: usize) -> Result<Directive, ParseError> {
        let body_start = pos + self.open.len();
        let rest = &src[body_start..];

        if let Some(inner) = rest.strip_prefix('{') {
            let closer = format!("}}{}", self.close);
            let rel = inner
                .find(&closer)
                .ok_or_else(|| ParseError::at(src, pos, "unterminated directive"))?;
            let key = name(src, pos, &inner[..rel])?;
            return Ok(Directive {
                kind: DirectiveKind::Interpolate {
                    key,
                    escaped: false,
                },
                start: pos,
                end: body_start + 1 + rel + closer.len(),
            });
        }

        if let Some(inner) = rest.strip_prefix('=') {
            let closer = format!("={}", self.close);
            let rel = inner
                .find(&closer)
                .ok_or_else(|| ParseError::at(src, pos, "unterminated delimiter change"))?;
            let parts: Vec<&str> = inner[..rel].split_whitespace().collect();
            let [open, close] = parts.as_slice() else {
                return Err(ParseError::at(
                    src,
                    pos,
                    "delimiter change needs exactly two delimiters",
                ));
            };
            if open.contains('=') || close.contains('=') {
                return Err(ParseError::at(src, pos, "delimiters may not contain `=`"));
            }
            self.open = open.to_string();
            self.close = close.to_string();
            return Ok(Directive {
                kind: DirectiveKind::Delimiters {
                    open: self.open.clone(),
                    close: self.close.clone(),
                },
                start: pos,
                end: body_start + 1 + rel + closer.len(),
            });
        }

        let rel = rest
            .find(&self.close)
            .ok_or_else(|| ParseError::at(src, pos, "unterminated directive"))?;
        let end = body_start + rel + self.close.len();
        let body = rest[..rel].trim_start();

        let mut chars = body.chars();
        let kind = match chars.next() {
            Some('!') => {
                let text = chars.as_str();
                match text.trim_start().strip_prefix(DEBUG_MARKER) {
                    Some(key) => DirectiveKind::Debug {
                        key: name(src, pos, key)?,
                    },
                    None => DirectiveKind::Comment(text.to_string()),
                }
            }
            Some('#') => DirectiveKind::Section {
                key: name(src, pos, chars.as_str())?,
                inverted: false,
            },
            Some('^') => DirectiveKind::Section {
                key: name(src, pos, chars.as_str())?,
                inverted: true,
            },
            Some('$') => DirectiveKind::Slot {
                key: name(src, pos, chars.as_str())?,
            },
            Some('/') => DirectiveKind::Close {
                key: name(src, pos, chars.as_str())?,
            },
            Some('>') => DirectiveKind::Partial {
                key: name(src, pos, chars.as_str())?,
            },
            Some('&') => DirectiveKind::Interpolate {
                key: name(src, pos, chars.as_str())?,
                escaped: false,
            },
            _ => DirectiveKind::Interpolate {
                key: name(src, pos, body)?,
                escaped: true,
            },
        };
        Ok(Directive {
            kind,
            start: pos,
            end,
        })
    }
}

fn name(src: &str, pos: usize, raw: &str) -> Result<String, ParseError> {
    let key = raw.trim();
    if key.is_empty() {
        return Err(ParseError::at(src, pos, "directive has an empty name"));
    }
    if key.chars().any(char::is_whitespace) {
        return Err(ParseError::at(
            src,
            pos,
            format!("directive name `{key}` contains whitespace"),
        ));
    }
    Ok(key.to_string())
}

fn is_blank(s: &str) -> bool {
    s.chars().all(|c| c == ' ' || c == '\t' || c == '\r')
}

/// Byte ranges of whitespace to strip around standalone directives.
///
/// A line is standalone when it holds nothing but blanks and a single
/// structural directive. A directive spanning several physical lines (a long
/// comment) makes them one logical line. Runs on a copy of the scanner so the
/// caller's delimiter state is untouched.
pub fn standalone_spans(src: &str, scanner: &Scanner) -> Result<Vec<Range<usize>>, ParseError> {
    let mut sc = scanner.clone();
    let mut spans = Vec::new();
    let mut line_start = 0;
    let mut pos = 0;
    let mut tokens: Vec<Directive> = Vec::new();
    let mut only_blanks = true;

    let mut close_line = |line_start: usize,
                          line_end: usize,
                          tokens: &mut Vec<Directive>,
                          only_blanks: bool| {
        if let [d] = tokens.as_slice() {
            if only_blanks && d.kind.is_structural() {
                if d.start > line_start {
                    spans.push(line_start..d.start);
                }
                if line_end > d.end {
                    spans.push(d.end..line_end);
                }
            }
        }
        tokens.clear();
    };

    loop {
        let next_dir = sc.find_next(src, pos);
        let next_nl = src[pos..].find('\n').map(|i| pos + i);
        match (next_dir, next_nl) {
            (Some(d), nl) if nl.is_none_or(|nl| d < nl) => {
                only_blanks &= is_blank(&src[pos..d]);
                let dir = sc.scan(src, d)?;
                pos = dir.end;
                tokens.push(dir);
            }
            (_, Some(nl)) => {
                only_blanks &= is_blank(&src[pos..nl]);
                close_line(line_start, nl + 1, &mut tokens, only_blanks);
                pos = nl + 1;
                line_start = pos;
                only_blanks = true;
            }
            (_, None) => {
                only_blanks &= is_blank(&src[pos..]);
                close_line(line_start, src.len(), &mut tokens, only_blanks);
                break;
            }
        }
    }
    Ok(spans)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(src: &str) -> DirectiveKind {
        Scanner::new().scan(src, 0).unwrap().kind
    }

    #[test]
    fn classifies_sigils() {
        assert_eq!(
            kind("{{ name }}"),
            DirectiveKind::Interpolate {
                key: "name".into(),
                escaped: true
            }
        );
        assert_eq!(
            kind("{{{name}}}"),
            DirectiveKind::Interpolate {
                key: "name".into(),
                escaped: false
            }
        );
        assert_eq!(
            kind("{{&name}}"),
            DirectiveKind::Interpolate {
                key: "name".into(),
                escaped: false
            }
        );
        assert_eq!(
            kind("{{^a.b}}"),
            DirectiveKind::Section {
                key: "a.b".into(),
                inverted: true
            }
        );
        assert_eq!(kind("{{> row}}"), DirectiveKind::Partial { key: "row".into() });
        assert_eq!(kind("{{$body}}"), DirectiveKind::Slot { key: "body".into() });
        assert_eq!(kind("{{! hi }}"), DirectiveKind::Comment(" hi ".into()));
        assert_eq!(kind("{{!@ user}}"), DirectiveKind::Debug { key: "user".into() });
    }

    #[test]
    fn delimiter_change_applies_to_later_directives() {
        let src = "{{=<% %>=}}<%name%>";
        let mut sc = Scanner::new();
        let d = sc.scan(src, 0).unwrap();
        assert_eq!(d.end, 11);
        assert_eq!(sc.delimiters(), ("<%", "%>"));
        assert!(sc.starts_at(src, 11));
        let d2 = sc.scan(src, 11).unwrap();
        assert_eq!(d2.end, src.len());
    }

    #[test]
    fn unterminated_reports_offset() {
        let err = Scanner::new().scan("ab{{name", 2).unwrap_err();
        assert_eq!(err.offset, 2);
        assert!(err.message.contains("unterminated"));
    }

    #[test]
    fn bad_names_are_rejected() {
        assert!(Scanner::new().scan("{{#}}", 0).is_err());
        assert!(Scanner::new().scan("{{a b}}", 0).is_err());
        assert!(Scanner::new().scan("{{=<%=}}", 0).is_err());
    }

    #[test]
    fn standalone_lines_only_for_structural_directives() {
        let src = "a\n  {{#x}}  \nb\n{{y}}\n";
        let spans = standalone_spans(src, &Scanner::new()).unwrap();
        assert_eq!(spans, vec![2..4, 10..13]);
    }

    #[test]
    fn multiline_comment_is_one_logical_line() {
        let src = "a\n {{! one\ntwo }} \nb";
        let spans = standalone_spans(src, &Scanner::new()).unwrap();
        assert_eq!(spans, vec![2..3, 17..19]);
    }
}
