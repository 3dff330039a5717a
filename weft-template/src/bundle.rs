use pest::Parser;
use pest::iterators::Pair;

use crate::error::BundleError;
use crate::options::CompileOptions;

#[derive(pest_derive::Parser)]
#[grammar = "bundle.pest"]
struct BundleParser;

#[derive(Debug, Clone, PartialEq)]
pub struct Attr {
    pub name: String,
    pub value: Option<String>, // boolean attrs allowed, e.g. `<template name="x" raw>`
}

#[derive(Debug, Clone, PartialEq)]
pub struct BundleEntry {
    pub name: String,
    pub attrs: Vec<Attr>,
    pub content: String,
}

impl BundleEntry {
    pub fn attr(&self, key: &str) -> Option<&Attr> {
        self.attrs.iter().find(|a| a.name == key)
    }

    /// Per-template overrides: `elide="false"` and `delimiters="<% %>"`.
    pub fn compile_options(&self, base: &CompileOptions) -> CompileOptions {
        let mut opts = base.clone();
        if let Some(v) = self.attr("elide").and_then(|a| a.value.as_deref()) {
            opts.elide_standalone = v != "false";
        }
        if let Some(v) = self.attr("delimiters").and_then(|a| a.value.as_deref()) {
            if let [open, close] = v.split_whitespace().collect::<Vec<_>>().as_slice() {
                opts = opts.with_delimiters(*open, *close);
            }
        }
        opts
    }
}

/// A file of `<template name="...">` blocks, each one a named template.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Bundle {
    pub templates: Vec<BundleEntry>,
}

impl Bundle {
    pub fn parse(source: &str) -> Result<Bundle, BundleError> {
        let mut pairs = BundleParser::parse(Rule::file, source)
            .map_err(|e| BundleError::Syntax(e.to_string()))?;
        let file = pairs
            .next()
            .ok_or_else(|| BundleError::Syntax("empty bundle".to_string()))?;

        let mut bundle = Bundle::default();
        for node in file.into_inner() {
            if node.as_rule() != Rule::block {
                continue;
            }
            let line = node.as_span().start_pos().line_col().0;
            let (attrs, content) = parse_block(node);
            let name = attrs
                .iter()
                .find(|a| a.name == "name")
                .and_then(|a| a.value.clone())
                .ok_or(BundleError::MissingName { line })?;
            if bundle.get(&name).is_some() {
                return Err(BundleError::Duplicate(name));
            }
            bundle.templates.push(BundleEntry {
                name,
                attrs,
                content,
            });
        }
        Ok(bundle)
    }

    pub fn get(&self, name: &str) -> Option<&BundleEntry> {
        self.templates.iter().find(|t| t.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.templates.iter().map(|t| t.name.as_str())
    }
}

fn parse_block(block: Pair<Rule>) -> (Vec<Attr>, String) {
    let mut attrs = Vec::new();
    let mut content = String::new();

    for p in block.into_inner() {
        match p.as_rule() {
            Rule::template_open => {
                for a in p.into_inner() {
                    if a.as_rule() == Rule::attribute {
                        attrs.push(parse_attr(a));
                    }
                }
            }
            Rule::template_body => {
                let body = p.as_str();
                let body = body
                    .strip_prefix("\r\n")
                    .or_else(|| body.strip_prefix('\n'))
                    .unwrap_or(body);
                content = body.to_string();
            }
            _ => {}
        }
    }
    (attrs, content)
}

fn parse_attr(attr: Pair<Rule>) -> Attr {
    let mut name = String::new();
    let mut value: Option<String> = None;

    for part in attr.into_inner() {
        match part.as_rule() {
            Rule::ident => name = part.as_str().to_string(),
            Rule::quoted => value = Some(strip_quotes(part.as_str())),
            _ => {}
        }
    }
    Attr { name, value }
}

fn strip_quotes(s: &str) -> String {
    let b = s.as_bytes();
    if b.len() >= 2
        && ((b[0] == b'"' && b[b.len() - 1] == b'"') || (b[0] == b'\'' && b[b.len() - 1] == b'\''))
    {
        s[1..s.len() - 1].to_string()
    } else {
        s.to_string()
    }
}
