use thiserror::Error;

/// Malformed directive or a directive where the markup forbids one.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("parse error at offset {offset}: {message} (near `{excerpt}`)")]
pub struct ParseError {
    pub offset: usize,
    pub message: String,
    pub excerpt: String,
}

impl ParseError {
    pub(crate) fn at(src: &str, offset: usize, message: impl Into<String>) -> Self {
        Self {
            offset,
            message: message.into(),
            excerpt: excerpt(src, offset),
        }
    }
}

/// Unpaired tags or directives, illegal nesting, or stack underflow.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("structural error at node {id}: {message}")]
pub struct StructuralError {
    /// Id path of the offending frame, or `-` when no frame is involved.
    pub id: String,
    pub message: String,
}

impl StructuralError {
    pub(crate) fn new(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            message: message.into(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Structural(#[from] StructuralError),
}

/// Errors reading a template bundle file.
#[derive(Error, Debug)]
pub enum BundleError {
    #[error("malformed bundle: {0}")]
    Syntax(String),
    #[error("template block without a `name` attribute at line {line}")]
    MissingName { line: usize },
    #[error("duplicate template name `{0}`")]
    Duplicate(String),
}

const EXCERPT_RADIUS: usize = 16;

fn excerpt(src: &str, offset: usize) -> String {
    let mut start = offset.saturating_sub(EXCERPT_RADIUS).min(src.len());
    while !src.is_char_boundary(start) {
        start -= 1;
    }
    let mut end = (offset + EXCERPT_RADIUS).min(src.len());
    while !src.is_char_boundary(end) {
        end += 1;
    }
    src[start..end].replace('\n', "\\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excerpt_is_clamped_to_char_boundaries() {
        let src = "ééééééééééééééééééé{{oops";
        let e = ParseError::at(src, src.len() - 6, "unterminated");
        assert!(e.excerpt.ends_with("{{oops"));
        assert!(e.to_string().contains("unterminated"));
    }
}
