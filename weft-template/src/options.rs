use serde::{Deserialize, Serialize};

use crate::scanner::{DEFAULT_CLOSE, DEFAULT_OPEN};

/// Knobs for a single compile. Deserializes from a `[compile]` TOML table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompileOptions {
    /// Strip whitespace around standalone structural directives.
    pub elide_standalone: bool,
    pub open_delimiter: String,
    pub close_delimiter: String,
    /// Treat the source as plain markup; no directive scanning.
    pub markup_only: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            elide_standalone: true,
            open_delimiter: DEFAULT_OPEN.to_string(),
            close_delimiter: DEFAULT_CLOSE.to_string(),
            markup_only: false,
        }
    }
}

impl CompileOptions {
    pub fn markup_only() -> Self {
        Self {
            markup_only: true,
            elide_standalone: false,
            ..Self::default()
        }
    }

    pub fn with_delimiters(mut self, open: impl Into<String>, close: impl Into<String>) -> Self {
        self.open_delimiter = open.into();
        self.close_delimiter = close.into();
        self
    }
}
