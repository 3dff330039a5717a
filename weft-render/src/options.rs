use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_PARTIAL_DEPTH: usize = 64;

/// Deserializes from a `[render]` TOML table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Nesting limit for partials; deeper ones render nothing.
    pub max_partial_depth: usize,
    /// Check that `Template::update` patches reproduce the new tree.
    pub validate_updates: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            max_partial_depth: DEFAULT_MAX_PARTIAL_DEPTH,
            validate_updates: true,
        }
    }
}
