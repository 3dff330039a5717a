use crate::value::Value;

/// Host hooks that decide how names resolve against a scope value.
///
/// The renderer only talks to scopes through this trait, so a host can
/// expose its own object model without the renderer knowing its types.
pub trait Adaptor {
    /// Resolve `key` directly on `scope`; no outward walk.
    fn lookup(&self, scope: &Value, key: &str) -> Option<Value>;

    /// Whether `key` may be read from `scope` at all.
    fn is_visible(&self, _scope: &Value, _key: &str) -> bool {
        true
    }

    /// Enclosing scope for a root frame built without an explicit parent.
    fn parent(&self, _scope: &Value) -> Option<Value> {
        None
    }

    /// Model-like scopes are tracked by every frame beneath them.
    fn is_model(&self, _scope: &Value) -> bool {
        false
    }
}

/// Plain data: map keys and list indices.
#[derive(Debug, Clone, Copy, Default)]
pub struct DataAdaptor;

impl Adaptor for DataAdaptor {
    fn lookup(&self, scope: &Value, key: &str) -> Option<Value> {
        scope.get(key).cloned()
    }
}
