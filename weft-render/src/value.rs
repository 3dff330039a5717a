//! Data model the renderer resolves names against.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use weft_dom::{VNode, to_html};

pub type ThunkFn = dyn Fn() -> Value;
pub type BlockFn = dyn Fn(&str) -> Value;

/// A callable scope value.
#[derive(Clone)]
pub enum Lambda {
    /// Zero arguments; invoked on lookup and memoized.
    Thunk(Rc<ThunkFn>),
    /// Takes the raw body of the section it is used in.
    Block(Rc<BlockFn>),
}

impl fmt::Debug for Lambda {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lambda::Thunk(_) => f.write_str("Lambda::Thunk"),
            Lambda::Block(_) => f.write_str("Lambda::Block"),
        }
    }
}

impl PartialEq for Lambda {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Lambda::Thunk(a), Lambda::Thunk(b)) => Rc::ptr_eq(a, b),
            (Lambda::Block(a), Lambda::Block(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    List(Rc<Vec<Value>>),
    Map(Rc<BTreeMap<String, Value>>),
    Lambda(Lambda),
    /// Output-owned node, emitted as is by unescaped interpolation.
    Node(VNode),
}

impl Value {
    pub fn thunk(f: impl Fn() -> Value + 'static) -> Self {
        Value::Lambda(Lambda::Thunk(Rc::new(f)))
    }

    pub fn block(f: impl Fn(&str) -> Value + 'static) -> Self {
        Value::Lambda(Lambda::Block(Rc::new(f)))
    }

    pub fn list(items: impl IntoIterator<Item = Value>) -> Self {
        Value::List(Rc::new(items.into_iter().collect()))
    }

    pub fn map<K: Into<String>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
        Value::Map(Rc::new(
            entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        ))
    }

    /// `Null`, `false`, `0` and `""` are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
            Value::String(s) => !s.is_empty(),
            _ => true,
        }
    }

    /// List items; empty for anything that is not a list.
    pub fn items(&self) -> &[Value] {
        match self {
            Value::List(items) => items,
            _ => &[],
        }
    }

    /// Key lookup on maps, index lookup on lists.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Map(m) => m.get(key),
            Value::List(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        }
    }

    /// Plain-text form used by interpolation.
    pub fn to_text(&self) -> String {
        match self {
            Value::Null | Value::Lambda(_) => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => number_text(n),
            Value::String(s) => s.clone(),
            Value::List(items) => items
                .iter()
                .map(Value::to_text)
                .collect::<Vec<_>>()
                .join(","),
            Value::Map(_) => self.to_json().to_string(),
            Value::Node(n) => to_html(n),
        }
    }

    /// JSON snapshot. Lambdas become `null`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null | Value::Lambda(_) => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => serde_json::Value::Number(n.clone()),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::List(items) => items.iter().map(Value::to_json).collect(),
            Value::Map(m) => serde_json::Value::Object(
                m.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
            Value::Node(n) => serde_json::to_value(n).unwrap_or(serde_json::Value::Null),
        }
    }
}

/// Whole floats print without a fraction: `2.0` is `2`.
fn number_text(n: &serde_json::Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f == 0.0 => "0".to_string(),
        Some(f) if n.is_f64() => f.to_string(),
        _ => n.to_string(),
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => Value::list(items.into_iter().map(Value::from)),
            serde_json::Value::Object(m) => {
                Value::map(m.into_iter().map(|(k, v)| (k, Value::from(v))))
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n.into())
    }
}

impl From<VNode> for Value {
    fn from(n: VNode) -> Self {
        Value::Node(n)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(Rc::new(items))
    }
}
