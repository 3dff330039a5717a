//! Scope chain the renderer resolves names against.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::scope::{Adaptor, DataAdaptor};
use crate::value::{BlockFn, Lambda, Value};

struct Frame {
    scope: Value,
    parent: Option<Rc<Frame>>,
    /// Literal name -> resolution. Only this frame's own lookups land here.
    cache: RefCell<HashMap<String, Option<Value>>>,
    model: Weak<Frame>,
    adaptor: Rc<dyn Adaptor>,
}

/// One frame of the scope chain. Cloning is cheap and shares the frame.
#[derive(Clone)]
pub struct Context {
    frame: Rc<Frame>,
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("scope", &self.frame.scope)
            .field("depth", &self.depth())
            .finish()
    }
}

impl Context {
    pub fn new(scope: impl Into<Value>) -> Self {
        Self::with_adaptor(scope, Rc::new(DataAdaptor))
    }

    /// Root frame. The adaptor's `parent` hook supplies the enclosing frames.
    pub fn with_adaptor(scope: impl Into<Value>, adaptor: Rc<dyn Adaptor>) -> Self {
        let scope = scope.into();
        let parent = adaptor
            .parent(&scope)
            .map(|p| Self::with_adaptor(p, adaptor.clone()).frame);
        Self::build(scope, parent, adaptor)
    }

    fn build(scope: Value, parent: Option<Rc<Frame>>, adaptor: Rc<dyn Adaptor>) -> Self {
        let is_model = adaptor.is_model(&scope);
        let frame = Rc::new_cyclic(|me: &Weak<Frame>| {
            let model = if is_model {
                me.clone()
            } else {
                parent.as_ref().map_or_else(Weak::new, |p| p.model.clone())
            };
            Frame {
                scope,
                parent,
                cache: RefCell::new(HashMap::new()),
                model,
                adaptor,
            }
        });
        Context { frame }
    }

    /// Child frame over `scope`.
    pub fn push(&self, scope: impl Into<Value>) -> Context {
        Self::build(
            scope.into(),
            Some(self.frame.clone()),
            self.frame.adaptor.clone(),
        )
    }

    pub fn scope(&self) -> &Value {
        &self.frame.scope
    }

    pub fn parent(&self) -> Option<Context> {
        self.frame.parent.clone().map(|frame| Context { frame })
    }

    /// Nearest model-like frame, this one included.
    pub fn model(&self) -> Option<Context> {
        self.frame.model.upgrade().map(|frame| Context { frame })
    }

    pub fn depth(&self) -> usize {
        let mut n = 1;
        let mut cur = self.frame.parent.as_deref();
        while let Some(f) = cur {
            n += 1;
            cur = f.parent.as_deref();
        }
        n
    }

    pub fn is_sequence(value: &Value) -> bool {
        matches!(value, Value::List(_))
    }

    /// Resolve `name`. Block lambdas come back unevaluated.
    pub fn lookup(&self, name: &str) -> Option<Value> {
        if let Some(hit) = self.frame.cache.borrow().get(name) {
            return hit.clone();
        }
        let resolved = self.resolve(name);
        self.frame
            .cache
            .borrow_mut()
            .insert(name.to_string(), resolved.clone());
        resolved
    }

    /// Like [`lookup`](Self::lookup), but a block lambda is handed to
    /// `on_lambda` and its result returned in its place. That result is not
    /// memoized.
    pub fn lookup_with(
        &self,
        name: &str,
        on_lambda: &mut dyn FnMut(&BlockFn) -> Value,
    ) -> Option<Value> {
        match self.lookup(name)? {
            Value::Lambda(Lambda::Block(f)) => Some(on_lambda(&*f)),
            v => Some(v),
        }
    }

    fn resolve(&self, name: &str) -> Option<Value> {
        if name == "." {
            return Some(settle(self.frame.scope.clone()));
        }
        let adaptor = &self.frame.adaptor;
        let mut segments = name.split('.');
        let first = segments.next()?;
        let mut value = settle(self.find(first)?);
        for seg in segments {
            if !adaptor.is_visible(&value, seg) {
                return None;
            }
            value = settle(adaptor.lookup(&value, seg)?);
        }
        Some(value)
    }

    /// First frame, walking outward, whose scope has `key`.
    fn find(&self, key: &str) -> Option<Value> {
        let adaptor = &self.frame.adaptor;
        let mut cur = Some(&*self.frame);
        while let Some(frame) = cur {
            if adaptor.is_visible(&frame.scope, key) {
                if let Some(v) = adaptor.lookup(&frame.scope, key) {
                    return Some(v);
                }
            }
            cur = frame.parent.as_deref();
        }
        None
    }
}

/// Invoke zero-argument lambdas until a plain value comes out.
fn settle(mut value: Value) -> Value {
    loop {
        match value {
            Value::Lambda(Lambda::Thunk(f)) => value = f(),
            other => return other,
        }
    }
}
