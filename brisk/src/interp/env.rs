//! Environment for variable bindings

use super::Object;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Shared reference to an environment
pub type EnvRef = Rc<RefCell<Environment>>;

/// Environment holding variable bindings
#[derive(Debug, Default)]
pub struct Environment {
    /// Variable bindings in this scope
    store: HashMap<String, Object>,
    /// Enclosing environment for lexical scoping
    outer: Option<EnvRef>,
}

impl Environment {
    /// Create a new top-level environment
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new environment enclosed by `outer`
    pub fn with_outer(outer: EnvRef) -> Self {
        Environment {
            store: HashMap::new(),
            outer: Some(outer),
        }
    }

    /// Wrap in Rc<RefCell<>>
    pub fn into_ref(self) -> EnvRef {
        Rc::new(RefCell::new(self))
    }

    /// Look up a variable in the scope chain
    pub fn get(&self, name: &str) -> Option<Object> {
        match self.store.get(name) {
            Some(value) => Some(value.clone()),
            None => self.outer.as_ref()?.borrow().get(name),
        }
    }

    /// Bind in this scope only; outer bindings of the same name are shadowed
    pub fn set(&mut self, name: impl Into<String>, value: Object) {
        self.store.insert(name.into(), value);
    }
}

/// Create an environment enclosed by `outer`
pub fn enclosed_env(outer: &EnvRef) -> EnvRef {
    Environment::with_outer(Rc::clone(outer)).into_ref()
}
