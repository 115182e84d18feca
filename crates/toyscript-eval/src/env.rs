//! Lexical scopes.
//!
//! An [`Env`] is a shared handle to one scope and, through its parent link,
//! the chain enclosing it. Closures capture the handle, not a copy.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::error::{EvalError, EvalResult};
use crate::value::Value;

#[derive(Debug, Clone)]
pub struct Binding {
    pub value: Value,
    pub mutable: bool,
}

struct Scope {
    bindings: RefCell<HashMap<String, Binding>>,
    parent: Option<Env>,
}

#[derive(Clone)]
pub struct Env(Rc<Scope>);

impl Env {
    /// A root scope with no parent.
    pub fn new() -> Self {
        Env(Rc::new(Scope {
            bindings: RefCell::new(HashMap::new()),
            parent: None,
        }))
    }

    /// A fresh scope whose lookups fall back to `self`.
    pub fn child(&self) -> Self {
        Env(Rc::new(Scope {
            bindings: RefCell::new(HashMap::new()),
            parent: Some(self.clone()),
        }))
    }

    /// Bind `name` in this scope, replacing a mutable binding of the same name.
    pub fn declare(&self, name: &str, value: Value, mutable: bool) -> EvalResult<()> {
        let mut bindings = self.0.bindings.borrow_mut();
        if let Some(existing) = bindings.get(name) {
            if !existing.mutable {
                return Err(EvalError::Immutable(name.to_string()));
            }
        }
        bindings.insert(name.to_string(), Binding { value, mutable });
        Ok(())
    }

    /// Rebind the nearest existing `name`. The binding must be mutable and
    /// the new value must keep its runtime type.
    pub fn assign(&self, name: &str, value: Value) -> EvalResult<Value> {
        let mut scope = Some(self);
        while let Some(env) = scope {
            let mut bindings = env.0.bindings.borrow_mut();
            if let Some(binding) = bindings.get_mut(name) {
                if !binding.mutable {
                    return Err(EvalError::Immutable(name.to_string()));
                }
                let (old, new) = (binding.value.type_tag(), value.type_tag());
                if old != new {
                    return Err(EvalError::TypeMismatch {
                        left: old,
                        op: "=",
                        right: new,
                    });
                }
                binding.value = value.clone();
                return Ok(value);
            }
            drop(bindings);
            scope = env.0.parent.as_ref();
        }
        Err(EvalError::NameNotFound(name.to_string()))
    }

    pub fn lookup(&self, name: &str) -> Option<Value> {
        let mut scope = Some(self);
        while let Some(env) = scope {
            if let Some(binding) = env.0.bindings.borrow().get(name) {
                return Some(binding.value.clone());
            }
            scope = env.0.parent.as_ref();
        }
        None
    }

    /// Number of bindings in this scope only.
    pub fn len(&self) -> usize {
        self.0.bindings.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sorted names bound in this scope only.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.0.bindings.borrow().keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of scopes from here to the root, inclusive.
    pub fn depth(&self) -> usize {
        let mut depth = 1;
        let mut scope = self.0.parent.as_ref();
        while let Some(env) = scope {
            depth += 1;
            scope = env.0.parent.as_ref();
        }
        depth
    }
}

impl Default for Env {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Env {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Env")
            .field("names", &self.names())
            .field("depth", &self.depth())
            .finish()
    }
}
