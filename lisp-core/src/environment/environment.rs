use std::{cell::RefCell, fmt::Debug, rc::Rc};

use crate::eval::prelude::RuntimeFault;

use super::prelude::Expression;

pub type Env = Rc<RefCell<Environment>>;

/// One binding frame. Bindings keep insertion order; lookups that miss
/// continue in the parent frame.
#[derive(Default)]
pub struct Environment {
    bindings: Vec<(String, Expression)>,
    parent: Option<Env>,
}

impl Environment {
    pub fn new() -> Self {
        Self {
            bindings: vec![],
            parent: None
        }
    }

    pub fn new_ref() -> Env {
        Rc::new(RefCell::new(Self::new()))
    }

    pub fn child(parent: &Env) -> Env {
        Rc::new(RefCell::new(Self {
            bindings: vec![],
            parent: Some(parent.clone())
        }))
    }

    /// Looks the name up in this frame only.
    pub fn get(&self, name: &str) -> Option<&Expression> {
        self.bindings.iter()
            .find(|(bound, _)| bound == name)
            .map(|(_, value)| value)
    }

    pub fn set(&mut self, name: &str, value: Expression) -> Option<Expression> {
        match self.bindings.iter_mut().find(|(bound, _)| bound == name) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.bindings.push((name.to_string(), value));
                None
            }
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bindings.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Environment")
            .field("names", &self.names().collect::<Vec<&str>>())
            .field("has_parent", &self.parent.is_some())
            .finish()
    }
}

/// Walks the frame chain upward from `env`; the innermost binding wins.
pub fn resolve(name: &str, env: &Env) -> Result<Expression, RuntimeFault> {
    let mut frame = env.clone();

    loop {
        let parent = {
            let current = frame.borrow();

            if let Some(value) = current.get(name) {
                return Ok(value.clone());
            }

            current.parent.clone()
        };

        match parent {
            Some(parent) => frame = parent,
            None => return Err(RuntimeFault::UnresolvedName { name: name.to_string() })
        }
    }
}

/// Binds `name` in exactly this frame, overwriting an existing binding of
/// the same frame. Returns the replaced value.
pub fn register(env: &Env, name: &str, value: Expression) -> Option<Expression> {
    env.borrow_mut().set(name, value)
}
