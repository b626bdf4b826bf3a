use crate::object::Object;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::{self, Debug, Formatter};
use std::rc::Rc;

#[derive(Default)]
struct Scope {
    store: HashMap<String, Object>,
    outer: Option<Environment>,
}

/// A cheap-clone handle to one scope in the binding chain. Function objects
/// hold a clone of the scope they were defined in, which keeps that scope
/// alive after the defining call returns.
#[derive(Clone, Default)]
pub struct Environment(Rc<RefCell<Scope>>);

impl Environment {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_enclosed(outer: &Environment) -> Self {
        Self(Rc::new(RefCell::new(Scope {
            store: HashMap::new(),
            outer: Some(outer.clone()),
        })))
    }

    pub fn get(&self, name: &str) -> Option<Object> {
        let scope = self.0.borrow();
        scope
            .store
            .get(name)
            .cloned()
            .or_else(|| scope.outer.as_ref().and_then(|outer| outer.get(name)))
    }

    // Always writes the current scope; `let` shadows, never mutates an
    // ancestor binding.
    pub fn set(&mut self, name: &str, val: Object) {
        self.0.borrow_mut().store.insert(name.to_owned(), val);
    }
}

// Handle identity. Chains can be cyclic through captured functions, so
// structural comparison would not terminate.
impl PartialEq for Environment {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Debug for Environment {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let scope = self.0.borrow();
        let mut names: Vec<&String> = scope.store.keys().collect();
        names.sort();
        write!(f, "Environment({:?})", names)
    }
}
