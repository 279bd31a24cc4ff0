// ABOUTME: Environment module for managing variable bindings and scopes.
// ABOUTME: Also doubles, unmodified, as the macro table's storage (see session.rs).

use crate::symbol::Symbol;
use crate::value::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// A frame of symbol-to-value bindings linked to an optional parent frame.
/// Lookup walks outward from child to parent; `define` always targets the
/// innermost frame. Used both as the value environment and, as a second,
/// independent instance, as the macro table.
#[derive(Debug)]
pub struct Environment {
    bindings: RefCell<HashMap<Symbol, Value>>,
    parent: Option<Rc<Environment>>,
}

impl Environment {
    /// Creates a new root environment with no parent.
    pub fn new() -> Rc<Self> {
        Rc::new(Environment {
            bindings: RefCell::new(HashMap::new()),
            parent: None,
        })
    }

    /// Creates a new child environment extending `parent`.
    pub fn extend(parent: Rc<Environment>) -> Rc<Self> {
        Rc::new(Environment {
            bindings: RefCell::new(HashMap::new()),
            parent: Some(parent),
        })
    }

    /// Defines a binding in this frame, overwriting if already present.
    /// Never walks the parent chain.
    pub fn define(&self, name: Symbol, value: Value) {
        self.bindings.borrow_mut().insert(name, value);
    }

    /// Looks up a symbol in this frame, then outward through parents.
    pub fn lookup(&self, name: &Symbol) -> Option<Value> {
        if let Some(value) = self.bindings.borrow().get(name) {
            return Some(value.clone());
        }

        if let Some(ref parent) = self.parent {
            return parent.lookup(name);
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::number::Integer;
    use crate::symbol::SymbolTable;

    fn int(n: i64) -> Value {
        Value::Integer(Integer::from_i64(n))
    }

    #[test]
    fn test_define_and_lookup() {
        let table = SymbolTable::new();
        let env = Environment::new();
        env.define(table.intern("x"), int(42));

        match env.lookup(&table.intern("x")) {
            Some(Value::Integer(n)) => assert_eq!(n.to_string(), "42"),
            _ => panic!("expected Integer(42)"),
        }
    }

    #[test]
    fn test_undefined_symbol() {
        let table = SymbolTable::new();
        let env = Environment::new();
        assert!(env.lookup(&table.intern("undefined")).is_none());
    }

    #[test]
    fn test_shadowing() {
        let table = SymbolTable::new();
        let parent = Environment::new();
        parent.define(table.intern("x"), int(42));

        let child = Environment::extend(parent);
        child.define(table.intern("x"), int(100));

        match child.lookup(&table.intern("x")) {
            Some(Value::Integer(n)) => assert_eq!(n.to_string(), "100"),
            _ => panic!("expected Integer(100)"),
        }
    }

    #[test]
    fn test_parent_lookup() {
        let table = SymbolTable::new();
        let parent = Environment::new();
        parent.define(table.intern("x"), int(42));

        let child = Environment::extend(parent);

        match child.lookup(&table.intern("x")) {
            Some(Value::Integer(n)) => assert_eq!(n.to_string(), "42"),
            _ => panic!("expected Integer(42)"),
        }
    }

    #[test]
    fn test_multiple_levels() {
        let table = SymbolTable::new();
        let grandparent = Environment::new();
        grandparent.define(table.intern("a"), int(1));

        let parent = Environment::extend(grandparent);
        parent.define(table.intern("b"), int(2));

        let child = Environment::extend(parent);
        child.define(table.intern("c"), int(3));

        assert!(child.lookup(&table.intern("a")).is_some());
        assert!(child.lookup(&table.intern("b")).is_some());
        assert!(child.lookup(&table.intern("c")).is_some());
    }

    #[test]
    fn sibling_children_do_not_see_each_other() {
        let table = SymbolTable::new();
        let parent = Environment::new();
        let child_a = Environment::extend(parent.clone());
        let child_b = Environment::extend(parent);

        child_a.define(table.intern("x"), int(1));
        assert!(child_b.lookup(&table.intern("x")).is_none());
    }
}
