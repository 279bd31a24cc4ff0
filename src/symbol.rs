// ABOUTME: Symbol interning for identity-based symbol equality within a session

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

/// An interned identifier. Two symbols are `eq?` exactly when they were
/// produced by the same `SymbolTable` from equal text.
#[derive(Clone)]
pub struct Symbol(Rc<str>);

impl Symbol {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn ptr(&self) -> *const () {
        Rc::as_ptr(&self.0) as *const ()
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.ptr().hash(state);
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({:?})", self.0)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Session-scoped interner. Every session owns exactly one table; the
/// end-of-file sentinel is its own `Value` variant rather than a symbol
/// produced here (see `Value::EndOfFile`).
#[derive(Debug)]
pub struct SymbolTable {
    symbols: RefCell<HashMap<Rc<str>, Symbol>>,
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable {
            symbols: RefCell::new(HashMap::new()),
        }
    }

    /// Interns `text`, returning the same identity for repeated calls with
    /// equal text.
    pub fn intern(&self, text: &str) -> Symbol {
        if let Some(sym) = self.symbols.borrow().get(text) {
            return sym.clone();
        }

        let rc: Rc<str> = Rc::from(text);
        let sym = Symbol(rc.clone());
        self.symbols.borrow_mut().insert(rc, sym.clone());
        sym
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}
