// ABOUTME: Built-in procedure registration, organized by category. Every
// ABOUTME: category exposes `register`, and is wired up here into the
// ABOUTME: session's top-level environment.

use crate::env::Environment;
use crate::error::ActinideError;
use crate::symbol::SymbolTable;
use crate::value::{NativeProcedure, Procedure, Value};
use std::rc::Rc;

/// Binds a plain function pointer as a native procedure.
pub fn bind(env: &Rc<Environment>, symbols: &SymbolTable, name: &str, func: fn(&[Value]) -> Result<Vec<Value>, ActinideError>) {
    let native = NativeProcedure {
        name: Rc::from(name),
        func: Box::new(func),
    };
    env.define(symbols.intern(name), Value::Procedure(Procedure::Native(Rc::new(native))));
}

/// Binds a closure as a native procedure, for built-ins that need to capture
/// session state (the macro table, the symbol table, the reader).
pub fn bind_closure(
    env: &Rc<Environment>,
    symbols: &SymbolTable,
    name: &str,
    func: impl Fn(&[Value]) -> Result<Vec<Value>, ActinideError> + 'static,
) {
    let native = NativeProcedure {
        name: Rc::from(name),
        func: Box::new(func),
    };
    env.define(symbols.intern(name), Value::Procedure(Procedure::Native(Rc::new(native))));
}

// Shared promotion helpers for arithmetic/comparison; not a category of its
// own.
mod numeric;

pub mod arithmetic;
pub mod comparison;
pub mod conversions;
pub mod equality;
pub mod logic;
pub mod metaprogramming;
pub mod pairs_lists;
pub mod ports;
pub mod predicates;
pub mod strings;
pub mod vectors;

/// Registers every built-in procedure, plus the `nil` constant, into `env`
/// (the session's top-level value environment, also passed as `value_env`).
/// `macro_env` is the session's separate top-level macro table. Both are
/// threaded through here because `map`/`filter`/`reduce`/`eval`/`expand` need
/// to call back into the evaluator and expander against the session's own
/// environments, not some incidental local one.
pub fn register_all(env: &Rc<Environment>, symbols: &Rc<SymbolTable>, value_env: &Rc<Environment>, macro_env: &Rc<Environment>) {
    env.define(symbols.intern("nil"), Value::Nil);

    arithmetic::register(env, symbols);
    comparison::register(env, symbols);
    logic::register(env, symbols);
    predicates::register(env, symbols);
    pairs_lists::register(env, symbols, macro_env);
    conversions::register(env, symbols);
    equality::register(env, symbols);
    vectors::register(env, symbols);
    strings::register(env, symbols);
    ports::register(env, symbols);
    metaprogramming::register(env, symbols, value_env, macro_env);
}
