// ABOUTME: `Session`, the host-facing façade composing the symbol table,
// ABOUTME: the top-level value and macro environments, the reader, expander
// ABOUTME: and evaluator into read/expand/eval/run/bind/get.

use crate::builtins;
use crate::env::Environment;
use crate::error::ActinideError;
use crate::eval;
use crate::expander::Expander;
use crate::reader::Reader;
use crate::symbol::SymbolTable;
use crate::value::{NativeProcedure, Procedure, Value};
use std::rc::Rc;

/// A session owns one symbol table, one top-level value environment and one
/// top-level macro environment. Reads, expansions and evaluations against it
/// are not safe to interleave across threads: a session is meant to be
/// driven from a single host thread at a time.
pub struct Session {
    symbols: Rc<SymbolTable>,
    value_env: Rc<Environment>,
    macro_env: Rc<Environment>,
}

impl Session {
    /// Creates a session seeded with the symbol table and every built-in
    /// procedure. The host adds anything further via `bind`.
    pub fn new() -> Session {
        let symbols = Rc::new(SymbolTable::new());
        let value_env = Environment::new();
        let macro_env = Environment::new();
        builtins::register_all(&value_env, &symbols, &value_env, &macro_env);
        Session {
            symbols,
            value_env,
            macro_env,
        }
    }

    /// Reads exactly one top-level form from `text`; trailing non-whitespace
    /// is a read error, per the reader's documented `read_one` behavior.
    pub fn read(&self, text: &str) -> Result<Value, ActinideError> {
        Reader::new(&self.symbols).read_one(text)
    }

    /// A reader bound to this session's symbol table, for hosts that need to
    /// pull forms one at a time out of a `Port` (e.g. a script runner
    /// reading an entire file as a sequence of top-level programs).
    pub fn reader(&self) -> Reader<'_> {
        Reader::new(&self.symbols)
    }

    /// Expands a form to a fixed point without evaluating it.
    pub fn expand(&self, form: Value) -> Result<Value, ActinideError> {
        let expander = Expander::new(&self.symbols, self.value_env.clone(), self.macro_env.clone());
        expander.expand_top_level(form)
    }

    /// Expands then reduces a form against the session's top-level
    /// environment, returning the value sequence produced.
    pub fn eval(&self, form: Value) -> Result<Vec<Value>, ActinideError> {
        let expanded = self.expand(form)?;
        eval::eval(expanded, self.value_env.clone(), self.macro_env.clone())
    }

    /// Reads one form from `text` and evaluates it, the REPL's and script
    /// runner's primitive.
    pub fn run(&self, text: &str) -> Result<Vec<Value>, ActinideError> {
        let form = self.read(text)?;
        self.eval(form)
    }

    /// Installs a plain value into the top-level value environment.
    pub fn bind(&self, name: &str, value: Value) {
        self.value_env.define(self.symbols.intern(name), value);
    }

    /// Binds a native callable whose return value the language discards.
    pub fn bind_fn_unit(&self, name: &str, func: impl Fn(&[Value]) -> Result<(), ActinideError> + 'static) {
        self.bind_native(name, move |args| {
            func(args)?;
            Ok(vec![Value::Nil])
        });
    }

    /// Binds a native callable returning a single value, adapter shape (b).
    pub fn bind_fn(&self, name: &str, func: impl Fn(&[Value]) -> Result<Value, ActinideError> + 'static) {
        self.bind_native(name, move |args| Ok(vec![func(args)?]));
    }

    /// Binds a native callable returning a multi-value sequence directly,
    /// adapter shape (c).
    pub fn bind_fn_multi(&self, name: &str, func: impl Fn(&[Value]) -> Result<Vec<Value>, ActinideError> + 'static) {
        self.bind_native(name, func);
    }

    fn bind_native(&self, name: &str, func: impl Fn(&[Value]) -> Result<Vec<Value>, ActinideError> + 'static) {
        let native = NativeProcedure {
            name: Rc::from(name),
            func: Box::new(func),
        };
        self.bind(name, Value::Procedure(Procedure::Native(Rc::new(native))));
    }

    /// Looks up a binding in the top-level value environment.
    pub fn get(&self, name: &str) -> Option<Value> {
        self.value_env.lookup(&self.symbols.intern(name))
    }

    /// Calls a procedure value with native arguments, yielding a value
    /// sequence, the callable handle `get` promises for procedure bindings.
    pub fn call(&self, proc: &Value, args: Vec<Value>) -> Result<Vec<Value>, ActinideError> {
        match proc {
            Value::Procedure(p) => eval::apply(p, args, self.macro_env.clone()),
            other => Err(ActinideError::type_error("call", "procedure", other, 0)),
        }
    }

    /// Installs a plain value into the top-level macro environment.
    pub fn macro_bind(&self, name: &str, value: Value) {
        self.macro_env.define(self.symbols.intern(name), value);
    }

    /// The macro-table counterpart of `bind_fn_unit`.
    pub fn macro_bind_fn_unit(&self, name: &str, func: impl Fn(&[Value]) -> Result<(), ActinideError> + 'static) {
        self.macro_bind_native(name, move |args| {
            func(args)?;
            Ok(vec![Value::Nil])
        });
    }

    /// The macro-table counterpart of `bind_fn`.
    pub fn macro_bind_fn(&self, name: &str, func: impl Fn(&[Value]) -> Result<Value, ActinideError> + 'static) {
        self.macro_bind_native(name, move |args| Ok(vec![func(args)?]));
    }

    /// The macro-table counterpart of `bind_fn_multi`.
    pub fn macro_bind_fn_multi(&self, name: &str, func: impl Fn(&[Value]) -> Result<Vec<Value>, ActinideError> + 'static) {
        self.macro_bind_native(name, func);
    }

    fn macro_bind_native(&self, name: &str, func: impl Fn(&[Value]) -> Result<Vec<Value>, ActinideError> + 'static) {
        let native = NativeProcedure {
            name: Rc::from(name),
            func: Box::new(func),
        };
        self.macro_bind(name, Value::Procedure(Procedure::Native(Rc::new(native))));
    }

    /// Looks up a binding in the top-level macro environment.
    pub fn macro_get(&self, name: &str) -> Option<Value> {
        self.macro_env.lookup(&self.symbols.intern(name))
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_reads_and_evaluates_one_form() {
        let session = Session::new();
        let result = session.run("(+ 1 2 3)").unwrap();
        assert_eq!(result[0].to_string(), "6");
    }

    #[test]
    fn define_then_reference_across_separate_runs() {
        let session = Session::new();
        session.run("(define x 10)").unwrap();
        let result = session.run("(* x x)").unwrap();
        assert_eq!(result[0].to_string(), "100");
    }

    #[test]
    fn define_macro_at_one_run_is_visible_to_the_next() {
        let session = Session::new();
        session.run("(define-macro (my-if c t f) (list 'if c t f))").unwrap();
        let result = session.run("(my-if #t 1 2)").unwrap();
        assert_eq!(result[0].to_string(), "1");
    }

    #[test]
    fn host_bind_fn_is_callable_from_the_language() {
        let session = Session::new();
        session.bind_fn("double", |args| match &args[0] {
            Value::Integer(i) => Ok(Value::Integer(i.add(i))),
            other => Err(ActinideError::type_error("double", "integer", other, 0)),
        });
        let result = session.run("(double 21)").unwrap();
        assert_eq!(result[0].to_string(), "42");
    }

    #[test]
    fn get_and_call_invoke_a_bound_procedure_from_the_host() {
        let session = Session::new();
        let plus = session.get("+").unwrap();
        let result = session.call(&plus, vec![Value::Integer(crate::number::Integer::from_i64(2)), Value::Integer(crate::number::Integer::from_i64(3))]).unwrap();
        assert_eq!(result[0].to_string(), "5");
    }

    #[test]
    fn bind_fn_unit_discards_its_return_value() {
        let session = Session::new();
        session.bind_fn_unit("ignore-me", |_args| Ok(()));
        let result = session.run("(ignore-me 1 2 3)").unwrap();
        assert!(matches!(result[0], Value::Nil));
    }
}
