// ABOUTME: `and or not`, ordinary procedures (not short-circuiting special
// ABOUTME: forms): every argument is evaluated by the caller before these run.

use crate::env::Environment;
use crate::error::ActinideError;
use crate::symbol::SymbolTable;
use crate::value::Value;
use std::rc::Rc;

/// Returns a canonical `#t`/`#f` rather than the last-evaluated argument,
/// matching every other predicate in the inventory.
fn and(args: &[Value]) -> Result<Vec<Value>, ActinideError> {
    Ok(vec![Value::Boolean(args.iter().all(Value::is_truthy))])
}

fn or(args: &[Value]) -> Result<Vec<Value>, ActinideError> {
    Ok(vec![Value::Boolean(args.iter().any(Value::is_truthy))])
}

fn not(args: &[Value]) -> Result<Vec<Value>, ActinideError> {
    if args.len() != 1 {
        return Err(ActinideError::arity_error("not", crate::error::ARITY_ONE, args.len()));
    }
    Ok(vec![Value::Boolean(!args[0].is_truthy())])
}

pub fn register(env: &Rc<Environment>, symbols: &SymbolTable) {
    super::bind(env, symbols, "and", and);
    super::bind(env, symbols, "or", or);
    super::bind(env, symbols, "not", not);
}
