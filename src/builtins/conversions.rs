// ABOUTME: Conversions between the data model's types, `integer decimal
// ABOUTME: string symbol display list-to-vector vector-to-list`.

use crate::env::Environment;
use crate::error::{ActinideError, ARITY_ONE};
use crate::symbol::SymbolTable;
use crate::value::Value;
use std::cell::RefCell;
use std::rc::Rc;

fn one(args: &[Value], name: &str) -> Result<&Value, ActinideError> {
    if args.len() != 1 {
        return Err(ActinideError::arity_error(name, ARITY_ONE, args.len()));
    }
    Ok(&args[0])
}

/// Truncates decimals toward zero; parses strings with the reader's integer
/// grammar. A string that doesn't parse is a domain error, not a type error.
fn integer(args: &[Value]) -> Result<Vec<Value>, ActinideError> {
    let value = one(args, "integer")?;
    let result = match value {
        Value::Integer(i) => i.clone(),
        Value::Decimal(d) => d.truncate_to_integer(),
        Value::String(s) => crate::number::Integer::parse(s)
            .ok_or_else(|| ActinideError::domain_error("integer", format!("cannot parse {:?} as an integer", s)))?,
        other => return Err(ActinideError::type_error("integer", "integer, decimal or string", other, 0)),
    };
    Ok(vec![Value::Integer(result)])
}

fn decimal(args: &[Value]) -> Result<Vec<Value>, ActinideError> {
    let value = one(args, "decimal")?;
    let result = match value {
        Value::Integer(i) => i.to_decimal(),
        Value::Decimal(d) => d.clone(),
        Value::String(s) => crate::number::Decimal::parse(s)
            .ok_or_else(|| ActinideError::domain_error("decimal", format!("cannot parse {:?} as a decimal", s)))?,
        other => return Err(ActinideError::type_error("decimal", "integer, decimal or string", other, 0)),
    };
    Ok(vec![Value::Decimal(result)])
}

/// The textual content of a value, with no surrounding quotes for strings.
/// Distinct from `display`, which is the literal printed form a reader could
/// read back (quotes and all).
fn string(args: &[Value]) -> Result<Vec<Value>, ActinideError> {
    let value = one(args, "string")?;
    let text = match value {
        Value::String(s) => s.to_string(),
        other => other.to_string(),
    };
    Ok(vec![Value::String(Rc::from(text.as_str()))])
}

/// The literal printed form, exactly `Display`'s output. A string value
/// comes back quoted, so that `(read (string-to-input-port (display x)))`
/// round-trips under `=`.
fn display(args: &[Value]) -> Result<Vec<Value>, ActinideError> {
    let value = one(args, "display")?;
    Ok(vec![Value::String(Rc::from(value.to_string().as_str()))])
}

fn symbol(args: &[Value], symbols: &Rc<SymbolTable>) -> Result<Vec<Value>, ActinideError> {
    let value = one(args, "symbol")?;
    match value {
        Value::String(s) => Ok(vec![Value::Symbol(symbols.intern(s))]),
        other => Err(ActinideError::type_error("symbol", "string", other, 0)),
    }
}

fn list_to_vector(args: &[Value]) -> Result<Vec<Value>, ActinideError> {
    let value = one(args, "list-to-vector")?;
    let items = value
        .to_vec_list()
        .ok_or_else(|| ActinideError::type_error("list-to-vector", "proper list", value, 0))?;
    Ok(vec![Value::Vector(Rc::new(RefCell::new(items)))])
}

fn vector_to_list(args: &[Value]) -> Result<Vec<Value>, ActinideError> {
    let value = one(args, "vector-to-list")?;
    match value {
        Value::Vector(items) => Ok(vec![Value::list(items.borrow().clone())]),
        other => Err(ActinideError::type_error("vector-to-list", "vector", other, 0)),
    }
}

pub fn register(env: &Rc<Environment>, symbols: &Rc<SymbolTable>) {
    super::bind(env, symbols, "integer", integer);
    super::bind(env, symbols, "decimal", decimal);
    super::bind(env, symbols, "string", string);
    super::bind(env, symbols, "display", display);
    super::bind(env, symbols, "list-to-vector", list_to_vector);
    super::bind(env, symbols, "vector-to-list", vector_to_list);

    let table = symbols.clone();
    super::bind_closure(env, symbols, "symbol", move |args| symbol(args, &table));
}
