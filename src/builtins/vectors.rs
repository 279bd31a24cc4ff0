// ABOUTME: Mutable fixed-identity vectors, `vector vector-add vector-get
// ABOUTME: vector-set vector-length`.

use crate::env::Environment;
use crate::error::ActinideError;
use crate::symbol::SymbolTable;
use crate::value::Value;
use std::cell::RefCell;
use std::rc::Rc;

fn vector(args: &[Value]) -> Result<Vec<Value>, ActinideError> {
    Ok(vec![Value::Vector(Rc::new(RefCell::new(args.to_vec())))])
}

fn as_vector<'a>(value: &'a Value, function: &str, position: usize) -> Result<&'a Rc<RefCell<Vec<Value>>>, ActinideError> {
    match value {
        Value::Vector(cells) => Ok(cells),
        other => Err(ActinideError::type_error(function, "vector", other, position)),
    }
}

fn as_index(value: &Value, function: &str, position: usize) -> Result<usize, ActinideError> {
    use num_traits::ToPrimitive;
    match value {
        Value::Integer(i) => i
            .value()
            .to_usize()
            .ok_or_else(|| ActinideError::domain_error(function, "index out of range")),
        other => Err(ActinideError::type_error(function, "integer", other, position)),
    }
}

/// Appends every remaining argument in place and returns the vector itself.
/// Vectors are mutable with fixed identity, so every operation on them is a
/// side effect, not a copy.
fn vector_add(args: &[Value]) -> Result<Vec<Value>, ActinideError> {
    let Some((vector, items)) = args.split_first() else {
        return Err(ActinideError::arity_error("vector-add", crate::error::ARITY_AT_LEAST_TWO, 0));
    };
    if items.is_empty() {
        return Err(ActinideError::arity_error("vector-add", crate::error::ARITY_AT_LEAST_TWO, 1));
    }
    let cells = as_vector(vector, "vector-add", 0)?;
    cells.borrow_mut().extend(items.iter().cloned());
    Ok(vec![vector.clone()])
}

fn vector_get(args: &[Value]) -> Result<Vec<Value>, ActinideError> {
    if args.len() != 2 {
        return Err(ActinideError::arity_error("vector-get", crate::error::ARITY_TWO, args.len()));
    }
    let cells = as_vector(&args[0], "vector-get", 0)?;
    let index = as_index(&args[1], "vector-get", 1)?;
    let borrowed = cells.borrow();
    borrowed
        .get(index)
        .cloned()
        .map(|v| vec![v])
        .ok_or_else(|| ActinideError::domain_error("vector-get", "index out of range"))
}

fn vector_set(args: &[Value]) -> Result<Vec<Value>, ActinideError> {
    if args.len() != 3 {
        return Err(ActinideError::arity_error("vector-set", crate::error::ARITY_THREE, args.len()));
    }
    let cells = as_vector(&args[0], "vector-set", 0)?;
    let index = as_index(&args[1], "vector-set", 1)?;
    let mut borrowed = cells.borrow_mut();
    if index >= borrowed.len() {
        return Err(ActinideError::domain_error("vector-set", "index out of range"));
    }
    borrowed[index] = args[2].clone();
    drop(borrowed);
    Ok(vec![args[0].clone()])
}

fn vector_length(args: &[Value]) -> Result<Vec<Value>, ActinideError> {
    if args.len() != 1 {
        return Err(ActinideError::arity_error("vector-length", crate::error::ARITY_ONE, args.len()));
    }
    let cells = as_vector(&args[0], "vector-length", 0)?;
    let len = cells.borrow().len();
    Ok(vec![Value::Integer(crate::number::Integer::from_i64(len as i64))])
}

pub fn register(env: &Rc<Environment>, symbols: &SymbolTable) {
    super::bind(env, symbols, "vector", vector);
    super::bind(env, symbols, "vector-add", vector_add);
    super::bind(env, symbols, "vector-get", vector_get);
    super::bind(env, symbols, "vector-set", vector_set);
    super::bind(env, symbols, "vector-length", vector_length);
}
