// ABOUTME: Pairs and lists, `cons head tail uncons list append length map
// ABOUTME: filter reduce`. `map`/`filter`/`reduce` call back into evaluated
// ABOUTME: procedures, so they need the session's macro table.

use crate::env::Environment;
use crate::error::{ActinideError, ARITY_AT_LEAST_ONE, ARITY_ONE, ARITY_TWO};
use crate::eval;
use crate::symbol::SymbolTable;
use crate::value::{Procedure, Value};
use std::rc::Rc;

fn cons(args: &[Value]) -> Result<Vec<Value>, ActinideError> {
    if args.len() != 2 {
        return Err(ActinideError::arity_error("cons", ARITY_TWO, args.len()));
    }
    Ok(vec![Value::cons(args[0].clone(), args[1].clone())])
}

fn head(args: &[Value]) -> Result<Vec<Value>, ActinideError> {
    if args.len() != 1 {
        return Err(ActinideError::arity_error("head", ARITY_ONE, args.len()));
    }
    match &args[0] {
        Value::Cons(cell) => Ok(vec![cell.head.clone()]),
        other => Err(ActinideError::type_error("head", "cons", other, 0)),
    }
}

fn tail(args: &[Value]) -> Result<Vec<Value>, ActinideError> {
    if args.len() != 1 {
        return Err(ActinideError::arity_error("tail", ARITY_ONE, args.len()));
    }
    match &args[0] {
        Value::Cons(cell) => Ok(vec![cell.tail.clone()]),
        other => Err(ActinideError::type_error("tail", "cons", other, 0)),
    }
}

fn uncons(args: &[Value]) -> Result<Vec<Value>, ActinideError> {
    if args.len() != 1 {
        return Err(ActinideError::arity_error("uncons", ARITY_ONE, args.len()));
    }
    match &args[0] {
        Value::Cons(cell) => Ok(vec![cell.head.clone(), cell.tail.clone()]),
        other => Err(ActinideError::type_error("uncons", "cons", other, 0)),
    }
}

fn list(args: &[Value]) -> Result<Vec<Value>, ActinideError> {
    Ok(vec![Value::list(args.to_vec())])
}

/// Variadic: concatenates every argument but the last as proper lists, then
/// terminates the chain in the final argument (which need not itself be a
/// list, matching the expander's own use of `append` to lower
/// `unquote-splicing`).
fn append(args: &[Value]) -> Result<Vec<Value>, ActinideError> {
    let Some((last, init)) = args.split_last() else {
        return Ok(vec![Value::Nil]);
    };
    let mut items = Vec::new();
    for (position, arg) in init.iter().enumerate() {
        let elems = arg
            .to_vec_list()
            .ok_or_else(|| ActinideError::type_error("append", "proper list", arg, position))?;
        items.extend(elems);
    }
    let mut result = last.clone();
    for item in items.into_iter().rev() {
        result = Value::cons(item, result);
    }
    Ok(vec![result])
}

fn length(args: &[Value]) -> Result<Vec<Value>, ActinideError> {
    if args.len() != 1 {
        return Err(ActinideError::arity_error("length", ARITY_ONE, args.len()));
    }
    let count = match &args[0] {
        Value::String(s) => s.chars().count(),
        list @ (Value::Cons(_) | Value::Nil) => list
            .to_vec_list()
            .ok_or_else(|| ActinideError::type_error("length", "proper list or string", list, 0))?
            .len(),
        other => return Err(ActinideError::type_error("length", "proper list or string", other, 0)),
    };
    Ok(vec![Value::Integer(crate::number::Integer::from_i64(count as i64))])
}

fn as_procedure(value: &Value, function: &str, position: usize) -> Result<Procedure, ActinideError> {
    match value {
        Value::Procedure(p) => Ok(p.clone()),
        other => Err(ActinideError::type_error(function, "procedure", other, position)),
    }
}

fn as_list(value: &Value, function: &str, position: usize) -> Result<Vec<Value>, ActinideError> {
    value
        .to_vec_list()
        .ok_or_else(|| ActinideError::type_error(function, "proper list", value, position))
}

fn map(args: &[Value], macro_env: &Rc<Environment>) -> Result<Vec<Value>, ActinideError> {
    if args.len() != 2 {
        return Err(ActinideError::arity_error("map", ARITY_TWO, args.len()));
    }
    let proc = as_procedure(&args[0], "map", 0)?;
    let items = as_list(&args[1], "map", 1)?;
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        let result = eval::apply(&proc, vec![item], macro_env.clone())?;
        out.push(result.into_iter().next().unwrap_or(Value::Nil));
    }
    Ok(vec![Value::list(out)])
}

fn filter(args: &[Value], macro_env: &Rc<Environment>) -> Result<Vec<Value>, ActinideError> {
    if args.len() != 2 {
        return Err(ActinideError::arity_error("filter", ARITY_TWO, args.len()));
    }
    let proc = as_procedure(&args[0], "filter", 0)?;
    let items = as_list(&args[1], "filter", 1)?;
    let mut out = Vec::new();
    for item in items {
        let result = eval::apply(&proc, vec![item.clone()], macro_env.clone())?;
        let keep = result.into_iter().next().unwrap_or(Value::Nil).is_truthy();
        if keep {
            out.push(item);
        }
    }
    Ok(vec![Value::list(out)])
}

/// Left fold with no seed: a singleton list returns its one element without
/// ever calling `proc`; an empty list is a domain error rather than yielding
/// some identity value, since no identity is specified for an arbitrary fold.
fn reduce(args: &[Value], macro_env: &Rc<Environment>) -> Result<Vec<Value>, ActinideError> {
    if args.len() != 2 {
        return Err(ActinideError::arity_error("reduce", ARITY_TWO, args.len()));
    }
    let proc = as_procedure(&args[0], "reduce", 0)?;
    let items = as_list(&args[1], "reduce", 1)?;
    let mut iter = items.into_iter();
    let Some(mut acc) = iter.next() else {
        return Err(ActinideError::domain_error("reduce", "empty list"));
    };
    for item in iter {
        let result = eval::apply(&proc, vec![acc, item], macro_env.clone())?;
        acc = result.into_iter().next().unwrap_or(Value::Nil);
    }
    Ok(vec![acc])
}

pub fn register(env: &Rc<Environment>, symbols: &SymbolTable, macro_env: &Rc<Environment>) {
    super::bind(env, symbols, "cons", cons);
    super::bind(env, symbols, "head", head);
    super::bind(env, symbols, "tail", tail);
    super::bind(env, symbols, "uncons", uncons);
    super::bind(env, symbols, "list", list);
    super::bind(env, symbols, "append", append);
    super::bind(env, symbols, "length", length);

    let me = macro_env.clone();
    super::bind_closure(env, symbols, "map", move |args| map(args, &me));
    let me = macro_env.clone();
    super::bind_closure(env, symbols, "filter", move |args| filter(args, &me));
    let me = macro_env.clone();
    super::bind_closure(env, symbols, "reduce", move |args| reduce(args, &me));
}
