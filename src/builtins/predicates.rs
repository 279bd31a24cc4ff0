// ABOUTME: Type predicates, `boolean? cons? decimal? integer? list? nil?
// ABOUTME: procedure? string? symbol? vector?`.

use crate::env::Environment;
use crate::error::ActinideError;
use crate::symbol::SymbolTable;
use crate::value::Value;
use std::rc::Rc;

fn one(args: &[Value], name: &str) -> Result<&Value, ActinideError> {
    if args.len() != 1 {
        return Err(ActinideError::arity_error(name, crate::error::ARITY_ONE, args.len()));
    }
    Ok(&args[0])
}

fn boolean_p(args: &[Value]) -> Result<Vec<Value>, ActinideError> {
    Ok(vec![Value::Boolean(matches!(one(args, "boolean?")?, Value::Boolean(_)))])
}

/// True for any cons, including an improper one, and also for nil.
fn cons_p(args: &[Value]) -> Result<Vec<Value>, ActinideError> {
    Ok(vec![Value::Boolean(matches!(
        one(args, "cons?")?,
        Value::Cons(_) | Value::Nil
    ))])
}

fn decimal_p(args: &[Value]) -> Result<Vec<Value>, ActinideError> {
    Ok(vec![Value::Boolean(matches!(one(args, "decimal?")?, Value::Decimal(_)))])
}

/// True only for integers: a decimal with a zero fractional part is still a
/// decimal, not an integer.
fn integer_p(args: &[Value]) -> Result<Vec<Value>, ActinideError> {
    Ok(vec![Value::Boolean(matches!(one(args, "integer?")?, Value::Integer(_)))])
}

fn list_p(args: &[Value]) -> Result<Vec<Value>, ActinideError> {
    Ok(vec![Value::Boolean(one(args, "list?")?.is_proper_list())])
}

fn nil_p(args: &[Value]) -> Result<Vec<Value>, ActinideError> {
    Ok(vec![Value::Boolean(matches!(one(args, "nil?")?, Value::Nil))])
}

fn procedure_p(args: &[Value]) -> Result<Vec<Value>, ActinideError> {
    Ok(vec![Value::Boolean(matches!(one(args, "procedure?")?, Value::Procedure(_)))])
}

fn string_p(args: &[Value]) -> Result<Vec<Value>, ActinideError> {
    Ok(vec![Value::Boolean(matches!(one(args, "string?")?, Value::String(_)))])
}

fn symbol_p(args: &[Value]) -> Result<Vec<Value>, ActinideError> {
    Ok(vec![Value::Boolean(matches!(one(args, "symbol?")?, Value::Symbol(_)))])
}

fn vector_p(args: &[Value]) -> Result<Vec<Value>, ActinideError> {
    Ok(vec![Value::Boolean(matches!(one(args, "vector?")?, Value::Vector(_)))])
}

pub fn register(env: &Rc<Environment>, symbols: &SymbolTable) {
    super::bind(env, symbols, "boolean?", boolean_p);
    super::bind(env, symbols, "cons?", cons_p);
    super::bind(env, symbols, "decimal?", decimal_p);
    super::bind(env, symbols, "integer?", integer_p);
    super::bind(env, symbols, "list?", list_p);
    super::bind(env, symbols, "nil?", nil_p);
    super::bind(env, symbols, "procedure?", procedure_p);
    super::bind(env, symbols, "string?", string_p);
    super::bind(env, symbols, "symbol?", symbol_p);
    super::bind(env, symbols, "vector?", vector_p);
}
