// ABOUTME: Input ports over in-memory text, `string-to-input-port peek-port
// ABOUTME: read-port read-port-fully read`. `read` pulls one parsed form at a
// ABOUTME: time and needs the session's reader and symbols.

use crate::env::Environment;
use crate::error::{ActinideError, ARITY_ONE, ARITY_ONE_OR_TWO};
use crate::reader::Reader;
use crate::symbol::SymbolTable;
use crate::value::{PortState, Value};
use std::cell::RefCell;
use std::rc::Rc;

fn string_to_input_port(args: &[Value]) -> Result<Vec<Value>, ActinideError> {
    if args.len() != 1 {
        return Err(ActinideError::arity_error("string-to-input-port", ARITY_ONE, args.len()));
    }
    match &args[0] {
        Value::String(s) => Ok(vec![Value::Port(Rc::new(RefCell::new(PortState::from_str(s))))]),
        other => Err(ActinideError::type_error("string-to-input-port", "string", other, 0)),
    }
}

fn as_port<'a>(value: &'a Value, function: &str, position: usize) -> Result<&'a Rc<RefCell<PortState>>, ActinideError> {
    match value {
        Value::Port(p) => Ok(p),
        other => Err(ActinideError::type_error(function, "port", other, position)),
    }
}

fn as_length(value: &Value, function: &str, position: usize) -> Result<usize, ActinideError> {
    use num_traits::ToPrimitive;
    match value {
        Value::Integer(i) => i
            .value()
            .to_usize()
            .ok_or_else(|| ActinideError::domain_error(function, "length out of range")),
        other => Err(ActinideError::type_error(function, "integer", other, position)),
    }
}

/// Non-consuming lookahead. One argument peeks a single character; two peeks
/// up to the given length. Either way the result is a string, empty at end
/// of input.
fn peek_port(args: &[Value]) -> Result<Vec<Value>, ActinideError> {
    if args.is_empty() || args.len() > 2 {
        return Err(ActinideError::arity_error("peek-port", ARITY_ONE_OR_TWO, args.len()));
    }
    let port = as_port(&args[0], "peek-port", 0)?;
    let len = if args.len() == 2 { as_length(&args[1], "peek-port", 1)? } else { 1 };
    Ok(vec![Value::String(Rc::from(port.borrow().peek(len).as_str()))])
}

/// Consumes and returns up to one character. Returns `Value::EndOfFile` once
/// the port is exhausted, rather than an empty string, so callers can
/// distinguish "read nothing because there was nothing left" from "read an
/// empty string".
fn read_port(args: &[Value]) -> Result<Vec<Value>, ActinideError> {
    if args.len() != 1 {
        return Err(ActinideError::arity_error("read-port", ARITY_ONE, args.len()));
    }
    let port = as_port(&args[0], "read-port", 0)?;
    let mut borrowed = port.borrow_mut();
    match borrowed.next_char() {
        Some(c) => Ok(vec![Value::String(Rc::from(c.to_string().as_str()))]),
        None => Ok(vec![Value::EndOfFile]),
    }
}

fn read_port_fully(args: &[Value]) -> Result<Vec<Value>, ActinideError> {
    if args.len() != 1 {
        return Err(ActinideError::arity_error("read-port-fully", ARITY_ONE, args.len()));
    }
    let port = as_port(&args[0], "read-port-fully", 0)?;
    let rest = port.borrow_mut().read_remaining();
    Ok(vec![Value::String(Rc::from(rest.as_str()))])
}

/// Parses one complete form from the port, leaving the remaining text
/// untouched for the next call. Returns `Value::EndOfFile` when no form
/// remains. Builds a fresh `Reader` per call: `Reader` is stateless and
/// borrows the symbol table only for the call's duration.
fn read(args: &[Value], symbols: &Rc<SymbolTable>) -> Result<Vec<Value>, ActinideError> {
    if args.len() != 1 {
        return Err(ActinideError::arity_error("read", ARITY_ONE, args.len()));
    }
    let port = as_port(&args[0], "read", 0)?;
    let form = Reader::new(symbols).read_form(port)?;
    Ok(vec![form])
}

pub fn register(env: &Rc<Environment>, symbols: &Rc<SymbolTable>) {
    super::bind(env, symbols, "string-to-input-port", string_to_input_port);
    super::bind(env, symbols, "peek-port", peek_port);
    super::bind(env, symbols, "read-port", read_port);
    super::bind(env, symbols, "read-port-fully", read_port_fully);

    let table = symbols.clone();
    super::bind_closure(env, symbols, "read", move |args| read(args, &table));
}
