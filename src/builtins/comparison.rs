// ABOUTME: `< <= > >=`, variadic numeric chain comparison; see DESIGN.md for
// ABOUTME: the chosen arity reading.

use super::numeric::{self, Numeric};
use crate::env::Environment;
use crate::error::ActinideError;
use crate::symbol::SymbolTable;
use crate::value::Value;
use std::cmp::Ordering;
use std::rc::Rc;

fn chain(name: &str, args: &[Value], holds: impl Fn(Ordering) -> bool) -> Result<Vec<Value>, ActinideError> {
    let numbers = args
        .iter()
        .enumerate()
        .map(|(i, v)| Numeric::from_value(v, name, i))
        .collect::<Result<Vec<_>, _>>()?;
    let result = numbers.windows(2).all(|pair| holds(numeric::compare(&pair[0], &pair[1])));
    Ok(vec![Value::Boolean(result)])
}

fn lt(args: &[Value]) -> Result<Vec<Value>, ActinideError> {
    chain("<", args, |o| o == Ordering::Less)
}

fn le(args: &[Value]) -> Result<Vec<Value>, ActinideError> {
    chain("<=", args, |o| o != Ordering::Greater)
}

fn gt(args: &[Value]) -> Result<Vec<Value>, ActinideError> {
    chain(">", args, |o| o == Ordering::Greater)
}

fn ge(args: &[Value]) -> Result<Vec<Value>, ActinideError> {
    chain(">=", args, |o| o != Ordering::Less)
}

pub fn register(env: &Rc<Environment>, symbols: &SymbolTable) {
    super::bind(env, symbols, "<", lt);
    super::bind(env, symbols, "<=", le);
    super::bind(env, symbols, ">", gt);
    super::bind(env, symbols, ">=", ge);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(n: i64) -> Value {
        Value::Integer(crate::number::Integer::from_i64(n))
    }

    #[test]
    fn lt_is_strictly_increasing_across_a_chain() {
        assert!(matches!(lt(&[int(1), int(2), int(3)]).unwrap()[0], Value::Boolean(true)));
        assert!(matches!(lt(&[int(1), int(3), int(2)]).unwrap()[0], Value::Boolean(false)));
    }

    #[test]
    fn le_allows_equal_adjacent_values() {
        assert!(matches!(le(&[int(1), int(1), int(2)]).unwrap()[0], Value::Boolean(true)));
    }

    #[test]
    fn single_argument_chain_is_trivially_true() {
        assert!(matches!(lt(&[int(1)]).unwrap()[0], Value::Boolean(true)));
    }

    #[test]
    fn non_numeric_argument_is_a_type_error() {
        assert!(matches!(
            lt(&[int(1), Value::String(std::rc::Rc::from("x"))]),
            Err(ActinideError::Type { .. })
        ));
    }
}
