// ABOUTME: `= != eq?`, structural/value equality, its pairwise negation, and
// ABOUTME: identity equality, built on `Value::is_equal`/`is_eq`.

use crate::env::Environment;
use crate::error::{ActinideError, ARITY_TWO};
use crate::symbol::SymbolTable;
use crate::value::Value;
use std::rc::Rc;

fn equal(args: &[Value]) -> Result<Vec<Value>, ActinideError> {
    let result = args.windows(2).all(|pair| pair[0].is_equal(&pair[1]));
    Ok(vec![Value::Boolean(result)])
}

/// The pairwise negation of `=` over *every* pair, not just adjacent ones:
/// true iff no two arguments, anywhere in the list, are equal to each other.
fn not_equal(args: &[Value]) -> Result<Vec<Value>, ActinideError> {
    for i in 0..args.len() {
        for j in (i + 1)..args.len() {
            if args[i].is_equal(&args[j]) {
                return Ok(vec![Value::Boolean(false)]);
            }
        }
    }
    Ok(vec![Value::Boolean(true)])
}

fn eq(args: &[Value]) -> Result<Vec<Value>, ActinideError> {
    if args.len() != 2 {
        return Err(ActinideError::arity_error("eq?", ARITY_TWO, args.len()));
    }
    Ok(vec![Value::Boolean(args[0].is_eq(&args[1]))])
}

pub fn register(env: &Rc<Environment>, symbols: &SymbolTable) {
    super::bind(env, symbols, "=", equal);
    super::bind(env, symbols, "!=", not_equal);
    super::bind(env, symbols, "eq?", eq);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(n: i64) -> Value {
        Value::Integer(crate::number::Integer::from_i64(n))
    }

    #[test]
    fn equal_crosses_integer_decimal_boundary() {
        let dec = Value::Decimal(crate::number::Decimal::parse("10.0").unwrap());
        assert!(matches!(equal(&[int(10), dec]).unwrap()[0], Value::Boolean(true)));
    }

    #[test]
    fn not_equal_checks_every_pair_not_just_adjacent() {
        // 1 2 1: adjacent pairs are both unequal, but the first and third
        // argument collide, so `!=` must still be false.
        assert!(matches!(not_equal(&[int(1), int(2), int(1)]).unwrap()[0], Value::Boolean(false)));
        assert!(matches!(not_equal(&[int(1), int(2), int(3)]).unwrap()[0], Value::Boolean(true)));
    }

    #[test]
    fn eq_is_identity_not_value_equality_for_strings() {
        let a = Value::String(Rc::from("hi"));
        let b = Value::String(Rc::from("hi"));
        assert!(matches!(eq(&[a, b]).unwrap()[0], Value::Boolean(false)));
    }

    #[test]
    fn eq_requires_exactly_two_arguments() {
        assert!(matches!(eq(&[int(1)]), Err(ActinideError::Arity { .. })));
    }
}
