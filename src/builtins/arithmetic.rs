// ABOUTME: `+ - * /`, promote to decimal when any operand is a decimal,
// ABOUTME: integer division rounds toward negative infinity.

use super::numeric::{self, Numeric};
use crate::env::Environment;
use crate::error::{ActinideError, ARITY_AT_LEAST_ONE};
use crate::symbol::SymbolTable;
use crate::value::Value;
use std::rc::Rc;

fn add(args: &[Value]) -> Result<Vec<Value>, ActinideError> {
    let mut acc = Numeric::Integer(crate::number::Integer::from_i64(0));
    for (position, arg) in args.iter().enumerate() {
        acc = numeric::add(acc, Numeric::from_value(arg, "+", position)?);
    }
    Ok(vec![acc.into_value()])
}

fn sub(args: &[Value]) -> Result<Vec<Value>, ActinideError> {
    let Some((first, rest)) = args.split_first() else {
        return Err(ActinideError::arity_error("-", ARITY_AT_LEAST_ONE, 0));
    };
    let first = Numeric::from_value(first, "-", 0)?;
    if rest.is_empty() {
        return Ok(vec![first.negate().into_value()]);
    }
    let mut acc = first;
    for (position, arg) in rest.iter().enumerate() {
        acc = numeric::sub(acc, Numeric::from_value(arg, "-", position + 1)?);
    }
    Ok(vec![acc.into_value()])
}

fn mul(args: &[Value]) -> Result<Vec<Value>, ActinideError> {
    let mut acc = Numeric::Integer(crate::number::Integer::from_i64(1));
    for (position, arg) in args.iter().enumerate() {
        acc = numeric::mul(acc, Numeric::from_value(arg, "*", position)?);
    }
    Ok(vec![acc.into_value()])
}

fn div(args: &[Value]) -> Result<Vec<Value>, ActinideError> {
    let Some((first, rest)) = args.split_first() else {
        return Err(ActinideError::arity_error("/", ARITY_AT_LEAST_ONE, 0));
    };
    let first = Numeric::from_value(first, "/", 0)?;
    if rest.is_empty() {
        let one = Numeric::Integer(crate::number::Integer::from_i64(1));
        return Ok(vec![numeric::div(one, first, "/")?.into_value()]);
    }
    let mut acc = first;
    for (position, arg) in rest.iter().enumerate() {
        acc = numeric::div(acc, Numeric::from_value(arg, "/", position + 1)?, "/")?;
    }
    Ok(vec![acc.into_value()])
}

pub fn register(env: &Rc<Environment>, symbols: &SymbolTable) {
    super::bind(env, symbols, "+", add);
    super::bind(env, symbols, "-", sub);
    super::bind(env, symbols, "*", mul);
    super::bind(env, symbols, "/", div);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(n: i64) -> Value {
        Value::Integer(crate::number::Integer::from_i64(n))
    }

    #[test]
    fn add_sums_all_arguments() {
        assert_eq!(add(&[int(1), int(2), int(3)]).unwrap()[0].to_string(), "6");
        assert_eq!(add(&[]).unwrap()[0].to_string(), "0");
    }

    #[test]
    fn sub_with_one_argument_negates() {
        assert_eq!(sub(&[int(5)]).unwrap()[0].to_string(), "-5");
    }

    #[test]
    fn div_promotes_to_decimal_on_mixed_operands() {
        let dec = Value::Decimal(crate::number::Decimal::parse("2.0").unwrap());
        let result = div(&[int(5), dec]).unwrap();
        assert!(matches!(result[0], Value::Decimal(_)));
    }

    #[test]
    fn integer_division_rounds_toward_negative_infinity() {
        let result = div(&[int(-7), int(2)]).unwrap();
        assert_eq!(result[0].to_string(), "-4");
    }

    #[test]
    fn division_by_zero_is_a_domain_error() {
        assert!(matches!(
            div(&[int(1), int(0)]),
            Err(ActinideError::Domain { .. })
        ));
    }
}
