// ABOUTME: Shared integer/decimal promotion helpers used by the arithmetic
// ABOUTME: and comparison builtins.

use crate::error::ActinideError;
use crate::number::{Decimal, Integer};
use crate::value::Value;
use std::cmp::Ordering;

/// Either side of a promoted arithmetic operation: integer-only until a
/// decimal operand forces the whole computation to decimal.
pub enum Numeric {
    Integer(Integer),
    Decimal(Decimal),
}

impl Numeric {
    pub fn from_value(value: &Value, function: &str, position: usize) -> Result<Numeric, ActinideError> {
        match value {
            Value::Integer(i) => Ok(Numeric::Integer(i.clone())),
            Value::Decimal(d) => Ok(Numeric::Decimal(d.clone())),
            other => Err(ActinideError::type_error(function, "integer or decimal", other, position)),
        }
    }

    pub fn into_value(self) -> Value {
        match self {
            Numeric::Integer(i) => Value::Integer(i),
            Numeric::Decimal(d) => Value::Decimal(d),
        }
    }

    fn as_decimal(&self) -> Decimal {
        match self {
            Numeric::Integer(i) => i.to_decimal(),
            Numeric::Decimal(d) => d.clone(),
        }
    }

    pub fn negate(self) -> Numeric {
        match self {
            Numeric::Integer(i) => Numeric::Integer(i.negate()),
            Numeric::Decimal(d) => Numeric::Decimal(d.negate()),
        }
    }
}

pub fn add(a: Numeric, b: Numeric) -> Numeric {
    match (a, b) {
        (Numeric::Integer(a), Numeric::Integer(b)) => Numeric::Integer(a.add(&b)),
        (a, b) => Numeric::Decimal(a.as_decimal().add(&b.as_decimal())),
    }
}

pub fn sub(a: Numeric, b: Numeric) -> Numeric {
    match (a, b) {
        (Numeric::Integer(a), Numeric::Integer(b)) => Numeric::Integer(a.sub(&b)),
        (a, b) => Numeric::Decimal(a.as_decimal().sub(&b.as_decimal())),
    }
}

pub fn mul(a: Numeric, b: Numeric) -> Numeric {
    match (a, b) {
        (Numeric::Integer(a), Numeric::Integer(b)) => Numeric::Integer(a.mul(&b)),
        (a, b) => Numeric::Decimal(a.as_decimal().mul(&b.as_decimal())),
    }
}

/// Integer division rounds toward negative infinity; decimal division
/// inherits whatever rounding `bigdecimal` performs. Both fail, rather than
/// panic, on division by zero.
pub fn div(a: Numeric, b: Numeric, function: &str) -> Result<Numeric, ActinideError> {
    match (a, b) {
        (Numeric::Integer(a), Numeric::Integer(b)) => a
            .div_floor(&b)
            .map(Numeric::Integer)
            .ok_or_else(|| ActinideError::domain_error(function, "division by zero")),
        (a, b) => a
            .as_decimal()
            .div(&b.as_decimal())
            .map(Numeric::Decimal)
            .ok_or_else(|| ActinideError::domain_error(function, "division by zero")),
    }
}

pub fn compare(a: &Numeric, b: &Numeric) -> Ordering {
    match (a, b) {
        (Numeric::Integer(a), Numeric::Integer(b)) => a.cmp_value(b),
        _ => a.as_decimal().cmp_value(&b.as_decimal()),
    }
}
