// ABOUTME: Arbitrary-precision integer and decimal values, with the promotion
// ABOUTME: and representation-vs-value equality rules the evaluator relies on.

use bigdecimal::BigDecimal;
use num_bigint::{BigInt, Sign};
use num_traits::Zero;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// An arbitrary-precision signed integer. No range limit.
#[derive(Debug, Clone)]
pub struct Integer(BigInt);

impl Integer {
    pub fn from_bigint(v: BigInt) -> Self {
        Integer(v)
    }

    pub fn from_i64(v: i64) -> Self {
        Integer(BigInt::from(v))
    }

    /// Parses the reader's integer grammar: optional leading `-`, digits and
    /// underscores, at least one digit. Underscores are discarded.
    pub fn parse(token: &str) -> Option<Integer> {
        let cleaned: String = token.chars().filter(|c| *c != '_').collect();
        cleaned.parse::<BigInt>().ok().map(Integer)
    }

    pub fn value(&self) -> &BigInt {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn negate(&self) -> Integer {
        Integer(-self.0.clone())
    }

    pub fn to_decimal(&self) -> Decimal {
        Decimal::from_integer_value(&self.0)
    }

    pub fn add(&self, other: &Integer) -> Integer {
        Integer(&self.0 + &other.0)
    }

    pub fn sub(&self, other: &Integer) -> Integer {
        Integer(&self.0 - &other.0)
    }

    pub fn mul(&self, other: &Integer) -> Integer {
        Integer(&self.0 * &other.0)
    }

    /// Division rounding toward negative infinity, per spec. `None` on
    /// division by zero.
    pub fn div_floor(&self, other: &Integer) -> Option<Integer> {
        if other.0.is_zero() {
            return None;
        }
        let q = &self.0 / &other.0;
        let r = &self.0 % &other.0;
        if !r.is_zero() && (r.sign() == Sign::Minus) != (other.0.sign() == Sign::Minus) {
            Some(Integer(q - BigInt::from(1)))
        } else {
            Some(Integer(q))
        }
    }

    pub fn cmp_value(&self, other: &Integer) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl PartialEq for Integer {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for Integer {}

impl fmt::Display for Integer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An arbitrary-precision base-10 decimal. Tracks whether it was entered or
/// produced as a negative zero, since `bigdecimal` itself (like most
/// arbitrary-precision decimal libraries) collapses the sign of a zero
/// magnitude; `eq?` still needs to distinguish `-0.0` from `0.0` while `=`
/// treats them as equal.
#[derive(Debug, Clone)]
pub struct Decimal {
    value: BigDecimal,
    negative_zero: bool,
}

impl Decimal {
    /// Parses the reader's decimal grammar (already validated by the caller
    /// to have a `.` with a non-empty side): optional `-`, digits, `.`,
    /// digits, optional `e` exponent. Underscores are discarded.
    pub fn parse(token: &str) -> Option<Decimal> {
        let cleaned: String = token.chars().filter(|c| *c != '_').collect();
        let value = BigDecimal::from_str(&cleaned).ok()?;
        let negative_zero = cleaned.starts_with('-') && value.is_zero();
        Some(Decimal {
            value,
            negative_zero,
        })
    }

    pub fn from_integer_value(v: &BigInt) -> Decimal {
        Decimal {
            value: BigDecimal::from(v.clone()),
            negative_zero: false,
        }
    }

    pub fn value(&self) -> &BigDecimal {
        &self.value
    }

    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    pub fn negate(&self) -> Decimal {
        let value = -self.value.clone();
        let negative_zero = if value.is_zero() {
            !self.negative_zero
        } else {
            false
        };
        Decimal {
            value,
            negative_zero,
        }
    }

    pub fn add(&self, other: &Decimal) -> Decimal {
        Decimal {
            value: &self.value + &other.value,
            negative_zero: false,
        }
    }

    pub fn sub(&self, other: &Decimal) -> Decimal {
        Decimal {
            value: &self.value - &other.value,
            negative_zero: false,
        }
    }

    pub fn mul(&self, other: &Decimal) -> Decimal {
        Decimal {
            value: &self.value * &other.value,
            negative_zero: false,
        }
    }

    /// `None` on division by zero. Rounding beyond what `bigdecimal` itself
    /// performs is not specified or tightened here.
    pub fn div(&self, other: &Decimal) -> Option<Decimal> {
        if other.value.is_zero() {
            return None;
        }
        Some(Decimal {
            value: &self.value / &other.value,
            negative_zero: false,
        })
    }

    pub fn cmp_value(&self, other: &Decimal) -> Ordering {
        self.value.cmp(&other.value)
    }

    /// Truncates the fractional part toward zero, for the `integer`
    /// conversion builtin. `bigdecimal`'s own rounding policy is untouched;
    /// this just discards the fraction rather than rounding it.
    pub fn truncate_to_integer(&self) -> Integer {
        let (digits, exponent) = self.value.as_bigint_and_exponent();
        if exponent <= 0 {
            let scale = BigInt::from(10).pow((-exponent) as u32);
            Integer(digits * scale)
        } else {
            let scale = BigInt::from(10).pow(exponent as u32);
            Integer(&digits / &scale)
        }
    }

    /// Representation equality: distinguishes `1e1` from `10`, and `-0.0`
    /// from `0.0`. Used by `eq?`.
    pub fn representation_eq(&self, other: &Decimal) -> bool {
        if self.value.is_zero() && other.value.is_zero() {
            return self.negative_zero == other.negative_zero;
        }
        self.value.as_bigint_and_exponent() == other.value.as_bigint_and_exponent()
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative_zero && self.value.is_zero() {
            write!(f, "-{}", self.value)
        } else {
            write!(f, "{}", self.value)
        }
    }
}
