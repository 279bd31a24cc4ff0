// ABOUTME: String operations, just `concat`. `length` on strings is in
// ABOUTME: `pairs_lists`, since it shares the same builtin as list length.

use crate::env::Environment;
use crate::error::ActinideError;
use crate::symbol::SymbolTable;
use crate::value::Value;
use std::rc::Rc;

/// Variadic concatenation of string arguments, in order.
fn concat(args: &[Value]) -> Result<Vec<Value>, ActinideError> {
    let mut result = String::new();
    for (position, arg) in args.iter().enumerate() {
        match arg {
            Value::String(s) => result.push_str(s),
            other => return Err(ActinideError::type_error("concat", "string", other, position)),
        }
    }
    Ok(vec![Value::String(Rc::from(result.as_str()))])
}

pub fn register(env: &Rc<Environment>, symbols: &SymbolTable) {
    super::bind(env, symbols, "concat", concat);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concat_joins_strings_in_order() {
        let args = vec![
            Value::String(Rc::from("hello")),
            Value::String(Rc::from(" ")),
            Value::String(Rc::from("world")),
        ];
        assert_eq!(concat(&args).unwrap()[0].to_string(), "\"hello world\"");
    }

    #[test]
    fn concat_of_no_arguments_is_empty_string() {
        assert_eq!(concat(&[]).unwrap()[0].to_string(), "\"\"");
    }

    #[test]
    fn concat_rejects_non_string_arguments() {
        let args = vec![Value::String(Rc::from("x")), Value::Boolean(true)];
        assert!(matches!(concat(&args), Err(ActinideError::Type { .. })));
    }
}
