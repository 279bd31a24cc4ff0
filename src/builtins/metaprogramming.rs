// ABOUTME: `expand eval`, the built-in doorway into the expander and
// ABOUTME: evaluator themselves. Both need the session's symbol table and
// ABOUTME: its value and macro environments.

use crate::env::Environment;
use crate::error::{ActinideError, ARITY_ONE};
use crate::eval;
use crate::expander::Expander;
use crate::symbol::SymbolTable;
use crate::value::Value;
use std::rc::Rc;

fn expand(args: &[Value], symbols: &Rc<SymbolTable>, value_env: &Rc<Environment>, macro_env: &Rc<Environment>) -> Result<Vec<Value>, ActinideError> {
    if args.len() != 1 {
        return Err(ActinideError::arity_error("expand", ARITY_ONE, args.len()));
    }
    let expander = Expander::new(symbols, value_env.clone(), macro_env.clone());
    let expanded = expander.expand_top_level(args[0].clone())?;
    Ok(vec![expanded])
}

/// Expands then reduces the form against the session's top-level
/// environment, exactly as if it had been read in as program source.
fn eval(args: &[Value], symbols: &Rc<SymbolTable>, value_env: &Rc<Environment>, macro_env: &Rc<Environment>) -> Result<Vec<Value>, ActinideError> {
    if args.len() != 1 {
        return Err(ActinideError::arity_error("eval", ARITY_ONE, args.len()));
    }
    let expander = Expander::new(symbols, value_env.clone(), macro_env.clone());
    let expanded = expander.expand_top_level(args[0].clone())?;
    eval::eval(expanded, value_env.clone(), macro_env.clone())
}

pub fn register(env: &Rc<Environment>, symbols: &Rc<SymbolTable>, value_env: &Rc<Environment>, macro_env: &Rc<Environment>) {
    let (s, v, m) = (symbols.clone(), value_env.clone(), macro_env.clone());
    super::bind_closure(env, symbols, "expand", move |args| expand(args, &s, &v, &m));

    let (s, v, m) = (symbols.clone(), value_env.clone(), macro_env.clone());
    super::bind_closure(env, symbols, "eval", move |args| eval(args, &s, &v, &m));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::Reader;

    #[test]
    fn eval_reduces_a_quoted_arithmetic_form() {
        let symbols = Rc::new(SymbolTable::new());
        let value_env = Environment::new();
        let macro_env = Environment::new();
        crate::builtins::arithmetic::register(&value_env, &symbols);

        let reader = Reader::new(&symbols);
        let form = reader.read_one("(+ 1 2)").unwrap();
        let result = eval(&[form], &symbols, &value_env, &macro_env).unwrap();
        assert_eq!(result[0].to_string(), "3");
    }

    #[test]
    fn expand_rewrites_define_sugar_without_evaluating() {
        let symbols = Rc::new(SymbolTable::new());
        let value_env = Environment::new();
        let macro_env = Environment::new();

        let reader = Reader::new(&symbols);
        let form = reader.read_one("(define (id x) x)").unwrap();
        let result = expand(&[form], &symbols, &value_env, &macro_env).unwrap();
        assert_eq!(result[0].to_string(), "(define id (lambda (x) x))");
    }
}
