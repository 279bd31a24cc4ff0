// ABOUTME: The trampolined evaluator. Tail positions loop in place; every
// ABOUTME: other recursive call goes through the host stack and the depth guard.

use crate::env::Environment;
use crate::error::ActinideError;
use crate::value::{Formals, NativeProcedure, Procedure, UserProcedure, Value};
use std::cell::Cell;
use std::rc::Rc;

/// Non-tail recursion is the only thing that can grow the host stack; tail
/// calls stay inside the trampoline loop below and never touch this counter.
/// 10,000 leaves generous headroom under a default thread stack before a
/// runaway non-tail recursion (e.g. a naive, non-tail factorial) could
/// overflow it for real.
const RECURSION_LIMIT: usize = 10_000;

thread_local! {
    static DEPTH: Cell<usize> = const { Cell::new(0) };
}

struct DepthGuard;

impl DepthGuard {
    fn enter() -> Result<DepthGuard, ActinideError> {
        let depth = DEPTH.with(|d| {
            let next = d.get() + 1;
            d.set(next);
            next
        });
        if depth > RECURSION_LIMIT {
            DEPTH.with(|d| d.set(d.get() - 1));
            return Err(ActinideError::RecursionDepthExceeded {
                limit: RECURSION_LIMIT,
            });
        }
        Ok(DepthGuard)
    }
}

impl Drop for DepthGuard {
    fn drop(&mut self) {
        DEPTH.with(|d| d.set(d.get() - 1));
    }
}

/// One step of the trampoline: either a final, fully-reduced sequence of
/// values, or a form/environment pair still left to reduce in tail position.
enum Step {
    Done(Vec<Value>),
    Continue(Value, Rc<Environment>),
}

/// Evaluates `form` in `env` to its (possibly multiple) resulting values.
/// `macro_env` is the session's macro table, threaded through unchanged so a
/// runtime `define-macro` (one that survived expansion because it was nested
/// inside a body rather than at the top level) has somewhere to install.
pub fn eval(form: Value, env: Rc<Environment>, macro_env: Rc<Environment>) -> Result<Vec<Value>, ActinideError> {
    let mut form = form;
    let mut env = env;
    loop {
        match reduce(form, env, &macro_env)? {
            Step::Done(values) => return Ok(values),
            Step::Continue(next_form, next_env) => {
                form = next_form;
                env = next_env;
            }
        }
    }
}

/// Applies a procedure value to already-evaluated arguments. Used by builtins
/// that invoke a callable they were handed (`map`, `filter`, `reduce`,
/// `apply`) and by the expander to run macro transformers. Counts as one
/// stack frame, same as a native call: a user procedure's own tail call is
/// still trampolined internally, just not across this boundary.
pub fn apply(proc: &Procedure, args: Vec<Value>, macro_env: Rc<Environment>) -> Result<Vec<Value>, ActinideError> {
    let _guard = DepthGuard::enter()?;
    match proc {
        Procedure::Native(native) => (native.func)(&args),
        Procedure::User(user) => {
            let call_env = Environment::extend(user.env.clone());
            bind_formals(&user.formals, args, &call_env)?;
            eval_body(&user.body, call_env, macro_env)
        }
    }
}

/// Evaluates a procedure body (a sequence of forms) to completion: all but
/// the last discarded for effect, the last returned. Not trampolined across
/// this call, since the caller is already inside a native stack frame.
fn eval_body(body: &[Value], env: Rc<Environment>, macro_env: Rc<Environment>) -> Result<Vec<Value>, ActinideError> {
    match body.split_last() {
        None => Ok(vec![Value::Nil]),
        Some((last, rest)) => {
            for form in rest {
                eval(form.clone(), env.clone(), macro_env.clone())?;
            }
            eval(last.clone(), env, macro_env)
        }
    }
}

fn single(mut values: Vec<Value>) -> Value {
    if values.is_empty() {
        Value::Nil
    } else {
        values.swap_remove(0)
    }
}

fn reduce(form: Value, env: Rc<Environment>, macro_env: &Rc<Environment>) -> Result<Step, ActinideError> {
    match &form {
        Value::Symbol(sym) => match env.lookup(sym) {
            Some(value) => Ok(Step::Done(vec![value])),
            None => Err(ActinideError::UndefinedSymbol(sym.as_str().to_string())),
        },
        Value::Cons(cell) => {
            if let Value::Symbol(head) = &cell.head {
                match head.as_str() {
                    "quote" => eval_quote(&form),
                    "begin" => eval_begin(&form, env, macro_env),
                    "if" => eval_if(&form, env, macro_env),
                    "lambda" => eval_lambda(&form, env),
                    "define" => eval_define(&form, env, macro_env),
                    "define-macro" => eval_define_macro(&form, env, macro_env),
                    "values" => eval_values(&form, env, macro_env),
                    _ => apply_form(&form, env, macro_env),
                }
            } else {
                apply_form(&form, env, macro_env)
            }
        }
        atom => Ok(Step::Done(vec![atom.clone()])),
    }
}

fn args_of(form: &Value) -> Result<Vec<Value>, ActinideError> {
    match form {
        Value::Cons(cell) => cell
            .tail
            .to_vec_list()
            .ok_or_else(|| ActinideError::read("improper list in special form")),
        _ => unreachable!("args_of called on a non-cons form"),
    }
}

fn eval_quote(form: &Value) -> Result<Step, ActinideError> {
    let args = args_of(form)?;
    if args.len() != 1 {
        return Err(ActinideError::arity_error("quote", "1", args.len()));
    }
    Ok(Step::Done(vec![args[0].clone()]))
}

fn eval_begin(form: &Value, env: Rc<Environment>, macro_env: &Rc<Environment>) -> Result<Step, ActinideError> {
    let args = args_of(form)?;
    match args.split_last() {
        None => Ok(Step::Done(vec![Value::Nil])),
        Some((last, rest)) => {
            for sub in rest {
                let _guard = DepthGuard::enter()?;
                eval(sub.clone(), env.clone(), macro_env.clone())?;
            }
            Ok(Step::Continue(last.clone(), env))
        }
    }
}

fn eval_if(form: &Value, env: Rc<Environment>, macro_env: &Rc<Environment>) -> Result<Step, ActinideError> {
    let args = args_of(form)?;
    if args.len() != 2 && args.len() != 3 {
        return Err(ActinideError::arity_error("if", "2-3", args.len()));
    }
    let condition = {
        let _guard = DepthGuard::enter()?;
        single(eval(args[0].clone(), env.clone(), macro_env.clone())?)
    };
    if condition.is_truthy() {
        Ok(Step::Continue(args[1].clone(), env))
    } else if args.len() == 3 {
        Ok(Step::Continue(args[2].clone(), env))
    } else {
        Ok(Step::Done(vec![Value::Nil]))
    }
}

fn eval_lambda(form: &Value, env: Rc<Environment>) -> Result<Step, ActinideError> {
    let args = args_of(form)?;
    if args.is_empty() {
        return Err(ActinideError::arity_error("lambda", "at least 1", 0));
    }
    let formals = parse_formals(&args[0])?;
    let body = args[1..].to_vec();
    let proc = Procedure::User(Rc::new(UserProcedure { formals, body, env }));
    Ok(Step::Done(vec![Value::Procedure(proc)]))
}

fn eval_define(form: &Value, env: Rc<Environment>, macro_env: &Rc<Environment>) -> Result<Step, ActinideError> {
    let args = args_of(form)?;
    if args.len() != 2 {
        return Err(ActinideError::arity_error("define", "2", args.len()));
    }
    let name = match &args[0] {
        Value::Symbol(s) => s.clone(),
        other => return Err(ActinideError::type_error("define", "symbol", other, 0)),
    };
    let value = {
        let _guard = DepthGuard::enter()?;
        single(eval(args[1].clone(), env.clone(), macro_env.clone())?)
    };
    env.define(name, value);
    Ok(Step::Done(vec![Value::Nil]))
}

/// Only reached for a `define-macro` that survived expansion by being nested
/// inside a body rather than written at the top level; the expander installs
/// top-level occurrences itself and never re-emits them as evaluable forms.
/// Its transformer is evaluated in the current lexical environment and
/// installed into the session's one macro table, not the lexical one.
fn eval_define_macro(form: &Value, env: Rc<Environment>, macro_env: &Rc<Environment>) -> Result<Step, ActinideError> {
    let args = args_of(form)?;
    if args.len() != 2 {
        return Err(ActinideError::arity_error("define-macro", "2", args.len()));
    }
    let name = match &args[0] {
        Value::Symbol(s) => s.clone(),
        other => return Err(ActinideError::type_error("define-macro", "symbol", other, 0)),
    };
    let value = {
        let _guard = DepthGuard::enter()?;
        single(eval(args[1].clone(), env, macro_env.clone())?)
    };
    macro_env.define(name, value);
    Ok(Step::Done(vec![Value::Nil]))
}

fn eval_values(form: &Value, env: Rc<Environment>, macro_env: &Rc<Environment>) -> Result<Step, ActinideError> {
    let args = args_of(form)?;
    let mut results = Vec::new();
    for sub in &args {
        let _guard = DepthGuard::enter()?;
        results.append(&mut eval(sub.clone(), env.clone(), macro_env.clone())?);
    }
    Ok(Step::Done(results))
}

fn apply_form(form: &Value, env: Rc<Environment>, macro_env: &Rc<Environment>) -> Result<Step, ActinideError> {
    let items = form
        .to_vec_list()
        .ok_or_else(|| ActinideError::read("improper list is not a valid form"))?;
    let (callee_form, arg_forms) = items
        .split_first()
        .expect("a cons always has at least one element");

    let callee = {
        let _guard = DepthGuard::enter()?;
        single(eval(callee_form.clone(), env.clone(), macro_env.clone())?)
    };

    let mut arg_values = Vec::new();
    for sub in arg_forms {
        let _guard = DepthGuard::enter()?;
        arg_values.append(&mut eval(sub.clone(), env.clone(), macro_env.clone())?);
    }

    match callee {
        Value::Procedure(Procedure::User(proc)) => {
            let call_env = Environment::extend(proc.env.clone());
            bind_formals(&proc.formals, arg_values, &call_env)?;
            match proc.body.split_last() {
                None => Ok(Step::Done(vec![Value::Nil])),
                Some((last, rest)) => {
                    for sub in rest {
                        let _guard = DepthGuard::enter()?;
                        eval(sub.clone(), call_env.clone(), macro_env.clone())?;
                    }
                    Ok(Step::Continue(last.clone(), call_env))
                }
            }
        }
        Value::Procedure(Procedure::Native(native)) => {
            let _guard = DepthGuard::enter()?;
            Ok(Step::Done(call_native(&native, &arg_values)?))
        }
        other => Err(ActinideError::NotCallable(other.type_name())),
    }
}

fn call_native(native: &NativeProcedure, args: &[Value]) -> Result<Vec<Value>, ActinideError> {
    (native.func)(args)
}

fn bind_formals(formals: &Formals, args: Vec<Value>, env: &Rc<Environment>) -> Result<(), ActinideError> {
    match formals {
        Formals::Fixed(params) => {
            if params.len() != args.len() {
                return Err(ActinideError::arity_error(
                    "procedure",
                    params.len().to_string(),
                    args.len(),
                ));
            }
            for (param, value) in params.iter().zip(args) {
                env.define(param.clone(), value);
            }
        }
        Formals::Rest(params, rest) => {
            if args.len() < params.len() {
                return Err(ActinideError::arity_error(
                    "procedure",
                    format!("at least {}", params.len()),
                    args.len(),
                ));
            }
            let mut values = args.into_iter();
            for param in params {
                env.define(param.clone(), values.next().expect("length checked above"));
            }
            env.define(rest.clone(), Value::list(values.collect::<Vec<_>>()));
        }
        Formals::Bare(name) => {
            env.define(name.clone(), Value::list(args));
        }
    }
    Ok(())
}

/// Parses a raw, unevaluated formals form into the shape it describes: a
/// proper list (`Fixed`), a dotted list (`Rest`), or a bare symbol (`Bare`).
pub fn parse_formals(raw: &Value) -> Result<Formals, ActinideError> {
    match raw {
        Value::Symbol(s) => Ok(Formals::Bare(s.clone())),
        Value::Nil => Ok(Formals::Fixed(Vec::new())),
        Value::Cons(_) => {
            let mut params = Vec::new();
            let mut current = raw.clone();
            loop {
                match current {
                    Value::Cons(cell) => {
                        match &cell.head {
                            Value::Symbol(s) => params.push(s.clone()),
                            other => {
                                return Err(ActinideError::type_error("lambda", "symbol", other, params.len()))
                            }
                        }
                        current = cell.tail.clone();
                    }
                    Value::Nil => return Ok(Formals::Fixed(params)),
                    Value::Symbol(rest) => return Ok(Formals::Rest(params, rest)),
                    other => return Err(ActinideError::type_error("lambda", "formals", &other, 0)),
                }
            }
        }
        other => Err(ActinideError::type_error("lambda", "formals", other, 0)),
    }
}
