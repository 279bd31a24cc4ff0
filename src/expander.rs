// ABOUTME: The macro/quasiquote expander. Runs once over a freshly-read form,
// ABOUTME: before the evaluator ever sees it, rewriting sugar and macro calls
// ABOUTME: to a fixed point.

use crate::env::Environment;
use crate::error::ActinideError;
use crate::symbol::SymbolTable;
use crate::value::Value;
use std::rc::Rc;

/// Macro calls can expand into further macro calls; this bounds how many
/// rounds of self-rewriting (macro application, quasiquote lowering, define
/// sugar) a single top-level form can go through before expansion gives up
/// rather than looping forever on a macro that never reaches a fixed point.
const MAX_EXPANSION_ROUNDS: usize = 512;

/// Expands one top-level form. `value_env` is the environment a top-level
/// `define-macro`'s transformer expression is evaluated in; `macro_env` is
/// the session's macro table, both read from (to apply macros) and written to
/// (to install new ones).
pub struct Expander<'a> {
    symbols: &'a SymbolTable,
    value_env: Rc<Environment>,
    macro_env: Rc<Environment>,
}

impl<'a> Expander<'a> {
    pub fn new(symbols: &'a SymbolTable, value_env: Rc<Environment>, macro_env: Rc<Environment>) -> Self {
        Expander {
            symbols,
            value_env,
            macro_env,
        }
    }

    pub fn expand_top_level(&self, form: Value) -> Result<Value, ActinideError> {
        self.expand(form, true, 0)
    }

    fn expand(&self, form: Value, is_top: bool, round: usize) -> Result<Value, ActinideError> {
        if round > MAX_EXPANSION_ROUNDS {
            return Err(ActinideError::expansion(
                "macro expansion did not reach a fixed point",
            ));
        }
        let cell = match &form {
            Value::Cons(cell) => cell.clone(),
            _ => return Ok(form),
        };
        if let Value::Symbol(head) = &cell.head {
            match head.as_str() {
                "quote" => return Ok(form),
                "quasiquote" => return self.expand_quasiquote(&form, is_top, round),
                "unquote" => {
                    return Err(ActinideError::expansion("unquote outside quasiquote"))
                }
                "unquote-splicing" => {
                    return Err(ActinideError::expansion(
                        "unquote-splicing outside quasiquote",
                    ))
                }
                "lambda" => return self.expand_lambda(&form),
                "define" => return self.expand_define(&form, is_top, round),
                "define-macro" => return self.expand_define_macro(&form, is_top),
                _ => {
                    if let Some(transformer) = self.macro_env.lookup(head) {
                        return self.expand_macro_call(&form, transformer, is_top, round);
                    }
                }
            }
        }
        self.expand_list(&form)
    }

    fn expand_quasiquote(&self, form: &Value, is_top: bool, round: usize) -> Result<Value, ActinideError> {
        let args = args_of(form, "quasiquote")?;
        if args.len() != 1 {
            return Err(ActinideError::expansion("quasiquote takes exactly one form"));
        }
        let lowered = lower_quasiquote(&args[0], 1, self.symbols)?;
        self.expand(lowered, is_top, round + 1)
    }

    fn expand_lambda(&self, form: &Value) -> Result<Value, ActinideError> {
        let items = form
            .to_vec_list()
            .ok_or_else(|| ActinideError::expansion("malformed lambda"))?;
        if items.len() < 2 {
            return Err(ActinideError::expansion(
                "lambda requires a formals list and at least one body form",
            ));
        }
        let mut out = vec![items[0].clone(), items[1].clone()];
        for body_form in &items[2..] {
            out.push(self.expand(body_form.clone(), false, 0)?);
        }
        Ok(Value::list(out))
    }

    /// Rewrites `(define (name . formals) body...)` into
    /// `(define name (lambda formals (begin body...)))` before expanding it
    /// as an ordinary define; leaves `(define name val)` alone apart from
    /// expanding `val`.
    fn expand_define(&self, form: &Value, is_top: bool, round: usize) -> Result<Value, ActinideError> {
        let items = form
            .to_vec_list()
            .ok_or_else(|| ActinideError::expansion("malformed define"))?;
        if items.len() < 2 {
            return Err(ActinideError::expansion(
                "define requires a name and a value",
            ));
        }
        if let Value::Cons(signature) = &items[1] {
            let name = signature.head.clone();
            let formals = signature.tail.clone();
            let body = &items[2..];
            if body.is_empty() {
                return Err(ActinideError::expansion(
                    "define with a procedure signature requires at least one body form",
                ));
            }
            let body_form = if body.len() == 1 {
                body[0].clone()
            } else {
                let mut begin_form = vec![Value::Symbol(self.symbols.intern("begin"))];
                begin_form.extend(body.iter().cloned());
                Value::list(begin_form)
            };
            let lambda = Value::list(vec![
                Value::Symbol(self.symbols.intern("lambda")),
                formals,
                body_form,
            ]);
            let rewritten = Value::list(vec![items[0].clone(), name, lambda]);
            return self.expand(rewritten, is_top, round + 1);
        }
        if items.len() != 3 {
            return Err(ActinideError::expansion(
                "define takes a name and exactly one value form",
            ));
        }
        let value = self.expand(items[2].clone(), false, 0)?;
        Ok(Value::list(vec![items[0].clone(), items[1].clone(), value]))
    }

    /// At the top level, evaluates the transformer now and installs it into
    /// the macro table, then vanishes (its result is unspecified, `nil`).
    /// Nested inside a body, a `define-macro` has no expansion-time effect at
    /// all: it is left in place, with only its transformer subform expanded,
    /// to become a runtime call the evaluator installs into the same macro
    /// table when it actually runs (which this program's own expansion
    /// cannot see or depend on).
    fn expand_define_macro(&self, form: &Value, is_top: bool) -> Result<Value, ActinideError> {
        let items = form
            .to_vec_list()
            .ok_or_else(|| ActinideError::expansion("malformed define-macro"))?;
        if items.len() < 2 {
            return Err(ActinideError::expansion(
                "define-macro requires a name and a transformer",
            ));
        }
        // `(define-macro (name . formals) body...)` is sugar for
        // `(define-macro name (lambda formals (begin body...)))`, exactly as
        // `define` rewrites a procedure signature.
        if let Value::Cons(signature) = &items[1] {
            let name = signature.head.clone();
            let formals = signature.tail.clone();
            let body = &items[2..];
            if body.is_empty() {
                return Err(ActinideError::expansion(
                    "define-macro with a transformer signature requires at least one body form",
                ));
            }
            let body_form = if body.len() == 1 {
                body[0].clone()
            } else {
                let mut begin_form = vec![Value::Symbol(self.symbols.intern("begin"))];
                begin_form.extend(body.iter().cloned());
                Value::list(begin_form)
            };
            let lambda = Value::list(vec![
                Value::Symbol(self.symbols.intern("lambda")),
                formals,
                body_form,
            ]);
            let rewritten = Value::list(vec![items[0].clone(), name, lambda]);
            return self.expand_define_macro(&rewritten, is_top);
        }
        if items.len() != 3 {
            return Err(ActinideError::expansion(
                "define-macro takes a name and exactly one transformer form",
            ));
        }
        let name = match &items[1] {
            Value::Symbol(s) => s.clone(),
            other => {
                return Err(ActinideError::expansion(format!(
                    "define-macro name must be a symbol, got {}",
                    other.type_name()
                )))
            }
        };
        let transformer_form = self.expand(items[2].clone(), false, 0)?;
        if !is_top {
            return Ok(Value::list(vec![
                items[0].clone(),
                items[1].clone(),
                transformer_form,
            ]));
        }
        let values = crate::eval::eval(transformer_form, self.value_env.clone(), self.macro_env.clone())?;
        let transformer = values.into_iter().next().unwrap_or(Value::Nil);
        self.macro_env.define(name, transformer);
        Ok(Value::Nil)
    }

    fn expand_macro_call(
        &self,
        form: &Value,
        transformer: Value,
        is_top: bool,
        round: usize,
    ) -> Result<Value, ActinideError> {
        let raw_args = match form {
            Value::Cons(cell) => cell
                .tail
                .to_vec_list()
                .ok_or_else(|| ActinideError::expansion("malformed macro call"))?,
            _ => unreachable!("expand_macro_call given a non-cons form"),
        };
        let proc = match transformer {
            Value::Procedure(p) => p,
            other => {
                return Err(ActinideError::expansion(format!(
                    "macro is bound to a non-procedure value ({})",
                    other.type_name()
                )))
            }
        };
        let results = crate::eval::apply(&proc, raw_args, self.macro_env.clone())?;
        let expanded_once = results.into_iter().next().unwrap_or(Value::Nil);
        self.expand(expanded_once, is_top, round + 1)
    }

    /// Not a special form and not a macro call: an ordinary application (or
    /// other data list). Each element is expanded independently.
    fn expand_list(&self, form: &Value) -> Result<Value, ActinideError> {
        match form {
            Value::Nil => Ok(Value::Nil),
            Value::Cons(cell) => {
                let head = self.expand(cell.head.clone(), false, 0)?;
                let tail = self.expand_list(&cell.tail)?;
                Ok(Value::cons(head, tail))
            }
            other => self.expand(other.clone(), false, 0),
        }
    }
}

fn args_of(form: &Value, name: &str) -> Result<Vec<Value>, ActinideError> {
    match form {
        Value::Cons(cell) => cell
            .tail
            .to_vec_list()
            .ok_or_else(|| ActinideError::expansion(format!("malformed {}", name))),
        _ => unreachable!("args_of given a non-cons form"),
    }
}

/// Lowers a quasiquoted form into `cons`/`append`/`list`/`quote` construction
/// calls. `depth` starts at 1 for the outermost quasiquote and increases with
/// nested quasiquotes, decreasing with nested unquotes; an unquote only
/// splices its form in directly once depth returns to 1.
fn lower_quasiquote(form: &Value, depth: u32, symbols: &SymbolTable) -> Result<Value, ActinideError> {
    match form {
        Value::Cons(cell) => {
            if let Value::Symbol(s) = &cell.head {
                match s.as_str() {
                    "unquote" => {
                        let args = args_of(form, "unquote")?;
                        if args.len() != 1 {
                            return Err(ActinideError::expansion("unquote takes exactly one form"));
                        }
                        return if depth == 1 {
                            Ok(args[0].clone())
                        } else {
                            let inner = lower_quasiquote(&args[0], depth - 1, symbols)?;
                            Ok(requote_call("unquote", inner, symbols))
                        };
                    }
                    "quasiquote" => {
                        let args = args_of(form, "quasiquote")?;
                        if args.len() != 1 {
                            return Err(ActinideError::expansion("quasiquote takes exactly one form"));
                        }
                        let inner = lower_quasiquote(&args[0], depth + 1, symbols)?;
                        return Ok(requote_call("quasiquote", inner, symbols));
                    }
                    // Reached only when an `unquote-splicing` form is not the
                    // head of a surrounding cons (the valid case is caught by
                    // the head_cell check below, before recursing here).
                    "unquote-splicing" => {
                        return Err(ActinideError::expansion(
                            "unquote-splicing outside a list context",
                        ));
                    }
                    _ => {}
                }
            }
            // `(unquote-splicing x) . rest` in head position splices `x`
            // into the surrounding list via `append`.
            if let Value::Cons(head_cell) = &cell.head {
                if let Value::Symbol(s) = &head_cell.head {
                    if s.as_str() == "unquote-splicing" && depth == 1 {
                        let args = args_of(&cell.head, "unquote-splicing")?;
                        if args.len() != 1 {
                            return Err(ActinideError::expansion(
                                "unquote-splicing takes exactly one form",
                            ));
                        }
                        let rest = lower_quasiquote(&cell.tail, depth, symbols)?;
                        return Ok(Value::list(vec![
                            Value::Symbol(symbols.intern("append")),
                            args[0].clone(),
                            rest,
                        ]));
                    }
                }
            }
            let head = lower_quasiquote(&cell.head, depth, symbols)?;
            let tail = lower_quasiquote(&cell.tail, depth, symbols)?;
            Ok(Value::list(vec![Value::Symbol(symbols.intern("cons")), head, tail]))
        }
        atom => Ok(quote_value(atom.clone(), symbols)),
    }
}

fn quote_value(value: Value, symbols: &SymbolTable) -> Value {
    Value::list(vec![Value::Symbol(symbols.intern("quote")), value])
}

/// Builds the `(list 'tag inner)` form a nested quasiquote/unquote lowers to
/// once it reappears as literal data rather than being spliced in directly.
fn requote_call(tag: &str, inner: Value, symbols: &SymbolTable) -> Value {
    Value::list(vec![
        Value::Symbol(symbols.intern("list")),
        quote_value(Value::Symbol(symbols.intern(tag)), symbols),
        inner,
    ])
}
