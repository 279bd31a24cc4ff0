// ABOUTME: Reader module, a pull parser over a Port producing one Actinide
// ABOUTME: form per call, built on nom combinators over the full value model.

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{char, multispace1, not_line_ending},
    multi::many0,
    IResult, Parser,
};

use crate::error::ActinideError;
use crate::number::{Decimal, Integer};
use crate::symbol::SymbolTable;
use crate::value::{PortState, Value};
use std::cell::RefCell;
use std::rc::Rc;

/// Marks the dotted-pair `.` token, which is self-delimiting but is not
/// itself a value; it only has meaning inside `parse_list`.
struct DotToken;

/// Reads one form at a time from a `Port`. Stateless itself; all mutable
/// state (the cursor) lives in the `PortState` passed to `read_form`.
pub struct Reader<'a> {
    symbols: &'a SymbolTable,
}

impl<'a> Reader<'a> {
    pub fn new(symbols: &'a SymbolTable) -> Self {
        Reader { symbols }
    }

    /// Reads exactly one top-level form, advancing the port past it. Returns
    /// `Value::EndOfFile` when the port holds nothing but whitespace and
    /// comments.
    pub fn read_form(&self, port: &Rc<RefCell<PortState>>) -> Result<Value, ActinideError> {
        let text = port.borrow().peek(usize::MAX);
        let after_ws = skip_ws_and_comments(&text)
            .map(|(rest, _)| rest)
            .unwrap_or(text.as_str());

        if after_ws.is_empty() {
            port.borrow_mut().read(text.chars().count());
            return Ok(Value::EndOfFile);
        }

        match self.parse_expr(after_ws) {
            Ok((rest, value)) => {
                let consumed_bytes = text.len() - rest.len();
                let consumed_chars = text[..consumed_bytes].chars().count();
                port.borrow_mut().read(consumed_chars);
                Ok(value)
            }
            Err(e) => Err(ActinideError::read(format!("{:?}", e))),
        }
    }

    /// Reads a single form directly out of a string, requiring that exactly
    /// one top-level form is present (trailing non-whitespace is an error).
    /// This is the behavior `Session::read` documents for text input.
    pub fn read_one(&self, text: &str) -> Result<Value, ActinideError> {
        let after_ws = skip_ws_and_comments(text)
            .map(|(rest, _)| rest)
            .unwrap_or(text);

        if after_ws.is_empty() {
            return Ok(Value::EndOfFile);
        }

        let (rest, value) = self
            .parse_expr(after_ws)
            .map_err(|e| ActinideError::read(format!("{:?}", e)))?;
        let trailing = skip_ws_and_comments(rest).map(|(r, _)| r).unwrap_or(rest);
        if !trailing.is_empty() {
            return Err(ActinideError::read(format!(
                "unexpected trailing input: '{}'",
                trailing
            )));
        }
        Ok(value)
    }

    fn parse_expr<'i>(&self, input: &'i str) -> IResult<&'i str, Value> {
        let (input, _) = skip_ws_and_comments(input)?;
        alt((
            |i| self.parse_quote_like(i, "'", "quote"),
            |i| self.parse_quote_like(i, "`", "quasiquote"),
            |i| self.parse_unquote(i),
            |i| self.parse_list(i),
            parse_bool,
            parse_decimal,
            parse_integer,
            |i| self.parse_string(i),
            |i| self.parse_symbol(i),
        ))
        .parse(input)
    }

    fn parse_quote_like<'i>(
        &self,
        input: &'i str,
        prefix: &str,
        head: &str,
    ) -> IResult<&'i str, Value> {
        let (input, _) = tag(prefix)(input)?;
        let (input, expr) = self.parse_expr(input)?;
        Ok((
            input,
            Value::list(vec![Value::Symbol(self.symbols.intern(head)), expr]),
        ))
    }

    fn parse_unquote<'i>(&self, input: &'i str) -> IResult<&'i str, Value> {
        let (input, _) = char(',')(input)?;
        if let Ok((input, _)) = char::<_, nom::error::Error<_>>('@')(input) {
            let (input, expr) = self.parse_expr(input)?;
            return Ok((
                input,
                Value::list(vec![Value::Symbol(self.symbols.intern("unquote-splicing")), expr]),
            ));
        }
        let (input, expr) = self.parse_expr(input)?;
        Ok((
            input,
            Value::list(vec![Value::Symbol(self.symbols.intern("unquote")), expr]),
        ))
    }

    fn parse_list<'i>(&self, input: &'i str) -> IResult<&'i str, Value> {
        let (input, _) = char('(')(input)?;
        let (mut remaining, _) = skip_ws_and_comments(input)?;

        let mut items = Vec::new();
        let mut tail = Value::Nil;

        loop {
            if let Ok((rest, _)) = char::<_, nom::error::Error<_>>(')')(remaining) {
                return Ok((rest, build_list(items, tail)));
            }

            if let Ok((rest, _)) = self.parse_dot(remaining) {
                let (rest, _) = skip_ws_and_comments(rest)?;
                let (rest, dotted_tail) = self.parse_expr(rest)?;
                let (rest, _) = skip_ws_and_comments(rest)?;
                let (rest, _) = char(')')(rest)?;
                tail = dotted_tail;
                return Ok((rest, build_list(items, tail)));
            }

            let (rest, expr) = self.parse_expr(remaining)?;
            items.push(expr);
            let (rest, _) = skip_ws_and_comments(rest)?;
            remaining = rest;
        }
    }

    /// Recognizes a standalone `.` token: the dot followed by whitespace, a
    /// paren, or end of input (so it isn't mistaken for the start of a
    /// number or symbol that happens to contain a dot).
    fn parse_dot<'i>(&self, input: &'i str) -> IResult<&'i str, DotToken> {
        let (input, _) = char('.')(input)?;
        match input.chars().next() {
            None => Ok((input, DotToken)),
            Some(c) if c.is_whitespace() || c == '(' || c == ')' => Ok((input, DotToken)),
            _ => Err(nom::Err::Error(nom::error::Error::new(
                input,
                nom::error::ErrorKind::Char,
            ))),
        }
    }

    fn parse_string<'i>(&self, input: &'i str) -> IResult<&'i str, Value> {
        let (input, _) = char('"')(input)?;
        let mut result = String::new();
        let mut chars = input.char_indices();

        loop {
            match chars.next() {
                None => {
                    return Err(nom::Err::Error(nom::error::Error::new(
                        input,
                        nom::error::ErrorKind::Eof,
                    )))
                }
                Some((i, '"')) => {
                    return Ok((&input[i + 1..], Value::String(Rc::from(result.as_str()))));
                }
                Some((_, '\\')) => match chars.next() {
                    Some((_, '"')) => result.push('"'),
                    Some((_, '\\')) => result.push('\\'),
                    // Only \" and \\ are recognized escapes; anything else,
                    // including \n, is a read error rather than a literal.
                    _ => {
                        return Err(nom::Err::Error(nom::error::Error::new(
                            input,
                            nom::error::ErrorKind::Escaped,
                        )))
                    }
                },
                Some((_, c)) => result.push(c),
            }
        }
    }

    fn parse_symbol<'i>(&self, input: &'i str) -> IResult<&'i str, Value> {
        let (rest, token) = take_while1(is_symbol_char)(input)?;
        if token == "." {
            // A bare dot is only meaningful inside a list, handled by
            // parse_list's own lookahead; anywhere else it's a read error.
            return Err(nom::Err::Error(nom::error::Error::new(
                input,
                nom::error::ErrorKind::Char,
            )));
        }
        Ok((rest, Value::Symbol(self.symbols.intern(token))))
    }
}

fn build_list(items: Vec<Value>, tail: Value) -> Value {
    let mut result = tail;
    for item in items.into_iter().rev() {
        result = Value::cons(item, result);
    }
    result
}

fn is_delimiter(c: char) -> bool {
    c.is_whitespace() || matches!(c, '(' | ')' | '\'' | '`' | ',' | '"' | ';')
}

fn is_symbol_char(c: char) -> bool {
    !is_delimiter(c)
}

fn is_integer_token(token: &str) -> bool {
    let body = token.strip_prefix('-').unwrap_or(token);
    !body.is_empty()
        && body.chars().all(|c| c.is_ascii_digit() || c == '_')
        && body.chars().any(|c| c.is_ascii_digit())
}

fn is_decimal_token(token: &str) -> bool {
    let body = token.strip_prefix('-').unwrap_or(token);
    let (mantissa, _exponent) = match body.split_once(['e', 'E']) {
        Some((m, e)) => {
            if e.is_empty() || !e.trim_start_matches(['+', '-']).chars().all(|c| c.is_ascii_digit())
                || e.trim_start_matches(['+', '-']).is_empty()
            {
                return false;
            }
            (m, e)
        }
        None => (body, ""),
    };

    let Some((int_part, frac_part)) = mantissa.split_once('.') else {
        return false;
    };
    let digits_only = |s: &str| s.chars().all(|c| c.is_ascii_digit() || c == '_');
    digits_only(int_part)
        && digits_only(frac_part)
        && (!int_part.is_empty() || !frac_part.is_empty())
}

fn parse_integer(input: &str) -> IResult<&str, Value> {
    let (rest, token) = take_while1(is_symbol_char)(input)?;
    if !is_integer_token(token) {
        return Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Digit,
        )));
    }
    let int = Integer::parse(token).ok_or_else(|| {
        nom::Err::Failure(nom::error::Error::new(input, nom::error::ErrorKind::Digit))
    })?;
    Ok((rest, Value::Integer(int)))
}

fn parse_decimal(input: &str) -> IResult<&str, Value> {
    let (rest, token) = take_while1(is_symbol_char)(input)?;
    if !is_decimal_token(token) {
        return Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Float,
        )));
    }
    let dec = Decimal::parse(token).ok_or_else(|| {
        nom::Err::Failure(nom::error::Error::new(input, nom::error::ErrorKind::Float))
    })?;
    Ok((rest, Value::Decimal(dec)))
}

fn parse_bool(input: &str) -> IResult<&str, Value> {
    alt((
        nom::combinator::value(Value::Boolean(true), tag("#t")),
        nom::combinator::value(Value::Boolean(false), tag("#f")),
    ))
    .parse(input)
}

fn parse_line_comment(input: &str) -> IResult<&str, ()> {
    let (input, _) = char(';')(input)?;
    let (input, _) = not_line_ending(input)?;
    Ok((input, ()))
}

fn skip_ws_and_comments(input: &str) -> IResult<&str, ()> {
    many0(alt((
        nom::combinator::value((), multispace1),
        parse_line_comment,
    )))
    .map(|_| ())
    .parse(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::PortState;

    fn read(symbols: &SymbolTable, text: &str) -> Value {
        Reader::new(symbols).read_one(text).expect("read failed")
    }

    #[test]
    fn reads_integer() {
        let symbols = SymbolTable::new();
        assert_eq!(read(&symbols, "42").to_string(), "42");
        assert_eq!(read(&symbols, "-42").to_string(), "-42");
        assert_eq!(read(&symbols, "1_000").to_string(), "1000");
    }

    #[test]
    fn reads_decimal() {
        let symbols = SymbolTable::new();
        assert!(matches!(read(&symbols, "3.14"), Value::Decimal(_)));
        assert!(matches!(read(&symbols, "1.0e10"), Value::Decimal(_)));
        assert!(matches!(read(&symbols, ".5"), Value::Decimal(_)));
        assert!(matches!(read(&symbols, "5."), Value::Decimal(_)));
        // no dot at all: not a decimal under the reader's grammar, so it
        // falls through to a symbol rather than being treated as numeric.
        assert!(matches!(read(&symbols, "1e10"), Value::Symbol(_)));
    }

    #[test]
    fn reads_booleans() {
        let symbols = SymbolTable::new();
        assert!(matches!(read(&symbols, "#t"), Value::Boolean(true)));
        assert!(matches!(read(&symbols, "#f"), Value::Boolean(false)));
    }

    #[test]
    fn reads_symbol() {
        let symbols = SymbolTable::new();
        match read(&symbols, "list->vector?") {
            Value::Symbol(s) => assert_eq!(s.as_str(), "list->vector?"),
            _ => panic!("expected symbol"),
        }
    }

    #[test]
    fn reads_string_with_escapes() {
        let symbols = SymbolTable::new();
        match read(&symbols, r#""say \"hi\" \\now""#) {
            Value::String(s) => assert_eq!(&*s, "say \"hi\" \\now"),
            _ => panic!("expected string"),
        }
    }

    #[test]
    fn string_passes_through_unknown_escapes_are_read_errors() {
        let symbols = SymbolTable::new();
        assert!(Reader::new(&symbols).read_one(r#""bad \n escape""#).is_err());
    }

    #[test]
    fn reads_empty_list_as_nil() {
        let symbols = SymbolTable::new();
        assert!(matches!(read(&symbols, "()"), Value::Nil));
    }

    #[test]
    fn reads_proper_list() {
        let symbols = SymbolTable::new();
        let v = read(&symbols, "(1 2 3)");
        assert_eq!(v.to_string(), "(1 2 3)");
        assert!(v.is_proper_list());
    }

    #[test]
    fn reads_dotted_pair() {
        let symbols = SymbolTable::new();
        let v = read(&symbols, "(1 . 2)");
        assert_eq!(v.to_string(), "(1 . 2)");
        assert!(!v.is_proper_list());
    }

    #[test]
    fn reads_quote_shorthand() {
        let symbols = SymbolTable::new();
        assert_eq!(read(&symbols, "'x").to_string(), "(quote x)");
        assert_eq!(read(&symbols, "`x").to_string(), "(quasiquote x)");
        assert_eq!(read(&symbols, ",x").to_string(), "(unquote x)");
        assert_eq!(read(&symbols, ",@x").to_string(), "(unquote-splicing x)");
    }

    #[test]
    fn reads_one_top_level_form_and_errors_on_trailing_input() {
        let symbols = SymbolTable::new();
        assert!(Reader::new(&symbols).read_one("1 2").is_err());
    }

    #[test]
    fn unclosed_list_is_a_read_error() {
        let symbols = SymbolTable::new();
        assert!(Reader::new(&symbols).read_one("(1 2").is_err());
    }

    #[test]
    fn eof_at_top_level_yields_end_of_file_value() {
        let symbols = SymbolTable::new();
        assert!(matches!(read(&symbols, "  ; just a comment\n"), Value::EndOfFile));
    }

    #[test]
    fn read_form_advances_port_across_calls() {
        let symbols = SymbolTable::new();
        let reader = Reader::new(&symbols);
        let port = Rc::new(RefCell::new(PortState::from_str("1 2 3")));

        let a = reader.read_form(&port).unwrap();
        let b = reader.read_form(&port).unwrap();
        let c = reader.read_form(&port).unwrap();
        let eof = reader.read_form(&port).unwrap();

        assert_eq!(a.to_string(), "1");
        assert_eq!(b.to_string(), "2");
        assert_eq!(c.to_string(), "3");
        assert!(matches!(eof, Value::EndOfFile));
    }
}
