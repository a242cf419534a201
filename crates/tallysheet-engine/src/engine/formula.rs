//! Expression tree builder.
//!
//! [`build`] turns formula text (without the leading `=`) into a [`Term`].
//! It tries, in order: a literal, a single cell reference, an infix
//! expression (rewritten to call form through the shunting yard), and
//! finally a function call `Name(arg, ...)`. Range arguments such as `A1:B3`
//! expand in place into one reference per cell, row by row.

use rust_decimal::Decimal;
use std::fmt;

use super::cell::parse_decimal;
use super::format::format_number;
use super::location::{Location, MAX_RANGE_CELLS, Range};
use super::shunting_yard::{postfix_to_call, to_postfix};
use super::tokenize::{has_top_level_operator, tokenize};
use crate::builtins::{self, Builtin};
use crate::error::{FormulaError, Result};

/// A node of a built formula.
#[derive(Clone, Debug, PartialEq)]
pub enum Term {
    Literal(Decimal),
    Ref(Location),
    Call(Call),
}

/// A resolved function applied to its argument terms.
#[derive(Clone, Debug)]
pub struct Call {
    pub builtin: &'static Builtin,
    pub args: Vec<Term>,
}

impl Call {
    pub fn name(&self) -> &'static str {
        self.builtin.name
    }
}

impl PartialEq for Call {
    fn eq(&self, other: &Self) -> bool {
        self.builtin.name == other.builtin.name && self.args == other.args
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Literal(n) => write!(f, "{}", format_number(*n)),
            Term::Ref(loc) => write!(f, "{}", loc),
            Term::Call(call) => {
                write!(f, "{}(", call.name())?;
                for (i, arg) in call.args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
        }
    }
}

fn parse_literal(text: &str) -> Option<Decimal> {
    if text.eq_ignore_ascii_case("true") {
        return Some(Decimal::ONE);
    }
    if text.eq_ignore_ascii_case("false") {
        return Some(Decimal::ZERO);
    }
    parse_decimal(text)
}

/// Build a tree from formula text.
pub fn build(text: &str) -> Result<Term> {
    let text = text.trim();
    if text.is_empty() {
        return Err(FormulaError::syntax("Empty expression"));
    }

    if let Some(n) = parse_literal(text) {
        return Ok(Term::Literal(n));
    }

    if let Some(loc) = Location::parse(text) {
        return Ok(Term::Ref(loc));
    }

    if has_top_level_operator(text) {
        let tokens = tokenize(text)?;
        let call = postfix_to_call(&to_postfix(&tokens))?;
        tracing::trace!(infix = %text, call = %call, "rewrote infix expression");
        return build(&call);
    }

    build_call(text)
}

/// Byte index of the `)` that closes the `(` at `open`.
fn matching_paren(text: &str, open: usize) -> Result<usize> {
    let mut depth = 0usize;
    for (i, c) in text[open..].char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(open + i);
                }
            }
            _ => {}
        }
    }
    Err(FormulaError::syntax(format!("Unmatched parentheses in '{}'", text)))
}

fn build_call(text: &str) -> Result<Term> {
    let open = text
        .find('(')
        .ok_or_else(|| FormulaError::syntax(format!("Malformed formula near '{}'", text)))?;
    let close = matching_paren(text, open)?;
    if close != text.len() - 1 {
        return Err(FormulaError::syntax(format!(
            "Unexpected text after ')' in '{}'",
            text
        )));
    }

    let inner = &text[open + 1..close];
    let name = builtins::normalize_name(&text[..open]);
    if name.is_empty() {
        return build(inner);
    }

    let builtin = builtins::lookup(&name).ok_or(FormulaError::UnknownName { name })?;
    let args = split_arguments(inner)?
        .into_iter()
        .map(expand_argument)
        .collect::<Result<Vec<_>>>()?
        .into_iter()
        .flatten()
        .collect();

    Ok(Term::Call(Call { builtin, args }))
}

/// Depth-0 comma-separated pieces of a call's interior, trimmed.
fn split_arguments(inner: &str) -> Result<Vec<&str>> {
    if inner.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut pieces = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in inner.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                pieces.push(inner[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    pieces.push(inner[start..].trim());

    if pieces.iter().any(|p| p.is_empty()) {
        return Err(FormulaError::syntax(format!("Empty argument in '{}'", inner)));
    }
    Ok(pieces)
}

/// One argument becomes one term, or a run of references for a range.
fn expand_argument(arg: &str) -> Result<Vec<Term>> {
    if arg.contains(':') && !arg.contains('(') {
        if let Some(range) = Range::parse(arg) {
            return expand_range(range);
        }
    }
    Ok(vec![build(arg)?])
}

fn expand_range(range: Range) -> Result<Vec<Term>> {
    match range.len() {
        Some(len) if len <= MAX_RANGE_CELLS => Ok(range.locations().map(Term::Ref).collect()),
        _ => Err(FormulaError::eval(format!(
            "Range {} exceeds {} cells",
            range, MAX_RANGE_CELLS
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tree(text: &str) -> String {
        build(text).unwrap().to_string()
    }

    fn code(text: &str) -> &'static str {
        build(text).unwrap_err().short_code()
    }

    #[test]
    fn test_literals() {
        assert_eq!(build("42"), Ok(Term::Literal(Decimal::from(42))));
        assert_eq!(build(" -1.5 ").unwrap().to_string(), "-1.5");
        assert_eq!(build("TRUE"), Ok(Term::Literal(Decimal::ONE)));
        assert_eq!(build("false"), Ok(Term::Literal(Decimal::ZERO)));
    }

    #[test]
    fn test_reference() {
        assert_eq!(build("b2"), Ok(Term::Ref(Location::new(1, 1))));
    }

    #[test]
    fn test_infix_rewrites_to_calls() {
        assert_eq!(tree("1 + 2 * 3"), "Add(1, Multiply(2, 3))");
        assert_eq!(tree("(1 + 2) * 3"), "Multiply(Add(1, 2), 3)");
        assert_eq!(tree("A1^2 - 1"), "Subtract(Power(A1, 2), 1)");
        assert_eq!(tree("3 - -2"), "Subtract(3, -2)");
    }

    #[test]
    fn test_calls_normalize_names() {
        assert_eq!(tree("sum(1, 2)"), "Sum(1, 2)");
        assert_eq!(tree("AVERAGE(1, add(2, 3))"), "Average(1, Add(2, 3))");
        assert_eq!(tree("Add()"), "Add()");
        assert_eq!(tree("((7))"), "7");
    }

    #[test]
    fn test_ranges_expand_in_place() {
        assert_eq!(tree("Sum(1, A1:B2, 9)"), "Sum(1, A1, B1, A2, B2, 9)");
        assert_eq!(tree("Sum(B2:A1)"), "Sum(A1, B1, A2, B2)");
    }

    #[test]
    fn test_oversized_range() {
        assert_eq!(code("Sum(A1:XFD9999)"), "#EVAL");
        assert_eq!(code("Sum(A1:ZZZ9999)"), "#SYNTAX");
        assert_eq!(code("ZZZZZZZZZZZZ1 + 1"), "#SYNTAX");
    }

    #[test]
    fn test_errors() {
        assert_eq!(code("foo(1)"), "#NAME");
        assert_eq!(code("Add(1"), "#SYNTAX");
        assert_eq!(code("Add(1))"), "#SYNTAX");
        assert_eq!(code("Add(1) 2"), "#SYNTAX");
        assert_eq!(code("Add(1,,2)"), "#SYNTAX");
        assert_eq!(code("hello"), "#SYNTAX");
        assert_eq!(code("A1:ZZ"), "#SYNTAX");
        assert_eq!(code("1 +"), "#SYNTAX");
        assert_eq!(code(""), "#SYNTAX");
    }
}
