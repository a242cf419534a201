//! Infix to postfix conversion, and postfix to call-expression text.
//!
//! `1 + 2 * 3` becomes `1 2 3 * +`, which in turn becomes
//! `Add(1, Multiply(2, 3))`. The call form is what the tree builder parses,
//! so infix arithmetic needs no separate evaluator.
//!
//! Operators of equal precedence associate to the left, `^` included.

use super::tokenize::tokenize;
use crate::error::{FormulaError, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
}

impl Operator {
    pub fn from_token(token: &str) -> Option<Operator> {
        match token {
            "+" => Some(Operator::Add),
            "-" => Some(Operator::Subtract),
            "*" => Some(Operator::Multiply),
            "/" => Some(Operator::Divide),
            "^" => Some(Operator::Power),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "*",
            Operator::Divide => "/",
            Operator::Power => "^",
        }
    }

    /// Registry function implementing the operator.
    pub fn function_name(self) -> &'static str {
        match self {
            Operator::Add => "Add",
            Operator::Subtract => "Subtract",
            Operator::Multiply => "Multiply",
            Operator::Divide => "Divide",
            Operator::Power => "Power",
        }
    }

    /// Whether `self`, sitting on the stack, is emitted before `incoming` is pushed.
    fn yields_to(self, incoming: Operator) -> bool {
        match self {
            Operator::Power => true,
            Operator::Multiply | Operator::Divide => incoming != Operator::Power,
            Operator::Add | Operator::Subtract => {
                matches!(incoming, Operator::Add | Operator::Subtract)
            }
        }
    }
}

/// Reorder infix tokens into postfix.
pub fn to_postfix(tokens: &[String]) -> Vec<String> {
    let mut output = Vec::with_capacity(tokens.len());
    let mut stack: Vec<Operator> = Vec::new();

    for token in tokens {
        match Operator::from_token(token) {
            Some(incoming) => {
                while let Some(&top) = stack.last() {
                    if !top.yields_to(incoming) {
                        break;
                    }
                    output.push(top.symbol().to_string());
                    stack.pop();
                }
                stack.push(incoming);
            }
            None => output.push(token.clone()),
        }
    }

    while let Some(op) = stack.pop() {
        output.push(op.symbol().to_string());
    }
    output
}

/// Convert an infix expression into space-separated postfix.
pub fn shunting_yard(infix: &str) -> Result<String> {
    let tokens = tokenize(infix)?;
    Ok(to_postfix(&tokens).join(" "))
}

/// Fold postfix tokens into nested call text such as `Add(1, Multiply(2, 3))`.
pub fn postfix_to_call(postfix: &[String]) -> Result<String> {
    let mut stack: Vec<String> = Vec::new();

    for token in postfix {
        let Some(op) = Operator::from_token(token) else {
            stack.push(token.clone());
            continue;
        };
        let (Some(rhs), Some(lhs)) = (stack.pop(), stack.pop()) else {
            return Err(FormulaError::syntax(format!(
                "Operator '{}' is missing an operand",
                op.symbol()
            )));
        };
        stack.push(format!("{}({}, {})", op.function_name(), lhs, rhs));
    }

    match stack.len() {
        1 => Ok(stack.remove(0)),
        0 => Err(FormulaError::syntax("Empty expression")),
        _ => Err(FormulaError::syntax(format!(
            "Expected an operator between '{}'",
            stack.join("' and '")
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tokens(s: &str) -> Vec<String> {
        s.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn test_precedence_tiers() {
        assert_eq!(shunting_yard("1 + 2 * 3").unwrap(), "1 2 3 * +");
        assert_eq!(
            shunting_yard("1 + 2 * 3 / 4 - 5 ^ 6").unwrap(),
            "1 2 3 * 4 / + 5 6 ^ -"
        );
        assert_eq!(shunting_yard("2 ^ 3 * 4").unwrap(), "2 3 ^ 4 *");
    }

    #[test]
    fn test_left_associative() {
        assert_eq!(shunting_yard("8 - 3 - 2").unwrap(), "8 3 - 2 -");
        assert_eq!(shunting_yard("2 ^ 3 ^ 2").unwrap(), "2 3 ^ 2 ^");
    }

    #[test]
    fn test_parenthesized_operand_passes_through() {
        assert_eq!(shunting_yard("2 * (3 + 4)").unwrap(), "2 (3 + 4) *");
    }

    #[test]
    fn test_postfix_to_call() {
        assert_eq!(
            postfix_to_call(&tokens("1 2 3 * +")).unwrap(),
            "Add(1, Multiply(2, 3))"
        );
        assert_eq!(postfix_to_call(&tokens("A1 2 ^")).unwrap(), "Power(A1, 2)");
    }

    #[test]
    fn test_postfix_to_call_rejects_malformed() {
        assert_eq!(
            postfix_to_call(&tokens("1 +")).unwrap_err().short_code(),
            "#SYNTAX"
        );
        assert_eq!(
            postfix_to_call(&tokens("1 2")).unwrap_err().short_code(),
            "#SYNTAX"
        );
        assert!(postfix_to_call(&[]).is_err());
    }
}
