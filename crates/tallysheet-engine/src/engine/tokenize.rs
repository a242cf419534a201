//! Split infix formula text into tokens.
//!
//! Tokens are separated by spaces. A parenthesized span is kept whole, however
//! many spaces or commas it contains, so `Add(1, 2) * 3` yields three tokens.
//! Outside parentheses the operators `+ * / ^` are always tokens of their own,
//! and `-` is one when a space follows it (`-5` stays a negative literal).

use crate::error::{FormulaError, Result};

fn flush(tokens: &mut Vec<String>, current: &mut String) {
    if !current.is_empty() {
        tokens.push(std::mem::take(current));
    }
}

pub fn tokenize(text: &str) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '(' => {
                depth += 1;
                current.push(c);
            }
            ')' => {
                if depth == 0 {
                    return Err(FormulaError::syntax(format!("Unmatched ')' in '{}'", text)));
                }
                depth -= 1;
                current.push(c);
            }
            _ if depth > 0 => current.push(c),
            ' ' => flush(&mut tokens, &mut current),
            '+' | '*' | '/' | '^' => {
                flush(&mut tokens, &mut current);
                tokens.push(c.to_string());
            }
            '-' if chars.peek() == Some(&' ') => {
                flush(&mut tokens, &mut current);
                tokens.push(c.to_string());
            }
            _ => current.push(c),
        }
    }

    if depth > 0 {
        return Err(FormulaError::syntax(format!("Unclosed '(' in '{}'", text)));
    }
    flush(&mut tokens, &mut current);
    Ok(tokens)
}

/// Whether `text` has an operator outside any parentheses.
pub fn has_top_level_operator(text: &str) -> bool {
    let mut depth = 0usize;
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ if depth > 0 => {}
            '+' | '*' | '/' | '^' => return true,
            '-' if chars.peek() == Some(&' ') => return true,
            _ => {}
        }
    }
    false
}
