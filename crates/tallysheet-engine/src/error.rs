//! Formula error taxonomy.
//!
//! Every failure while building or evaluating a formula is one of these
//! variants. Each carries a long message (its `Display`) and a short
//! spreadsheet-style code that the grid shows in place of a value.

use thiserror::Error;

use crate::engine::Location;

/// Errors produced while parsing or evaluating a formula.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormulaError {
    #[error("Division by zero")]
    DivideByZero,

    #[error("{}", non_numeric_message(.location))]
    NonNumeric { location: Option<Location> },

    #[error("Function {name} not found")]
    UnknownName { name: String },

    #[error("Syntax error: {message}")]
    Syntax { message: String },

    #[error("Evaluation error: {message}")]
    Eval { message: String },

    #[error("Circular reference through {location}")]
    CircularReference { location: Location },
}

fn non_numeric_message(location: &Option<Location>) -> String {
    match location {
        Some(location) => format!("Non-real value referenced at {}", location),
        None => "Non-real value referenced".to_string(),
    }
}

impl FormulaError {
    /// The code shown in a cell whose formula failed (`#DIV0`, `#VALUE`, ...).
    pub fn short_code(&self) -> &'static str {
        match self {
            FormulaError::DivideByZero => "#DIV0",
            FormulaError::NonNumeric { .. } => "#VALUE",
            FormulaError::UnknownName { .. } => "#NAME",
            FormulaError::Syntax { .. } => "#SYNTAX",
            FormulaError::Eval { .. } => "#EVAL",
            FormulaError::CircularReference { .. } => "#CYCLE",
        }
    }

    pub(crate) fn syntax(message: impl Into<String>) -> Self {
        FormulaError::Syntax {
            message: message.into(),
        }
    }

    pub(crate) fn eval(message: impl Into<String>) -> Self {
        FormulaError::Eval {
            message: message.into(),
        }
    }

    pub(crate) fn arity(name: &str, expected: usize, got: usize) -> Self {
        FormulaError::eval(format!(
            "{} expects {} argument{}, got {}",
            name,
            expected,
            if expected == 1 { "" } else { "s" },
            got
        ))
    }

    pub(crate) fn overflow() -> Self {
        FormulaError::eval("numeric overflow")
    }
}

pub type Result<T> = std::result::Result<T, FormulaError>;
