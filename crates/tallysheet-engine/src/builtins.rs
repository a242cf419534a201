//! Built-in formula functions and their metadata.
//!
//! Conventions:
//! - Names are normalized to an uppercase first letter, the rest lowercase
//!   (`SUM`, `sum` and `Sum` all resolve to `Sum`).
//! - Every function is a pure reduction over already-evaluated arguments.
//! - If you add a function, add a row to `BUILTINS`; lookup picks it up.

use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use std::collections::HashMap;
use std::sync::OnceLock;

use crate::error::{FormulaError, Result};

pub type Reduction = fn(&[Decimal]) -> Result<Decimal>;

#[derive(Debug)]
pub struct Builtin {
    pub name: &'static str,
    pub description: &'static str,
    pub reduce: Reduction,
}

pub const BUILTINS: &[Builtin] = &[
    Builtin {
        name: "Add",
        description: "Sum of all arguments",
        reduce: add,
    },
    Builtin {
        name: "Sum",
        description: "Sum of all arguments",
        reduce: add,
    },
    Builtin {
        name: "Subtract",
        description: "First argument minus the second",
        reduce: subtract,
    },
    Builtin {
        name: "Multiply",
        description: "Product of all arguments",
        reduce: multiply,
    },
    Builtin {
        name: "Divide",
        description: "First argument divided by the second",
        reduce: divide,
    },
    Builtin {
        name: "Average",
        description: "Arithmetic mean of the arguments",
        reduce: average,
    },
    Builtin {
        name: "Avg",
        description: "Arithmetic mean of the arguments",
        reduce: average,
    },
    Builtin {
        name: "Power",
        description: "First argument raised to the second",
        reduce: power,
    },
    Builtin {
        name: "Min",
        description: "Smallest argument",
        reduce: min,
    },
    Builtin {
        name: "Max",
        description: "Largest argument",
        reduce: max,
    },
    Builtin {
        name: "Count",
        description: "Number of arguments",
        reduce: count,
    },
    Builtin {
        name: "Abs",
        description: "Absolute value",
        reduce: abs,
    },
];

/// `sUM` -> `Sum`. Surrounding whitespace is dropped.
pub fn normalize_name(name: &str) -> String {
    let lower = name.trim().to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Find a builtin by its normalized name.
pub fn lookup(name: &str) -> Option<&'static Builtin> {
    static TABLE: OnceLock<HashMap<&'static str, &'static Builtin>> = OnceLock::new();
    TABLE
        .get_or_init(|| BUILTINS.iter().map(|b| (b.name, b)).collect())
        .get(name)
        .copied()
}

fn binary(name: &str, args: &[Decimal]) -> Result<(Decimal, Decimal)> {
    match args {
        [a, b] => Ok((*a, *b)),
        _ => Err(FormulaError::arity(name, 2, args.len())),
    }
}

fn add(args: &[Decimal]) -> Result<Decimal> {
    args.iter().try_fold(Decimal::ZERO, |acc, n| {
        acc.checked_add(*n).ok_or_else(FormulaError::overflow)
    })
}

fn subtract(args: &[Decimal]) -> Result<Decimal> {
    let (a, b) = binary("Subtract", args)?;
    a.checked_sub(b).ok_or_else(FormulaError::overflow)
}

fn multiply(args: &[Decimal]) -> Result<Decimal> {
    args.iter().try_fold(Decimal::ONE, |acc, n| {
        acc.checked_mul(*n).ok_or_else(FormulaError::overflow)
    })
}

fn divide(args: &[Decimal]) -> Result<Decimal> {
    let (a, b) = binary("Divide", args)?;
    if b.is_zero() {
        return Err(FormulaError::DivideByZero);
    }
    a.checked_div(b).ok_or_else(FormulaError::overflow)
}

fn average(args: &[Decimal]) -> Result<Decimal> {
    if args.is_empty() {
        return Err(FormulaError::DivideByZero);
    }
    add(args)?
        .checked_div(Decimal::from(args.len()))
        .ok_or_else(FormulaError::overflow)
}

/// Computed through `f64`, so results are approximate.
fn power(args: &[Decimal]) -> Result<Decimal> {
    let (base, exponent) = binary("Power", args)?;
    if exponent.is_zero() {
        return Ok(Decimal::ONE);
    }
    if base.is_zero() {
        if exponent.is_sign_negative() {
            return Err(FormulaError::eval("Cannot raise zero to a negative power"));
        }
        return Ok(Decimal::ZERO);
    }
    if base.is_sign_negative() && !exponent.fract().is_zero() {
        return Err(FormulaError::eval(
            "Negative base with a non-integer exponent results in a complex number",
        ));
    }

    let out_of_range = || FormulaError::eval("Power result is out of range");
    let b = base.to_f64().ok_or_else(out_of_range)?;
    let e = exponent.to_f64().ok_or_else(out_of_range)?;
    let result = b.powf(e);
    if !result.is_finite() {
        return Err(out_of_range());
    }
    Decimal::from_f64(result).ok_or_else(out_of_range)
}

fn min(args: &[Decimal]) -> Result<Decimal> {
    args.iter()
        .copied()
        .min()
        .ok_or_else(|| FormulaError::eval("Min expects at least one argument"))
}

fn max(args: &[Decimal]) -> Result<Decimal> {
    args.iter()
        .copied()
        .max()
        .ok_or_else(|| FormulaError::eval("Max expects at least one argument"))
}

fn count(args: &[Decimal]) -> Result<Decimal> {
    Ok(Decimal::from(args.len()))
}

fn abs(args: &[Decimal]) -> Result<Decimal> {
    match args {
        [n] => Ok(n.abs()),
        _ => Err(FormulaError::arity("Abs", 1, args.len())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn call(name: &str, args: &[&str]) -> Result<Decimal> {
        let args: Vec<Decimal> = args.iter().map(|s| d(s)).collect();
        (lookup(name).unwrap().reduce)(&args)
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("SUM"), "Sum");
        assert_eq!(normalize_name(" average "), "Average");
        assert_eq!(normalize_name("aVg"), "Avg");
        assert_eq!(normalize_name(""), "");
    }

    #[test]
    fn test_lookup() {
        assert_eq!(lookup("Sum").unwrap().name, "Sum");
        assert!(lookup("sum").is_none());
        assert!(lookup("Foo").is_none());
    }

    #[test]
    fn test_add_and_multiply_identities() {
        assert_eq!(call("Add", &[]), Ok(d("0")));
        assert_eq!(call("Multiply", &[]), Ok(d("1")));
        assert_eq!(call("Sum", &["1", "2.5", "-0.5"]), Ok(d("3")));
        assert_eq!(call("Multiply", &["2", "3", "4"]), Ok(d("24")));
    }

    #[test]
    fn test_binary_arity() {
        assert_eq!(call("Subtract", &["5", "3"]), Ok(d("2")));
        assert_eq!(call("Subtract", &["1"]).unwrap_err().short_code(), "#EVAL");
        assert_eq!(
            call("Divide", &["1", "2", "3"]).unwrap_err().short_code(),
            "#EVAL"
        );
    }

    #[test]
    fn test_divide() {
        assert_eq!(call("Divide", &["1", "4"]), Ok(d("0.25")));
        assert_eq!(call("Divide", &["1", "0"]), Err(FormulaError::DivideByZero));
    }

    #[test]
    fn test_average() {
        assert_eq!(call("Average", &["1", "2", "3"]), Ok(d("2")));
        assert_eq!(call("Avg", &[]), Err(FormulaError::DivideByZero));
    }

    #[test]
    fn test_power_domain() {
        assert_eq!(call("Power", &["0", "0"]), Ok(d("1")));
        assert_eq!(call("Power", &["5", "0"]), Ok(d("1")));
        assert_eq!(call("Power", &["0", "3"]), Ok(d("0")));
        assert_eq!(call("Power", &["2", "10"]), Ok(d("1024")));
        assert_eq!(call("Power", &["-2", "3"]), Ok(d("-8")));
        assert_eq!(call("Power", &["0", "-1"]).unwrap_err().short_code(), "#EVAL");
        assert_eq!(call("Power", &["-8", "0.5"]).unwrap_err().short_code(), "#EVAL");
        assert_eq!(call("Power", &["10", "400"]).unwrap_err().short_code(), "#EVAL");
    }

    #[test]
    fn test_min_max_count_abs() {
        assert_eq!(call("Min", &["3", "-1", "2"]), Ok(d("-1")));
        assert_eq!(call("Max", &["3", "-1", "2"]), Ok(d("3")));
        assert!(call("Max", &[]).is_err());
        assert_eq!(call("Count", &["3", "4"]), Ok(d("2")));
        assert_eq!(call("Abs", &["-2.5"]), Ok(d("2.5")));
        assert!(call("Abs", &["1", "2"]).is_err());
    }

    #[test]
    fn test_overflow_is_eval() {
        let err = call("Multiply", &["79228162514264337593543950335", "2"]).unwrap_err();
        assert_eq!(err.short_code(), "#EVAL");
    }
}
