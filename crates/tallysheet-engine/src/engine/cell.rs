//! Typed cell values.
//!
//! - [`Cell`] - one variant per kind of content a user can type
//! - [`FormulaCell`] - formula source plus the tree built from it at assignment
//!
//! Every cell renders into a fixed-width string ([`Cell::display`]) and has a
//! canonical text form ([`Cell::real_value`]) that reclassifies to an
//! equivalent cell through [`Cell::from_input`].

use chrono::{NaiveDate, NaiveTime};
use regex::Regex;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;
use std::sync::OnceLock;

use super::eval::Evaluator;
use super::format::{fit_left, fit_right, fit_right_ellipsis, format_number};
use super::formula::{self, Term};
use super::grid::Grid;
use crate::error::FormulaError;

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
const TIME_FORMATS: &[&str] = &["%H:%M:%S", "%H:%M", "%I:%M:%S %p", "%I:%M %p"];

/// Content of a single grid cell.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Cell {
    #[default]
    Empty,
    Text(String),
    Integer(i64),
    Decimal(Decimal),
    /// Stored as a fraction: `25%` is kept as `0.25`.
    Percent(Decimal),
    Time(NaiveTime),
    Date(NaiveDate),
    Formula(FormulaCell),
}

/// A formula and its pre-built expression tree (or the error building it hit).
#[derive(Clone, Debug)]
pub struct FormulaCell {
    source: String,
    term: Result<Term, FormulaError>,
}

impl FormulaCell {
    /// `source` is the full input including the leading `=`.
    pub fn new(source: &str) -> FormulaCell {
        let body = source.strip_prefix('=').unwrap_or(source);
        let term = formula::build(body);
        if let Err(err) = &term {
            tracing::debug!(formula = %source, error = %err, "formula failed to build");
        }
        FormulaCell {
            source: source.to_string(),
            term,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn term(&self) -> Result<&Term, &FormulaError> {
        self.term.as_ref()
    }
}

impl PartialEq for FormulaCell {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

fn number_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[+-]?([0-9]+\.?[0-9]*|\.[0-9]+)$").unwrap())
}

/// Parse a plain decimal number (no exponent, no digit separators).
pub fn parse_decimal(text: &str) -> Option<Decimal> {
    let text = text.trim();
    if !number_regex().is_match(text) {
        return None;
    }
    Decimal::from_str(text).ok()
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
}

fn parse_time(text: &str) -> Option<NaiveTime> {
    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(text, fmt).ok())
}

impl Cell {
    /// Classify raw user input.
    /// - Whitespace only -> Empty
    /// - Starts with '=' -> Formula
    /// - Quoted string -> Text (without quotes)
    /// - Date, then time, then number, then `N%`
    /// - Otherwise -> Text, kept verbatim
    pub fn from_input(input: &str) -> Cell {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Cell::Empty;
        }

        if trimmed.starts_with('=') {
            return Cell::Formula(FormulaCell::new(trimmed));
        }

        if trimmed.starts_with('"') && trimmed.ends_with('"') && trimmed.len() >= 2 {
            return Cell::Text(trimmed[1..trimmed.len() - 1].to_string());
        }

        if let Some(date) = parse_date(trimmed) {
            return Cell::Date(date);
        }

        if let Some(time) = parse_time(trimmed) {
            return Cell::Time(time);
        }

        if let Some(n) = parse_decimal(trimmed) {
            return Cell::Decimal(n);
        }

        if let Some(n) = trimmed.strip_suffix('%').and_then(parse_decimal) {
            return Cell::percent(n);
        }

        Cell::Text(input.to_string())
    }

    /// Percent cell from the number the user typed (`12.5` for `12.5%`).
    pub fn percent(value: Decimal) -> Cell {
        Cell::Percent(value / Decimal::ONE_HUNDRED)
    }

    pub fn formula(source: &str) -> Cell {
        Cell::Formula(FormulaCell::new(source))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Whether the cell has a numeric projection (formulas count, even failing ones).
    pub fn is_numeric(&self) -> bool {
        !matches!(self, Cell::Empty | Cell::Text(_))
    }

    /// Canonical text that reclassifies to an equivalent cell.
    /// Text that would classify as something else (blank, padded, number-like)
    /// is wrapped in double quotes.
    pub fn real_value(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => match Cell::from_input(s) {
                Cell::Text(ref same) if same == s => s.clone(),
                _ => format!("\"{}\"", s),
            },
            Cell::Integer(n) => n.to_string(),
            Cell::Decimal(n) => n.to_string(),
            Cell::Percent(fraction) => {
                format!("{}%", format_number(*fraction * Decimal::ONE_HUNDRED))
            }
            Cell::Time(t) => t.format("%H:%M:%S").to_string(),
            Cell::Date(d) => d.format("%Y-%m-%d").to_string(),
            Cell::Formula(f) => f.source.clone(),
        }
    }

    /// Render into exactly `width` chars. Formulas are evaluated against `grid`.
    pub fn display(&self, width: usize, grid: &Grid) -> String {
        match self {
            Cell::Empty => " ".repeat(width),
            Cell::Text(s) => fit_left(s, width),
            Cell::Integer(n) => fit_right_ellipsis(&n.to_string(), width),
            Cell::Decimal(n) => fit_right(&n.to_string(), width),
            Cell::Percent(fraction) => {
                let mut shown = (*fraction * Decimal::ONE_HUNDRED)
                    .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
                shown.rescale(2);
                fit_right(&format!("{}%", shown), width)
            }
            Cell::Time(_) | Cell::Date(_) => fit_right(&self.real_value(), width),
            Cell::Formula(f) => match Evaluator::new(grid).formula(f) {
                Ok(value) => fit_right(&format_number(value), width),
                Err(err) => fit_left(err.short_code(), width),
            },
        }
    }
}
