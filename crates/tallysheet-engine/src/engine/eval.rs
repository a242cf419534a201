//! Tree evaluation against a grid.
//!
//! Nothing is cached: every call walks the tree and re-reads referenced
//! cells, so results always reflect the grid's current contents.

use chrono::{Datelike, Timelike};
use rust_decimal::Decimal;

use super::cell::{Cell, FormulaCell};
use super::formula::Term;
use super::grid::Grid;
use super::location::Location;
use crate::error::{FormulaError, Result};

/// `num_days_from_ce` of 1899-12-30, day zero of the serial date system.
const SERIAL_EPOCH_DAYS_FROM_CE: i32 = 693_594;
const SECONDS_PER_DAY: u32 = 86_400;

/// Evaluates terms, tracking which locations are mid-evaluation so that
/// reference cycles fail instead of recursing forever.
pub struct Evaluator<'g> {
    grid: &'g Grid,
    in_progress: Vec<Location>,
}

impl<'g> Evaluator<'g> {
    pub fn new(grid: &'g Grid) -> Self {
        Evaluator {
            grid,
            in_progress: Vec::new(),
        }
    }

    /// Numeric projection of a cell. Empty and text cells have none.
    pub fn cell(&mut self, cell: &Cell) -> Result<Decimal> {
        match cell {
            Cell::Empty | Cell::Text(_) => Err(FormulaError::NonNumeric { location: None }),
            Cell::Integer(n) => Ok(Decimal::from(*n)),
            Cell::Decimal(n) | Cell::Percent(n) => Ok(*n),
            Cell::Date(d) => Ok(Decimal::from(
                d.num_days_from_ce() - SERIAL_EPOCH_DAYS_FROM_CE,
            )),
            Cell::Time(t) => Decimal::from(t.num_seconds_from_midnight())
                .checked_div(Decimal::from(SECONDS_PER_DAY))
                .ok_or_else(FormulaError::overflow),
            Cell::Formula(f) => self.formula(f),
        }
    }

    pub fn formula(&mut self, formula: &FormulaCell) -> Result<Decimal> {
        match formula.term() {
            Ok(term) => self.term(term),
            Err(err) => Err(err.clone()),
        }
    }

    pub fn term(&mut self, term: &Term) -> Result<Decimal> {
        match term {
            Term::Literal(n) => Ok(*n),
            Term::Ref(loc) => self.reference(*loc),
            Term::Call(call) => {
                let args = call
                    .args
                    .iter()
                    .map(|arg| self.term(arg))
                    .collect::<Result<Vec<_>>>()?;
                (call.builtin.reduce)(&args)
            }
        }
    }

    /// Value of the cell at `loc`.
    pub fn reference(&mut self, loc: Location) -> Result<Decimal> {
        if self.in_progress.contains(&loc) {
            tracing::warn!(location = %loc, "circular reference");
            return Err(FormulaError::CircularReference { location: loc });
        }

        let cell = self.grid.cell(loc);
        if !cell.is_numeric() {
            return Err(FormulaError::NonNumeric {
                location: Some(loc),
            });
        }

        self.in_progress.push(loc);
        let result = self.cell(cell);
        self.in_progress.pop();
        result
    }
}
