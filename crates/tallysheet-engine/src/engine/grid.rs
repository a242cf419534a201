//! Row-major cell storage.

use rust_decimal::Decimal;

use super::cell::Cell;
use super::eval::Evaluator;
use super::location::Location;
use crate::error::Result;

static EMPTY: Cell = Cell::Empty;

/// A growable table of cells.
///
/// Writes beyond the current bounds grow the table; reads beyond the bounds
/// see `Empty` without growing anything. Each row only stores cells up to its
/// last written column, so `width()` is the logical width of the sheet.
/// Writes must stay inside `MAX_ROWS` x `MAX_COLS` (see [`Location::in_bounds`]).
#[derive(Clone, Debug, Default)]
pub struct Grid {
    rows: Vec<Vec<Cell>>,
    width: usize,
}

impl Grid {
    pub fn new() -> Grid {
        Grid::default()
    }

    pub fn with_size(rows: usize, cols: usize) -> Grid {
        Grid {
            rows: vec![Vec::new(); rows],
            width: cols,
        }
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    fn ensure(&mut self, loc: Location) {
        debug_assert!(loc.in_bounds(), "{} is outside the sheet", loc);
        self.width = self.width.max(loc.col + 1);
        if loc.row >= self.rows.len() {
            self.rows.resize_with(loc.row + 1, Vec::new);
        }
        let row = &mut self.rows[loc.row];
        if loc.col >= row.len() {
            row.resize(loc.col + 1, Cell::Empty);
        }
    }

    /// Read a cell, growing the grid so that `loc` exists.
    pub fn get(&mut self, loc: Location) -> &Cell {
        self.get_mut(loc)
    }

    pub fn get_mut(&mut self, loc: Location) -> &mut Cell {
        self.ensure(loc);
        &mut self.rows[loc.row][loc.col]
    }

    /// Read a cell without growing; out-of-range locations are `Empty`.
    pub fn cell(&self, loc: Location) -> &Cell {
        self.rows
            .get(loc.row)
            .and_then(|row| row.get(loc.col))
            .unwrap_or(&EMPTY)
    }

    /// Store `cell` at `loc`, returning what was there before.
    pub fn set(&mut self, loc: Location, cell: Cell) -> Cell {
        std::mem::replace(self.get_mut(loc), cell)
    }

    /// Non-empty cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Location, &Cell)> {
        self.rows.iter().enumerate().flat_map(|(r, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, cell)| !cell.is_empty())
                .map(move |(c, cell)| (Location::new(r, c), cell))
        })
    }

    /// Rows and columns needed to hold every non-empty cell.
    pub fn used_extent(&self) -> (usize, usize) {
        self.iter().fold((0, 0), |(rows, cols), (loc, _)| {
            (rows.max(loc.row + 1), cols.max(loc.col + 1))
        })
    }

    pub fn display(&self, loc: Location, width: usize) -> String {
        self.cell(loc).display(width, self)
    }

    /// Numeric value of the cell at `loc`.
    pub fn value(&self, loc: Location) -> Result<Decimal> {
        Evaluator::new(self).reference(loc)
    }
}
