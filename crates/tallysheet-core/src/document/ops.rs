use super::Document;
use super::state::{ActionRecord, MAX_UNDO_STACK, UndoEntry};
use crate::error::{Result, TallyError};
use tallysheet_engine::FormulaError;
use tallysheet_engine::engine::{Cell, Decimal, Location, Range};

impl Document {
    fn push_undo(&mut self, entry: UndoEntry) {
        self.undo_stack.push(entry);
        self.redo_stack.clear();
        if self.undo_stack.len() > MAX_UNDO_STACK {
            self.undo_stack.remove(0);
        }
    }

    /// Write `cell` at `loc`. With `record == false` the write bypasses
    /// history, which is how undo/redo replays avoid recording themselves.
    /// Writes outside the sheet and writes that change nothing are ignored.
    pub fn set_cell(&mut self, loc: Location, cell: Cell, record: bool) {
        if !loc.in_bounds() {
            tracing::warn!(location = %loc, "write outside the sheet ignored");
            return;
        }
        if *self.grid.cell(loc) == cell {
            return;
        }
        let old = self.grid.set(loc, cell.clone());
        self.modified = true;
        if record {
            self.push_undo(UndoEntry::Single(ActionRecord {
                location: loc,
                old,
                new: cell,
            }));
        }
    }

    /// Set cell contents from input string.
    pub fn set_cell_from_input(&mut self, loc: Location, input: &str) {
        self.set_cell(loc, Cell::from_input(input), true);
    }

    /// Apply several writes as one undoable step. Writes that change nothing
    /// are dropped; an all-no-op batch records nothing.
    pub fn set_cells(&mut self, writes: Vec<(Location, Cell)>) {
        let mut records = Vec::with_capacity(writes.len());
        for (location, new) in writes {
            if !location.in_bounds() || *self.grid.cell(location) == new {
                continue;
            }
            let old = self.grid.set(location, new.clone());
            if old != new {
                records.push(ActionRecord { location, old, new });
            }
        }
        if records.is_empty() {
            return;
        }
        self.modified = true;
        self.push_undo(UndoEntry::Batch(records));
    }

    /// Clear the specified cell
    pub fn clear_cell(&mut self, loc: Location) {
        if !self.grid.cell(loc).is_empty() {
            self.set_cell(loc, Cell::Empty, true);
        }
    }

    /// Clear every cell in a row.
    pub fn clear_row(&mut self, row: usize) {
        let width = self.grid.width().max(1);
        self.clear_range(Location::new(row, 0), Location::new(row, width - 1));
    }

    /// Clear the rectangle spanned by two corners.
    pub fn clear_range(&mut self, a: Location, b: Location) {
        let range = Range::new(a, b);
        let writes = self
            .grid
            .iter()
            .filter(|(loc, _)| range.contains(*loc))
            .map(|(loc, _)| (loc, Cell::Empty))
            .collect();
        self.set_cells(writes);
    }

    /// Copy the cells of a range, row by row.
    pub fn copy_range(&self, a: Location, b: Location) -> Vec<Vec<Cell>> {
        let range = Range::new(a, b);
        (range.start.row..=range.end.row)
            .map(|row| {
                (range.start.col..=range.end.col)
                    .map(|col| self.grid.cell(Location::new(row, col)).clone())
                    .collect()
            })
            .collect()
    }

    /// Paste a block with its top-left corner at `at`. Formulas are copied
    /// verbatim; references are not shifted. Cells that would land outside
    /// the sheet are dropped.
    pub fn paste(&mut self, at: Location, block: &[Vec<Cell>]) {
        let writes = block
            .iter()
            .enumerate()
            .flat_map(|(r, row)| {
                row.iter().enumerate().filter_map(move |(c, cell)| {
                    let loc = Location::new(at.row.checked_add(r)?, at.col.checked_add(c)?);
                    loc.in_bounds().then(|| (loc, cell.clone()))
                })
            })
            .collect();
        self.set_cells(writes);
    }

    /// Undo the last recorded write or batch.
    pub fn undo(&mut self) -> Result<()> {
        let entry = self.undo_stack.pop().ok_or(TallyError::NothingToUndo)?;
        for record in entry.records().iter().rev() {
            self.set_cell(record.location, record.old.clone(), false);
        }
        tracing::debug!(cells = entry.records().len(), "undo");
        self.redo_stack.push(entry);
        Ok(())
    }

    /// Redo the last undone action
    pub fn redo(&mut self) -> Result<()> {
        let entry = self.redo_stack.pop().ok_or(TallyError::NothingToRedo)?;
        for record in entry.records() {
            self.set_cell(record.location, record.new.clone(), false);
        }
        tracing::debug!(cells = entry.records().len(), "redo");
        self.undo_stack.push(entry);
        Ok(())
    }

    /// Cell rendered into exactly `width` chars.
    pub fn display(&self, loc: Location, width: usize) -> String {
        self.grid.display(loc, width)
    }

    /// Canonical text of a cell, as shown in the formula bar and saved to disk.
    pub fn real_value(&self, loc: Location) -> String {
        self.grid.cell(loc).real_value()
    }

    pub fn value(&self, loc: Location) -> std::result::Result<Decimal, FormulaError> {
        self.grid.value(loc)
    }
}
