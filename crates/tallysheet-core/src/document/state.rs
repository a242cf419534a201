use crate::error::Result;
use std::path::PathBuf;
use tallysheet_engine::engine::{Cell, Grid, Location};

/// Maximum number of undo entries to keep
pub(crate) const MAX_UNDO_STACK: usize = 100;

/// One cell write: where, what was there, what replaced it.
#[derive(Clone, Debug, PartialEq)]
pub struct ActionRecord {
    pub location: Location,
    pub old: Cell,
    pub new: Cell,
}

/// Represents an undo entry (single write or a batch applied together)
#[derive(Clone, Debug)]
pub enum UndoEntry {
    Single(ActionRecord),
    /// Clears of rows/ranges and pastes undo as one step.
    Batch(Vec<ActionRecord>),
}

impl UndoEntry {
    pub fn records(&self) -> &[ActionRecord] {
        match self {
            UndoEntry::Single(record) => std::slice::from_ref(record),
            UndoEntry::Batch(records) => records,
        }
    }
}

/// UI-agnostic document state for the spreadsheet.
#[derive(Debug, Default)]
pub struct Document {
    pub grid: Grid,
    /// Current file path
    pub file_path: Option<PathBuf>,
    /// Whether the grid has changed since the last load or save
    pub modified: bool,
    pub undo_stack: Vec<UndoEntry>,
    pub redo_stack: Vec<UndoEntry>,
}

impl Document {
    /// Create an empty document.
    ///
    /// This constructor is side-effect free: it does not touch the filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty document with a pre-sized grid.
    pub fn with_size(rows: usize, cols: usize) -> Self {
        Document {
            grid: Grid::with_size(rows, cols),
            ..Self::default()
        }
    }

    /// Create a document and load `path` if it exists. A missing file
    /// becomes the save target.
    pub fn with_file(path: Option<PathBuf>, rows: usize, cols: usize) -> Result<Self> {
        let mut doc = Self::with_size(rows, cols);
        if let Some(p) = path {
            if p.exists() {
                doc.load_file(&p)?;
            } else {
                doc.file_path = Some(p);
            }
        }
        Ok(doc)
    }

    pub fn cell(&self, loc: Location) -> &Cell {
        self.grid.cell(loc)
    }
}
