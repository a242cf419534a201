//! Application state and logic.
//!
//! This module contains the main [`App`] struct which holds all application state:
//! the document, cursor position, viewport, editing buffers and UI state.
//! The app operates in different [`Mode`]s (Normal, Insert, Visual, Command)
//! similar to Vim's modal editing.

use std::collections::HashMap;
use std::path::PathBuf;
use tallysheet_core::{Cell, Document, Location, Range};
use tallysheet_engine::engine::MAX_RANGE_CELLS;

use crate::config::{Config, MAX_COLUMN_WIDTH, MIN_COLUMN_WIDTH};

/// Modal editing state for the application.
///
/// - [`Normal`](Mode::Normal): Navigate and execute commands
/// - [`Insert`](Mode::Insert): Edit cell contents
/// - [`Visual`](Mode::Visual): Select cell ranges
/// - [`Command`](Mode::Command): Enter ex-style commands (`:w`, `:q`, etc.)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Insert,
    Visual,
    Command,
}

/// Main application state container.
pub struct App {
    pub doc: Document,
    pub cursor_row: usize,
    pub cursor_col: usize,
    /// First visible row/column
    pub viewport_row: usize,
    pub viewport_col: usize,
    /// Updated by the renderer from the terminal size
    pub visible_rows: usize,
    pub visible_cols: usize,
    pub mode: Mode,
    pub edit_buffer: String,
    /// Cursor position within edit buffer (byte offset)
    pub edit_cursor: usize,
    pub command_buffer: String,
    /// Cursor position within command buffer (byte offset)
    pub command_cursor: usize,
    pub status_message: String,
    /// Default column width for display
    pub col_width: usize,
    /// Per-column overrides of `col_width`
    pub column_widths: HashMap<usize, usize>,
    /// Where the visual selection started
    pub selection_anchor: Option<Location>,
    /// Yanked cells, row by row
    pub clipboard: Option<Vec<Vec<Cell>>>,
    pub help_modal: bool,
    pub help_scroll: usize,
    pub should_quit: bool,
}

impl App {
    pub fn new(doc: Document, config: &Config) -> Self {
        App {
            doc,
            cursor_row: 0,
            cursor_col: 0,
            viewport_row: 0,
            viewport_col: 0,
            visible_rows: config.rows,
            visible_cols: config.columns,
            mode: Mode::Normal,
            edit_buffer: String::new(),
            edit_cursor: 0,
            command_buffer: String::new(),
            command_cursor: 0,
            status_message: String::new(),
            col_width: config.column_width,
            column_widths: HashMap::new(),
            selection_anchor: None,
            clipboard: None,
            help_modal: false,
            help_scroll: 0,
            should_quit: false,
        }
    }

    pub fn current_location(&self) -> Location {
        Location::new(self.cursor_row, self.cursor_col)
    }

    /// Move cursor by delta, clamping at the top-left corner
    pub fn move_cursor(&mut self, drow: isize, dcol: isize) {
        let loc = self.current_location().offset(drow, dcol);
        self.cursor_row = loc.row;
        self.cursor_col = loc.col;
        self.update_viewport();
    }

    /// Update viewport to keep cursor visible
    pub fn update_viewport(&mut self) {
        let visible_cols = self.visible_cols.max(1);
        let visible_rows = self.visible_rows.max(1);

        if self.cursor_col < self.viewport_col {
            self.viewport_col = self.cursor_col;
        } else if self.cursor_col >= self.viewport_col.saturating_add(visible_cols) {
            self.viewport_col = self.cursor_col - visible_cols + 1;
        }

        if self.cursor_row < self.viewport_row {
            self.viewport_row = self.cursor_row;
        } else if self.cursor_row >= self.viewport_row.saturating_add(visible_rows) {
            self.viewport_row = self.cursor_row - visible_rows + 1;
        }
    }

    /// Enter insert mode with the cell's real value in the buffer
    pub fn enter_edit_mode(&mut self) {
        self.edit_buffer = self.doc.real_value(self.current_location());
        self.edit_cursor = self.edit_buffer.len();
        self.mode = Mode::Insert;
    }

    /// Enter insert mode with `text` replacing the cell's contents
    pub fn enter_edit_mode_with(&mut self, text: &str) {
        self.edit_buffer = text.to_string();
        self.edit_cursor = self.edit_buffer.len();
        self.mode = Mode::Insert;
    }

    /// Commit the current edit and move down, like pressing Enter in a spreadsheet
    pub fn commit_edit(&mut self) {
        let loc = self.current_location();
        self.doc.set_cell_from_input(loc, &self.edit_buffer);
        self.edit_buffer.clear();
        self.edit_cursor = 0;
        self.mode = Mode::Normal;
        self.move_cursor(1, 0);
    }

    pub fn cancel_edit(&mut self) {
        self.edit_buffer.clear();
        self.edit_cursor = 0;
        self.mode = Mode::Normal;
    }

    pub fn clear_current_cell(&mut self) {
        self.doc.clear_cell(self.current_location());
    }

    pub fn undo(&mut self) {
        match self.doc.undo() {
            Ok(()) => self.status_message = "Undone".to_string(),
            Err(e) => self.status_message = e.to_string(),
        }
    }

    pub fn redo(&mut self) {
        match self.doc.redo() {
            Ok(()) => self.status_message = "Redone".to_string(),
            Err(e) => self.status_message = e.to_string(),
        }
    }

    pub fn enter_visual_mode(&mut self) {
        self.selection_anchor = Some(self.current_location());
        self.mode = Mode::Visual;
        self.status_message = "-- VISUAL --".to_string();
    }

    pub fn exit_visual_mode(&mut self) {
        self.selection_anchor = None;
        self.mode = Mode::Normal;
        self.status_message.clear();
    }

    /// Current selection if in visual mode
    pub fn selection(&self) -> Option<Range> {
        let anchor = self.selection_anchor?;
        Some(Range::new(anchor, self.current_location()))
    }

    /// Yank current cell or selection to clipboard
    pub fn yank(&mut self) {
        match self.selection() {
            Some(range) if range.len().is_none_or(|len| len > MAX_RANGE_CELLS) => {
                self.status_message =
                    format!("Selection too large to yank (max {} cells)", MAX_RANGE_CELLS);
            }
            Some(range) => {
                self.clipboard = Some(self.doc.copy_range(range.start, range.end));
                self.exit_visual_mode();
                self.status_message =
                    format!("Yanked {}x{} cells", range.height(), range.width());
            }
            None => {
                let loc = self.current_location();
                self.clipboard = Some(self.doc.copy_range(loc, loc));
                self.status_message = "Yanked cell".to_string();
            }
        }
    }

    /// Paste clipboard at current cursor position
    pub fn paste(&mut self) {
        let Some(block) = self.clipboard.clone() else {
            self.status_message = "Nothing to paste".to_string();
            return;
        };
        self.doc.paste(self.current_location(), &block);
        let count: usize = block.iter().map(Vec::len).sum();
        self.status_message = format!("Pasted {} cells", count);
    }

    /// Clear every cell in the visual selection
    pub fn delete_selection(&mut self) {
        if let Some(range) = self.selection() {
            self.doc.clear_range(range.start, range.end);
            self.exit_visual_mode();
            self.status_message = format!("Cleared {}", range);
        }
    }

    pub fn get_column_width(&self, col: usize) -> usize {
        *self.column_widths.get(&col).unwrap_or(&self.col_width)
    }

    /// Set width for a column, clamped to a reasonable range
    pub fn set_column_width(&mut self, col: usize, width: usize) -> usize {
        let width = width.clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH);
        self.column_widths.insert(col, width);
        width
    }

    /// Jump to a specific cell label
    pub fn goto_cell(&mut self, label: &str) {
        match Location::parse(label.trim()) {
            Some(loc) => {
                self.cursor_row = loc.row;
                self.cursor_col = loc.col;
                self.update_viewport();
                self.status_message = format!("Jumped to {}", loc);
            }
            None => self.status_message = format!("Invalid cell reference: {}", label),
        }
    }

    /// Go to the last row with data
    pub fn goto_last(&mut self) {
        let (rows, _) = self.doc.grid.used_extent();
        self.cursor_row = rows.saturating_sub(1);
        self.update_viewport();
    }

    /// Run the command in the command buffer. Sets `should_quit` for `:q` and friends.
    pub fn execute_command(&mut self) {
        let cmd = self.command_buffer.trim().to_string();
        self.command_buffer.clear();
        self.command_cursor = 0;
        self.mode = Mode::Normal;

        let (command, args) = match cmd.split_once(' ') {
            Some((command, args)) => (command, Some(args.trim()).filter(|a| !a.is_empty())),
            None => (cmd.as_str(), None),
        };

        match command {
            "q" | "quit" => {
                if self.doc.modified {
                    self.status_message =
                        "Unsaved changes! Use :q! to force quit or :wq to save and quit"
                            .to_string();
                } else {
                    self.should_quit = true;
                }
            }
            "q!" => self.should_quit = true,
            "w" | "save" => {
                self.save_file(args.map(PathBuf::from));
            }
            "wq" | "x" => {
                self.save_file(args.map(PathBuf::from));
                if !self.doc.modified {
                    self.should_quit = true;
                }
            }
            "e" | "open" => match args {
                Some(path) => {
                    let path = PathBuf::from(path);
                    match self.doc.load_file(&path) {
                        Ok(()) => {
                            self.cursor_row = 0;
                            self.cursor_col = 0;
                            self.update_viewport();
                            self.status_message = format!("Loaded {}", path.display());
                        }
                        Err(e) => self.status_message = format!("Error: {}", e),
                    }
                }
                None => self.status_message = "Usage: :e <path>".to_string(),
            },
            "goto" | "g" => match args {
                Some(label) => self.goto_cell(label),
                None => {
                    self.status_message = "Usage: :goto CELL (e.g., :goto A100)".to_string()
                }
            },
            "colwidth" | "cw" => self.colwidth_command(args),
            "help" | "h" => {
                self.help_modal = true;
                self.help_scroll = 0;
            }
            "" => {}
            _ => self.status_message = format!("Unknown command: {}", command),
        }
    }

    fn colwidth_command(&mut self, args: Option<&str>) {
        const USAGE: &str = "Usage: :colwidth [COL] WIDTH";
        let parts: Vec<&str> = args.map(|a| a.split_whitespace().collect()).unwrap_or_default();
        let (col, width) = match parts.as_slice() {
            [width] => (Some(self.cursor_col), width.parse::<usize>().ok()),
            [col, width] => (parse_column_letters(col), width.parse::<usize>().ok()),
            _ => {
                self.status_message = USAGE.to_string();
                return;
            }
        };
        match (col, width) {
            (Some(col), Some(width)) => {
                let width = self.set_column_width(col, width);
                self.status_message = format!(
                    "Column {} width set to {}",
                    Location::col_to_letters(col),
                    width
                );
            }
            (None, _) => self.status_message = "Invalid column".to_string(),
            (_, None) => self.status_message = "Invalid width".to_string(),
        }
    }

    /// Save to `path`, or to the current file when `None`
    pub fn save_file(&mut self, path: Option<PathBuf>) {
        let result = match path {
            Some(path) => self.doc.save_as(&path),
            None => self.doc.save_file(),
        };
        self.status_message = match result {
            Ok(path) => format!("Saved to {}", path.display()),
            Err(tallysheet_core::TallyError::NoFilePath) => {
                "No file path. Use :w <path>".to_string()
            }
            Err(e) => format!("Error saving: {}", e),
        };
    }
}

/// `B` -> 1, `aa` -> 26
fn parse_column_letters(s: &str) -> Option<usize> {
    Location::parse(&format!("{}1", s)).map(|loc| loc.col)
}
