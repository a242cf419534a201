//! Spreadsheet engine API.
//!
//! - [`Cell`], [`FormulaCell`] - typed cell values and input classification
//! - [`Grid`] - growable row-major cell storage
//! - [`Location`], [`Range`] - A1 labels and rectangles
//! - [`tokenize`], [`shunting_yard`], [`build`] - formula text to [`Term`]
//! - [`Evaluator`] - pull-based evaluation with cycle detection
//! - [`fit_left`], [`fit_right`], [`format_number`] - fixed-width display

mod cell;
mod eval;
mod format;
mod formula;
mod grid;
mod location;
mod shunting_yard;
mod tokenize;

pub use cell::{Cell, FormulaCell, parse_decimal};
pub use eval::Evaluator;
pub use format::{fit_left, fit_right, fit_right_ellipsis, format_number};
pub use formula::{Call, Term, build};
pub use grid::Grid;
pub use location::{Location, MAX_COLS, MAX_RANGE_CELLS, MAX_ROWS, Range};
pub use shunting_yard::{Operator, postfix_to_call, shunting_yard, to_postfix};
pub use tokenize::{has_top_level_operator, tokenize};

pub use rust_decimal::Decimal;
