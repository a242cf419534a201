//! tallysheet_engine - typed cells and the arithmetic formula engine.

pub mod builtins;
pub mod engine;
pub mod error;

pub use error::{FormulaError, Result};
