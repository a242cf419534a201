//! File formats.

pub mod csv;

pub use csv::{grid_from_csv, parse_csv, read_csv, to_csv, write_csv};
