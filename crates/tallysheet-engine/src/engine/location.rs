//! Cell locations and rectangular ranges.
//!
//! Converts between spreadsheet labels ("A1", "B7", "AA100") and zero-indexed
//! `(row, col)` coordinates.
//!
//! # Examples
//!
//! ```
//! use tallysheet_engine::engine::Location;
//!
//! let loc = Location::parse("B3").unwrap();
//! assert_eq!(loc.row, 2);
//! assert_eq!(loc.col, 1);
//! assert_eq!(loc.to_string(), "B3");
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

use crate::error::FormulaError;

fn label_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(?<letters>[A-Za-z]+)(?<digits>[0-9]+)$").unwrap())
}

/// Rows a sheet can address (labels `1` through `1048576`).
pub const MAX_ROWS: usize = 1_048_576;
/// Columns a sheet can address (labels `A` through `XFD`).
pub const MAX_COLS: usize = 16_384;

/// A cell position, zero-indexed in both dimensions.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Location {
    pub row: usize,
    pub col: usize,
}

impl Location {
    pub fn new(row: usize, col: usize) -> Location {
        Location { row, col }
    }

    /// Parse a label such as `b12`. Row 0 and labels past `MAX_ROWS`/`MAX_COLS`
    /// are rejected.
    pub fn parse(label: &str) -> Option<Location> {
        let caps = label_regex().captures(label)?;

        let mut col_acc = 0usize;
        for c in caps["letters"].to_ascii_uppercase().bytes() {
            let digit = (c - b'A') as usize + 1;
            col_acc = col_acc.checked_mul(26)?.checked_add(digit)?;
        }
        let col = col_acc.checked_sub(1)?;
        let row = caps["digits"].parse::<usize>().ok()?.checked_sub(1)?;

        let loc = Location::new(row, col);
        loc.in_bounds().then_some(loc)
    }

    /// Whether the location lies inside the addressable sheet.
    pub fn in_bounds(&self) -> bool {
        self.row < MAX_ROWS && self.col < MAX_COLS
    }

    /// Column index to letters (0 -> A, 25 -> Z, 26 -> AA).
    pub fn col_to_letters(col: usize) -> String {
        let mut result = String::new();
        let mut n = col as u128 + 1;
        while n > 0 {
            n -= 1;
            result.insert(0, (b'A' + (n % 26) as u8) as char);
            n /= 26;
        }
        result
    }

    pub fn label(&self) -> String {
        self.to_string()
    }

    /// Move by a signed offset, clamping to the addressable sheet.
    pub fn offset(&self, rows: isize, cols: isize) -> Location {
        Location::new(
            self.row.saturating_add_signed(rows).min(MAX_ROWS - 1),
            self.col.saturating_add_signed(cols).min(MAX_COLS - 1),
        )
    }
}

impl std::str::FromStr for Location {
    type Err = FormulaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Location::parse(s.trim())
            .ok_or_else(|| FormulaError::syntax(format!("Invalid cell location: {}", s)))
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", Location::col_to_letters(self.col), self.row + 1)
    }
}

/// Largest number of cells a single range argument may expand to.
pub const MAX_RANGE_CELLS: usize = 1_000_000;

/// An inclusive rectangle of cells. Corners are normalized on construction,
/// so `B3:A1` and `A1:B3` describe the same range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Range {
    pub start: Location,
    pub end: Location,
}

impl Range {
    pub fn new(a: Location, b: Location) -> Range {
        Range {
            start: Location::new(a.row.min(b.row), a.col.min(b.col)),
            end: Location::new(a.row.max(b.row), a.col.max(b.col)),
        }
    }

    /// Parse `LOC1:LOC2`. Returns `None` when the text is not shaped like a range.
    pub fn parse(text: &str) -> Option<Range> {
        let (a, b) = text.split_once(':')?;
        let a = Location::parse(a.trim())?;
        let b = Location::parse(b.trim())?;
        Some(Range::new(a, b))
    }

    pub fn height(&self) -> usize {
        self.end.row - self.start.row + 1
    }

    pub fn width(&self) -> usize {
        self.end.col - self.start.col + 1
    }

    /// Cell count, or `None` if it does not fit in a `usize`.
    pub fn len(&self) -> Option<usize> {
        self.height().checked_mul(self.width())
    }

    pub fn contains(&self, loc: Location) -> bool {
        (self.start.row..=self.end.row).contains(&loc.row)
            && (self.start.col..=self.end.col).contains(&loc.col)
    }

    /// Row-major walk over every location in the rectangle.
    pub fn locations(&self) -> impl Iterator<Item = Location> + '_ {
        (self.start.row..=self.end.row).flat_map(move |row| {
            (self.start.col..=self.end.col).map(move |col| Location::new(row, col))
        })
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_labels() {
        assert_eq!(Location::parse("A1"), Some(Location::new(0, 0)));
        assert_eq!(Location::parse("b7"), Some(Location::new(6, 1)));
        assert_eq!(Location::parse("AA100"), Some(Location::new(99, 26)));
        assert_eq!(Location::parse("A0"), None);
        assert_eq!(Location::parse("1A"), None);
        assert_eq!(Location::parse("A"), None);
        assert_eq!(Location::parse(""), None);
        assert_eq!(Location::parse("A1B"), None);
    }

    #[test]
    fn test_parse_overflow_returns_none() {
        let huge = format!("{}1", "Z".repeat(40));
        assert!(Location::parse(&huge).is_none());
        let huge_row = format!("A{}", "9".repeat(40));
        assert!(Location::parse(&huge_row).is_none());
    }

    #[test]
    fn test_parse_rejects_labels_past_sheet_limits() {
        assert_eq!(Location::parse("ZZZZZZZZZZZZ1"), None);
        assert_eq!(
            Location::parse("XFD1048576"),
            Some(Location::new(MAX_ROWS - 1, MAX_COLS - 1))
        );
        assert_eq!(Location::parse("XFE1"), None);
        assert_eq!(Location::parse("A1048577"), None);
        assert!(Range::parse("A1:XFE1").is_none());
    }

    #[test]
    fn test_label_round_trip() {
        for (row, col) in [(0, 0), (6, 1), (99, 25), (0, 26), (41, 701), (3, 702)] {
            let loc = Location::new(row, col);
            assert_eq!(Location::parse(&loc.label()), Some(loc));
        }
        assert_eq!(Location::col_to_letters(701), "ZZ");
        assert_eq!(Location::col_to_letters(702), "AAA");
    }

    #[test]
    fn test_col_to_letters_handles_max_usize() {
        let letters = Location::col_to_letters(usize::MAX);
        assert!(!letters.is_empty());
        assert!(letters.chars().all(|c| c.is_ascii_uppercase()));
    }

    #[test]
    fn test_from_str_reports_syntax_error() {
        let err = "nope".parse::<Location>().unwrap_err();
        assert_eq!(err.short_code(), "#SYNTAX");
        assert_eq!(" c3 ".parse::<Location>(), Ok(Location::new(2, 2)));
    }

    #[test]
    fn test_offset_clamps_at_origin() {
        let loc = Location::new(1, 1);
        assert_eq!(loc.offset(-5, 2), Location::new(0, 3));
        assert_eq!(
            loc.offset(isize::MAX, isize::MAX),
            Location::new(MAX_ROWS - 1, MAX_COLS - 1)
        );
    }

    #[test]
    fn test_range_normalizes_corners() {
        let range = Range::parse("B3:A1").unwrap();
        assert_eq!(range.start, Location::new(0, 0));
        assert_eq!(range.end, Location::new(2, 1));
        assert_eq!(range.len(), Some(6));
        assert_eq!(range.to_string(), "A1:B3");
    }

    #[test]
    fn test_range_locations_are_row_major() {
        let range = Range::parse("A1:B2").unwrap();
        let labels: Vec<String> = range.locations().map(|l| l.label()).collect();
        assert_eq!(labels, vec!["A1", "B1", "A2", "B2"]);
        assert!(range.contains(Location::new(1, 1)));
        assert!(!range.contains(Location::new(2, 0)));
    }

    #[test]
    fn test_range_rejects_malformed_corners() {
        assert_eq!(Range::parse("A1"), None);
        assert_eq!(Range::parse("A1:ZZ"), None);
        assert_eq!(Range::parse("A1:B2:C3"), None);
    }
}
