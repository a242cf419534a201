//! CSV import/export.
//!
//! Cells are written as their real values, so formulas survive a round trip
//! as formulas and ambiguous text keeps the quotes that force it to text.

use crate::error::{Result, TallyError};
use std::path::Path;
use tallysheet_engine::engine::{Cell, Grid, Location, MAX_COLS, MAX_ROWS};

/// Split CSV content into records of fields. Quoted fields may contain
/// commas, doubled quotes and line breaks; unquoted fields are trimmed.
pub fn parse_csv(content: &str) -> Result<Vec<Vec<String>>> {
    let mut records = Vec::new();
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut field_was_quoted = false;
    let mut line = 1;
    let mut quote_line = 1;
    let mut chars = content.chars().peekable();

    let end_field = |fields: &mut Vec<String>, current: &mut String, quoted: bool| {
        let field = std::mem::take(current);
        fields.push(if quoted { field } else { field.trim().to_string() });
    };

    while let Some(c) = chars.next() {
        if c == '\n' {
            line += 1;
        }
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                current.push(c);
            }
            continue;
        }
        match c {
            '"' => {
                if current.trim().is_empty() {
                    current.clear();
                }
                in_quotes = true;
                field_was_quoted = true;
                quote_line = line;
            }
            ',' => {
                end_field(&mut fields, &mut current, field_was_quoted);
                field_was_quoted = false;
            }
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                end_field(&mut fields, &mut current, field_was_quoted);
                field_was_quoted = false;
                records.push(std::mem::take(&mut fields));
            }
            _ => current.push(c),
        }
    }

    if in_quotes {
        return Err(TallyError::Parse {
            line: quote_line,
            message: "unterminated quoted field".to_string(),
        });
    }
    if !current.is_empty() || !fields.is_empty() || field_was_quoted {
        end_field(&mut fields, &mut current, field_was_quoted);
        records.push(fields);
    }
    Ok(records)
}

/// Build a grid from CSV content. Empty fields stay empty. Content that does
/// not fit in `MAX_ROWS` x `MAX_COLS` is rejected.
pub fn grid_from_csv(content: &str) -> Result<Grid> {
    let mut grid = Grid::new();
    for (row, fields) in parse_csv(content)?.into_iter().enumerate() {
        for (col, field) in fields.iter().enumerate() {
            if field.is_empty() {
                continue;
            }
            let loc = Location::new(row, col);
            if !loc.in_bounds() {
                return Err(TallyError::Parse {
                    line: row + 1,
                    message: format!(
                        "record exceeds the sheet limit of {} x {}",
                        MAX_ROWS, MAX_COLS
                    ),
                });
            }
            grid.set(loc, Cell::from_input(field));
        }
    }
    Ok(grid)
}

/// Read a CSV file into a grid.
pub fn read_csv(path: &Path) -> Result<Grid> {
    let content = std::fs::read_to_string(path)?;
    let grid = grid_from_csv(&content)?;
    tracing::debug!(
        path = %path.display(),
        rows = grid.height(),
        cols = grid.width(),
        "loaded csv"
    );
    Ok(grid)
}

/// Escape a field for CSV output
fn escape_csv_field(field: &str) -> String {
    if field.contains(',')
        || field.contains('"')
        || field.contains('\n')
        || field.contains('\r')
        || field.trim() != field
    {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Render the used part of a grid (from A1 to the last non-empty cell) as CSV.
pub fn to_csv(grid: &Grid) -> String {
    let (rows, cols) = grid.used_extent();
    let mut out = String::new();
    for row in 0..rows {
        let fields: Vec<String> = (0..cols)
            .map(|col| escape_csv_field(&grid.cell(Location::new(row, col)).real_value()))
            .collect();
        out.push_str(&fields.join(","));
        out.push('\n');
    }
    out
}

/// Write a grid to a CSV file.
pub fn write_csv(path: &Path, grid: &Grid) -> Result<()> {
    std::fs::write(path, to_csv(grid))?;
    tracing::debug!(path = %path.display(), "saved csv");
    Ok(())
}
