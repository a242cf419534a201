//! UI rendering

use super::app::{App, Mode};
use super::help::{commands_help, functions_help, keys_help};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap},
};
use tallysheet_core::Location;
use tallysheet_engine::engine::{MAX_COLS, MAX_ROWS};

pub(crate) const FORMULA_BAR_HEIGHT: u16 = 3;
pub(crate) const GRID_MIN_HEIGHT: u16 = 10;
pub(crate) const STATUS_BAR_HEIGHT: u16 = 1;
pub(crate) const ROW_HEADER_WIDTH: u16 = 7;
pub(crate) const GRID_COLUMN_SPACING: u16 = 1;

pub(crate) fn split_main_chunks(area: Rect) -> [Rect; 3] {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(FORMULA_BAR_HEIGHT),
            Constraint::Min(GRID_MIN_HEIGHT),
            Constraint::Length(STATUS_BAR_HEIGHT),
        ])
        .split(area);
    [chunks[0], chunks[1], chunks[2]]
}

/// How many columns starting at the viewport fit in `available` chars.
pub(crate) fn columns_that_fit(app: &App, available: usize) -> usize {
    let mut used = 0;
    let mut count = 0;
    loop {
        let width = app.get_column_width(app.viewport_col + count) + GRID_COLUMN_SPACING as usize;
        if used + width > available {
            break;
        }
        used += width;
        count += 1;
    }
    count.max(1)
}

/// Map a mouse position to the grid cell under it, if any.
pub(crate) fn grid_cell_at(
    app: &App,
    grid_area: Rect,
    mouse_col: u16,
    mouse_row: u16,
) -> Option<Location> {
    let inner_x = grid_area.x.saturating_add(1);
    let inner_y = grid_area.y.saturating_add(1);
    let inner_right = inner_x.saturating_add(grid_area.width.saturating_sub(2));
    let inner_bottom = inner_y.saturating_add(grid_area.height.saturating_sub(2));

    if mouse_col < inner_x
        || mouse_col >= inner_right
        || mouse_row < inner_y
        || mouse_row >= inner_bottom
    {
        return None;
    }

    // Header row contains column letters, not data cells.
    if mouse_row == inner_y {
        return None;
    }

    let rel_row = (mouse_row - inner_y - 1) as usize;
    if rel_row >= app.visible_rows {
        return None;
    }
    let row = app.viewport_row + rel_row;
    if row >= MAX_ROWS {
        return None;
    }

    let mut x = inner_x.saturating_add(ROW_HEADER_WIDTH + GRID_COLUMN_SPACING);
    if mouse_col < x {
        return None;
    }

    for offset in 0..app.visible_cols {
        let col = app.viewport_col + offset;
        if col >= MAX_COLS {
            return None;
        }
        let cell_end = x.saturating_add(app.get_column_width(col) as u16);
        if mouse_col >= x && mouse_col < cell_end {
            return Some(Location::new(row, col));
        }
        x = cell_end.saturating_add(GRID_COLUMN_SPACING);
        if mouse_col < x || x >= inner_right {
            return None;
        }
    }

    None
}

/// Draw the application UI
pub fn draw(f: &mut Frame, app: &mut App) {
    let chunks = split_main_chunks(f.area());

    // Update visible dimensions based on actual size
    let grid_area = chunks[1];
    let available_width = grid_area
        .width
        .saturating_sub(ROW_HEADER_WIDTH + GRID_COLUMN_SPACING + 2) as usize;
    let available_height = grid_area.height.saturating_sub(3) as usize; // header + borders

    app.visible_cols = columns_that_fit(app, available_width);
    app.visible_rows = available_height.max(1);
    app.update_viewport();

    draw_formula_bar(f, app, chunks[0]);
    draw_grid(f, app, chunks[1]);
    draw_status_bar(f, app, chunks[2]);

    if app.help_modal {
        draw_help_modal(f, app);
    }
}

fn draw_formula_bar(f: &mut Frame, app: &App, area: Rect) {
    let loc = app.current_location();

    let content = match app.mode {
        Mode::Insert => {
            // Insert cursor marker at cursor position
            let (before, after) = app.edit_buffer.split_at(app.edit_cursor);
            format!("{}: {}│{}", loc, before, after)
        }
        Mode::Command => {
            let (before, after) = app.command_buffer.split_at(app.command_cursor);
            format!(":{}│{}", before, after)
        }
        Mode::Visual => match app.selection() {
            Some(range) => format!("{} ({})", loc, range),
            None => loc.to_string(),
        },
        Mode::Normal => {
            let value = app.doc.real_value(loc);
            if value.is_empty() {
                format!("{}: (empty)", loc)
            } else {
                format!("{}: {}", loc, value)
            }
        }
    };

    let title = match app.mode {
        Mode::Insert => " Insert ",
        Mode::Command => " Command ",
        Mode::Visual => " Visual ",
        Mode::Normal => " Cell ",
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(match app.mode {
            Mode::Insert => Color::Yellow,
            Mode::Command => Color::Cyan,
            Mode::Visual => Color::Magenta,
            Mode::Normal => Color::White,
        }));

    f.render_widget(Paragraph::new(content).block(block), area);
}

fn header_style(active: bool) -> Style {
    if active {
        Style::default()
            .fg(Color::Black)
            .bg(Color::White)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

fn draw_grid(f: &mut Frame, app: &App, area: Rect) {
    let cols = app.viewport_col..(app.viewport_col + app.visible_cols).min(MAX_COLS);
    let selection = app.selection();

    let mut header_cells = vec![Cell::from(" ")]; // Corner
    for col in cols.clone() {
        let name = Location::col_to_letters(col);
        let width = app.get_column_width(col);
        header_cells.push(
            Cell::from(format!("{:^width$}", name, width = width))
                .style(header_style(col == app.cursor_col)),
        );
    }
    let header = Row::new(header_cells).height(1);

    let mut rows = Vec::new();
    for row in app.viewport_row..(app.viewport_row + app.visible_rows).min(MAX_ROWS) {
        let mut cells = vec![
            Cell::from(format!("{:>7}", row + 1)).style(header_style(row == app.cursor_row)),
        ];

        for col in cols.clone() {
            let loc = Location::new(row, col);
            let display = app.doc.display(loc, app.get_column_width(col));

            let is_cursor = loc == app.current_location();
            let is_selected = selection.is_some_and(|range| range.contains(loc));

            let style = if is_cursor {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else if is_selected {
                Style::default().fg(Color::White).bg(Color::Blue)
            } else if display.trim_start().starts_with('#') && app.doc.cell(loc).is_numeric() {
                Style::default().fg(Color::Red)
            } else {
                Style::default()
            };

            cells.push(Cell::from(display).style(style));
        }

        rows.push(Row::new(cells));
    }

    let mut widths = vec![Constraint::Length(ROW_HEADER_WIDTH)];
    widths.extend(cols.map(|col| Constraint::Length(app.get_column_width(col) as u16)));

    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(" Tallysheet "))
        .column_spacing(GRID_COLUMN_SPACING);

    f.render_widget(table, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

pub(crate) fn status_line(app: &App) -> String {
    if !app.status_message.is_empty() {
        return app.status_message.clone();
    }
    let file_info = match (&app.doc.file_path, app.doc.modified) {
        (Some(path), true) => format!("{} [+]", path.display()),
        (Some(path), false) => path.display().to_string(),
        (None, true) => "[New File] [+]".to_string(),
        (None, false) => "[New File]".to_string(),
    };
    format!("{}  |  :help for keys and functions", file_info)
}

fn draw_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let style = if app.status_message.starts_with("Error") {
        Style::default().fg(Color::Red)
    } else if !app.status_message.is_empty() {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let paragraph = Paragraph::new(Line::from(vec![Span::styled(status_line(app), style)]));
    f.render_widget(paragraph, area);
}

fn draw_help_modal(f: &mut Frame, app: &App) {
    let area = centered_rect(80, 80, f.area());
    let modal_style = Style::default().fg(Color::White).bg(Color::Black);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help (Esc to close) ")
        .border_style(Style::default().fg(Color::Green))
        .style(modal_style);

    let mut lines: Vec<Line> = Vec::new();
    for section in [keys_help(), commands_help(), functions_help()] {
        if !lines.is_empty() {
            lines.push(Line::from(""));
        }
        for text in section {
            let style = if text.starts_with("  ") {
                Style::default().fg(Color::White)
            } else {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            };
            lines.push(Line::from(Span::styled(text, style)));
        }
    }

    let viewport_height = area.height.saturating_sub(2) as usize;
    let max_scroll = lines.len().saturating_sub(viewport_height);
    let scroll_y = u16::try_from(app.help_scroll.min(max_scroll)).unwrap_or(u16::MAX);

    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(modal_style)
        .scroll((scroll_y, 0))
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, area);
    f.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use pretty_assertions::assert_eq;
    use tallysheet_core::Document;

    fn app() -> App {
        let mut app = App::new(Document::new(), &Config::default());
        app.visible_cols = 4;
        app.visible_rows = 4;
        app
    }

    fn first_body_cell_point(grid_area: Rect) -> (u16, u16) {
        (
            grid_area.x + 1 + ROW_HEADER_WIDTH + GRID_COLUMN_SPACING,
            grid_area.y + 2,
        )
    }

    #[test]
    fn grid_cell_at_maps_first_visible_cell_to_viewport_origin() {
        let mut app = app();
        app.viewport_col = 5;
        app.viewport_row = 7;

        let grid_area = Rect::new(0, 0, 80, 20);
        let (x, y) = first_body_cell_point(grid_area);
        assert_eq!(grid_cell_at(&app, grid_area, x, y), Some(Location::new(7, 5)));
    }

    #[test]
    fn grid_cell_at_uses_custom_widths() {
        let mut app = app();
        app.column_widths.insert(0, 6);

        let grid_area = Rect::new(0, 0, 80, 20);
        let (first_x, y) = first_body_cell_point(grid_area);
        let second_col_start = first_x + 6 + GRID_COLUMN_SPACING;
        assert_eq!(
            grid_cell_at(&app, grid_area, second_col_start, y + 1),
            Some(Location::new(1, 1))
        );
    }

    #[test]
    fn grid_cell_at_ignores_headers_and_spacing() {
        let app = app();
        let grid_area = Rect::new(0, 0, 80, 20);
        let (x, y) = first_body_cell_point(grid_area);

        assert_eq!(grid_cell_at(&app, grid_area, 2, y), None);
        assert_eq!(grid_cell_at(&app, grid_area, x, grid_area.y + 1), None);
        assert_eq!(grid_cell_at(&app, grid_area, x + app.col_width as u16, y), None);
        assert_eq!(grid_cell_at(&app, grid_area, 0, 0), None);
    }

    #[test]
    fn grid_cell_at_stops_at_sheet_edge() {
        let mut app = app();
        app.viewport_col = MAX_COLS - 1;
        app.viewport_row = MAX_ROWS - 1;

        let grid_area = Rect::new(0, 0, 80, 20);
        let (x, y) = first_body_cell_point(grid_area);
        assert_eq!(
            grid_cell_at(&app, grid_area, x, y),
            Some(Location::new(MAX_ROWS - 1, MAX_COLS - 1))
        );
        assert_eq!(grid_cell_at(&app, grid_area, x, y + 1), None);
        let next_col = x + app.col_width as u16 + GRID_COLUMN_SPACING;
        assert_eq!(grid_cell_at(&app, grid_area, next_col, y), None);
    }

    #[test]
    fn columns_that_fit_counts_spacing() {
        let mut app = app();
        // default width 10 + 1 spacing
        assert_eq!(columns_that_fit(&app, 33), 3);
        assert_eq!(columns_that_fit(&app, 32), 2);
        app.column_widths.insert(0, 50);
        assert_eq!(columns_that_fit(&app, 20), 1);
    }

    #[test]
    fn status_line_shows_file_state() {
        let mut app = app();
        assert_eq!(status_line(&app), "[New File]  |  :help for keys and functions");
        app.doc.set_cell_from_input(Location::new(0, 0), "1");
        assert!(status_line(&app).starts_with("[New File] [+]"));
        app.status_message = "Saved".to_string();
        assert_eq!(status_line(&app), "Saved");
    }
}
