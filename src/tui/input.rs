use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::prelude::*;
use std::io;
use std::time::Duration;

use super::actions::{apply_action, handle_text_input, translate};
use super::app::{App, Mode};
use super::ui;

fn handle_mouse_event(app: &mut App, terminal_area: Rect, mouse: MouseEvent) {
    if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
        return;
    }
    if app.help_modal || app.mode != Mode::Normal {
        return;
    }

    let [_formula_area, grid_area, _status_area] = ui::split_main_chunks(terminal_area);
    if let Some(loc) = ui::grid_cell_at(app, grid_area, mouse.column, mouse.row) {
        app.cursor_row = loc.row;
        app.cursor_col = loc.col;
        app.update_viewport();
    }
}

fn handle_help_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => app.help_modal = false,
        KeyCode::Down | KeyCode::Char('j') => app.help_scroll += 1,
        KeyCode::Up | KeyCode::Char('k') => app.help_scroll = app.help_scroll.saturating_sub(1),
        KeyCode::PageDown => app.help_scroll += 12,
        KeyCode::PageUp => app.help_scroll = app.help_scroll.saturating_sub(12),
        KeyCode::Home | KeyCode::Char('g') => app.help_scroll = 0,
        _ => {}
    }
}

/// Dispatch one key press.
pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Only process key press events (Windows reports Press + Release)
    if key.kind != KeyEventKind::Press {
        return;
    }

    if app.help_modal {
        handle_help_key(app, key);
        return;
    }

    if app.mode == Mode::Normal && translate(app.mode, key).is_some() {
        app.status_message.clear();
    }

    match translate(app.mode, key) {
        Some(action) => apply_action(app, action),
        None => match app.mode {
            Mode::Insert => handle_text_input(&mut app.edit_buffer, &mut app.edit_cursor, key),
            Mode::Command => {
                if key.code == KeyCode::Backspace && app.command_buffer.is_empty() {
                    app.mode = Mode::Normal;
                } else {
                    handle_text_input(&mut app.command_buffer, &mut app.command_cursor, key);
                }
            }
            Mode::Normal | Mode::Visual => {}
        },
    }
}

pub fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    while !app.should_quit {
        terminal.draw(|f| ui::draw(f, app))?;

        if !event::poll(Duration::from_millis(100))? {
            continue;
        }
        match event::read()? {
            Event::Key(key) => handle_key(app, key),
            Event::Mouse(mouse) => {
                let size = terminal.size()?;
                handle_mouse_event(app, Rect::new(0, 0, size.width, size.height), mouse);
            }
            _ => {}
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crossterm::event::KeyModifiers;
    use pretty_assertions::assert_eq;
    use tallysheet_core::{Document, Location};

    fn app() -> App {
        let mut app = App::new(Document::new(), &Config::default());
        app.visible_cols = 4;
        app.visible_rows = 4;
        app
    }

    fn press(app: &mut App, code: KeyCode) {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_str(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn left_click(col: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: col,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn typing_a_formula_and_committing() {
        let mut app = app();
        press(&mut app, KeyCode::Char('='));
        assert_eq!(app.mode, Mode::Insert);
        type_str(&mut app, "Add(1, 2)");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.mode, Mode::Normal);
        assert_eq!(app.doc.real_value(Location::new(0, 0)), "=Add(1, 2)");
        assert_eq!(app.cursor_row, 1);
    }

    #[test]
    fn escape_discards_edit() {
        let mut app = app();
        press(&mut app, KeyCode::Char('i'));
        type_str(&mut app, "jk");
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, Mode::Normal);
        assert_eq!(app.doc.real_value(Location::new(0, 0)), "");
    }

    #[test]
    fn command_mode_runs_goto() {
        let mut app = app();
        press(&mut app, KeyCode::Char(':'));
        type_str(&mut app, "goto B3");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.current_location(), Location::new(2, 1));
    }

    #[test]
    fn backspace_on_empty_command_leaves_command_mode() {
        let mut app = app();
        press(&mut app, KeyCode::Char(':'));
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.mode, Mode::Normal);
    }

    #[test]
    fn visual_delete_then_undo() {
        let mut app = app();
        app.doc.set_cell_from_input(Location::new(0, 0), "1");
        app.doc.set_cell_from_input(Location::new(0, 1), "2");
        press(&mut app, KeyCode::Char('v'));
        press(&mut app, KeyCode::Char('l'));
        press(&mut app, KeyCode::Char('d'));
        assert_eq!(app.mode, Mode::Normal);
        assert_eq!(app.doc.real_value(Location::new(0, 1)), "");
        press(&mut app, KeyCode::Char('u'));
        assert_eq!(app.doc.real_value(Location::new(0, 0)), "1");
        assert_eq!(app.doc.real_value(Location::new(0, 1)), "2");
    }

    #[test]
    fn help_modal_takes_over_input() {
        let mut app = app();
        press(&mut app, KeyCode::Char('?'));
        assert!(app.help_modal);
        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.help_scroll, 1);
        assert_eq!(app.cursor_row, 0);
        press(&mut app, KeyCode::Esc);
        assert!(!app.help_modal);
    }

    #[test]
    fn mouse_click_moves_cursor_in_normal_mode_only() {
        let mut app = app();
        let area = Rect::new(0, 0, 80, 24);
        let [_, grid_area, _] = ui::split_main_chunks(area);
        let x = grid_area.x + 1 + ui::ROW_HEADER_WIDTH + ui::GRID_COLUMN_SPACING;
        let y = grid_area.y + 3;

        handle_mouse_event(&mut app, area, left_click(x, y));
        assert_eq!(app.current_location(), Location::new(1, 0));

        app.mode = Mode::Insert;
        handle_mouse_event(&mut app, area, left_click(x, y + 1));
        assert_eq!(app.current_location(), Location::new(1, 0));
    }
}
