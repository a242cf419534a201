use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::{App, Mode};

/// Things a key press can ask the app to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Cancel,
    EnterEdit,
    /// Start editing with an empty buffer
    ChangeCell,
    /// Start editing with `=` already typed
    StartFormula,
    CommitEdit,
    EnterCommand,
    ExecuteCommand,
    EnterVisual,
    Yank,
    Paste,
    DeleteSelection,
    Undo,
    Redo,
    ClearCell,
    Move(isize, isize),
    Page(isize),
    HomeCol,
    GotoFirst,
    GotoLast,
    OpenGotoPrompt,
    IncColWidth,
    DecColWidth,
    Save,
    Help,
}

/// Map a key to an action for the current mode. Text keys in Insert and
/// Command mode return `None` and go to the line editor instead.
pub fn translate(mode: Mode, key: KeyEvent) -> Option<Action> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let action = match mode {
        Mode::Insert => match key.code {
            KeyCode::Esc => Action::Cancel,
            KeyCode::Enter => Action::CommitEdit,
            _ => return None,
        },
        Mode::Command => match key.code {
            KeyCode::Esc => Action::Cancel,
            KeyCode::Enter => Action::ExecuteCommand,
            _ => return None,
        },
        Mode::Normal | Mode::Visual => match key.code {
            KeyCode::Char('r') if ctrl => Action::Redo,
            KeyCode::Char('s') if ctrl => Action::Save,
            KeyCode::Char('d') if ctrl => Action::Page(1),
            KeyCode::Char('u') if ctrl => Action::Page(-1),
            _ if ctrl => return None,
            KeyCode::Esc => Action::Cancel,
            KeyCode::Char('h') | KeyCode::Left => Action::Move(0, -1),
            KeyCode::Char('j') | KeyCode::Down => Action::Move(1, 0),
            KeyCode::Char('k') | KeyCode::Up => Action::Move(-1, 0),
            KeyCode::Char('l') | KeyCode::Right => Action::Move(0, 1),
            KeyCode::Tab => Action::Move(0, 1),
            KeyCode::BackTab => Action::Move(0, -1),
            KeyCode::PageDown => Action::Page(1),
            KeyCode::PageUp => Action::Page(-1),
            KeyCode::Home | KeyCode::Char('0') => Action::HomeCol,
            KeyCode::Char('g') => Action::GotoFirst,
            KeyCode::Char('G') => Action::GotoLast,
            KeyCode::Char(':') => Action::EnterCommand,
            KeyCode::Char('y') => Action::Yank,
            KeyCode::Char('v') if mode == Mode::Normal => Action::EnterVisual,
            KeyCode::Char('v') => Action::Cancel,
            KeyCode::Char('d') | KeyCode::Char('x') | KeyCode::Delete
                if mode == Mode::Visual =>
            {
                Action::DeleteSelection
            }
            _ if mode == Mode::Visual => return None,
            KeyCode::Char('i') | KeyCode::Enter | KeyCode::F(2) => Action::EnterEdit,
            KeyCode::Char('c') => Action::ChangeCell,
            KeyCode::Char('=') => Action::StartFormula,
            KeyCode::Char('x') | KeyCode::Delete | KeyCode::Backspace => Action::ClearCell,
            KeyCode::Char('p') => Action::Paste,
            KeyCode::Char('u') => Action::Undo,
            KeyCode::Char('+') => Action::IncColWidth,
            KeyCode::Char('-') => Action::DecColWidth,
            KeyCode::Char('?') => Action::Help,
            KeyCode::Char('/') => Action::OpenGotoPrompt,
            _ => return None,
        },
    };
    Some(action)
}

/// Apply an action to the application state.
pub fn apply_action(app: &mut App, action: Action) {
    match action {
        Action::Cancel => match app.mode {
            Mode::Insert => app.cancel_edit(),
            Mode::Command => {
                app.mode = Mode::Normal;
                app.command_buffer.clear();
                app.command_cursor = 0;
            }
            Mode::Visual => app.exit_visual_mode(),
            Mode::Normal => app.status_message.clear(),
        },

        Action::EnterEdit => app.enter_edit_mode(),
        Action::ChangeCell => app.enter_edit_mode_with(""),
        Action::StartFormula => app.enter_edit_mode_with("="),
        Action::CommitEdit => app.commit_edit(),
        Action::EnterCommand => {
            if app.mode == Mode::Visual {
                app.exit_visual_mode();
            }
            app.mode = Mode::Command;
            app.command_buffer.clear();
            app.command_cursor = 0;
        }
        Action::ExecuteCommand => app.execute_command(),
        Action::EnterVisual => app.enter_visual_mode(),
        Action::Yank => app.yank(),
        Action::Paste => app.paste(),
        Action::DeleteSelection => app.delete_selection(),
        Action::Undo => app.undo(),
        Action::Redo => app.redo(),
        Action::ClearCell => app.clear_current_cell(),

        Action::Move(drow, dcol) => app.move_cursor(drow, dcol),
        Action::Page(dir) => {
            let delta = app.visible_rows as isize * dir;
            app.move_cursor(delta, 0);
        }
        Action::HomeCol => {
            app.cursor_col = 0;
            app.update_viewport();
        }
        Action::GotoFirst => {
            app.cursor_row = 0;
            app.update_viewport();
        }
        Action::GotoLast => app.goto_last(),
        Action::OpenGotoPrompt => {
            app.mode = Mode::Command;
            app.command_buffer = "goto ".to_string();
            app.command_cursor = app.command_buffer.len();
        }

        Action::IncColWidth => {
            let col = app.cursor_col;
            app.set_column_width(col, app.get_column_width(col) + 1);
        }
        Action::DecColWidth => {
            let col = app.cursor_col;
            app.set_column_width(col, app.get_column_width(col).saturating_sub(1));
        }
        Action::Save => app.save_file(None),
        Action::Help => {
            app.help_modal = true;
            app.help_scroll = 0;
        }
    }
}

/// Handle text editing operations on a buffer with UTF-8 aware cursor movement.
pub fn handle_text_input(buffer: &mut String, cursor: &mut usize, key: KeyEvent) {
    match key.code {
        KeyCode::Left => {
            if *cursor > 0 {
                let mut new_pos = *cursor - 1;
                while new_pos > 0 && !buffer.is_char_boundary(new_pos) {
                    new_pos -= 1;
                }
                *cursor = new_pos;
            }
        }
        KeyCode::Right => {
            if *cursor < buffer.len() {
                let mut new_pos = *cursor + 1;
                while new_pos < buffer.len() && !buffer.is_char_boundary(new_pos) {
                    new_pos += 1;
                }
                *cursor = new_pos;
            }
        }
        KeyCode::Home => *cursor = 0,
        KeyCode::End => *cursor = buffer.len(),
        KeyCode::Backspace => {
            if *cursor > 0 {
                let mut del_start = *cursor - 1;
                while del_start > 0 && !buffer.is_char_boundary(del_start) {
                    del_start -= 1;
                }
                buffer.drain(del_start..*cursor);
                *cursor = del_start;
            }
        }
        KeyCode::Delete => {
            if *cursor < buffer.len() {
                let mut del_end = *cursor + 1;
                while del_end < buffer.len() && !buffer.is_char_boundary(del_end) {
                    del_end += 1;
                }
                buffer.drain(*cursor..del_end);
            }
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            buffer.drain(..*cursor);
            *cursor = 0;
        }
        KeyCode::Char(c) => {
            if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT {
                buffer.insert(*cursor, c);
                *cursor += c.len_utf8();
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn text_input_respects_char_boundaries() {
        let mut buffer = String::new();
        let mut cursor = 0;
        for c in "a€b".chars() {
            handle_text_input(&mut buffer, &mut cursor, key(KeyCode::Char(c)));
        }
        assert_eq!(cursor, buffer.len());

        handle_text_input(&mut buffer, &mut cursor, key(KeyCode::Left));
        handle_text_input(&mut buffer, &mut cursor, key(KeyCode::Left));
        assert_eq!(cursor, 1);
        handle_text_input(&mut buffer, &mut cursor, key(KeyCode::Delete));
        assert_eq!(buffer, "ab");

        handle_text_input(&mut buffer, &mut cursor, key(KeyCode::End));
        handle_text_input(&mut buffer, &mut cursor, key(KeyCode::Backspace));
        assert_eq!(buffer, "a");
        assert_eq!(cursor, 1);
    }

    #[test]
    fn text_input_ignores_control_chars() {
        let mut buffer = "abc".to_string();
        let mut cursor = 2;
        handle_text_input(&mut buffer, &mut cursor, ctrl('x'));
        assert_eq!(buffer, "abc");
        handle_text_input(&mut buffer, &mut cursor, ctrl('u'));
        assert_eq!(buffer, "c");
        assert_eq!(cursor, 0);
    }

    #[test]
    fn translate_depends_on_mode() {
        assert_eq!(
            translate(Mode::Normal, key(KeyCode::Char('j'))),
            Some(Action::Move(1, 0))
        );
        assert_eq!(translate(Mode::Normal, ctrl('r')), Some(Action::Redo));
        assert_eq!(translate(Mode::Normal, key(KeyCode::Char('x'))), Some(Action::ClearCell));
        assert_eq!(
            translate(Mode::Visual, key(KeyCode::Char('x'))),
            Some(Action::DeleteSelection)
        );
        assert_eq!(translate(Mode::Visual, key(KeyCode::Char('p'))), None);
        assert_eq!(translate(Mode::Insert, key(KeyCode::Char('j'))), None);
        assert_eq!(translate(Mode::Insert, key(KeyCode::Enter)), Some(Action::CommitEdit));
        assert_eq!(
            translate(Mode::Command, key(KeyCode::Enter)),
            Some(Action::ExecuteCommand)
        );
    }
}
