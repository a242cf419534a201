//! Help text content for the help modal

use tallysheet_engine::builtins::BUILTINS;

fn lines(text: &[&str]) -> Vec<String> {
    text.iter().map(|s| s.to_string()).collect()
}

/// Key bindings
pub fn keys_help() -> Vec<String> {
    lines(&[
        "Navigation",
        "  h/j/k/l      Move left/down/up/right",
        "  Arrow keys   Move cursor",
        "  PageUp/Down  Scroll by page (also C-u/C-d)",
        "  0 / Home     First column",
        "  g / G        First row / last row with data",
        "  /            Open goto prompt",
        "",
        "Editing",
        "  i / Enter    Edit cell",
        "  c            Replace cell contents",
        "  =            Start a formula",
        "  x / Delete   Clear cell",
        "  Esc          Cancel edit",
        "  u / C-r      Undo / redo",
        "",
        "Selection",
        "  v            Enter visual mode",
        "  y            Yank (copy)",
        "  p            Paste",
        "  d            Clear selection",
        "",
        "Other",
        "  :            Enter command mode",
        "  +/-          Adjust column width",
        "  C-s          Save",
    ])
}

/// Ex-style commands
pub fn commands_help() -> Vec<String> {
    lines(&[
        "Commands",
        "  :w [file]       Save",
        "  :wq             Save and quit",
        "  :q              Quit",
        "  :q!             Force quit",
        "  :e <file>       Open file",
        "  :goto A1        Jump to cell",
        "  :cw [COL] N     Set column width",
        "  :help           Show this help",
    ])
}

/// One line per builtin, from the function table
pub fn functions_help() -> Vec<String> {
    let mut out = vec!["Functions (operators: + - * / ^, cells: A1, ranges: A1:B5)".to_string()];
    out.extend(
        BUILTINS
            .iter()
            .map(|b| format!("  {:<10} {}", b.name, b.description)),
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn functions_help_lists_every_builtin() {
        let help = functions_help();
        assert_eq!(help.len(), BUILTINS.len() + 1);
        assert!(help.iter().any(|line| line.trim_start().starts_with("Average")));
    }
}
