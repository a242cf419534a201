//! Interactive terminal front end.

mod actions;
mod app;
mod help;
mod input;
mod ui;

pub use app::App;

use anyhow::Context;
use crossterm::{
    ExecutableCommand,
    event::{DisableMouseCapture, EnableMouseCapture},
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::stdout;

/// Take over the terminal and run the editor until the user quits.
/// The terminal is restored even if drawing fails.
pub fn run(app: &mut App) -> anyhow::Result<()> {
    terminal::enable_raw_mode().context("failed to enable raw mode")?;

    struct Cleanup;
    impl Drop for Cleanup {
        fn drop(&mut self) {
            let _ = stdout().execute(DisableMouseCapture);
            let _ = stdout().execute(LeaveAlternateScreen);
            let _ = terminal::disable_raw_mode();
        }
    }
    let _cleanup = Cleanup;

    stdout()
        .execute(EnterAlternateScreen)
        .context("failed to enter alternate screen")?;
    stdout()
        .execute(EnableMouseCapture)
        .context("failed to enable mouse capture")?;

    let mut terminal =
        Terminal::new(CrosstermBackend::new(stdout())).context("failed to create terminal")?;
    input::run_app(&mut terminal, app).context("terminal error")?;
    tracing::debug!(modified = app.doc.modified, "editor closed");
    Ok(())
}
