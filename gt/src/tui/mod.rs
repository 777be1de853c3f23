//! Terminal User Interface for the goal tracker
//!
//! A single-screen dashboard:
//! - Free-text goal entry, interpreted by an LLM in the background
//! - Active goals with live countdowns
//! - Completed and abandoned goal history
//! - Status updates through a picker dialog

mod app;
mod events;
mod runner;
pub mod state;
mod views;

pub use app::App;
pub use events::{Event, EventHandler};
pub use runner::TuiRunner;
pub use state::{AppState, InteractionMode};

use std::io::{self, Stdout};

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use eyre::Result;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::config::TrackerConfig;
use crate::interpret::Interpreter;

/// Terminal type alias
pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Initialize the terminal for TUI mode
pub fn init() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to normal mode
pub fn restore() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(())
}

/// Run the tracker until the user quits
///
/// Without an interpreter the UI still runs, but adding goals reports that no
/// LLM client is configured.
pub async fn run(interpreter: Option<Interpreter>, config: &TrackerConfig) -> Result<()> {
    let terminal = init()?;

    // Restore the terminal even on early return or error
    struct TerminalGuard;
    impl Drop for TerminalGuard {
        fn drop(&mut self) {
            let _ = restore();
        }
    }
    let _guard = TerminalGuard;

    let mut runner = TuiRunner::new(
        terminal,
        interpreter,
        config.tick_rate(),
        config.countdown_interval(),
    );
    runner.run().await
}
