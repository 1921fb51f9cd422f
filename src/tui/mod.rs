//! Terminal User Interface (TUI) for breathe.
//!
//! Draws the breathing orb over a warm gradient and drives the sequencer
//! from the event loop. Built with ratatui and crossterm.

mod app;
mod event;
mod orb;
mod ui;

pub use app::{App, Screen};
pub use orb::OrbAnimation;

use std::io;
use std::time::Instant;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;

use crate::config::SessionConfig;
use crate::error::BreatheError;
use crate::sequencer::TerminalBell;
use crate::technique::Catalog;

/// Run the TUI application.
///
/// `status` is shown in the status bar on launch, e.g. a catalog that
/// failed to load.
///
/// # Errors
///
/// Returns an error if the TUI fails to initialize or run.
pub fn run(
    catalog: Catalog,
    config: &SessionConfig,
    initial: Option<&str>,
    mute: bool,
    status: Option<String>,
) -> Result<(), BreatheError> {
    let config = SessionConfig {
        sound: config.sound && !mute,
        ..config.clone()
    };

    // Setup terminal
    enable_raw_mode()
        .map_err(|e| BreatheError::Terminal(format!("Failed to enable raw mode: {e}")))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)
        .map_err(|e| BreatheError::Terminal(format!("Failed to setup terminal: {e}")))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)
        .map_err(|e| BreatheError::Terminal(format!("Failed to create terminal: {e}")))?;

    // Create app state and run main loop
    let mut app = App::new(catalog, &config, initial, Box::new(TerminalBell::stdout()));
    if status.is_some() {
        app.status = status;
    }
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    app.stop();
    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();

    result
}

/// Run the main application loop.
fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), BreatheError> {
    while !app.should_quit {
        // Draw UI
        terminal
            .draw(|frame| ui::render(frame, app))
            .map_err(|e| BreatheError::Terminal(format!("Failed to draw: {e}")))?;

        // Handle events
        let timeout = app.poll_timeout(Instant::now());
        if let Some(action) = event::handle_events(app, timeout)? {
            match action {
                event::Action::Quit => app.should_quit = true,
                event::Action::Start => app.start(Instant::now()),
                event::Action::Stop => app.stop(),
                event::Action::StopOrQuit => app.stop_or_quit(),
                event::Action::Next => app.select_next(),
                event::Action::Previous => app.select_previous(),
                event::Action::MoreCycles => app.more_cycles(),
                event::Action::FewerCycles => app.fewer_cycles(),
                event::Action::ToggleSound => app.toggle_sound(),
            }
        }

        app.tick(Instant::now());
    }

    Ok(())
}
