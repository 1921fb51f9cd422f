//! Event handling for the TUI.

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::error::BreatheError;
use crate::tui::app::App;

/// Key help shown in the status bar.
pub const HELP: &str =
    "Enter:start | s:stop | j/k:technique | +/-:cycles | m:sound | q:quit";

/// Action to take after handling an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Quit the application.
    Quit,
    /// Start a session.
    Start,
    /// Stop the session.
    Stop,
    /// Stop if running, otherwise quit.
    StopOrQuit,
    /// Select the next technique.
    Next,
    /// Select the previous technique.
    Previous,
    /// Add a cycle.
    MoreCycles,
    /// Remove a cycle.
    FewerCycles,
    /// Toggle the bell.
    ToggleSound,
}

/// Handle terminal events, waiting at most `timeout` for one.
///
/// Returns an action to take, or None if no action is needed.
///
/// # Errors
///
/// Returns an error if event polling fails.
pub fn handle_events(app: &mut App, timeout: Duration) -> Result<Option<Action>, BreatheError> {
    if event::poll(timeout)
        .map_err(|e| BreatheError::Terminal(format!("Event poll failed: {e}")))?
    {
        if let Event::Key(key) = event::read()
            .map_err(|e| BreatheError::Terminal(format!("Event read failed: {e}")))?
        {
            if key.kind != KeyEventKind::Press {
                return Ok(None);
            }
            if key.code == KeyCode::Char('?') {
                app.status = Some(HELP.to_string());
                return Ok(None);
            }
            return Ok(map_key(key));
        }
    }

    Ok(None)
}

/// Map a key press to an action.
pub fn map_key(key: KeyEvent) -> Option<Action> {
    // Handle Ctrl+C
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    match key.code {
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Esc => Some(Action::StopOrQuit),
        KeyCode::Enter | KeyCode::Char(' ') => Some(Action::Start),
        KeyCode::Char('s') => Some(Action::Stop),
        KeyCode::Char('j') | KeyCode::Down => Some(Action::Next),
        KeyCode::Char('k') | KeyCode::Up => Some(Action::Previous),
        KeyCode::Char('+' | '=') | KeyCode::Right => Some(Action::MoreCycles),
        KeyCode::Char('-') | KeyCode::Left => Some(Action::FewerCycles),
        KeyCode::Char('m') => Some(Action::ToggleSound),
        _ => None,
    }
}
