//! Phase sequencing for breathing sessions.
//!
//! The [`Sequencer`] owns the session state and walks it through the
//! technique's steps:
//! - a single-shot phase timer drives every transition
//! - a periodic countdown timer refreshes the remaining time
//! - both timers are cancelled together and tagged with a session generation
//!
//! Rendering and sound are delegated to [`Presenter`] and [`CueEmitter`].

mod cue;
mod engine;
mod presenter;
mod timers;

pub use cue::{CueEmitter, Silent, TerminalBell, Tone};
pub use engine::{Sequencer, SequencerState, Session, DEFAULT_COUNTDOWN_INTERVAL};
pub use presenter::{
    cycle_text, format_countdown, Gradient, OrbStyle, PhaseView, Presenter, Rgb,
    TechniqueSummary, IDLE_LABEL, IDLE_TRANSITION, MIN_TRANSITION,
};
