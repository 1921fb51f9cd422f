//! Audio cues played at each phase change.

use std::io::{self, Write};
use std::time::Duration;

use serde::Serialize;

use crate::technique::Phase;

/// Describes the short tone for a phase.
///
/// Emitters that can synthesize audio follow this envelope; simpler ones
/// (like the terminal bell) only use it as a trigger.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Tone {
    /// Phase the tone belongs to.
    pub phase: Phase,
    /// Starting pitch in Hz.
    pub frequency_hz: f64,
    /// Pitch multiplier reached at the end of the glide.
    pub glide_ratio: f64,
    /// Length of the pitch glide.
    pub glide: Duration,
    /// Peak gain, reached after `attack`.
    pub peak_gain: f64,
    /// Time to reach peak gain.
    pub attack: Duration,
    /// Time at which the gain has decayed to silence.
    pub decay_end: Duration,
    /// Total length before the oscillator stops.
    pub length: Duration,
}

impl Tone {
    /// The cue for a phase: a higher note on inhale, lower on exhale, lowest
    /// on holds.
    #[must_use]
    pub const fn for_phase(phase: Phase) -> Self {
        let frequency_hz = match phase {
            Phase::Inhale => 392.0,
            Phase::Exhale => 330.0,
            Phase::Hold | Phase::HoldAfter => 262.0,
        };

        Self {
            phase,
            frequency_hz,
            glide_ratio: 1.08,
            glide: Duration::from_millis(120),
            peak_gain: 0.08,
            attack: Duration::from_millis(20),
            decay_end: Duration::from_millis(250),
            length: Duration::from_millis(300),
        }
    }

    /// Pitch at the end of the glide.
    #[must_use]
    pub fn glide_target_hz(&self) -> f64 {
        self.frequency_hz * self.glide_ratio
    }
}

/// Plays phase cues.
///
/// Implementations must not block the caller for the length of the tone.
#[cfg_attr(test, mockall::automock)]
pub trait CueEmitter {
    /// Called when a session starts, before the first cue.
    fn prepare(&mut self) {}

    /// Play the cue for a phase.
    fn play(&mut self, tone: &Tone);
}

impl<C: CueEmitter + ?Sized> CueEmitter for Box<C> {
    fn prepare(&mut self) {
        (**self).prepare();
    }

    fn play(&mut self, tone: &Tone) {
        (**self).play(tone);
    }
}

/// Discards every cue.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl CueEmitter for Silent {
    fn play(&mut self, _tone: &Tone) {}
}

/// Rings the terminal bell on each phase change.
///
/// If the terminal cannot be written, the bell disables itself and the
/// session carries on silently.
#[derive(Debug)]
pub struct TerminalBell<W: Write> {
    out: W,
    available: bool,
}

impl TerminalBell<io::Stdout> {
    /// Bell on standard output.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalBell<W> {
    /// Bell writing to any sink.
    pub const fn new(out: W) -> Self {
        Self {
            out,
            available: true,
        }
    }

    /// Whether the bell still works.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.available
    }

    /// The underlying sink.
    pub const fn get_ref(&self) -> &W {
        &self.out
    }

    fn ring(&mut self) -> io::Result<()> {
        self.out.write_all(b"\x07")?;
        self.out.flush()
    }
}

impl<W: Write> CueEmitter for TerminalBell<W> {
    fn play(&mut self, tone: &Tone) {
        if !self.available {
            return;
        }

        if let Err(e) = self.ring() {
            tracing::warn!(phase = %tone.phase, error = %e, "Audio cue unavailable, continuing without sound");
            self.available = false;
        }
    }
}
