//! Application state for the TUI.

use std::time::{Duration, Instant};

use crate::config::SessionConfig;
use crate::sequencer::{
    cycle_text, format_countdown, CueEmitter, Gradient, OrbStyle, PhaseView, Presenter,
    Sequencer, TechniqueSummary, IDLE_LABEL, IDLE_TRANSITION, MIN_TRANSITION,
};
use crate::technique::{Catalog, Phase};
use crate::tui::orb::OrbAnimation;

/// Redraw cadence while the orb is moving.
const FRAME_INTERVAL: Duration = Duration::from_millis(33);

/// What the UI shows; updated by the sequencer.
#[derive(Debug, Clone)]
pub struct Screen {
    /// Selected technique, if any.
    pub summary: Option<TechniqueSummary>,
    /// Phase label, `Ready` when idle.
    pub phase_label: String,
    /// Current phase, `None` when idle.
    pub phase: Option<Phase>,
    /// Remaining phase time, e.g. `03.8`.
    pub countdown: String,
    /// `Cycle N / M`.
    pub cycle: String,
    /// Background gradient.
    pub gradient: Gradient,
    /// Orb size and glow.
    pub orb: OrbAnimation,
    finished_at: Option<Instant>,
}

impl Screen {
    fn new(now: Instant) -> Self {
        Self {
            summary: None,
            phase_label: IDLE_LABEL.to_string(),
            phase: None,
            countdown: format_countdown(Duration::ZERO),
            cycle: cycle_text(0, 0),
            gradient: Gradient::Idle,
            orb: OrbAnimation::resting(OrbStyle::IDLE, now),
            finished_at: None,
        }
    }
}

impl Presenter for Screen {
    fn technique_selected(&mut self, summary: &TechniqueSummary) {
        self.summary = Some(summary.clone());
    }

    fn duration_changed(&mut self, cycles: u32, duration: &str) {
        if let Some(summary) = self.summary.as_mut() {
            summary.cycles = cycles;
            summary.duration = duration.to_string();
        }
    }

    fn session_started(&mut self) {
        self.gradient = Gradient::Active;
    }

    fn phase_started(&mut self, view: &PhaseView) {
        self.phase_label.clone_from(&view.label);
        self.phase = Some(view.phase);
        self.cycle = view.cycle_text();
        self.orb.retarget(
            view.started_at,
            view.orb_style(),
            view.transition.max(MIN_TRANSITION),
        );
    }

    fn countdown(&mut self, remaining: Duration) {
        self.countdown = format_countdown(remaining);
    }

    fn session_finished(&mut self, at: Instant) {
        self.finished_at = Some(at);
    }

    fn idle(&mut self) {
        self.phase_label = IDLE_LABEL.to_string();
        self.phase = None;
        self.countdown = format_countdown(Duration::ZERO);
        self.cycle = cycle_text(0, 0);
        self.gradient = Gradient::Idle;
        let at = self.finished_at.take().unwrap_or_else(Instant::now);
        self.orb.retarget(at, OrbStyle::IDLE, IDLE_TRANSITION);
    }
}

/// Application state.
pub struct App {
    /// The session driver; its presenter is the [`Screen`].
    pub sequencer: Sequencer<Screen, Box<dyn CueEmitter>>,
    /// Status message to display.
    pub status: Option<String>,
    /// Whether the app should quit.
    pub should_quit: bool,
}

impl App {
    /// Create the app and select the initial technique.
    ///
    /// `initial` wins over `config.default_technique`; an unknown id is
    /// reported in the status bar and the first technique is selected
    /// instead.
    pub fn new(
        catalog: Catalog,
        config: &SessionConfig,
        initial: Option<&str>,
        cue: Box<dyn CueEmitter>,
    ) -> Self {
        let sequencer = Sequencer::new(catalog, Screen::new(Instant::now()), cue)
            .with_countdown_interval(config.countdown_interval())
            .with_sound(config.sound);

        let mut app = Self {
            sequencer,
            status: None,
            should_quit: false,
        };

        let wanted = initial.or(config.default_technique.as_deref());
        match wanted.map(|id| app.sequencer.select(id)) {
            Some(Ok(())) => {}
            Some(Err(e)) => {
                app.status = Some(e.to_string());
                app.sequencer.select_next();
            }
            None => app.sequencer.select_next(),
        }

        app
    }

    /// The view state.
    pub fn screen(&self) -> &Screen {
        self.sequencer.presenter()
    }

    /// Start a session.
    pub fn start(&mut self, now: Instant) {
        self.sequencer.start(now);
        self.status = None;
    }

    /// Stop the session.
    pub fn stop(&mut self) {
        self.sequencer.stop();
    }

    /// Stop if running, otherwise quit.
    pub fn stop_or_quit(&mut self) {
        if self.sequencer.is_running() {
            self.stop();
        } else {
            self.should_quit = true;
        }
    }

    /// Select the next technique.
    pub fn select_next(&mut self) {
        self.sequencer.select_next();
    }

    /// Select the previous technique.
    pub fn select_previous(&mut self) {
        self.sequencer.select_previous();
    }

    /// Add a cycle.
    pub fn more_cycles(&mut self) {
        self.adjust_cycles(1);
    }

    /// Remove a cycle; never goes below one.
    pub fn fewer_cycles(&mut self) {
        self.adjust_cycles(-1);
    }

    fn adjust_cycles(&mut self, delta: i64) {
        if let Some(cycles) = self.sequencer.cycles() {
            self.sequencer.set_cycles(i64::from(cycles) + delta);
        }
    }

    /// Flip the sound toggle.
    pub fn toggle_sound(&mut self) {
        let enabled = self.sequencer.toggle_sound();
        self.status = Some(if enabled { "Sound on" } else { "Sound off" }.to_string());
    }

    /// Fire due timers.
    pub fn tick(&mut self, now: Instant) {
        self.sequencer.poll(now);
    }

    /// How long the event loop may wait for input before redrawing.
    pub fn poll_timeout(&self, now: Instant) -> Duration {
        let mut timeout = self.sequencer.countdown_interval();
        if self.screen().orb.is_animating(now) {
            timeout = timeout.min(FRAME_INTERVAL);
        }
        if let Some(deadline) = self.sequencer.next_deadline() {
            timeout = timeout.min(deadline.saturating_duration_since(now));
        }
        timeout
    }
}
