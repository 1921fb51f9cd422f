//! The phase sequencer state machine.

use std::time::{Duration, Instant};

use serde::Serialize;

use crate::error::BreatheError;
use crate::sequencer::cue::{CueEmitter, Tone};
use crate::sequencer::presenter::{PhaseView, Presenter, TechniqueSummary};
use crate::sequencer::timers::Timers;
use crate::technique::{format_duration, Catalog, Phase, Technique};

/// Default cadence of countdown refreshes.
pub const DEFAULT_COUNTDOWN_INTERVAL: Duration = Duration::from_millis(100);

const MIN_COUNTDOWN_INTERVAL: Duration = Duration::from_millis(1);
const MAX_COUNTDOWN_INTERVAL: Duration = Duration::from_secs(60);

/// A running breathing session.
///
/// Created by [`Sequencer::start`] and dropped by [`Sequencer::stop`] or on
/// completion, so a session that exists is always running.
#[derive(Debug, Clone)]
pub struct Session {
    technique: Technique,
    cycle_index: u32,
    phase_index: usize,
    phase_ends_at: Instant,
    generation: u64,
}

impl Session {
    fn new(technique: Technique, generation: u64, now: Instant) -> Self {
        Self {
            technique,
            cycle_index: 0,
            phase_index: 0,
            phase_ends_at: now,
            generation,
        }
    }

    /// The technique being run, with the session's cycle count.
    #[must_use]
    pub const fn technique(&self) -> &Technique {
        &self.technique
    }

    /// Zero-based index of the current cycle.
    #[must_use]
    pub const fn cycle_index(&self) -> u32 {
        self.cycle_index
    }

    /// Index of the next step to show.
    #[must_use]
    pub const fn phase_index(&self) -> usize {
        self.phase_index
    }

    /// When the current phase ends.
    #[must_use]
    pub const fn phase_ends_at(&self) -> Instant {
        self.phase_ends_at
    }

    /// Generation this session was started with.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// The step currently being shown.
    #[must_use]
    pub fn current_phase(&self) -> Option<Phase> {
        self.phase_index
            .checked_sub(1)
            .and_then(|i| self.technique.steps.get(i))
            .map(|step| step.phase)
    }
}

/// Observable state of the sequencer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum SequencerState {
    /// No session.
    Idle,
    /// A session is showing `phase`.
    Running {
        /// Phase being shown.
        phase: Phase,
        /// Zero-based cycle index.
        cycle_index: u32,
        /// Zero-based index of the shown step.
        step_index: usize,
    },
}

/// Drives a breathing session through its phases.
///
/// The sequencer is single-threaded and clock-free: callers pass the current
/// `Instant` into [`start`](Self::start) and [`poll`](Self::poll), and ask
/// [`next_deadline`](Self::next_deadline) how long they may sleep.
pub struct Sequencer<P: Presenter, C: CueEmitter> {
    catalog: Catalog,
    selected: Option<usize>,
    cycles_input: Option<u32>,
    session: Option<Session>,
    generation: u64,
    timers: Timers,
    presenter: P,
    cue: C,
    sound_enabled: bool,
    countdown_interval: Duration,
}

impl<P: Presenter, C: CueEmitter> Sequencer<P, C> {
    /// Create an idle sequencer with nothing selected.
    pub fn new(catalog: Catalog, presenter: P, cue: C) -> Self {
        Self {
            catalog,
            selected: None,
            cycles_input: None,
            session: None,
            generation: 0,
            timers: Timers::default(),
            presenter,
            cue,
            sound_enabled: true,
            countdown_interval: DEFAULT_COUNTDOWN_INTERVAL,
        }
    }

    /// Set the countdown refresh cadence, kept between one millisecond and
    /// one minute.
    #[must_use]
    pub fn with_countdown_interval(mut self, interval: Duration) -> Self {
        self.countdown_interval = interval.clamp(MIN_COUNTDOWN_INTERVAL, MAX_COUNTDOWN_INTERVAL);
        self
    }

    /// Set whether cues are played.
    #[must_use]
    pub const fn with_sound(mut self, enabled: bool) -> Self {
        self.sound_enabled = enabled;
        self
    }

    // ==================== Selection ====================

    /// Select a technique by id.
    ///
    /// Stops any running session first, then shows the technique's ratio,
    /// default cycles and duration. The cycle override is reset.
    ///
    /// # Errors
    ///
    /// Returns `BreatheError::NotFound` if no technique has this id. Nothing
    /// changes in that case.
    pub fn select(&mut self, id: &str) -> Result<(), BreatheError> {
        let index = self
            .catalog
            .position(id)
            .ok_or_else(|| BreatheError::NotFound(id.to_string()))?;
        self.select_index(index);
        Ok(())
    }

    /// Select the next technique in load order, wrapping around.
    pub fn select_next(&mut self) {
        let next = self.selected.map_or(0, |i| (i + 1) % self.catalog.len());
        self.select_index(next);
    }

    /// Select the previous technique in load order, wrapping around.
    pub fn select_previous(&mut self) {
        let len = self.catalog.len();
        let previous = self.selected.map_or(len - 1, |i| (i + len - 1) % len);
        self.select_index(previous);
    }

    fn select_index(&mut self, index: usize) {
        self.stop();
        self.selected = Some(index);
        self.cycles_input = None;

        if let Some(technique) = self.catalog.at(index) {
            tracing::debug!(technique = %technique.id, "Technique selected");
            let summary = TechniqueSummary::new(technique, technique.cycles);
            self.presenter.technique_selected(&summary);
        }
    }

    /// Override the number of cycles. Values below one become one.
    ///
    /// Returns the cycle count now in effect.
    pub fn set_cycles(&mut self, requested: i64) -> u32 {
        let cycles = u32::try_from(requested.max(1)).unwrap_or(u32::MAX);
        self.cycles_input = Some(cycles);

        if let Some(duration) = self.duration_text() {
            self.presenter.duration_changed(cycles, &duration);
        }
        cycles
    }

    /// Turn cues on or off. Takes effect from the next phase.
    pub fn set_sound_enabled(&mut self, enabled: bool) {
        self.sound_enabled = enabled;
    }

    /// Flip the sound toggle and return the new value.
    pub fn toggle_sound(&mut self) -> bool {
        self.sound_enabled = !self.sound_enabled;
        self.sound_enabled
    }

    // ==================== Session control ====================

    /// Start a session with the selected technique.
    ///
    /// Does nothing when no technique is selected. A running session is
    /// replaced.
    pub fn start(&mut self, now: Instant) {
        let Some(technique) = self.technique() else {
            tracing::debug!("Start ignored, no technique selected");
            return;
        };
        let cycles = self.cycles_input.unwrap_or(technique.cycles).max(1);
        let technique = technique.with_cycles(cycles);

        self.timers.cancel_all();
        self.generation += 1;

        tracing::info!(
            technique = %technique.id,
            cycles,
            generation = self.generation,
            "Session started"
        );

        self.cue.prepare();
        self.presenter.session_started();
        self.session = Some(Session::new(technique, self.generation, now));
        self.timers
            .arm_countdown(self.generation, self.countdown_interval, now);

        self.advance(now);
    }

    /// Stop the session and return to idle. Safe to call repeatedly.
    pub fn stop(&mut self) {
        self.timers.cancel_all();

        if let Some(session) = self.session.take() {
            tracing::info!(
                technique = %session.technique.id,
                cycle = session.cycle_index,
                generation = session.generation,
                "Session stopped"
            );
        }

        self.presenter.idle();
    }

    /// Fire every timer that is due at `now`.
    ///
    /// Phase timers fire at their own deadline, so a late poll catches up on
    /// every missed phase without drift.
    pub fn poll(&mut self, now: Instant) {
        while let Some(timer) = self.timers.take_due_advance(now) {
            self.fire_advance(timer.generation, timer.due);
        }

        if let Some(generation) = self.timers.take_due_tick(now) {
            if generation == self.generation && self.session.is_some() {
                self.refresh_countdown(now);
            } else {
                tracing::debug!(generation, current = self.generation, "Dropped stale countdown tick");
            }
        }
    }

    /// Phase timer callback for an external timer driver.
    ///
    /// Ignored unless `generation` belongs to the running session.
    pub fn fire_advance(&mut self, generation: u64, now: Instant) {
        let current = self.session.as_ref().map(Session::generation);
        if current != Some(generation) {
            tracing::debug!(generation, ?current, "Dropped stale phase timer");
            return;
        }
        self.advance(now);
    }

    fn advance(&mut self, now: Instant) {
        let Some(session) = self.session.as_mut() else {
            return;
        };

        if session.phase_index >= session.technique.steps.len() {
            session.phase_index = 0;
            session.cycle_index += 1;
        }

        if session.cycle_index >= session.technique.cycles {
            tracing::info!(
                technique = %session.technique.id,
                cycles = session.technique.cycles,
                "Session complete"
            );
            self.presenter.session_finished(now);
            self.stop();
            return;
        }

        let step = session.technique.steps[session.phase_index];
        let duration = step.duration();
        let Some(ends_at) = now.checked_add(duration) else {
            tracing::warn!(seconds = step.seconds, "Phase end out of range, stopping session");
            self.stop();
            return;
        };
        let view = PhaseView {
            label: step.phase.label(),
            phase: step.phase,
            transition: duration,
            started_at: now,
            cycle_index: session.cycle_index,
            cycles: session.technique.cycles,
        };

        session.phase_ends_at = ends_at;
        session.phase_index += 1;
        let generation = session.generation;

        tracing::debug!(
            phase = %view.phase,
            cycle = view.cycle_index + 1,
            seconds = step.seconds,
            "Phase started"
        );

        self.presenter.phase_started(&view);
        if self.sound_enabled {
            self.cue.play(&Tone::for_phase(step.phase));
        }
        self.refresh_countdown(now);

        self.timers.arm_advance(generation, ends_at);
    }

    fn refresh_countdown(&mut self, now: Instant) {
        let remaining = self.remaining(now);
        self.presenter.countdown(remaining);
    }

    // ==================== Accessors ====================

    /// Loaded techniques.
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Selected technique with its default cycle count.
    pub fn technique(&self) -> Option<&Technique> {
        self.selected.and_then(|i| self.catalog.at(i))
    }

    /// Cycle count that the next session would use.
    pub fn cycles(&self) -> Option<u32> {
        let technique = self.technique()?;
        Some(self.cycles_input.unwrap_or(technique.cycles).max(1))
    }

    /// Total length of the next session, in seconds.
    pub fn total_seconds(&self) -> Option<f64> {
        let cycles = self.cycles()?;
        self.technique().map(|t| t.total_seconds(cycles))
    }

    /// Total length of the next session as `MM:SS`.
    pub fn duration_text(&self) -> Option<String> {
        self.total_seconds().map(format_duration)
    }

    /// Summary of the selected technique with the cycle count in effect.
    pub fn summary(&self) -> Option<TechniqueSummary> {
        let cycles = self.cycles()?;
        self.technique().map(|t| TechniqueSummary::new(t, cycles))
    }

    /// The running session, if any.
    pub const fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Whether a session is running.
    pub const fn is_running(&self) -> bool {
        self.session.is_some()
    }

    /// Current state.
    pub fn state(&self) -> SequencerState {
        match &self.session {
            Some(session) => match session.current_phase() {
                Some(phase) => SequencerState::Running {
                    phase,
                    cycle_index: session.cycle_index,
                    step_index: session.phase_index - 1,
                },
                None => SequencerState::Idle,
            },
            None => SequencerState::Idle,
        }
    }

    /// Time left in the current phase; zero when idle or overdue.
    pub fn remaining(&self, now: Instant) -> Duration {
        self.session
            .as_ref()
            .map_or(Duration::ZERO, |s| s.phase_ends_at.saturating_duration_since(now))
    }

    /// Generation of the most recent session.
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// When the next phase change is due.
    pub fn next_phase_at(&self) -> Option<Instant> {
        self.timers.advance_due()
    }

    /// Earliest instant at which [`poll`](Self::poll) has work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    /// Whether no timer is outstanding.
    pub const fn timers_idle(&self) -> bool {
        self.timers.is_idle()
    }

    /// Countdown refresh cadence.
    pub const fn countdown_interval(&self) -> Duration {
        self.countdown_interval
    }

    /// Whether cues are played.
    pub const fn sound_enabled(&self) -> bool {
        self.sound_enabled
    }

    /// The presenter.
    pub const fn presenter(&self) -> &P {
        &self.presenter
    }

    /// The presenter, mutably.
    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    /// The cue emitter.
    pub const fn cue(&self) -> &C {
        &self.cue
    }
}
