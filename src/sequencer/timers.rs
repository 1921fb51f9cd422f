//! Virtual timers owned by the sequencer.
//!
//! The sequencer never sleeps. It records when the next phase change and the
//! next countdown refresh are due, and the front end calls back with the
//! current time. Every timer carries the generation of the session that
//! armed it.

use std::time::{Duration, Instant};

/// Single-shot timer that drives the next phase change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PhaseTimer {
    pub generation: u64,
    pub due: Instant,
}

/// Periodic timer that refreshes the countdown display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CountdownTicker {
    generation: u64,
    period: Duration,
    next: Instant,
}

#[derive(Debug, Default)]
pub(crate) struct Timers {
    advance: Option<PhaseTimer>,
    countdown: Option<CountdownTicker>,
}

impl Timers {
    /// Arm the phase timer, replacing any outstanding one.
    pub fn arm_advance(&mut self, generation: u64, due: Instant) {
        self.advance = Some(PhaseTimer { generation, due });
    }

    /// Arm the countdown ticker; first tick one period after `now`.
    pub fn arm_countdown(&mut self, generation: u64, period: Duration, now: Instant) {
        self.countdown = Some(CountdownTicker {
            generation,
            period,
            next: now.checked_add(period).unwrap_or(now),
        });
    }

    /// Cancel both timers.
    pub fn cancel_all(&mut self) {
        self.advance = None;
        self.countdown = None;
    }

    /// Remove and return the phase timer if it is due at `now`.
    pub fn take_due_advance(&mut self, now: Instant) -> Option<PhaseTimer> {
        if self.advance.is_some_and(|timer| timer.due <= now) {
            self.advance.take()
        } else {
            None
        }
    }

    /// If the countdown is due, re-arm it and return its generation.
    ///
    /// Missed ticks are skipped: the next tick is one period after `now`.
    pub fn take_due_tick(&mut self, now: Instant) -> Option<u64> {
        let ticker = self.countdown.as_mut()?;
        if ticker.next > now {
            return None;
        }
        ticker.next = now.checked_add(ticker.period).unwrap_or(now);
        Some(ticker.generation)
    }

    /// When the phase timer fires, if armed.
    pub fn advance_due(&self) -> Option<Instant> {
        self.advance.map(|timer| timer.due)
    }

    /// Earliest instant at which either timer fires.
    pub fn next_deadline(&self) -> Option<Instant> {
        let tick = self.countdown.map(|ticker| ticker.next);
        match (self.advance_due(), tick) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    pub const fn is_idle(&self) -> bool {
        self.advance.is_none() && self.countdown.is_none()
    }
}
