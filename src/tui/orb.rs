//! Orb size animation.

use std::time::{Duration, Instant};

use crate::sequencer::OrbStyle;

/// Eases the orb from one style to another over a fixed duration.
#[derive(Debug, Clone, Copy)]
pub struct OrbAnimation {
    from: OrbStyle,
    to: OrbStyle,
    started: Instant,
    duration: Duration,
}

impl OrbAnimation {
    /// An orb sitting still at `style`.
    #[must_use]
    pub const fn resting(style: OrbStyle, now: Instant) -> Self {
        Self {
            from: style,
            to: style,
            started: now,
            duration: Duration::ZERO,
        }
    }

    /// Start moving towards `to`, beginning from wherever the orb is now.
    pub fn retarget(&mut self, now: Instant, to: OrbStyle, duration: Duration) {
        self.from = self.style_at(now);
        self.to = to;
        self.started = now;
        self.duration = duration;
    }

    /// Fraction of the transition completed at `now`, 0.0 - 1.0.
    #[must_use]
    pub fn progress(&self, now: Instant) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    /// Interpolated style at `now`.
    #[must_use]
    pub fn style_at(&self, now: Instant) -> OrbStyle {
        let progress = self.progress(now);
        if progress >= 1.0 {
            return self.to;
        }
        let t = ease_in_out(progress);
        OrbStyle {
            scale: lerp(self.from.scale, self.to.scale, t),
            glow: lerp(self.from.glow, self.to.glow, t),
        }
    }

    /// When the current transition began.
    #[must_use]
    pub const fn started(&self) -> Instant {
        self.started
    }

    /// Style the orb is heading for.
    #[must_use]
    pub const fn target(&self) -> OrbStyle {
        self.to
    }

    /// Whether the orb is still moving.
    #[must_use]
    pub fn is_animating(&self, now: Instant) -> bool {
        self.progress(now) < 1.0
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    (b - a).mul_add(t, a)
}

/// Smoothstep: slow at both ends.
fn ease_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    t * t * 2.0f64.mul_add(-t, 3.0)
}
