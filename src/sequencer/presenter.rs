//! The rendering side of the sequencer.
//!
//! The sequencer never draws anything itself. It hands plain view data to a
//! [`Presenter`], which front ends implement.

use std::time::{Duration, Instant};

use serde::Serialize;

use crate::technique::{format_duration, Phase, Technique};

/// Phase label shown while no session is running.
pub const IDLE_LABEL: &str = "Ready";

/// Orb transition used when returning to idle.
pub const IDLE_TRANSITION: Duration = Duration::from_millis(600);

/// Shortest orb transition; very short steps are eased over at least this.
pub const MIN_TRANSITION: Duration = Duration::from_millis(100);

/// Receives everything the sequencer wants shown.
pub trait Presenter {
    /// A technique was selected: show its name, ratio, default cycles and
    /// total duration.
    fn technique_selected(&mut self, summary: &TechniqueSummary);

    /// The cycle count changed; `duration` is the new total as `MM:SS`.
    fn duration_changed(&mut self, cycles: u32, duration: &str);

    /// A session started; switch to the active gradient.
    fn session_started(&mut self);

    /// A new phase began.
    fn phase_started(&mut self, view: &PhaseView);

    /// Time left in the current phase. Never negative.
    fn countdown(&mut self, remaining: Duration);

    /// The last phase ended at `at`; [`idle`](Self::idle) follows.
    fn session_finished(&mut self, _at: Instant) {}

    /// Back to idle: `Ready`, `00.0`, `Cycle 0 / 0`, idle orb and gradient.
    fn idle(&mut self);
}

/// Everything needed to render a phase change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhaseView {
    /// Human-readable label, e.g. `Hold after`.
    pub label: String,
    /// Phase category, used for styling and cues.
    pub phase: Phase,
    /// How long the orb should take to reach its new size.
    #[serde(with = "duration_secs")]
    pub transition: Duration,
    /// When the phase began in the sequencer's time base. Earlier than the
    /// wall clock when a late poll catches up.
    #[serde(skip)]
    pub started_at: Instant,
    /// Zero-based index of the current cycle.
    pub cycle_index: u32,
    /// Total cycles in this session.
    pub cycles: u32,
}

impl PhaseView {
    /// `Cycle N / M` text for this phase.
    #[must_use]
    pub fn cycle_text(&self) -> String {
        cycle_text(self.cycle_index + 1, self.cycles)
    }

    /// Target orb style for this phase.
    #[must_use]
    pub const fn orb_style(&self) -> OrbStyle {
        OrbStyle::for_phase(self.phase)
    }
}

/// Header data for a selected technique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TechniqueSummary {
    /// Technique id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Ratio string as defined by the technique.
    pub ratio: String,
    /// Cycle count in effect.
    pub cycles: u32,
    /// Total duration as `MM:SS`.
    pub duration: String,
}

impl TechniqueSummary {
    /// Summarize a technique with the given cycle count.
    #[must_use]
    pub fn new(technique: &Technique, cycles: u32) -> Self {
        let cycles = cycles.max(1);
        Self {
            id: technique.id.clone(),
            name: technique.name.clone(),
            ratio: technique.ratio.clone(),
            cycles,
            duration: format_duration(technique.total_seconds(cycles)),
        }
    }

    /// `Ratio 4-4-4-4`.
    #[must_use]
    pub fn ratio_text(&self) -> String {
        format!("Ratio {}", self.ratio)
    }

    /// `Duration 01:04`.
    #[must_use]
    pub fn duration_text(&self) -> String {
        format!("Duration {}", self.duration)
    }
}

/// Size and glow of the orb for a phase.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OrbStyle {
    /// Scale relative to the resting size.
    pub scale: f64,
    /// Glow intensity, 0.0 - 1.0.
    pub glow: f64,
}

impl OrbStyle {
    /// Style shown while idle. Same as exhale.
    pub const IDLE: Self = Self::for_phase(Phase::Exhale);

    /// Style for a phase.
    #[must_use]
    pub const fn for_phase(phase: Phase) -> Self {
        match phase {
            Phase::Inhale => Self { scale: 1.2, glow: 0.7 },
            Phase::Hold => Self { scale: 1.2, glow: 0.45 },
            Phase::Exhale => Self { scale: 0.9, glow: 0.2 },
            Phase::HoldAfter => Self { scale: 0.95, glow: 0.25 },
        }
    }
}

/// Background gradient state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Gradient {
    /// No session running.
    #[default]
    Idle,
    /// A session is running.
    Active,
}

impl Gradient {
    /// Three colour stops, top to bottom.
    #[must_use]
    pub const fn palette(&self) -> [Rgb; 3] {
        match self {
            Self::Idle => [
                Rgb(0xff, 0xf2, 0xcf),
                Rgb(0xff, 0xd0, 0x8a),
                Rgb(0xf0, 0x6a, 0x3f),
            ],
            Self::Active => [
                Rgb(0xff, 0xe1, 0x9e),
                Rgb(0xff, 0xb2, 0x4b),
                Rgb(0xe2, 0x4b, 0x2f),
            ],
        }
    }
}

/// An sRGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// `#rrggbb` notation.
    #[must_use]
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }

    /// Blend towards `other`; `t` is clamped to 0.0 - 1.0.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn mix(&self, other: Self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        let lerp = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8;
        Self(lerp(self.0, other.0), lerp(self.1, other.1), lerp(self.2, other.2))
    }
}

/// Format remaining phase time with one decimal, zero-padded to four
/// characters (`04.0`).
#[must_use]
pub fn format_countdown(remaining: Duration) -> String {
    format!("{:04.1}", remaining.as_secs_f64())
}

/// `Cycle N / M`.
#[must_use]
pub fn cycle_text(current: u32, total: u32) -> String {
    format!("Cycle {current} / {total}")
}

mod duration_secs {
    use std::time::Duration;

    use serde::Serializer;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.as_secs_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::technique::Step;

    #[test]
    fn test_format_countdown() {
        assert_eq!(format_countdown(Duration::from_secs(4)), "04.0");
        assert_eq!(format_countdown(Duration::from_millis(3800)), "03.8");
        assert_eq!(format_countdown(Duration::from_millis(12_340)), "12.3");
        assert_eq!(format_countdown(Duration::ZERO), "00.0");
    }

    #[test]
    fn test_cycle_text() {
        assert_eq!(cycle_text(0, 0), "Cycle 0 / 0");
        assert_eq!(cycle_text(2, 3), "Cycle 2 / 3");
    }

    #[test]
    fn test_orb_styles() {
        assert_eq!(OrbStyle::IDLE, OrbStyle::for_phase(Phase::Exhale));
        assert!(OrbStyle::for_phase(Phase::Inhale).scale > OrbStyle::IDLE.scale);
        assert!((OrbStyle::for_phase(Phase::HoldAfter).glow - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_gradient_palette() {
        let idle = Gradient::Idle.palette();
        assert_eq!(idle[0].hex(), "#fff2cf");
        assert_eq!(idle[2].hex(), "#f06a3f");
        assert_eq!(Gradient::Active.palette()[1].hex(), "#ffb24b");
    }

    #[test]
    fn test_rgb_mix() {
        let black = Rgb(0, 0, 0);
        let white = Rgb(255, 255, 255);
        assert_eq!(black.mix(white, 0.0), black);
        assert_eq!(black.mix(white, 1.0), white);
        assert_eq!(black.mix(white, 2.0), white);
        assert_eq!(black.mix(white, 0.5), Rgb(128, 128, 128));
    }

    #[test]
    fn test_summary_texts() {
        let technique = Technique {
            id: "calm".to_string(),
            name: "Calm".to_string(),
            ratio: "4-6".to_string(),
            cycles: 6,
            description: String::new(),
            steps: vec![Step::new(Phase::Inhale, 4.0), Step::new(Phase::Exhale, 6.0)],
        };
        let summary = TechniqueSummary::new(&technique, 6);
        assert_eq!(summary.ratio_text(), "Ratio 4-6");
        assert_eq!(summary.duration_text(), "Duration 01:00");

        let summary = TechniqueSummary::new(&technique, 0);
        assert_eq!(summary.cycles, 1);
        assert_eq!(summary.duration, "00:10");
    }
}
