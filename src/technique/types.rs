//! Technique and step definitions.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::BreatheError;

/// Longest allowed step, one day.
pub const MAX_STEP_SECONDS: f64 = 86_400.0;

/// One phase of a breath.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Breathe in.
    Inhale,
    /// Hold with full lungs.
    Hold,
    /// Breathe out.
    Exhale,
    /// Hold with empty lungs.
    HoldAfter,
}

impl Phase {
    /// Machine name as it appears in technique files.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Inhale => "inhale",
            Self::Hold => "hold",
            Self::Exhale => "exhale",
            Self::HoldAfter => "hold_after",
        }
    }

    /// Human-readable label: underscores become spaces and the first letter
    /// is capitalized (`hold_after` -> `Hold after`).
    #[must_use]
    pub fn label(&self) -> String {
        let spaced = self.as_str().replace('_', " ");
        let mut chars = spaced.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single timed phase inside a technique.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Step {
    /// Which phase this step represents.
    pub phase: Phase,
    /// Length of the step in seconds. May be fractional.
    pub seconds: f64,
}

impl Step {
    /// Create a new step.
    #[must_use]
    pub const fn new(phase: Phase, seconds: f64) -> Self {
        Self { phase, seconds }
    }

    /// Step length as a `Duration`.
    ///
    /// Only meaningful for validated steps; non-positive lengths map to zero
    /// and lengths above [`MAX_STEP_SECONDS`] are capped.
    #[must_use]
    pub fn duration(&self) -> Duration {
        if self.seconds.is_nan() {
            return Duration::ZERO;
        }
        Duration::try_from_secs_f64(self.seconds.min(MAX_STEP_SECONDS)).unwrap_or(Duration::ZERO)
    }
}

/// A breathing technique: an ordered list of steps repeated for a number of
/// cycles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Technique {
    /// Unique identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Ratio string shown to the user, e.g. `4-4-4-4`.
    pub ratio: String,
    /// Default number of cycles.
    pub cycles: u32,
    /// Short description.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Steps of one cycle, in order.
    pub steps: Vec<Step>,
}

impl Technique {
    /// Sum of step lengths for a single cycle, in seconds.
    #[must_use]
    pub fn cycle_seconds(&self) -> f64 {
        self.steps.iter().map(|step| step.seconds).sum()
    }

    /// Total session length in seconds for the given number of cycles.
    ///
    /// The cycle count is clamped to at least one.
    #[must_use]
    pub fn total_seconds(&self, cycles: u32) -> f64 {
        self.cycle_seconds() * f64::from(cycles.max(1))
    }

    /// Copy of this technique with a different cycle count.
    #[must_use]
    pub fn with_cycles(&self, cycles: u32) -> Self {
        Self {
            cycles: cycles.max(1),
            ..self.clone()
        }
    }

    /// Check that the technique is usable by the sequencer.
    ///
    /// # Errors
    ///
    /// Returns `BreatheError::InvalidTechnique` for an empty id, zero cycles,
    /// no steps, or a step whose length is not a positive finite number of
    /// seconds up to [`MAX_STEP_SECONDS`].
    pub fn validate(&self) -> Result<(), BreatheError> {
        if self.id.trim().is_empty() {
            return Err(BreatheError::invalid(&self.id, "id must not be empty"));
        }
        if self.cycles == 0 {
            return Err(BreatheError::invalid(&self.id, "cycles must be at least 1"));
        }
        if self.steps.is_empty() {
            return Err(BreatheError::invalid(&self.id, "no steps defined"));
        }
        for (i, step) in self.steps.iter().enumerate() {
            if !step.seconds.is_finite() || step.seconds <= 0.0 {
                return Err(BreatheError::invalid(
                    &self.id,
                    format!(
                        "step {} ({}) has non-positive length {}",
                        i + 1,
                        step.phase,
                        step.seconds
                    ),
                ));
            }
            if step.seconds > MAX_STEP_SECONDS {
                return Err(BreatheError::invalid(
                    &self.id,
                    format!(
                        "step {} ({}) is longer than {MAX_STEP_SECONDS} seconds",
                        i + 1,
                        step.phase
                    ),
                ));
            }
        }
        Ok(())
    }
}

/// Format a number of seconds as `MM:SS`.
///
/// Fractional seconds are truncated, not rounded. Minutes are not capped.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn format_duration(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.trunc() as u64
    } else {
        0
    };
    let minutes = total / 60;
    let seconds = total % 60;
    format!("{minutes:02}:{seconds:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn box_breathing() -> Technique {
        Technique {
            id: "box".to_string(),
            name: "Box".to_string(),
            ratio: "4-4-4-2".to_string(),
            cycles: 3,
            description: String::new(),
            steps: vec![
                Step::new(Phase::Inhale, 4.0),
                Step::new(Phase::Hold, 4.0),
                Step::new(Phase::Exhale, 4.0),
                Step::new(Phase::HoldAfter, 2.0),
            ],
        }
    }

    #[test]
    fn test_phase_label() {
        assert_eq!(Phase::Inhale.label(), "Inhale");
        assert_eq!(Phase::Hold.label(), "Hold");
        assert_eq!(Phase::Exhale.label(), "Exhale");
        assert_eq!(Phase::HoldAfter.label(), "Hold after");
    }

    #[test]
    fn test_phase_serde_names() {
        let phase: Phase = serde_json::from_str("\"hold_after\"").unwrap();
        assert_eq!(phase, Phase::HoldAfter);
        assert_eq!(serde_json::to_string(&Phase::Inhale).unwrap(), "\"inhale\"");
        assert!(serde_json::from_str::<Phase>("\"sigh\"").is_err());
    }

    #[test]
    fn test_total_seconds() {
        let technique = box_breathing();
        assert!((technique.cycle_seconds() - 14.0).abs() < f64::EPSILON);
        assert!((technique.total_seconds(3) - 42.0).abs() < f64::EPSILON);
        // Zero cycles is treated as one
        assert!((technique.total_seconds(0) - 14.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_with_cycles_clamps() {
        let technique = box_breathing();
        assert_eq!(technique.with_cycles(7).cycles, 7);
        assert_eq!(technique.with_cycles(0).cycles, 1);
        assert_eq!(technique.with_cycles(7).steps, technique.steps);
    }

    #[test]
    fn test_validate_ok() {
        assert!(box_breathing().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_steps() {
        let mut technique = box_breathing();
        technique.steps[1].seconds = 0.0;
        let err = technique.validate().unwrap_err();
        assert!(err.to_string().contains("step 2 (hold)"));

        technique.steps[1].seconds = -1.0;
        assert!(technique.validate().is_err());

        technique.steps[1].seconds = f64::NAN;
        assert!(technique.validate().is_err());

        technique.steps.clear();
        assert!(technique.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_huge_steps() {
        let mut technique = box_breathing();
        technique.steps[0].seconds = MAX_STEP_SECONDS;
        assert!(technique.validate().is_ok());

        technique.steps[0].seconds = 1e19;
        let err = technique.validate().unwrap_err();
        assert!(matches!(err, BreatheError::InvalidTechnique { .. }));
        assert!(err.to_string().contains("step 1 (inhale) is longer than"));

        technique.steps[0].seconds = 1e20;
        assert!(technique.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_cycles_and_blank_id() {
        let mut technique = box_breathing();
        technique.cycles = 0;
        assert!(technique.validate().is_err());

        let mut technique = box_breathing();
        technique.id = "  ".to_string();
        assert!(technique.validate().is_err());
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(42.0), "00:42");
        assert_eq!(format_duration(90.0), "01:30");
        assert_eq!(format_duration(0.0), "00:00");
        assert_eq!(format_duration(59.9), "00:59");
        assert_eq!(format_duration(6000.0), "100:00");
        assert_eq!(format_duration(-3.0), "00:00");
    }

    #[test]
    fn test_step_duration() {
        assert_eq!(Step::new(Phase::Inhale, 1.5).duration(), Duration::from_millis(1500));
        assert_eq!(Step::new(Phase::Inhale, -1.0).duration(), Duration::ZERO);
        assert_eq!(Step::new(Phase::Inhale, f64::NAN).duration(), Duration::ZERO);
        assert_eq!(
            Step::new(Phase::Inhale, 1e20).duration(),
            Duration::from_secs(86_400)
        );
    }
}
