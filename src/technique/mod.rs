//! Breathing techniques.
//!
//! A technique is an ordered list of timed phases repeated for a number of
//! cycles. Techniques are loaded from JSON and validated up front, so the
//! sequencer never sees a step with a non-positive length.

mod catalog;
mod types;

pub use catalog::Catalog;
pub use types::{format_duration, Phase, Step, Technique, MAX_STEP_SECONDS};
