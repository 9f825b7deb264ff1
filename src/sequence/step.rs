// Step - One timed unit of the compiled sequence

use serde::Serialize;
use std::fmt;

/// Coarse section of a routine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Phase {
    Warmup,
    Hiit,
    Stretch,
}

impl Phase {
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Warmup => "WARMUP",
            Phase::Hiit => "HIIT",
            Phase::Stretch => "STRETCH",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Fine-grained state within a phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Activity {
    Ready,
    Work,
    Rest,
}

impl Activity {
    pub fn label(&self) -> &'static str {
        match self {
            Activity::Ready => "GET READY",
            Activity::Work => "WORK",
            Activity::Rest => "REST",
        }
    }
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Compiled step
///
/// Ephemeral: a whole new list is built whenever the routine changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Step {
    pub phase: Phase,
    /// Display name (never empty)
    pub name: String,
    /// Duration in seconds
    pub duration: u32,
    pub activity: Activity,
    /// 1-based round number, HIIT steps only
    pub round: Option<u32>,
    /// Display name of the following step, or the completion marker
    pub next_name: String,
    /// Sum of the durations of all previous steps
    pub cumulative_time_before: u32,
}

impl Step {
    /// Elapsed time once this step has run to the end
    pub fn cumulative_time_after(&self) -> u32 {
        self.cumulative_time_before.saturating_add(self.duration)
    }
}
