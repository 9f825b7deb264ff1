// Timer state and cue events

use crate::sequence::{Activity, Phase, Step};

/// Countdown state exposed to the display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerState {
    pub current_phase: Phase,
    /// Current HIIT round, 0 outside the HIIT block
    pub round_index: u32,
    /// Activity of the current step
    pub sub_phase: Activity,
    /// Seconds left in the current step
    pub time_left: u32,
    pub is_active: bool,
    /// Seconds of countdown consumed since the start of the sequence
    pub total_time_elapsed: u32,
}

impl TimerState {
    /// State positioned at the start of `step`
    pub fn at_step(step: &Step, is_active: bool) -> Self {
        Self {
            current_phase: step.phase,
            round_index: step.round.unwrap_or(0),
            sub_phase: step.activity,
            time_left: step.duration,
            is_active,
            total_time_elapsed: step.cumulative_time_before,
        }
    }
}

/// Side-channel event emitted by a playback transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// Countdown about to expire (3, 2, 1 seconds left)
    Warning,
    /// Step boundary crossed during normal countdown (flash + tone)
    Transition,
    /// Final step reached zero
    Completed,
}
