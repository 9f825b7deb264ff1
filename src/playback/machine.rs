// Playback state machine - Countdown, navigation and cue emission
//
// All transitions run to completion and never fail for in-range input.
// Out-of-range navigation is clamped or ignored.

use super::state::{Cue, TimerState};
use crate::routine::Routine;
use crate::sequence::{Step, compile};

/// Seconds-left values that trigger the countdown warning
const WARNING_SECONDS: [u32; 3] = [3, 2, 1];

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PlaybackError {
    #[error("Cannot play an empty sequence")]
    EmptySequence,
}

/// Drives a live countdown across a compiled step list
///
/// Invariants: `position < steps.len()` and
/// `state.time_left <= steps[position].duration`.
#[derive(Debug, Clone)]
pub struct PlaybackMachine {
    steps: Vec<Step>,
    position: usize,
    state: TimerState,
}

impl PlaybackMachine {
    /// Create a machine over an already compiled sequence
    pub fn new(steps: Vec<Step>) -> Result<Self, PlaybackError> {
        let first = steps.first().ok_or(PlaybackError::EmptySequence)?;
        let state = TimerState::at_step(first, false);
        Ok(Self {
            steps,
            position: 0,
            state,
        })
    }

    /// Compile `routine` and create a machine at its first step
    pub fn from_routine(routine: &Routine) -> Self {
        let steps = compile(routine);
        // The ready step is always emitted, so the list is never empty
        let state = TimerState::at_step(&steps[0], false);
        Self {
            steps,
            position: 0,
            state,
        }
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn current_step(&self) -> &Step {
        &self.steps[self.position]
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active
    }

    /// Final step ran out and the countdown stopped
    pub fn is_finished(&self) -> bool {
        self.position + 1 == self.steps.len() && self.state.time_left == 0 && !self.state.is_active
    }

    /// Total duration of the sequence in seconds
    pub fn total_duration(&self) -> u32 {
        self.steps
            .iter()
            .fold(0u32, |total, s| total.saturating_add(s.duration))
    }

    /// Back to the first step, paused, nothing elapsed
    pub fn reset(&mut self) {
        self.position = 0;
        self.state = TimerState::at_step(&self.steps[0], false);
        log::debug!("Playback reset");
    }

    /// Flip between running and paused, returning the new running flag
    pub fn toggle(&mut self) -> bool {
        self.state.is_active = !self.state.is_active;
        log::debug!(
            "Playback {} at step {}",
            if self.state.is_active { "started" } else { "paused" },
            self.position
        );
        self.state.is_active
    }

    /// Consume one second of countdown
    ///
    /// Emits a warning cue when the new value is 3, 2 or 1. When the
    /// countdown hits zero the step expires within the same transition:
    /// the machine moves to the next step (transition cue) or stops at the
    /// end of the sequence (completion cue). Does nothing while paused.
    pub fn tick(&mut self) -> Option<Cue> {
        if !self.state.is_active {
            return None;
        }

        if self.state.time_left > 0 {
            self.state.time_left -= 1;
            self.state.total_time_elapsed = self.state.total_time_elapsed.saturating_add(1);

            if WARNING_SECONDS.contains(&self.state.time_left) {
                return Some(Cue::Warning);
            }
        }

        if self.state.time_left == 0 {
            return Some(self.expire());
        }

        None
    }

    fn expire(&mut self) -> Cue {
        if self.position + 1 < self.steps.len() {
            self.sync_with_step(self.position + 1);
            log::debug!("Advanced to step {} ({})", self.position, self.current_step().name);
            Cue::Transition
        } else {
            self.state.is_active = false;
            log::info!("Sequence completed");
            Cue::Completed
        }
    }

    fn sync_with_step(&mut self, index: usize) {
        let is_active = self.state.is_active;
        self.position = index;
        self.state = TimerState::at_step(&self.steps[index], is_active);
    }

    /// Jump to `index`, clamped to the sequence bounds
    ///
    /// Keeps the running flag and emits no cue.
    pub fn seek_to(&mut self, index: usize) {
        let index = index.min(self.steps.len() - 1);
        self.sync_with_step(index);
    }

    /// Move one step forward; ignored on the last step
    pub fn next(&mut self) {
        if self.position + 1 < self.steps.len() {
            self.seek_to(self.position + 1);
        }
    }

    /// Move one step back; ignored on the first step
    pub fn prev(&mut self) {
        if self.position > 0 {
            self.seek_to(self.position - 1);
        }
    }
}
