// Display frame - What the timer view consumes on every tick

use super::state::TimerState;
use crate::sequence::Step;

/// Format seconds as "m:ss"
pub fn format_clock(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Snapshot of the current step, timer state and sequence length
#[derive(Debug, Clone, Copy)]
pub struct DisplayFrame<'a> {
    pub step: &'a Step,
    pub timer: &'a TimerState,
    pub total_duration: u32,
}

impl<'a> DisplayFrame<'a> {
    pub fn new(step: &'a Step, timer: &'a TimerState, total_duration: u32) -> Self {
        Self {
            step,
            timer,
            total_duration,
        }
    }

    /// Seconds left in the whole sequence
    pub fn remaining_total(&self) -> u32 {
        self.total_duration
            .saturating_sub(self.timer.total_time_elapsed)
    }

    /// Whole-sequence progress in percent (0..=100)
    pub fn total_progress(&self) -> f32 {
        if self.total_duration == 0 {
            return 100.0;
        }
        let done = self.total_duration - self.remaining_total();
        (done as f32 / self.total_duration as f32 * 100.0).clamp(0.0, 100.0)
    }

    /// Progress through the current step (0.0..=1.0)
    pub fn step_progress(&self) -> f32 {
        if self.step.duration == 0 {
            return 1.0;
        }
        1.0 - self.timer.time_left as f32 / self.step.duration as f32
    }

    /// "HIIT // RND 2" style header
    pub fn phase_label(&self) -> String {
        if self.timer.round_index > 0 {
            format!("{} // RND {}", self.timer.current_phase, self.timer.round_index)
        } else {
            self.timer.current_phase.to_string()
        }
    }

    /// Underscores in names read as spaces on screen
    pub fn next_label(&self) -> String {
        self.step.next_name.replace('_', " ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::PlaybackMachine;
    use crate::routine::Routine;

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0), "0:00");
        assert_eq!(format_clock(9), "0:09");
        assert_eq!(format_clock(65), "1:05");
        assert_eq!(format_clock(600), "10:00");
    }

    #[test]
    fn test_remaining_total_tracks_ticks() {
        let mut machine = PlaybackMachine::from_routine(&Routine::default());
        let total = machine.total_duration();
        machine.toggle();
        for _ in 0..7 {
            machine.tick();
        }

        let frame = DisplayFrame::new(machine.current_step(), machine.state(), total);
        assert_eq!(frame.remaining_total(), total - 7);
        assert!(frame.total_progress() > 0.0);
    }

    #[test]
    fn test_remaining_total_after_seek() {
        let mut machine = PlaybackMachine::from_routine(&Routine::default());
        let total = machine.total_duration();
        machine.seek_to(2);

        let step = machine.current_step();
        let frame = DisplayFrame::new(step, machine.state(), total);
        assert_eq!(frame.remaining_total(), total - step.cumulative_time_before);
        assert_eq!(frame.step_progress(), 0.0);
    }

    #[test]
    fn test_phase_label_with_round() {
        let mut machine = PlaybackMachine::from_routine(&Routine::default());
        // ready + 3 warm-up steps, then the first HIIT work step
        machine.seek_to(4);
        let frame = DisplayFrame::new(
            machine.current_step(),
            machine.state(),
            machine.total_duration(),
        );
        assert_eq!(frame.phase_label(), "HIIT // RND 1");
    }
}
